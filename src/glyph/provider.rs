use std::io::Read as _;
use std::time::Duration;

use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

use crate::assets::decode::{DecodedImage, decode_image};
use crate::foundation::error::{StickerError, StickerResult};

/// Resolved bitmap for one pictographic grapheme.
pub type GlyphImage = DecodedImage;

/// Placeholder substituted with the hex code point string in address templates.
pub const CODEPOINTS_PLACEHOLDER: &str = "{codepoints}";

/// Lower-case hex code points of a grapheme joined by a separator, e.g. `1f44d-1f3fd`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlyphKey(String);

impl GlyphKey {
    /// Encode every scalar of `grapheme`, variation selectors and joiners included.
    pub fn from_grapheme(grapheme: &str, separator: &str) -> Self {
        let parts: Vec<String> = grapheme
            .chars()
            .map(|c| format!("{:x}", u32::from(c)))
            .collect();
        Self(parts.join(separator))
    }

    /// Borrow the encoded form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GlyphKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of bitmaps for pictographic graphemes.
///
/// Failures are reported as [`StickerError::Fetch`]; the compositor substitutes a filler box and
/// never propagates them.
pub trait GlyphProvider: Send + Sync {
    /// Fetch and decode the bitmap for `key`.
    fn fetch(&self, key: &GlyphKey) -> StickerResult<GlyphImage>;
}

/// Build a blocking HTTP agent backed by the platform TLS stack.
pub fn http_agent(timeout: Duration) -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(timeout))
        .build()
        .into()
}

/// GET `url` and return the body bytes.
pub(crate) fn http_get_bytes(agent: &Agent, url: &str) -> Result<Vec<u8>, String> {
    let mut body = agent
        .get(url)
        .header("User-Agent", "stickerforge")
        .call()
        .map_err(|e| format!("GET {url} failed: {e}"))?
        .into_body();

    let mut bytes = Vec::new();
    body.as_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| format!("reading {url} failed: {e}"))?;
    Ok(bytes)
}

/// Fetches glyph images from a templated HTTP(S) address, one GET per call.
pub struct RemoteGlyphProvider {
    agent: Agent,
    template: String,
}

impl RemoteGlyphProvider {
    /// Create a provider over `template`, which must contain [`CODEPOINTS_PLACEHOLDER`].
    pub fn new(agent: Agent, template: impl Into<String>) -> StickerResult<Self> {
        let template = template.into();
        if !template.contains(CODEPOINTS_PLACEHOLDER) {
            return Err(StickerError::validation(format!(
                "glyph url template '{template}' lacks {CODEPOINTS_PLACEHOLDER}"
            )));
        }
        Ok(Self { agent, template })
    }

    /// Address for `key`.
    pub fn url_for(&self, key: &GlyphKey) -> String {
        self.template.replace(CODEPOINTS_PLACEHOLDER, key.as_str())
    }
}

impl GlyphProvider for RemoteGlyphProvider {
    fn fetch(&self, key: &GlyphKey) -> StickerResult<GlyphImage> {
        let url = self.url_for(key);
        let bytes = http_get_bytes(&self.agent, &url).map_err(StickerError::fetch)?;
        decode_image(&bytes)
            .map_err(|e| StickerError::fetch(format!("decode glyph '{key}' from {url}: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/provider.rs"]
mod tests;
