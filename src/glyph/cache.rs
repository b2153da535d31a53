use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use crate::foundation::error::StickerResult;
use crate::glyph::provider::{GlyphImage, GlyphKey, GlyphProvider};

/// LRU decorator over any [`GlyphProvider`], keyed by the hex code point string.
///
/// Only successful fetches are cached, so a transient failure is retried on the next render.
pub struct CachedGlyphProvider<P> {
    inner: P,
    cache: Mutex<LruCache<GlyphKey, GlyphImage>>,
}

impl<P: GlyphProvider> CachedGlyphProvider<P> {
    /// Wrap `inner` with room for `capacity` glyphs.
    pub fn new(inner: P, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached glyphs.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Return `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P: GlyphProvider> GlyphProvider for CachedGlyphProvider<P> {
    fn fetch(&self, key: &GlyphKey) -> StickerResult<GlyphImage> {
        if let Some(hit) = self.cache.lock().get(key) {
            return Ok(hit.clone());
        }
        // The lock is not held across the fetch; two racing misses both fetch.
        let img = self.inner.fetch(key)?;
        self.cache.lock().put(key.clone(), img.clone());
        Ok(img)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/glyph/cache.rs"]
mod tests;
