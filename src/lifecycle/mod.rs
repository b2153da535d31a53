//! Output directory, job naming, and cleanup of intermediate files.

/// Artifact directory, [`artifacts::JobId`], and drop guards for temp files.
pub mod artifacts;
