//! Media duration resolver backed by `ffprobe`.
//!
//! Probes run off the arrangement path and report back per clip id; the store only accepts a
//! result while that clip is still provisional.

pub mod error;
pub mod probe;
pub mod resolver;

pub use error::{ProbeError, Result};
pub use probe::{FfprobeProbe, MediaInfo, MediaProbe};
pub use resolver::{apply_resolved, pending_requests, resolve_all, DurationRequest, Resolved};
