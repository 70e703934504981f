use gravicut_core::units::seconds_to_frames;
use gravicut_core::Frame;
use serde::Deserialize;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ProbeError, Result};

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    streams: Vec<FfprobeStream>,
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    r_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// What the arrangement needs to know about a media file.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub duration_seconds: f64,
    pub has_video: bool,
    pub has_audio: bool,
    /// Native frame rate of the first video stream, 0 when there is none.
    pub native_fps: f64,
}

impl MediaInfo {
    /// Whole frames the media can supply at the project rate.
    pub fn duration_frames(&self, fps: u32) -> Frame {
        let exact = self.duration_seconds * fps as f64;
        let rounded = seconds_to_frames(self.duration_seconds, fps);
        // round only when within float noise, otherwise never promise a frame that isn't there
        let frames = if (exact - rounded.0 as f64).abs() < 1e-6 {
            rounded.0
        } else {
            exact.floor() as i64
        };
        Frame(frames.max(1))
    }
}

/// Source of media durations. Implemented over ffprobe; swappable for tests.
pub trait MediaProbe: Send + Sync + 'static {
    fn probe(&self, path: PathBuf) -> impl Future<Output = Result<MediaInfo>> + Send;
}

/// Probes by running the `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    pub binary: String,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self {
            binary: "ffprobe".to_string(),
        }
    }
}

impl MediaProbe for FfprobeProbe {
    fn probe(&self, path: PathBuf) -> impl Future<Output = Result<MediaInfo>> + Send {
        let binary = self.binary.clone();
        async move { probe_media(&binary, &path).await }
    }
}

/// Run ffprobe on a media file and parse the result.
pub async fn probe_media(binary: &str, path: &Path) -> Result<MediaInfo> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(ProbeError::FileNotFound(path.to_path_buf()));
    }

    let output = tokio::process::Command::new(binary)
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .await
        .map_err(|e| ProbeError::FfprobeExec(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ProbeError::FfprobeFailed(stderr.into_owned()));
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;
    let info = parse_probe_output(&probe, path)?;
    debug!(path = %path.display(), seconds = info.duration_seconds, "probed media");
    Ok(info)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn parse_probe_output(probe: &FfprobeOutput, path: &Path) -> Result<MediaInfo> {
    let video_stream = probe.streams.iter().find(|s| s.codec_type == "video");
    let audio_stream = probe.streams.iter().find(|s| s.codec_type == "audio");

    // container duration first, then whichever stream reports one
    let duration_seconds = probe
        .format
        .duration
        .as_deref()
        .and_then(parse_seconds)
        .or_else(|| {
            probe
                .streams
                .iter()
                .filter_map(|s| s.duration.as_deref().and_then(parse_seconds))
                .reduce(f64::max)
        })
        .ok_or_else(|| ProbeError::MissingDuration(path.to_path_buf()))?;

    let native_fps = video_stream
        .and_then(|s| s.r_frame_rate.as_deref())
        .and_then(parse_frame_rate)
        .unwrap_or(0.0);

    Ok(MediaInfo {
        duration_seconds,
        has_video: video_stream.is_some(),
        has_audio: audio_stream.is_some(),
        native_fps,
    })
}

fn parse_seconds(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s > 0.0)
}

/// Parse ffprobe frame rate string like "30000/1001" or "30/1" into f64.
fn parse_frame_rate(rate: &str) -> Option<f64> {
    if let Some((num, den)) = rate.split_once('/') {
        let n: f64 = num.parse().ok()?;
        let d: f64 = den.parse().ok()?;
        if d == 0.0 {
            return None;
        }
        Some(n / d)
    } else {
        rate.parse().ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
