//! Conversions between frames, seconds and timeline pixels.
//!
//! Pixel offsets are measured from the timeline origin (frame 0) at the given zoom, which is
//! expressed in pixels per second.

use crate::types::{Frame, Zoom};

pub fn seconds_to_frames(seconds: f64, fps: u32) -> Frame {
    Frame((seconds * fps as f64).round() as i64)
}

pub fn frames_to_seconds(frames: Frame, fps: u32) -> f64 {
    if fps == 0 {
        return 0.0;
    }
    frames.0 as f64 / fps as f64
}

pub fn frames_to_px(frames: Frame, zoom: Zoom, fps: u32) -> f64 {
    frames_to_seconds(frames, fps) * zoom.0
}

/// Nearest whole frame for a pixel offset.
pub fn px_to_frames(px: f64, zoom: Zoom, fps: u32) -> Frame {
    if zoom.0 <= 0.0 {
        return Frame::ZERO;
    }
    seconds_to_frames(px / zoom.0, fps)
}

/// Round a pixel offset to the nearest multiple of `grid`.
pub fn snap_px(px: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return px;
    }
    (px / grid).round() * grid
}

/// `HH:MM:SS:FF` timecode.
pub fn format_timecode(frames: Frame, fps: u32) -> String {
    let fps = fps.max(1) as i64;
    let total = frames.0.unsigned_abs() as i64;
    let ff = total % fps;
    let total_secs = total / fps;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;
    let sign = if frames.0 < 0 { "-" } else { "" };
    format!("{sign}{hours:02}:{mins:02}:{secs:02}:{ff:02}")
}
