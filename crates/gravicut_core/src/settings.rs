use serde::{Deserialize, Serialize};

use crate::types::{Frame, Zoom};
use crate::units;

/// Engine tuning stored alongside the project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub fps: u32,
    /// Floor below which neither resize edge may shrink a clip.
    pub min_duration_seconds: f64,
    pub snap_grid_px: f64,
    /// Also pull dragged clips onto neighbouring clip edges and the playhead.
    pub snap_to_edges: bool,
    /// Pointer travel that turns a press into a drag or resize.
    pub drag_tolerance_px: f64,
    pub autoscroll_edge_px: f64,
    pub autoscroll_step_px: f64,
    pub track_height_px: f64,
    pub edge_handle_px: f64,
    pub history_depth: usize,
    pub default_zoom: Zoom,
    pub max_track_volume: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: 30,
            min_duration_seconds: 0.5,
            snap_grid_px: 15.0,
            snap_to_edges: true,
            drag_tolerance_px: 4.0,
            autoscroll_edge_px: 40.0,
            autoscroll_step_px: 20.0,
            track_height_px: 60.0,
            edge_handle_px: 6.0,
            history_depth: 100,
            default_zoom: Zoom::default(),
            max_track_volume: 2.0,
        }
    }
}

impl Settings {
    pub fn with_fps(fps: u32) -> Self {
        Self {
            fps,
            ..Self::default()
        }
    }

    pub fn min_duration_frames(&self) -> Frame {
        let frames = units::seconds_to_frames(self.min_duration_seconds, self.fps);
        Frame(frames.0.max(1))
    }
}
