use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use uuid::Uuid;

use crate::error::{CoreError, Result};

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// A position or length on the timeline, in whole frames at the project FPS.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Frame(pub i64);

impl Frame {
    pub const ZERO: Self = Self(0);
    /// Largest start or duration a committed clip may carry. Sums of many such spans still fit
    /// in an i64.
    pub const MAX_SPAN: Self = Self(1 << 40);

    pub fn clamp_non_negative(self) -> Self {
        Self(self.0.max(0))
    }
}

impl Add for Frame {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Frame {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Frame {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}f", self.0)
    }
}

// ---------------------------------------------------------------------------
// ClipKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClipKind {
    Video {
        src: String,
        source_duration: Option<Frame>,
        #[serde(default)]
        muted: bool,
    },
    Audio {
        src: String,
        source_duration: Option<Frame>,
        volume: f64,
    },
    Text {
        text: String,
        font_size: u32,
        color: String,
    },
    Solid {
        color: String,
    },
    Caption {
        text: String,
    },
}

impl ClipKind {
    pub fn label(&self) -> &'static str {
        match self {
            ClipKind::Video { .. } => "video",
            ClipKind::Audio { .. } => "audio",
            ClipKind::Text { .. } => "text",
            ClipKind::Solid { .. } => "solid",
            ClipKind::Caption { .. } => "caption",
        }
    }

    /// Frame count available from the underlying media, when known.
    pub fn source_duration(&self) -> Option<Frame> {
        match self {
            ClipKind::Video {
                source_duration, ..
            }
            | ClipKind::Audio {
                source_duration, ..
            } => *source_duration,
            ClipKind::Text { .. } | ClipKind::Solid { .. } | ClipKind::Caption { .. } => None,
        }
    }

    /// Whether the clip is backed by a media file whose length must be probed.
    pub fn is_media(&self) -> bool {
        matches!(self, ClipKind::Video { .. } | ClipKind::Audio { .. })
    }
}

// ---------------------------------------------------------------------------
// RenderOptions
// ---------------------------------------------------------------------------

/// Per-clip presentation values handed through to the renderer untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderOptions {
    pub x: i32,
    pub y: i32,
    pub scale: f64,
    pub opacity: f64,
    pub rotation: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            scale: 1.0,
            opacity: 1.0,
            rotation: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Clip
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clip {
    pub id: Uuid,
    pub start: Frame,
    pub duration: Frame,
    /// In-point into the source media.
    #[serde(default)]
    pub media_offset: Frame,
    /// Set while the duration is a placeholder awaiting the media probe.
    #[serde(default)]
    pub provisional: bool,
    #[serde(default)]
    pub render: RenderOptions,
    pub kind: ClipKind,
}

impl Clip {
    /// New clip at frame 0. A duration of one frame or less marks it provisional.
    pub fn new(kind: ClipKind, duration: Frame) -> Self {
        Self {
            id: Uuid::new_v4(),
            start: Frame::ZERO,
            duration: Frame(duration.0.max(1)),
            media_offset: Frame::ZERO,
            provisional: duration.0 <= 1,
            render: RenderOptions::default(),
            kind,
        }
    }

    pub fn video(src: impl Into<String>, duration: Frame) -> Self {
        Self::new(
            ClipKind::Video {
                src: src.into(),
                source_duration: None,
                muted: false,
            },
            duration,
        )
    }

    pub fn audio(src: impl Into<String>, duration: Frame) -> Self {
        Self::new(
            ClipKind::Audio {
                src: src.into(),
                source_duration: None,
                volume: 1.0,
            },
            duration,
        )
    }

    pub fn text(text: impl Into<String>, duration: Frame) -> Self {
        Self::new(
            ClipKind::Text {
                text: text.into(),
                font_size: 48,
                color: "#ffffff".to_string(),
            },
            duration,
        )
    }

    pub fn solid(color: impl Into<String>, duration: Frame) -> Self {
        Self::new(ClipKind::Solid { color: color.into() }, duration)
    }

    pub fn caption(text: impl Into<String>, duration: Frame) -> Self {
        Self::new(ClipKind::Caption { text: text.into() }, duration)
    }

    pub fn at(mut self, start: Frame) -> Self {
        self.start = start;
        self
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_source_duration(mut self, frames: Frame) -> Self {
        self.set_source_duration(frames);
        self
    }

    pub fn end(&self) -> Frame {
        self.start + self.duration
    }

    pub fn source_duration(&self) -> Option<Frame> {
        self.kind.source_duration()
    }

    /// Record the probed media length. No-op for generated clips.
    pub fn set_source_duration(&mut self, frames: Frame) {
        match &mut self.kind {
            ClipKind::Video {
                source_duration, ..
            }
            | ClipKind::Audio {
                source_duration, ..
            } => *source_duration = Some(frames),
            ClipKind::Text { .. } | ClipKind::Solid { .. } | ClipKind::Caption { .. } => {}
        }
    }

    /// Half-open interval test against another clip.
    pub fn overlaps(&self, other: &Clip) -> bool {
        intervals_overlap(self.start, self.end(), other.start, other.end())
    }
}

/// `[a_start, a_end)` and `[b_start, b_end)` share at least one frame.
pub fn intervals_overlap(a_start: Frame, a_end: Frame, b_start: Frame, b_end: Frame) -> bool {
    !(a_end <= b_start || a_start >= b_end)
}

// ---------------------------------------------------------------------------
// TrackKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Video,
    Audio,
    Caption,
    Generic,
}

impl TrackKind {
    pub fn accepts(&self, kind: &ClipKind) -> bool {
        match self {
            TrackKind::Video => matches!(
                kind,
                ClipKind::Video { .. } | ClipKind::Text { .. } | ClipKind::Solid { .. }
            ),
            TrackKind::Audio => matches!(kind, ClipKind::Audio { .. }),
            TrackKind::Caption => matches!(kind, ClipKind::Caption { .. }),
            TrackKind::Generic => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Track
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub id: Uuid,
    pub name: String,
    pub kind: TrackKind,
    pub volume: f64,
    /// Sorted by `start`.
    pub clips: Vec<Clip>,
}

impl Track {
    pub fn new(name: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            volume: 1.0,
            clips: vec![],
        }
    }

    pub fn with_clips(mut self, clips: Vec<Clip>) -> Self {
        self.clips = clips;
        self.sort_clips();
        self
    }

    pub fn position(&self, clip_id: Uuid) -> Option<usize> {
        self.clips.iter().position(|c| c.id == clip_id)
    }

    pub fn clip(&self, clip_id: Uuid) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == clip_id)
    }

    /// End frame of the last clip, or zero for an empty track.
    pub fn end(&self) -> Frame {
        self.clips.iter().map(Clip::end).max().unwrap_or(Frame::ZERO)
    }

    pub fn sort_clips(&mut self) {
        self.clips.sort_by_key(|c| c.start);
    }

    /// First overlapping pair, if any.
    pub fn find_overlap(&self) -> Option<(Uuid, Uuid)> {
        let mut sorted: Vec<&Clip> = self.clips.iter().collect();
        sorted.sort_by_key(|c| c.start);
        sorted
            .windows(2)
            .find(|pair| pair[0].overlaps(pair[1]))
            .map(|pair| (pair[0].id, pair[1].id))
    }
}

// ---------------------------------------------------------------------------
// Zoom
// ---------------------------------------------------------------------------

/// Horizontal scale of the timeline view, in pixels per second.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Zoom(pub f64);

impl Zoom {
    pub const MIN: Self = Self(1.0);
    pub const MAX: Self = Self(2_000.0);

    pub fn clamped(self) -> Self {
        if !self.0.is_finite() {
            return Self::MIN;
        }
        Self(self.0.clamp(Self::MIN.0, Self::MAX.0))
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(100.0)
    }
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Timeline {
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub playhead: Frame,
    #[serde(default)]
    pub zoom: Zoom,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composition length: furthest end over video clips only.
    pub fn duration(&self) -> Frame {
        self.tracks
            .iter()
            .flat_map(|t| t.clips.iter())
            .filter(|c| matches!(c.kind, ClipKind::Video { .. }))
            .map(Clip::end)
            .max()
            .unwrap_or(Frame::ZERO)
    }

    pub fn track(&self, index: usize) -> Result<&Track> {
        self.tracks.get(index).ok_or(CoreError::TrackNotFound(index))
    }

    /// (track_index, clip_index) for a clip id.
    pub fn locate(&self, clip_id: Uuid) -> Option<(usize, usize)> {
        self.tracks
            .iter()
            .enumerate()
            .find_map(|(ti, t)| t.position(clip_id).map(|ci| (ti, ci)))
    }

    pub fn clip(&self, clip_id: Uuid) -> Option<&Clip> {
        self.locate(clip_id)
            .map(|(ti, ci)| &self.tracks[ti].clips[ci])
    }

    /// Check every arrangement invariant. Used on state coming from outside the store.
    pub fn validate(&self) -> Result<()> {
        validate_tracks(&self.tracks)
    }
}

/// Unique ids, positive durations, kind compatibility and no overlap on any track.
pub fn validate_tracks(tracks: &[Track]) -> Result<()> {
    let mut seen = HashSet::new();
    for (ti, track) in tracks.iter().enumerate() {
        for clip in &track.clips {
            if !seen.insert(clip.id) {
                return Err(CoreError::InvalidOperation(format!(
                    "duplicate clip id {}",
                    clip.id
                )));
            }
            validate_clip(clip)?;
            if !track.kind.accepts(&clip.kind) {
                return Err(CoreError::IncompatibleTrack {
                    clip: clip.id,
                    track: ti,
                });
            }
        }
        if track.find_overlap().is_some() {
            return Err(CoreError::OverlapDetected);
        }
    }
    Ok(())
}

pub(crate) fn validate_clip(clip: &Clip) -> Result<()> {
    if clip.duration.0 < 1 {
        return Err(CoreError::InvalidOperation(format!(
            "clip {} has non-positive duration {}",
            clip.id, clip.duration
        )));
    }
    if clip.start.0 < 0 || clip.media_offset.0 < 0 {
        return Err(CoreError::InvalidOperation(format!(
            "clip {} has a negative start or media offset",
            clip.id
        )));
    }
    if clip.duration > Frame::MAX_SPAN
        || clip.start > Frame::MAX_SPAN
        || clip.media_offset > Frame::MAX_SPAN
    {
        return Err(CoreError::InvalidOperation(format!(
            "clip {} exceeds the maximum span of {}",
            clip.id,
            Frame::MAX_SPAN
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
