//! Edge-drag resizing of a single clip.
//!
//! Pure frame arithmetic: nothing here touches a track. Out-of-range pointer positions are
//! clamped, never rejected, so every pointer move yields a usable rectangle.

use serde::{Deserialize, Serialize};

use crate::types::{Clip, Frame, Track};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResizeEdge {
    Left,
    Right,
}

/// Geometry of the clip being resized, captured when the gesture starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeInput {
    pub start: Frame,
    pub duration: Frame,
    pub media_offset: Frame,
    pub source_duration: Option<Frame>,
    /// Backed by media, so the in-point cannot move before the first source frame.
    pub media: bool,
}

impl ResizeInput {
    pub fn from_clip(clip: &Clip) -> Self {
        Self {
            start: clip.start,
            duration: clip.duration,
            media_offset: clip.media_offset,
            source_duration: clip.source_duration(),
            media: clip.kind.is_media(),
        }
    }

    fn end(&self) -> Frame {
        self.start + self.duration
    }
}

/// Room the clip may occupy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeLimits {
    pub min_duration: Frame,
    /// Earliest frame the left edge may reach.
    pub lower: Frame,
    /// Latest frame the right edge may reach, if bounded.
    pub upper: Option<Frame>,
}

impl ResizeLimits {
    pub fn unbounded(min_duration: Frame) -> Self {
        Self {
            min_duration,
            lower: Frame::ZERO,
            upper: None,
        }
    }

    /// Limits that stop at the neighbouring clips on `track`.
    pub fn within_track(track: &Track, clip: &Clip, min_duration: Frame) -> Self {
        let lower = track
            .clips
            .iter()
            .filter(|c| c.id != clip.id && c.end() <= clip.start)
            .map(Clip::end)
            .max()
            .unwrap_or(Frame::ZERO);
        let upper = track
            .clips
            .iter()
            .filter(|c| c.id != clip.id && c.start >= clip.end())
            .map(|c| c.start)
            .min();
        Self {
            min_duration,
            lower,
            upper,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOutcome {
    pub start: Frame,
    pub duration: Frame,
    pub media_offset: Frame,
}

impl ResizeOutcome {
    /// Current geometry of a clip.
    pub fn of(clip: &Clip) -> Self {
        Self {
            start: clip.start,
            duration: clip.duration,
            media_offset: clip.media_offset,
        }
    }

    pub fn end(&self) -> Frame {
        self.start + self.duration
    }

    pub fn apply(&self, clip: &mut Clip) {
        clip.start = self.start;
        clip.duration = self.duration;
        clip.media_offset = self.media_offset;
    }
}

pub fn resize_width(
    edge: ResizeEdge,
    pointer: Frame,
    input: &ResizeInput,
    limits: &ResizeLimits,
) -> ResizeOutcome {
    match edge {
        ResizeEdge::Right => resize_right(pointer, input, limits),
        ResizeEdge::Left => resize_left(pointer, input, limits),
    }
}

fn resize_right(pointer: Frame, input: &ResizeInput, limits: &ResizeLimits) -> ResizeOutcome {
    let mut duration = (pointer - input.start).max(limits.min_duration);

    if let Some(source) = input.source_duration {
        let available = Frame((source - input.media_offset).0.max(1));
        duration = duration.min(available);
    }
    if let Some(upper) = limits.upper {
        duration = duration.min(Frame((upper - input.start).0.max(1)));
    }

    ResizeOutcome {
        start: input.start,
        duration,
        media_offset: input.media_offset,
    }
}

fn resize_left(pointer: Frame, input: &ResizeInput, limits: &ResizeLimits) -> ResizeOutcome {
    let end = input.end();

    let mut start = pointer.min(end - limits.min_duration).max(limits.lower);
    if input.media {
        start = start.max(input.start - input.media_offset);
    }
    // never invert the clip, whatever the limits say
    start = start.min(end - Frame(1));

    let media_offset = if input.media {
        input.media_offset + (start - input.start)
    } else {
        input.media_offset
    };

    ResizeOutcome {
        start,
        duration: end - start,
        media_offset,
    }
}
