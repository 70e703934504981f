//! Canonical track/clip state and every mutation allowed on it.
//!
//! Each operation works on a copy of the track list and commits it only once the copy passes
//! [`validate_tracks`]; a rejected operation leaves the store exactly as it was and notifies
//! nobody.

use std::fmt;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::collision::move_across;
use crate::error::{CoreError, Result};
use crate::gap::find_gap;
use crate::gravity::compact;
use crate::history::History;
use crate::resize::{resize_width, ResizeEdge, ResizeInput, ResizeLimits, ResizeOutcome};
use crate::settings::Settings;
use crate::types::*;

/// What a committed mutation changed. Sent to observers with the new timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    TrackAdded { track: usize },
    TrackRemoved { track: usize },
    ClipsReplaced { track: usize },
    ClipInserted { track: usize, clip: Uuid },
    ClipPlaced { track: usize, clip: Uuid, start: Frame },
    ClipMoved { clip: Uuid, from: usize, to: usize },
    ClipDeleted { track: usize, clip: Uuid },
    ClipSplit { track: usize, left: Uuid, right: Uuid },
    ClipResized { track: usize, clip: Uuid },
    DurationResolved { clip: Uuid, duration: Frame },
    VolumeChanged { track: usize, volume: f64 },
    RenderOptionsChanged { clip: Uuid },
    PlayheadMoved { frame: Frame },
    ZoomChanged { zoom: Zoom },
    Undone { description: String },
    Redone { description: String },
}

pub type Observer = Box<dyn FnMut(&StoreEvent, &Timeline)>;

/// Where the insertion path puts a new clip before compaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertAt {
    #[default]
    End,
    Start,
}

pub struct ArrangementStore {
    timeline: Timeline,
    settings: Settings,
    history: History,
    observers: Vec<Observer>,
}

impl fmt::Debug for ArrangementStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrangementStore")
            .field("timeline", &self.timeline)
            .field("settings", &self.settings)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ArrangementStore {
    pub fn new(settings: Settings) -> Self {
        let timeline = Timeline {
            zoom: settings.default_zoom.clamped(),
            ..Timeline::default()
        };
        Self {
            timeline,
            history: History::new(settings.history_depth),
            settings,
            observers: Vec::new(),
        }
    }

    /// Adopt persisted state after checking its invariants.
    pub fn from_timeline(mut timeline: Timeline, settings: Settings) -> Result<Self> {
        for track in &mut timeline.tracks {
            track.sort_clips();
        }
        timeline.validate()?;
        Ok(Self {
            timeline,
            history: History::new(settings.history_depth),
            settings,
            observers: Vec::new(),
        })
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }

    pub fn tracks(&self) -> &[Track] {
        &self.timeline.tracks
    }

    pub fn track(&self, index: usize) -> Result<&Track> {
        self.timeline.track(index)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    // -----------------------------------------------------------------------
    // Tracks
    // -----------------------------------------------------------------------

    pub fn add_track(&mut self, name: impl Into<String>, kind: TrackKind) -> usize {
        let mut tracks = self.timeline.tracks.clone();
        tracks.push(Track::new(name, kind));
        let index = tracks.len() - 1;
        self.commit("Add track", tracks, StoreEvent::TrackAdded { track: index });
        index
    }

    pub fn remove_track(&mut self, index: usize) -> Result<Track> {
        self.track(index)?;
        let mut tracks = self.timeline.tracks.clone();
        let removed = tracks.remove(index);
        self.try_commit("Remove track", tracks, StoreEvent::TrackRemoved { track: index })?;
        Ok(removed)
    }

    /// Replace a track's clips wholesale. The new set is compacted before commit.
    pub fn update_track_clips(&mut self, track_index: usize, clips: Vec<Clip>) -> Result<()> {
        let track = self.track(track_index)?;
        check_kinds(track, track_index, &clips)?;

        let mut tracks = self.timeline.tracks.clone();
        tracks[track_index].clips = compact(&clips);
        self.try_commit(
            "Update clips",
            tracks,
            StoreEvent::ClipsReplaced { track: track_index },
        )
    }

    pub fn set_volume(&mut self, track_index: usize, volume: f64) -> Result<()> {
        self.track(track_index)?;
        if !volume.is_finite() || volume < 0.0 {
            return Err(CoreError::InvalidOperation(format!(
                "volume must be a non-negative number, got {volume}"
            )));
        }
        let volume = volume.min(self.settings.max_track_volume);

        let mut tracks = self.timeline.tracks.clone();
        tracks[track_index].volume = volume;
        self.try_commit(
            "Change volume",
            tracks,
            StoreEvent::VolumeChanged {
                track: track_index,
                volume,
            },
        )
    }

    // -----------------------------------------------------------------------
    // Clips
    // -----------------------------------------------------------------------

    /// Insertion path for new clips. The clip lands at the track end, or at frame 0 pushing
    /// the rest right, and the track is compacted.
    pub fn insert_clip(&mut self, track_index: usize, mut clip: Clip, at: InsertAt) -> Result<Uuid> {
        let track = self.track(track_index)?;
        check_kinds(track, track_index, std::slice::from_ref(&clip))?;

        let id = clip.id;
        let mut clips = track.clips.clone();
        match at {
            InsertAt::End => {
                clip.start = track.end();
                clips.push(clip);
            }
            InsertAt::Start => {
                clip.start = Frame::ZERO;
                clips.insert(0, clip);
            }
        }

        let mut tracks = self.timeline.tracks.clone();
        tracks[track_index].clips = compact(&clips);
        self.try_commit(
            "Insert clip",
            tracks,
            StoreEvent::ClipInserted {
                track: track_index,
                clip: id,
            },
        )?;
        Ok(id)
    }

    /// Same-track drag placement through the gap finder. No compaction: the found position
    /// is kept as is. Fails with [`CoreError::NoPlacement`] when nothing fits.
    pub fn place_clip(&mut self, track_index: usize, clip_id: Uuid, desired: Frame) -> Result<Frame> {
        let track = self.track(track_index)?;
        let position = track
            .position(clip_id)
            .ok_or(CoreError::ClipNotFound(clip_id))?;
        let duration = track.clips[position].duration;

        let start = find_gap(&track.clips, desired.clamp_non_negative(), duration, Some(clip_id))
            .ok_or_else(|| {
                warn!(clip = %clip_id, desired = desired.0, "no gap fits the dragged clip");
                CoreError::NoPlacement {
                    clip: clip_id,
                    desired,
                }
            })?;

        let mut tracks = self.timeline.tracks.clone();
        tracks[track_index].clips[position].start = start;
        tracks[track_index].sort_clips();
        self.try_commit(
            "Move clip",
            tracks,
            StoreEvent::ClipPlaced {
                track: track_index,
                clip: clip_id,
                start,
            },
        )?;
        Ok(start)
    }

    /// Move a clip to another track. Collisions resolve by appending, never by failing.
    /// Returns the clip's start on the destination.
    pub fn move_clip(
        &mut self,
        from: usize,
        clip_index: usize,
        to: usize,
        desired: Frame,
    ) -> Result<Frame> {
        let source = self.track(from)?;
        let dest = self.track(to)?;
        let clip = source
            .clips
            .get(clip_index)
            .ok_or(CoreError::ClipIndexNotFound {
                track: source.id,
                index: clip_index,
            })?;
        let clip_id = clip.id;

        if from == to {
            return self.place_clip(from, clip_id, desired);
        }
        if !dest.kind.accepts(&clip.kind) {
            return Err(CoreError::IncompatibleTrack {
                clip: clip_id,
                track: to,
            });
        }

        let (new_source, new_dest) = move_across(source, clip_index, dest, desired)?;
        let start = new_dest
            .clip(clip_id)
            .map(|c| c.start)
            .ok_or(CoreError::ClipNotFound(clip_id))?;

        let mut tracks = self.timeline.tracks.clone();
        tracks[from] = new_source;
        tracks[to] = new_dest;
        self.try_commit(
            "Move clip",
            tracks,
            StoreEvent::ClipMoved {
                clip: clip_id,
                from,
                to,
            },
        )?;
        Ok(start)
    }

    pub fn delete_clip(&mut self, track_index: usize, clip_id: Uuid) -> Result<Clip> {
        let track = self.track(track_index)?;
        let position = track
            .position(clip_id)
            .ok_or(CoreError::ClipNotFound(clip_id))?;

        let mut clips = track.clips.clone();
        let removed = clips.remove(position);

        let mut tracks = self.timeline.tracks.clone();
        tracks[track_index].clips = compact(&clips);
        self.try_commit(
            "Delete clip",
            tracks,
            StoreEvent::ClipDeleted {
                track: track_index,
                clip: clip_id,
            },
        )?;
        Ok(removed)
    }

    /// Cut a clip at timeline frame `at`, strictly inside it. The left half keeps the id.
    /// Returns (left, right) ids.
    pub fn split_clip(&mut self, track_index: usize, clip_id: Uuid, at: Frame) -> Result<(Uuid, Uuid)> {
        let track = self.track(track_index)?;
        let position = track
            .position(clip_id)
            .ok_or(CoreError::ClipNotFound(clip_id))?;
        let original = &track.clips[position];

        if at <= original.start || at >= original.end() {
            return Err(CoreError::InvalidOperation(
                "split position must be strictly between clip start and end".into(),
            ));
        }

        let offset = at - original.start;
        let mut left = original.clone();
        left.duration = offset;
        left.provisional = false;

        let mut right = original.clone();
        right.id = Uuid::new_v4();
        right.start = at;
        right.duration = original.duration - offset;
        right.media_offset = original.media_offset + offset;
        right.provisional = false;

        let ids = (left.id, right.id);
        let mut tracks = self.timeline.tracks.clone();
        tracks[track_index].clips[position] = left;
        tracks[track_index].clips.insert(position + 1, right);
        self.try_commit(
            "Split clip",
            tracks,
            StoreEvent::ClipSplit {
                track: track_index,
                left: ids.0,
                right: ids.1,
            },
        )?;
        Ok(ids)
    }

    /// Geometry a resize to `pointer` would produce, without committing it.
    pub fn preview_resize(
        &self,
        track_index: usize,
        clip_id: Uuid,
        edge: ResizeEdge,
        pointer: Frame,
    ) -> Result<ResizeOutcome> {
        let track = self.track(track_index)?;
        let clip = track.clip(clip_id).ok_or(CoreError::ClipNotFound(clip_id))?;
        let limits = ResizeLimits::within_track(track, clip, self.settings.min_duration_frames());
        Ok(resize_width(
            edge,
            pointer,
            &ResizeInput::from_clip(clip),
            &limits,
        ))
    }

    /// Resize one edge towards `pointer`, clamped to the duration floor, the source media and
    /// the neighbouring clips, then commit through the compacting path. Returns the clip's
    /// geometry as committed, after compaction.
    pub fn resize_clip(
        &mut self,
        track_index: usize,
        clip_id: Uuid,
        edge: ResizeEdge,
        pointer: Frame,
    ) -> Result<ResizeOutcome> {
        let outcome = self.preview_resize(track_index, clip_id, edge, pointer)?;
        let track = self.track(track_index)?;
        let position = track
            .position(clip_id)
            .ok_or(CoreError::ClipNotFound(clip_id))?;

        let mut clips = track.clips.clone();
        outcome.apply(&mut clips[position]);
        clips[position].provisional = false;

        let mut tracks = self.timeline.tracks.clone();
        tracks[track_index].clips = compact(&clips);
        self.try_commit(
            "Resize clip",
            tracks,
            StoreEvent::ClipResized {
                track: track_index,
                clip: clip_id,
            },
        )?;
        self.track(track_index)?
            .clip(clip_id)
            .map(ResizeOutcome::of)
            .ok_or(CoreError::ClipNotFound(clip_id))
    }

    /// Late correction from the media duration resolver. Applies only while the clip still
    /// carries its provisional duration, so an edit made in the meantime wins.
    /// Returns whether the correction was applied.
    pub fn resolve_duration(&mut self, clip_id: Uuid, duration: Frame) -> Result<bool> {
        if duration.0 < 1 {
            return Err(CoreError::InvalidOperation(format!(
                "resolved duration must be positive, got {duration}"
            )));
        }
        let (track_index, position) = self
            .timeline
            .locate(clip_id)
            .ok_or(CoreError::ClipNotFound(clip_id))?;

        let mut clips = self.timeline.tracks[track_index].clips.clone();
        let clip = &mut clips[position];
        if !clip.provisional {
            debug!(clip = %clip_id, "clip already edited, keeping its duration");
            return Ok(false);
        }
        clip.duration = duration;
        clip.set_source_duration(duration);
        clip.provisional = false;

        let mut tracks = self.timeline.tracks.clone();
        tracks[track_index].clips = compact(&clips);
        self.try_commit(
            "Resolve duration",
            tracks,
            StoreEvent::DurationResolved {
                clip: clip_id,
                duration,
            },
        )?;
        Ok(true)
    }

    pub fn set_render_options(&mut self, clip_id: Uuid, options: RenderOptions) -> Result<()> {
        let valid = options.scale.is_finite()
            && options.scale > 0.0
            && options.rotation.is_finite()
            && (0.0..=1.0).contains(&options.opacity);
        if !valid {
            return Err(CoreError::InvalidOperation(format!(
                "invalid render options {options:?}"
            )));
        }
        let (track_index, position) = self
            .timeline
            .locate(clip_id)
            .ok_or(CoreError::ClipNotFound(clip_id))?;

        let mut tracks = self.timeline.tracks.clone();
        tracks[track_index].clips[position].render = options;
        self.try_commit(
            "Change render options",
            tracks,
            StoreEvent::RenderOptionsChanged { clip: clip_id },
        )
    }

    // -----------------------------------------------------------------------
    // View state (not recorded in history)
    // -----------------------------------------------------------------------

    pub fn set_playhead(&mut self, frame: Frame) {
        self.timeline.playhead = frame.clamp_non_negative();
        let event = StoreEvent::PlayheadMoved {
            frame: self.timeline.playhead,
        };
        self.notify(&event);
    }

    pub fn set_zoom(&mut self, zoom: Zoom) {
        self.timeline.zoom = zoom.clamped();
        let event = StoreEvent::ZoomChanged {
            zoom: self.timeline.zoom,
        };
        self.notify(&event);
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    pub fn undo(&mut self) -> Result<()> {
        let description = self.history.undo(&mut self.timeline.tracks)?;
        debug!(%description, "undo");
        self.notify(&StoreEvent::Undone { description });
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        let description = self.history.redo(&mut self.timeline.tracks)?;
        debug!(%description, "redo");
        self.notify(&StoreEvent::Redone { description });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn try_commit(&mut self, description: &str, tracks: Vec<Track>, event: StoreEvent) -> Result<()> {
        if let Err(err) = validate_tracks(&tracks) {
            warn!(%description, error = %err, "rejected arrangement change");
            return Err(err);
        }
        self.commit(description, tracks, event);
        Ok(())
    }

    fn commit(&mut self, description: &str, tracks: Vec<Track>, event: StoreEvent) {
        let before = std::mem::replace(&mut self.timeline.tracks, tracks);
        self.history.record(description, before);
        debug!(?event, "arrangement committed");
        self.notify(&event);
    }

    fn notify(&mut self, event: &StoreEvent) {
        for observer in &mut self.observers {
            observer(event, &self.timeline);
        }
    }
}

fn check_kinds(track: &Track, track_index: usize, clips: &[Clip]) -> Result<()> {
    match clips.iter().find(|c| !track.kind.accepts(&c.kind)) {
        Some(clip) => Err(CoreError::IncompatibleTrack {
            clip: clip.id,
            track: track_index,
        }),
        None => Ok(()),
    }
}
