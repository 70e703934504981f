//! Pointer gesture sequencing on top of the [`ArrangementStore`].
//!
//! `Idle -> Armed -> Dragging | Resizing -> Idle`. A press arms a gesture; only once the pointer
//! travels past the drag tolerance does it become a drag or resize, otherwise the release is a
//! click that selects. Nothing is written to the store until release, and the commit step runs
//! inside [`InteractionController::pointer_up`], which always leaves the controller idle.

use tracing::{trace, warn};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::resize::{ResizeEdge, ResizeOutcome};
use crate::settings::Settings;
use crate::snapping::{collect_snap_points, snap_clip_start};
use crate::store::ArrangementStore;
use crate::types::{Frame, Timeline};
use crate::units::{frames_to_px, px_to_frames, snap_px};

/// Pointer position relative to the visible timeline area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Visible window onto the timeline content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
        }
    }

    fn content_x(&self, point: &Point) -> f64 {
        point.x + self.scroll_x
    }

    fn content_y(&self, point: &Point) -> f64 {
        point.y + self.scroll_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Body,
    LeftEdge,
    RightEdge,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub track: usize,
    pub clip: Uuid,
    pub handle: Handle,
    /// Pointer distance from the clip's left edge, in pixels.
    pub grab_offset_px: f64,
}

/// Resolve a pointer position to the clip and handle under it.
pub fn hit_test(
    timeline: &Timeline,
    settings: &Settings,
    viewport: &Viewport,
    point: Point,
) -> Option<Hit> {
    let x = viewport.content_x(&point);
    let y = viewport.content_y(&point);
    if x < 0.0 || y < 0.0 || settings.track_height_px <= 0.0 {
        return None;
    }
    let track_index = (y / settings.track_height_px).floor() as usize;
    let track = timeline.tracks.get(track_index)?;

    track.clips.iter().find_map(|clip| {
        let left = frames_to_px(clip.start, timeline.zoom, settings.fps);
        let right = frames_to_px(clip.end(), timeline.zoom, settings.fps);
        if x < left || x >= right {
            return None;
        }
        let handle = if x - left <= settings.edge_handle_px {
            Handle::LeftEdge
        } else if right - x <= settings.edge_handle_px {
            Handle::RightEdge
        } else {
            Handle::Body
        };
        Some(Hit {
            track: track_index,
            clip: clip.id,
            handle,
            grab_offset_px: x - left,
        })
    })
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Armed {
    pub hit: Hit,
    pub origin: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub clip: Uuid,
    pub source_track: usize,
    pub original_start: Frame,
    pub duration: Frame,
    pub grab_offset_px: f64,
    /// `None` while the pointer is above or below every track.
    pub candidate_track: Option<usize>,
    pub candidate_start: Frame,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    pub clip: Uuid,
    pub track: usize,
    pub edge: ResizeEdge,
    pub pointer: Frame,
    pub preview: ResizeOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Armed(Armed),
    Dragging(DragSession),
    Resizing(ResizeSession),
}

/// What the view should draw after a pointer move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feedback {
    None,
    /// Pressed, still under the drag tolerance.
    Pending,
    Drag {
        track: Option<usize>,
        start: Frame,
        autoscroll_px: f64,
    },
    Resize {
        track: usize,
        clip: Uuid,
        outcome: ResizeOutcome,
    },
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    Nothing,
    Selected(Uuid),
    Moved {
        clip: Uuid,
        track: usize,
        start: Frame,
    },
    /// No valid placement; the clip stays where it was before the drag.
    SnappedBack {
        clip: Uuid,
        track: usize,
        start: Frame,
    },
    /// Geometry as committed, after the track was compacted.
    Resized {
        clip: Uuid,
        outcome: ResizeOutcome,
    },
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    pub viewport: Viewport,
    selected: Option<Uuid>,
}

impl InteractionController {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            state: InteractionState::Idle,
            viewport,
            selected: None,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn pointer_down(&mut self, store: &ArrangementStore, point: Point) -> Option<Hit> {
        let hit = hit_test(store.timeline(), store.settings(), &self.viewport, point);
        match hit {
            Some(hit) => {
                self.state = InteractionState::Armed(Armed { hit, origin: point });
            }
            None => {
                self.state = InteractionState::Idle;
                self.selected = None;
            }
        }
        hit
    }

    pub fn pointer_move(&mut self, store: &ArrangementStore, point: Point) -> Feedback {
        let state = self.state;
        match state {
            InteractionState::Idle => Feedback::None,
            InteractionState::Armed(armed) => {
                if point.distance(&armed.origin) <= store.settings().drag_tolerance_px {
                    return Feedback::Pending;
                }
                match self.confirm(store, armed) {
                    Some(state) => {
                        self.state = state;
                        self.pointer_move(store, point)
                    }
                    None => {
                        self.state = InteractionState::Idle;
                        Feedback::None
                    }
                }
            }
            InteractionState::Dragging(_) | InteractionState::Resizing(_) => {
                self.track_pointer(store, point, true)
            }
        }
    }

    /// Recompute the active drag or resize for `point`. Autoscroll only runs when `scroll` is
    /// set, so a release commits exactly what the last move previewed.
    fn track_pointer(&mut self, store: &ArrangementStore, point: Point, scroll: bool) -> Feedback {
        let state = self.state;
        match state {
            InteractionState::Idle | InteractionState::Armed(_) => Feedback::None,
            InteractionState::Dragging(mut session) => {
                let autoscroll_px = if scroll {
                    self.autoscroll(store.settings(), point)
                } else {
                    0.0
                };
                session.candidate_start = self.drag_start(store, &session, point);
                session.candidate_track = self.track_at(store, point);
                trace!(
                    clip = %session.clip,
                    track = ?session.candidate_track,
                    start = session.candidate_start.0,
                    "drag"
                );
                self.state = InteractionState::Dragging(session);
                Feedback::Drag {
                    track: session.candidate_track,
                    start: session.candidate_start,
                    autoscroll_px,
                }
            }
            InteractionState::Resizing(mut session) => {
                if scroll {
                    self.autoscroll(store.settings(), point);
                }
                session.pointer = self.pointer_frame(store, point);
                match store.preview_resize(session.track, session.clip, session.edge, session.pointer) {
                    Ok(outcome) => {
                        session.preview = outcome;
                        self.state = InteractionState::Resizing(session);
                        Feedback::Resize {
                            track: session.track,
                            clip: session.clip,
                            outcome,
                        }
                    }
                    Err(err) => {
                        warn!(clip = %session.clip, error = %err, "resize target vanished");
                        self.state = InteractionState::Idle;
                        Feedback::None
                    }
                }
            }
        }
    }

    /// Finish the gesture. The controller is idle afterwards whatever the outcome.
    pub fn pointer_up(&mut self, store: &mut ArrangementStore, point: Point) -> Result<Release> {
        if matches!(
            self.state,
            InteractionState::Dragging(_) | InteractionState::Resizing(_)
        ) {
            self.track_pointer(store, point, false);
        }

        match std::mem::take(&mut self.state) {
            InteractionState::Idle => Ok(Release::Nothing),
            InteractionState::Armed(armed) => {
                self.selected = Some(armed.hit.clip);
                Ok(Release::Selected(armed.hit.clip))
            }
            InteractionState::Dragging(session) => self.commit_drag(store, session),
            InteractionState::Resizing(session) => {
                let outcome =
                    store.resize_clip(session.track, session.clip, session.edge, session.pointer)?;
                Ok(Release::Resized {
                    clip: session.clip,
                    outcome,
                })
            }
        }
    }

    /// Abandon the gesture without touching the store.
    pub fn cancel(&mut self) {
        self.state = InteractionState::Idle;
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn confirm(&self, store: &ArrangementStore, armed: Armed) -> Option<InteractionState> {
        let track = store.tracks().get(armed.hit.track)?;
        let clip = track.clip(armed.hit.clip)?;
        let state = match armed.hit.handle {
            Handle::Body => InteractionState::Dragging(DragSession {
                clip: clip.id,
                source_track: armed.hit.track,
                original_start: clip.start,
                duration: clip.duration,
                grab_offset_px: armed.hit.grab_offset_px,
                candidate_track: Some(armed.hit.track),
                candidate_start: clip.start,
            }),
            Handle::LeftEdge | Handle::RightEdge => {
                let edge = if armed.hit.handle == Handle::LeftEdge {
                    ResizeEdge::Left
                } else {
                    ResizeEdge::Right
                };
                InteractionState::Resizing(ResizeSession {
                    clip: clip.id,
                    track: armed.hit.track,
                    edge,
                    pointer: match edge {
                        ResizeEdge::Left => clip.start,
                        ResizeEdge::Right => clip.end(),
                    },
                    preview: ResizeOutcome::of(clip),
                })
            }
        };
        Some(state)
    }

    fn commit_drag(&mut self, store: &mut ArrangementStore, session: DragSession) -> Result<Release> {
        // Re-read the clip from committed state; the track list may have changed mid-drag.
        let Some((track_now, index_now)) = store.timeline().locate(session.clip) else {
            warn!(clip = %session.clip, "dragged clip no longer exists");
            return Ok(Release::Nothing);
        };
        let start_now = store.tracks()[track_now].clips[index_now].start;
        let Some(target) = session.candidate_track else {
            warn!(clip = %session.clip, "released off every track, snapping back");
            return Ok(Release::SnappedBack {
                clip: session.clip,
                track: track_now,
                start: start_now,
            });
        };

        let result = if target != track_now {
            store.move_clip(track_now, index_now, target, session.candidate_start)
        } else {
            store.place_clip(track_now, session.clip, session.candidate_start)
        };

        match result {
            Ok(start) => {
                self.selected = Some(session.clip);
                Ok(Release::Moved {
                    clip: session.clip,
                    track: target,
                    start,
                })
            }
            Err(CoreError::NoPlacement { .. }) | Err(CoreError::IncompatibleTrack { .. }) => {
                warn!(clip = %session.clip, "drop rejected, snapping back");
                Ok(Release::SnappedBack {
                    clip: session.clip,
                    track: track_now,
                    start: start_now,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Scroll when the pointer nears a horizontal edge. Returns the applied delta.
    fn autoscroll(&mut self, settings: &Settings, point: Point) -> f64 {
        let edge = settings.autoscroll_edge_px;
        let step = settings.autoscroll_step_px;
        let before = self.viewport.scroll_x;
        if point.x < edge {
            self.viewport.scroll_x = (before - step).max(0.0);
        } else if point.x > self.viewport.width - edge {
            self.viewport.scroll_x = before + step;
        }
        self.viewport.scroll_x - before
    }

    /// Track under the pointer, if any.
    fn track_at(&self, store: &ArrangementStore, point: Point) -> Option<usize> {
        let height = store.settings().track_height_px;
        let y = self.viewport.content_y(&point);
        if height <= 0.0 || y < 0.0 {
            return None;
        }
        let index = (y / height).floor() as usize;
        (index < store.tracks().len()).then_some(index)
    }

    fn pointer_frame(&self, store: &ArrangementStore, point: Point) -> Frame {
        let settings = store.settings();
        px_to_frames(self.viewport.content_x(&point), store.timeline().zoom, settings.fps)
    }

    /// Grid-snapped, horizontal-only start for the dragged clip. Edge snapping looks at the
    /// source track only, so the pointer's height never moves the frame.
    fn drag_start(&self, store: &ArrangementStore, session: &DragSession, point: Point) -> Frame {
        let settings = store.settings();
        let zoom = store.timeline().zoom;
        let left_px = self.viewport.content_x(&point) - session.grab_offset_px;
        let snapped = snap_px(left_px, settings.snap_grid_px);
        let start = px_to_frames(snapped, zoom, settings.fps).clamp_non_negative();

        if !settings.snap_to_edges {
            return start;
        }
        let threshold = px_to_frames(settings.snap_grid_px, zoom, settings.fps);
        let points = collect_snap_points(store.timeline(), session.source_track, Some(session.clip));
        snap_clip_start(start, session.duration, &points, threshold).clamp_non_negative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Clip, TrackKind, Zoom};

    // 150 px/s at 30 fps: 5 px per frame, the 15 px grid is 3 frames.
    fn store_with(tracks: Vec<Vec<Clip>>) -> ArrangementStore {
        let mut store = ArrangementStore::new(Settings::default());
        store.set_zoom(Zoom(150.0));
        for (i, clips) in tracks.into_iter().enumerate() {
            let index = store.add_track(format!("T{i}"), TrackKind::Generic);
            store.update_track_clips(index, clips).unwrap();
        }
        store
    }

    fn solid(duration: i64) -> Clip {
        Clip::solid("#000", Frame(duration))
    }

    fn controller() -> InteractionController {
        InteractionController::new(Viewport::new(1_000.0, 400.0))
    }

    #[test]
    fn hit_test_finds_handles() {
        let a = solid(30);
        let store = store_with(vec![vec![a.clone()]]);
        let vp = Viewport::new(1_000.0, 400.0);
        let tl = store.timeline();
        let settings = store.settings();

        let body = hit_test(tl, settings, &vp, Point::new(75.0, 30.0)).unwrap();
        assert_eq!(body.clip, a.id);
        assert_eq!(body.handle, Handle::Body);
        assert_eq!(body.grab_offset_px, 75.0);

        let left = hit_test(tl, settings, &vp, Point::new(2.0, 30.0)).unwrap();
        assert_eq!(left.handle, Handle::LeftEdge);
        let right = hit_test(tl, settings, &vp, Point::new(148.0, 30.0)).unwrap();
        assert_eq!(right.handle, Handle::RightEdge);

        assert!(hit_test(tl, settings, &vp, Point::new(151.0, 30.0)).is_none());
        assert!(hit_test(tl, settings, &vp, Point::new(75.0, 90.0)).is_none());
    }

    #[test]
    fn click_without_travel_selects() {
        let a = solid(30);
        let mut store = store_with(vec![vec![a.clone()]]);
        let mut ctl = controller();

        ctl.pointer_down(&store, Point::new(75.0, 30.0));
        assert_eq!(
            ctl.pointer_move(&store, Point::new(77.0, 31.0)),
            Feedback::Pending
        );
        let release = ctl.pointer_up(&mut store, Point::new(77.0, 31.0)).unwrap();

        assert_eq!(release, Release::Selected(a.id));
        assert_eq!(ctl.selected(), Some(a.id));
        assert_eq!(ctl.state(), &InteractionState::Idle);
        assert_eq!(store.track(0).unwrap().clips[0].start, Frame(0));
    }

    #[test]
    fn drag_past_free_space_falls_into_earliest_gap() {
        let a = solid(30);
        let b = solid(30);
        let mut store = store_with(vec![vec![a.clone(), b.clone()]]);
        let mut ctl = controller();

        ctl.pointer_down(&store, Point::new(75.0, 30.0));
        let feedback = ctl.pointer_move(&store, Point::new(675.0, 30.0));
        assert_eq!(
            feedback,
            Feedback::Drag {
                track: Some(0),
                start: Frame(120),
                autoscroll_px: 0.0
            }
        );

        let release = ctl.pointer_up(&mut store, Point::new(675.0, 30.0)).unwrap();
        // a's old slot in front of b is the earliest gap that fits
        assert_eq!(
            release,
            Release::Moved {
                clip: a.id,
                track: 0,
                start: Frame(0)
            }
        );
        assert_eq!(ctl.state(), &InteractionState::Idle);
    }

    #[test]
    fn drag_start_snaps_to_grid() {
        let a = solid(30);
        let store = store_with(vec![vec![a], vec![]]);
        let mut ctl = controller();
        let mut settings_off = store.settings().clone();
        settings_off.snap_to_edges = false;
        let mut store = ArrangementStore::from_timeline(store.timeline().clone(), settings_off).unwrap();

        ctl.pointer_down(&store, Point::new(75.0, 30.0));
        // left edge at 75 + 433 - 75 = 433 px snaps to 435 px = frame 87
        let feedback = ctl.pointer_move(&store, Point::new(508.0, 30.0));
        assert_eq!(
            feedback,
            Feedback::Drag {
                track: Some(0),
                start: Frame(87),
                autoscroll_px: 0.0
            }
        );
        ctl.cancel();
        assert_eq!(ctl.pointer_up(&mut store, Point::new(0.0, 0.0)).unwrap(), Release::Nothing);
    }

    #[test]
    fn infeasible_drop_snaps_back() {
        let a = solid(30);
        let b = solid(10);
        let c = solid(60);
        let mut store = store_with(vec![vec![a, b, c.clone()]]);
        let before = store.timeline().clone();
        let mut ctl = controller();

        // c spans [200, 500) px; grab it 100 px in and drop its left edge near frame 9
        ctl.pointer_down(&store, Point::new(300.0, 30.0));
        ctl.pointer_move(&store, Point::new(150.0, 30.0));
        let release = ctl.pointer_up(&mut store, Point::new(150.0, 30.0)).unwrap();

        assert_eq!(
            release,
            Release::SnappedBack {
                clip: c.id,
                track: 0,
                start: Frame(40)
            }
        );
        assert_eq!(store.timeline(), &before);
        assert_eq!(ctl.state(), &InteractionState::Idle);
    }

    #[test]
    fn release_off_every_track_snaps_back() {
        let a = solid(30);
        let b = solid(30);
        let mut store = store_with(vec![vec![a.clone(), b], vec![]]);
        let before = store.timeline().clone();
        let mut ctl = controller();

        // two 60 px tracks end at y = 120
        ctl.pointer_down(&store, Point::new(75.0, 30.0));
        let feedback = ctl.pointer_move(&store, Point::new(75.0, 380.0));
        assert!(matches!(feedback, Feedback::Drag { track: None, .. }));
        let release = ctl.pointer_up(&mut store, Point::new(75.0, 380.0)).unwrap();

        let snapped = Release::SnappedBack {
            clip: a.id,
            track: 0,
            start: Frame(0),
        };
        assert_eq!(release, snapped);
        assert_eq!(store.timeline(), &before);
        assert_eq!(ctl.state(), &InteractionState::Idle);

        ctl.pointer_down(&store, Point::new(75.0, 30.0));
        ctl.pointer_move(&store, Point::new(75.0, -20.0));
        let release = ctl.pointer_up(&mut store, Point::new(75.0, -20.0)).unwrap();
        assert_eq!(release, snapped);
        assert_eq!(store.timeline(), &before);
    }

    #[test]
    fn vertical_motion_keeps_start_frame() {
        let a = solid(30);
        let b = solid(30);
        let c = solid(23);
        let mut store = store_with(vec![vec![a.clone(), b], vec![c]]);
        let mut ctl = controller();

        ctl.pointer_down(&store, Point::new(75.0, 30.0));
        let on_source = ctl.pointer_move(&store, Point::new(175.0, 30.0));
        assert_eq!(
            on_source,
            Feedback::Drag {
                track: Some(0),
                start: Frame(21),
                autoscroll_px: 0.0
            }
        );
        // c ends at frame 23, within snapping distance, but only the track may change
        let on_other = ctl.pointer_move(&store, Point::new(175.0, 90.0));
        assert_eq!(
            on_other,
            Feedback::Drag {
                track: Some(1),
                start: Frame(21),
                autoscroll_px: 0.0
            }
        );

        // the drop collides with c, so the clip is appended after it
        let release = ctl.pointer_up(&mut store, Point::new(175.0, 90.0)).unwrap();
        assert_eq!(
            release,
            Release::Moved {
                clip: a.id,
                track: 1,
                start: Frame(23)
            }
        );
    }

    #[test]
    fn vertical_drag_moves_across_tracks() {
        let a = solid(30);
        let b = solid(30);
        let mut store = store_with(vec![vec![a.clone(), b.clone()], vec![]]);
        let mut ctl = controller();

        ctl.pointer_down(&store, Point::new(75.0, 30.0));
        let feedback = ctl.pointer_move(&store, Point::new(75.0, 90.0));
        assert_eq!(
            feedback,
            Feedback::Drag {
                track: Some(1),
                start: Frame(0),
                autoscroll_px: 0.0
            }
        );
        let release = ctl.pointer_up(&mut store, Point::new(75.0, 90.0)).unwrap();

        assert_eq!(
            release,
            Release::Moved {
                clip: a.id,
                track: 1,
                start: Frame(0)
            }
        );
        assert_eq!(store.track(1).unwrap().clips[0].id, a.id);
        let left = &store.track(0).unwrap().clips;
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, b.id);
        assert_eq!(left[0].start, Frame(0));
    }

    #[test]
    fn resize_previews_then_commits() {
        let a = Clip::video("a.mp4", Frame(30)).with_source_duration(Frame(45));
        let mut store = ArrangementStore::new(Settings::default());
        store.set_zoom(Zoom(150.0));
        store.add_track("V1", TrackKind::Video);
        store.update_track_clips(0, vec![a.clone()]).unwrap();
        let mut ctl = controller();

        let hit = ctl.pointer_down(&store, Point::new(148.0, 30.0)).unwrap();
        assert_eq!(hit.handle, Handle::RightEdge);

        match ctl.pointer_move(&store, Point::new(250.0, 30.0)) {
            Feedback::Resize { outcome, .. } => assert_eq!(outcome.duration, Frame(45)),
            other => panic!("expected resize feedback, got {other:?}"),
        }
        // still uncommitted
        assert_eq!(store.track(0).unwrap().clips[0].duration, Frame(30));

        let release = ctl.pointer_up(&mut store, Point::new(250.0, 30.0)).unwrap();
        let stored = store.track(0).unwrap().clips[0].clone();
        assert_eq!(stored.duration, Frame(45));
        assert_eq!(
            release,
            Release::Resized {
                clip: a.id,
                outcome: ResizeOutcome::of(&stored)
            }
        );
    }

    #[test]
    fn left_resize_release_reports_compacted_start() {
        let a = solid(30);
        let b = solid(30);
        let mut store = store_with(vec![vec![a, b.clone()]]);
        let mut ctl = controller();

        // b spans [150, 300) px; pull its left edge to frame 40
        let hit = ctl.pointer_down(&store, Point::new(152.0, 30.0)).unwrap();
        assert_eq!(hit.handle, Handle::LeftEdge);
        match ctl.pointer_move(&store, Point::new(200.0, 30.0)) {
            Feedback::Resize { outcome, .. } => assert_eq!(outcome.start, Frame(40)),
            other => panic!("expected resize feedback, got {other:?}"),
        }
        let release = ctl.pointer_up(&mut store, Point::new(200.0, 30.0)).unwrap();

        // the trimmed clip slides back against a
        assert_eq!(
            release,
            Release::Resized {
                clip: b.id,
                outcome: ResizeOutcome {
                    start: Frame(30),
                    duration: Frame(20),
                    media_offset: Frame::ZERO,
                }
            }
        );
    }

    #[test]
    fn drag_near_edge_autoscrolls() {
        let a = solid(30);
        let store = store_with(vec![vec![a]]);
        let mut ctl = InteractionController::new(Viewport::new(400.0, 200.0));

        ctl.pointer_down(&store, Point::new(75.0, 30.0));
        match ctl.pointer_move(&store, Point::new(390.0, 30.0)) {
            Feedback::Drag { autoscroll_px, .. } => assert_eq!(autoscroll_px, 20.0),
            other => panic!("expected drag feedback, got {other:?}"),
        }
        assert_eq!(ctl.viewport.scroll_x, 20.0);
    }

    #[test]
    fn release_in_autoscroll_zone_commits_previewed_start() {
        let a = solid(30);
        let b = solid(30);
        let mut store = store_with(vec![vec![a, b.clone()]]);
        let mut ctl = InteractionController::new(Viewport::new(400.0, 200.0));

        ctl.pointer_down(&store, Point::new(225.0, 30.0));
        let previewed = match ctl.pointer_move(&store, Point::new(390.0, 30.0)) {
            Feedback::Drag {
                start,
                autoscroll_px,
                ..
            } => {
                assert_eq!(autoscroll_px, 20.0);
                start
            }
            other => panic!("expected drag feedback, got {other:?}"),
        };
        assert_eq!(previewed, Frame(66));

        let release = ctl.pointer_up(&mut store, Point::new(390.0, 30.0)).unwrap();
        assert_eq!(
            release,
            Release::Moved {
                clip: b.id,
                track: 0,
                start: previewed
            }
        );
        assert_eq!(ctl.viewport.scroll_x, 20.0);
    }

    #[test]
    fn press_on_empty_space_clears_selection() {
        let a = solid(30);
        let mut store = store_with(vec![vec![a.clone()]]);
        let mut ctl = controller();
        ctl.pointer_down(&store, Point::new(75.0, 30.0));
        ctl.pointer_up(&mut store, Point::new(75.0, 30.0)).unwrap();
        assert_eq!(ctl.selected(), Some(a.id));

        assert!(ctl.pointer_down(&store, Point::new(900.0, 30.0)).is_none());
        assert_eq!(ctl.selected(), None);
    }
}
