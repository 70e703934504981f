use crate::types::*;

/// Find the nearest snap point within the threshold.
/// Returns the snapped position if within threshold, otherwise the original position.
pub fn find_snap_point(position: Frame, snap_points: &[Frame], threshold: Frame) -> Frame {
    let mut best = position;
    let mut best_dist = threshold.0 + 1;

    for &point in snap_points {
        let dist = (position.0 - point.0).abs();
        if dist < best_dist {
            best = point;
            best_dist = dist;
        }
    }

    if best_dist <= threshold.0 {
        best
    } else {
        position
    }
}

/// Snap a dragged clip so either of its edges lands on a snap point.
/// The start edge wins ties.
pub fn snap_clip_start(start: Frame, duration: Frame, snap_points: &[Frame], threshold: Frame) -> Frame {
    let by_start = find_snap_point(start, snap_points, threshold);
    let by_end = find_snap_point(start + duration, snap_points, threshold) - duration;

    let start_dist = (by_start.0 - start.0).abs();
    let end_dist = (by_end.0 - start.0).abs();
    match (by_start != start, by_end != start) {
        (true, true) if end_dist < start_dist => by_end,
        (true, _) => by_start,
        (false, true) => by_end,
        (false, false) => start,
    }
}

/// Collect snap points on one track (clip edges) plus frame 0 and the playhead.
pub fn collect_snap_points(
    timeline: &Timeline,
    track_index: usize,
    exclude_clip_id: Option<uuid::Uuid>,
) -> Vec<Frame> {
    let mut points = vec![Frame::ZERO, timeline.playhead];

    if let Some(track) = timeline.tracks.get(track_index) {
        for clip in &track.clips {
            if Some(clip.id) == exclude_clip_id {
                continue;
            }
            points.push(clip.start);
            points.push(clip.end());
        }
    }

    points.sort();
    points.dedup();
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_timeline_with_clips() -> (Timeline, Uuid) {
        let excluded = Clip::video("c.mp4", Frame(10)).at(Frame(200));
        let excluded_id = excluded.id;
        let tl = Timeline {
            tracks: vec![Track::new("V1", TrackKind::Video).with_clips(vec![
                Clip::video("a.mp4", Frame(60)).at(Frame(30)),
                Clip::video("b.mp4", Frame(30)).at(Frame(150)),
                excluded,
            ])],
            playhead: Frame(300),
            ..Timeline::default()
        };
        (tl, excluded_id)
    }

    #[test]
    fn snap_to_nearest_point() {
        let points = vec![Frame(0), Frame(30), Frame(150)];
        assert_eq!(find_snap_point(Frame(33), &points, Frame(5)), Frame(30));
    }

    #[test]
    fn no_snap_beyond_threshold() {
        let points = vec![Frame(0), Frame(30), Frame(150)];
        assert_eq!(find_snap_point(Frame(90), &points, Frame(5)), Frame(90));
    }

    #[test]
    fn snap_exactly_at_threshold() {
        let points = vec![Frame(0), Frame(30)];
        assert_eq!(find_snap_point(Frame(35), &points, Frame(5)), Frame(30));
        assert_eq!(find_snap_point(Frame(36), &points, Frame(5)), Frame(36));
    }

    #[test]
    fn empty_snap_points() {
        assert_eq!(find_snap_point(Frame(12), &[], Frame(5)), Frame(12));
    }

    #[test]
    fn clip_end_can_snap() {
        let points = vec![Frame(0), Frame(100)];
        // end at 98 snaps to 100, start follows
        assert_eq!(snap_clip_start(Frame(68), Frame(30), &points, Frame(3)), Frame(70));
        // start at 2 snaps to 0
        assert_eq!(snap_clip_start(Frame(2), Frame(30), &points, Frame(3)), Frame(0));
        // neither edge near a point
        assert_eq!(snap_clip_start(Frame(40), Frame(30), &points, Frame(3)), Frame(40));
    }

    #[test]
    fn collect_includes_edges_and_playhead() {
        let (tl, excluded) = make_timeline_with_clips();
        let points = collect_snap_points(&tl, 0, Some(excluded));
        assert_eq!(
            points,
            vec![Frame(0), Frame(30), Frame(90), Frame(150), Frame(180), Frame(300)]
        );
    }

    #[test]
    fn collect_unknown_track_keeps_origin_and_playhead() {
        let (tl, _) = make_timeline_with_clips();
        assert_eq!(collect_snap_points(&tl, 9, None), vec![Frame(0), Frame(300)]);
    }
}
