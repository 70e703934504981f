use crate::types::{Clip, Frame};

/// Repack clips left to right from frame 0 with no gaps.
///
/// Order follows `start`, ties keep their input order. Only `start` is rewritten.
pub fn compact(clips: &[Clip]) -> Vec<Clip> {
    let mut packed = clips.to_vec();
    packed.sort_by_key(|c| c.start);

    let mut cursor = Frame::ZERO;
    for clip in &mut packed {
        clip.start = cursor;
        cursor += clip.duration;
    }
    packed
}

/// True when `clips` is already the output of [`compact`] for itself.
pub fn is_compact(clips: &[Clip]) -> bool {
    let mut cursor = Frame::ZERO;
    for clip in clips {
        if clip.start != cursor {
            return false;
        }
        cursor += clip.duration;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn clip(start: i64, duration: i64) -> Clip {
        Clip::solid("#000", Frame(duration)).at(Frame(start))
    }

    fn layout(clips: &[Clip]) -> Vec<(i64, i64, Uuid)> {
        clips.iter().map(|c| (c.start.0, c.duration.0, c.id)).collect()
    }

    #[test]
    fn removes_gaps_in_start_order() {
        let a = clip(10, 5);
        let b = clip(20, 5);
        let c = clip(30, 5);
        let packed = compact(&[c.clone(), a.clone(), b.clone()]);
        assert_eq!(
            layout(&packed),
            vec![(0, 5, a.id), (5, 5, b.id), (10, 5, c.id)]
        );
    }

    #[test]
    fn contiguous_input_is_fixed_point() {
        let clips = vec![clip(0, 5), clip(5, 7), clip(12, 3)];
        assert_eq!(compact(&clips), clips);
        assert!(is_compact(&clips));
    }

    #[test]
    fn idempotent() {
        let clips = vec![clip(40, 5), clip(3, 9), clip(17, 2)];
        let once = compact(&clips);
        assert_eq!(compact(&once), once);
    }

    #[test]
    fn ties_keep_input_order() {
        let a = clip(0, 5);
        let b = clip(0, 8);
        let packed = compact(&[a.clone(), b.clone()]);
        assert_eq!(layout(&packed), vec![(0, 5, a.id), (5, 8, b.id)]);
    }

    #[test]
    fn preserves_non_positional_fields() {
        let mut a = clip(30, 5);
        a.media_offset = Frame(12);
        a.render.opacity = 0.25;
        let packed = compact(&[a.clone()]);
        assert_eq!(packed[0].media_offset, Frame(12));
        assert_eq!(packed[0].render.opacity, 0.25);
        assert_eq!(packed[0].duration, a.duration);
    }

    #[test]
    fn empty_input() {
        assert!(compact(&[]).is_empty());
        assert!(is_compact(&[]));
    }
}
