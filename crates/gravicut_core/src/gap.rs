use uuid::Uuid;

use crate::types::{Clip, Frame};

/// Earliest start on a track that can host `duration` frames, or `None`.
///
/// The search is biased towards the front of the track: a hole before the first clip wins over
/// `desired`, then the first internal hole that fits. `desired` is only honoured when it already
/// lies past every occupied frame. `ignore` drops the clip being moved from the occupancy set.
pub fn find_gap(
    clips: &[Clip],
    desired: Frame,
    duration: Frame,
    ignore: Option<Uuid>,
) -> Option<Frame> {
    let mut occupied: Vec<&Clip> = clips
        .iter()
        .filter(|c| Some(c.id) != ignore)
        .collect();
    occupied.sort_by_key(|c| c.start);

    let (first, last) = match (occupied.first(), occupied.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Some(desired),
    };

    if duration <= first.start {
        return Some(Frame::ZERO);
    }

    for pair in occupied.windows(2) {
        let gap_start = pair[0].end();
        if pair[1].start - gap_start >= duration {
            return Some(gap_start);
        }
    }

    if desired >= last.end() {
        return Some(desired);
    }

    None
}
