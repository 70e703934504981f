use crate::error::{CoreError, Result};
use crate::gravity::compact;
use crate::types::{Frame, Track};

/// Move the clip at `clip_index` of `source` onto `dest`, starting at `desired`.
///
/// A collision in the destination is resolved by appending after the destination's last clip,
/// so the move never blocks. Both resulting tracks are compacted. The inputs are untouched;
/// the caller commits the pair as one unit.
pub fn move_across(
    source: &Track,
    clip_index: usize,
    dest: &Track,
    desired: Frame,
) -> Result<(Track, Track)> {
    let original = source
        .clips
        .get(clip_index)
        .ok_or(CoreError::ClipIndexNotFound {
            track: source.id,
            index: clip_index,
        })?;

    let mut moving = original.clone();
    moving.start = desired.clamp_non_negative();

    let collides = dest.clips.iter().any(|other| moving.overlaps(other));
    if collides {
        moving.start = dest.clips.last().map(|c| c.end()).unwrap_or(Frame::ZERO);
    }

    let mut new_dest = dest.clone();
    new_dest.clips.push(moving);
    new_dest.clips = compact(&new_dest.clips);

    let mut new_source = source.clone();
    new_source.clips.remove(clip_index);
    new_source.clips = compact(&new_source.clips);

    Ok((new_source, new_dest))
}
