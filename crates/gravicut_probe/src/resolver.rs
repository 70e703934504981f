use gravicut_core::{ArrangementStore, ClipKind, Frame, Timeline};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ProbeError, Result};
use crate::probe::MediaProbe;

/// A provisional media clip waiting for its real length.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationRequest {
    pub clip: Uuid,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct Resolved {
    pub clip: Uuid,
    pub result: Result<Frame>,
}

/// Media clips still carrying a placeholder duration, in track order.
pub fn pending_requests(timeline: &Timeline) -> Vec<DurationRequest> {
    timeline
        .tracks
        .iter()
        .flat_map(|track| track.clips.iter())
        .filter(|clip| clip.provisional)
        .filter_map(|clip| match &clip.kind {
            ClipKind::Video { src, .. } | ClipKind::Audio { src, .. } => Some(DurationRequest {
                clip: clip.id,
                path: PathBuf::from(src),
            }),
            _ => None,
        })
        .collect()
}

/// Probe every request concurrently. Results come back in completion order.
pub async fn resolve_all<P: MediaProbe>(
    probe: Arc<P>,
    requests: Vec<DurationRequest>,
    fps: u32,
) -> Vec<Resolved> {
    let mut set = JoinSet::new();
    let mut ids = Vec::with_capacity(requests.len());
    for request in requests {
        let probe = Arc::clone(&probe);
        ids.push(request.clip);
        set.spawn(async move {
            let result = probe
                .probe(request.path)
                .await
                .map(|info| info.duration_frames(fps));
            Resolved {
                clip: request.clip,
                result,
            }
        });
    }

    let mut resolved = Vec::with_capacity(ids.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(r) => resolved.push(r),
            Err(e) => warn!(error = %e, "probe task did not complete"),
        }
    }

    // a panicked task still owes its clip an answer
    for id in ids {
        if !resolved.iter().any(|r| r.clip == id) {
            resolved.push(Resolved {
                clip: id,
                result: Err(ProbeError::Task(format!("no result for clip {id}"))),
            });
        }
    }
    resolved
}

/// Feed probe results back into the store. Returns how many clips were corrected.
///
/// Failures leave the clip provisional; a clip deleted or edited while its probe ran is
/// skipped.
pub fn apply_resolved(store: &mut ArrangementStore, resolved: Vec<Resolved>) -> usize {
    let mut applied = 0;
    for Resolved { clip, result } in resolved {
        let frames = match result {
            Ok(frames) => frames,
            Err(e) => {
                warn!(clip = %clip, error = %e, "could not resolve media duration");
                continue;
            }
        };
        match store.resolve_duration(clip, frames) {
            Ok(true) => applied += 1,
            Ok(false) => debug!(clip = %clip, "duration arrived after an edit, ignored"),
            Err(e) => warn!(clip = %clip, error = %e, "dropping resolved duration"),
        }
    }
    info!(applied, "media durations resolved");
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::MediaInfo;
    use gravicut_core::{Clip, InsertAt, ResizeEdge, Settings, TrackKind};
    use std::collections::HashMap;
    use std::future::Future;

    struct FixedProbe {
        seconds: HashMap<PathBuf, f64>,
    }

    impl FixedProbe {
        fn new(entries: &[(&str, f64)]) -> Arc<Self> {
            Arc::new(Self {
                seconds: entries
                    .iter()
                    .map(|(p, s)| (PathBuf::from(p), *s))
                    .collect(),
            })
        }
    }

    impl MediaProbe for FixedProbe {
        fn probe(&self, path: PathBuf) -> impl Future<Output = Result<MediaInfo>> + Send {
            let result = match self.seconds.get(&path) {
                Some(&duration_seconds) => Ok(MediaInfo {
                    duration_seconds,
                    has_video: true,
                    has_audio: true,
                    native_fps: 30.0,
                }),
                None => Err(ProbeError::FileNotFound(path)),
            };
            std::future::ready(result)
        }
    }

    fn store_with_placeholders() -> (ArrangementStore, Uuid, Uuid, Uuid) {
        let mut store = ArrangementStore::new(Settings::default());
        let v = store.add_track("V1", TrackKind::Video);
        let a = store.add_track("A1", TrackKind::Audio);
        let video = store
            .insert_clip(v, Clip::video("intro.mp4", Frame(1)), InsertAt::End)
            .unwrap();
        let title = store
            .insert_clip(v, Clip::text("Title", Frame(60)), InsertAt::End)
            .unwrap();
        let audio = store
            .insert_clip(a, Clip::audio("music.wav", Frame(1)), InsertAt::End)
            .unwrap();
        (store, video, title, audio)
    }

    #[test]
    fn pending_requests_lists_provisional_media_only() {
        let (store, video, _title, audio) = store_with_placeholders();
        let requests = pending_requests(store.timeline());
        assert_eq!(
            requests,
            vec![
                DurationRequest {
                    clip: video,
                    path: PathBuf::from("intro.mp4"),
                },
                DurationRequest {
                    clip: audio,
                    path: PathBuf::from("music.wav"),
                },
            ]
        );
    }

    #[tokio::test]
    async fn resolved_durations_replace_placeholders_and_repack() {
        let (mut store, video, title, audio) = store_with_placeholders();
        let probe = FixedProbe::new(&[("intro.mp4", 4.0), ("music.wav", 2.5)]);
        let requests = pending_requests(store.timeline());

        let resolved = resolve_all(probe, requests, store.settings().fps).await;
        assert_eq!(resolved.len(), 2);
        assert_eq!(apply_resolved(&mut store, resolved), 2);

        let timeline = store.timeline();
        let intro = timeline.clip(video).unwrap();
        assert_eq!(intro.duration, Frame(120));
        assert!(!intro.provisional);
        // the title slides along to stay packed behind the corrected clip
        assert_eq!(timeline.clip(title).unwrap().start, Frame(120));
        assert_eq!(timeline.clip(audio).unwrap().duration, Frame(75));
        assert!(pending_requests(timeline).is_empty());
    }

    #[tokio::test]
    async fn failed_probe_leaves_clip_provisional() {
        let (mut store, video, _title, audio) = store_with_placeholders();
        let probe = FixedProbe::new(&[("music.wav", 1.0)]);
        let requests = pending_requests(store.timeline());

        let resolved = resolve_all(probe, requests, 30).await;
        assert_eq!(apply_resolved(&mut store, resolved), 1);

        assert!(store.timeline().clip(video).unwrap().provisional);
        assert_eq!(store.timeline().clip(audio).unwrap().duration, Frame(30));
    }

    #[tokio::test]
    async fn edit_during_probe_wins() {
        let (mut store, video, _title, _audio) = store_with_placeholders();
        let probe = FixedProbe::new(&[("intro.mp4", 4.0), ("music.wav", 2.5)]);
        let requests = pending_requests(store.timeline());

        store
            .resize_clip(0, video, ResizeEdge::Right, Frame(15))
            .unwrap();
        let edited = store.timeline().clip(video).unwrap().duration;

        let resolved = resolve_all(probe, requests, 30).await;
        assert_eq!(apply_resolved(&mut store, resolved), 1);
        assert_eq!(store.timeline().clip(video).unwrap().duration, edited);
    }

    #[tokio::test]
    async fn deleted_clip_is_skipped() {
        let (mut store, video, _title, _audio) = store_with_placeholders();
        let probe = FixedProbe::new(&[("intro.mp4", 4.0), ("music.wav", 2.5)]);
        let requests = pending_requests(store.timeline());
        store.delete_clip(0, video).unwrap();

        let resolved = resolve_all(probe, requests, 30).await;
        assert_eq!(apply_resolved(&mut store, resolved), 1);
    }
}
