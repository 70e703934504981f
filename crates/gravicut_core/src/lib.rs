//! Timeline arrangement engine: keeps clips on tracks non-overlapping, repacks them, finds
//! drop positions, resolves cross-track moves and bounds edge resizes by source media.

pub mod collision;
pub mod error;
pub mod gap;
pub mod gravity;
pub mod history;
pub mod interaction;
pub mod project;
pub mod resize;
pub mod settings;
pub mod snapping;
pub mod store;
pub mod types;
pub mod units;

pub use error::{CoreError, Result};
pub use interaction::{Feedback, InteractionController, Point, Release, Viewport};
pub use project::Project;
pub use resize::{ResizeEdge, ResizeOutcome};
pub use settings::Settings;
pub use store::{ArrangementStore, InsertAt, StoreEvent};
pub use types::{Clip, ClipKind, Frame, RenderOptions, Timeline, Track, TrackKind, Zoom};
