//! Editor session: active mode, tonal adjustments and the source reference.
//!
//! The session owns no pixels. Surfaces learn about changes through the
//! events it queues, see [`EditorSession::take_events`].

mod adjustments;
mod mode;
mod session;

pub use adjustments::Adjustments;
pub use mode::{Channel, Mode};
pub use session::{
    CanvasSource, DEFAULT_SOURCE_URL, DownloadOutcome, DownloadSink, EditorSession, OutputSize,
    SessionEvent, SourceRef,
};
