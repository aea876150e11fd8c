pub mod captions;
pub mod reference;
pub mod ytdlp;

use async_trait::async_trait;

pub use captions::{CaptionTrack, YtDlpInfo, parse_json3};
pub use reference::VideoRef;
pub use ytdlp::YtDlpSource;

use crate::types::VideoContent;

/// Retrieval of video metadata and transcript.
///
/// Never fails: implementations return `VideoContent::fallback` when the
/// provider can't be reached.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, video: &VideoRef, lang_hint: Option<&str>) -> VideoContent;
}
