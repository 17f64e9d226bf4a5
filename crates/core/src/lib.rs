pub mod errors;
pub mod megacloud;
pub mod model;

pub use errors::{MegacloudError, Result};
pub use megacloud::MegacloudClient;
pub use model::{SourceMetadata, SubtitleTrack, TimeWindow, VideoSource};
