pub mod builder;
pub mod client;
pub mod errors;
pub mod resolver;

pub use builder::*;
pub use client::*;
pub use errors::*;
pub use resolver::*;

pub use hianime_core::{SourceMetadata, SubtitleTrack, TimeWindow, VideoSource};
