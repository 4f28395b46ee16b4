#![forbid(unsafe_code)]

pub mod background;
pub mod blend;
pub mod brand;
pub mod compose;
pub mod config;
pub mod encode;
pub mod error;
pub mod fetch;
pub mod fingerprint;
pub mod highlight;
pub mod icons;
pub mod pipeline;
pub mod portrait;
pub mod storage;
pub mod svg_raster;
pub mod title;

pub use config::{BackgroundId, LayoutHint, Theme, ThumbnailConfig};
pub use encode::OutputFormat;
pub use error::{ThumbError, ThumbResult};
pub use fetch::PhotoSource;
pub use fingerprint::{ConfigFingerprint, fingerprint_config};
pub use pipeline::{
    EngineOptions, PublishedThumbnail, RenderedThumbnail, ThumbnailEngine,
};
pub use storage::{FsObjectStore, MemoryObjectStore, ObjectStore, StoredObject};
