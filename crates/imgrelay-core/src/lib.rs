//! imgrelay core library
//!
//! Configuration, the presets table, the output image-type table and the error
//! types shared by the processing and API crates.

pub mod config;
pub mod error;
pub mod image_type;
pub mod presets;

// Re-export commonly used types
pub use config::Config;
pub use error::{
    ErrorKind, ErrorMetadata, LogLevel, ParseError, ParseResult, RequestError, MSG_FORBIDDEN,
    MSG_INVALID_URL,
};
pub use image_type::{CodecSaveSupport, ImageType, SaveSupport};
pub use presets::{PresetError, Presets, UrlOption, UrlOptions};
