//! Request URL interpretation: turns an image request path into a source URL and
//! a validated set of processing options.

pub mod defaults;
pub mod diff;
pub mod gravity;
pub mod options;
pub mod presets;
pub mod primitives;
pub mod router;
pub mod setters;
pub mod url_decoder;

pub use defaults::{ProcessingHeaders, MAX_CLIENT_HINT_DPR};
pub use diff::OptionsDiff;
pub use gravity::{GravityOptions, GravityType};
pub use options::{CropOptions, ProcessingOptions, ResizeType, WatermarkOptions};
pub use primitives::RgbColor;
pub use router::{parse_url_options, ImageRequest, PathValidator, RequestParser};
pub use url_decoder::{decode_url, DecodedUrl};
