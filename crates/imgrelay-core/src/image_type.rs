//! Output image types and the "can we produce this" predicate.

use serde::{Serialize, Serializer};
use std::fmt;

/// Output format requested for a processed image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageType {
    /// Let the processing pipeline decide
    #[default]
    Unknown,
    Jpeg,
    Png,
    WebP,
    Gif,
    Ico,
    Svg,
    Heic,
    Bmp,
    Tiff,
    Avif,
}

impl ImageType {
    /// Resolve a format name or file extension
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "jpeg" | "jpg" => Some(ImageType::Jpeg),
            "png" => Some(ImageType::Png),
            "webp" => Some(ImageType::WebP),
            "gif" => Some(ImageType::Gif),
            "ico" => Some(ImageType::Ico),
            "svg" => Some(ImageType::Svg),
            "heic" => Some(ImageType::Heic),
            "bmp" => Some(ImageType::Bmp),
            "tiff" | "tif" => Some(ImageType::Tiff),
            "avif" => Some(ImageType::Avif),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageType::Unknown => "",
            ImageType::Jpeg => "jpeg",
            ImageType::Png => "png",
            ImageType::WebP => "webp",
            ImageType::Gif => "gif",
            ImageType::Ico => "ico",
            ImageType::Svg => "svg",
            ImageType::Heic => "heic",
            ImageType::Bmp => "bmp",
            ImageType::Tiff => "tiff",
            ImageType::Avif => "avif",
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            ImageType::Unknown => "application/octet-stream",
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
            ImageType::WebP => "image/webp",
            ImageType::Gif => "image/gif",
            ImageType::Ico => "image/x-icon",
            ImageType::Svg => "image/svg+xml",
            ImageType::Heic => "image/heif",
            ImageType::Bmp => "image/bmp",
            ImageType::Tiff => "image/tiff",
            ImageType::Avif => "image/avif",
        }
    }

    /// Encoder format in the `image` crate, if it has one
    pub fn to_image_format(self) -> Option<image::ImageFormat> {
        match self {
            ImageType::Jpeg => Some(image::ImageFormat::Jpeg),
            ImageType::Png => Some(image::ImageFormat::Png),
            ImageType::WebP => Some(image::ImageFormat::WebP),
            ImageType::Gif => Some(image::ImageFormat::Gif),
            ImageType::Ico => Some(image::ImageFormat::Ico),
            ImageType::Bmp => Some(image::ImageFormat::Bmp),
            ImageType::Tiff => Some(image::ImageFormat::Tiff),
            ImageType::Avif => Some(image::ImageFormat::Avif),
            ImageType::Unknown | ImageType::Svg | ImageType::Heic => None,
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ImageType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ImageType::Unknown => serializer.serialize_none(),
            other => serializer.serialize_str(other.as_str()),
        }
    }
}

/// Answers whether the service is able to produce a given output format.
pub trait SaveSupport: Send + Sync {
    fn can_save(&self, image_type: ImageType) -> bool;
}

/// Save support backed by the encoders compiled into the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodecSaveSupport;

impl SaveSupport for CodecSaveSupport {
    fn can_save(&self, image_type: ImageType) -> bool {
        image_type
            .to_image_format()
            .map(|format| format.writing_enabled())
            .unwrap_or(false)
    }
}
