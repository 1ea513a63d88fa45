//! The validated processing intent produced for every request.

use crate::gravity::{GravityOptions, GravityType};
use crate::primitives::RgbColor;
use imgrelay_core::ImageType;
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResizeType {
    #[default]
    Fit,
    Fill,
    Crop,
    Auto,
}

impl ResizeType {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "fit" => Some(ResizeType::Fit),
            "fill" => Some(ResizeType::Fill),
            "crop" => Some(ResizeType::Crop),
            "auto" => Some(ResizeType::Auto),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeType::Fit => "fit",
            ResizeType::Fill => "fill",
            ResizeType::Crop => "crop",
            ResizeType::Auto => "auto",
        }
    }
}

impl fmt::Display for ResizeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResizeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CropOptions {
    pub width: u32,
    pub height: u32,
    pub gravity: GravityOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WatermarkOptions {
    /// Derived: true iff `opacity > 0`
    pub enabled: bool,
    pub opacity: f64,
    /// Tile the watermark instead of placing it once
    pub replicate: bool,
    pub gravity: GravityType,
    pub offset_x: i32,
    pub offset_y: i32,
    pub scale: f64,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            opacity: 1.0,
            replicate: false,
            gravity: GravityType::Center,
            offset_x: 0,
            offset_y: 0,
            scale: 0.0,
        }
    }
}

/// Processing instructions for a single request.
///
/// Built from the baseline template, then mutated by client hints, the `default`
/// preset, URL options and finally the path extension. Treated as read-only once
/// handed to the processing pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingOptions {
    pub resizing_type: ResizeType,
    pub width: u32,
    pub height: u32,
    pub dpr: f64,
    pub gravity: GravityOptions,
    pub enlarge: bool,
    pub extend: bool,
    pub crop: CropOptions,
    pub format: ImageType,
    pub quality: u8,
    /// Derived from how `background` was supplied
    pub flatten: bool,
    pub background: RgbColor,
    pub blur: f32,
    pub sharpen: f32,
    pub cache_buster: String,
    pub watermark: WatermarkOptions,
    pub prefer_webp: bool,
    pub enforce_webp: bool,
    pub filename: String,
    /// Presets applied so far, in application order
    pub used_presets: Vec<String>,
}

impl ProcessingOptions {
    /// Baseline options before any request input is applied.
    pub fn baseline(quality: u8) -> Self {
        Self {
            resizing_type: ResizeType::Fit,
            width: 0,
            height: 0,
            dpr: 1.0,
            gravity: GravityOptions::new(GravityType::Center),
            enlarge: false,
            extend: false,
            crop: CropOptions::default(),
            format: ImageType::Unknown,
            quality,
            flatten: false,
            background: RgbColor::WHITE,
            blur: 0.0,
            sharpen: 0.0,
            cache_buster: String::new(),
            watermark: WatermarkOptions::default(),
            prefer_webp: false,
            enforce_webp: false,
            filename: String::new(),
            used_presets: Vec::new(),
        }
    }

    pub fn is_preset_used(&self, name: &str) -> bool {
        self.used_presets.iter().any(|used| used == name)
    }

    pub fn preset_used(&mut self, name: &str) {
        self.used_presets.push(name.to_string());
    }
}
