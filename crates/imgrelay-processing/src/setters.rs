//! Option registry
//!
//! Every processing option is reached through [`OptionName::from_name`], which folds
//! canonical names and their short aliases onto one variant. Each setter validates
//! its own arguments before touching the options and fails with `InvalidArgument`
//! naming the option; the first failure aborts the whole parse.

use crate::gravity::{parse_gravity, GravityType};
use crate::options::{ProcessingOptions, ResizeType};
use crate::presets::apply_preset_option;
use crate::primitives::{color_from_hex, parse_bool_option, parse_dimension};
use imgrelay_core::{ErrorKind, ImageType, ParseError, ParseResult, Presets, SaveSupport, UrlOption};

/// Read-only collaborators the setters consult.
#[derive(Clone, Copy)]
pub struct OptionContext<'a> {
    pub presets: &'a Presets,
    pub save_support: &'a dyn SaveSupport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionName {
    Format,
    Resize,
    ResizingType,
    Size,
    Width,
    Height,
    Enlarge,
    Extend,
    Dpr,
    Gravity,
    Crop,
    Quality,
    Background,
    Blur,
    Sharpen,
    Watermark,
    Preset,
    CacheBuster,
    Filename,
}

impl OptionName {
    pub fn from_name(name: &str) -> Option<Self> {
        let option = match name {
            "format" | "f" | "ext" => OptionName::Format,
            "resize" | "rs" => OptionName::Resize,
            "resizing_type" | "rt" => OptionName::ResizingType,
            "size" | "s" => OptionName::Size,
            "width" | "w" => OptionName::Width,
            "height" | "h" => OptionName::Height,
            "enlarge" | "el" => OptionName::Enlarge,
            "extend" | "ex" => OptionName::Extend,
            "dpr" => OptionName::Dpr,
            "gravity" | "g" => OptionName::Gravity,
            "crop" | "c" => OptionName::Crop,
            "quality" | "q" => OptionName::Quality,
            "background" | "bg" => OptionName::Background,
            "blur" | "bl" => OptionName::Blur,
            "sharpen" | "sh" => OptionName::Sharpen,
            "watermark" | "wm" => OptionName::Watermark,
            "preset" | "pr" => OptionName::Preset,
            "cachebuster" | "cb" => OptionName::CacheBuster,
            "filename" | "fn" => OptionName::Filename,
            _ => return None,
        };

        Some(option)
    }
}

pub fn apply_processing_options(
    po: &mut ProcessingOptions,
    options: &[UrlOption],
    ctx: &OptionContext<'_>,
) -> ParseResult<()> {
    for option in options {
        apply_processing_option(po, option, ctx)?;
    }

    Ok(())
}

pub fn apply_processing_option(
    po: &mut ProcessingOptions,
    option: &UrlOption,
    ctx: &OptionContext<'_>,
) -> ParseResult<()> {
    let name = OptionName::from_name(&option.name).ok_or_else(|| {
        ParseError::new(
            ErrorKind::UnknownOption,
            format!("Unknown processing option: {}", option.name),
        )
    })?;
    let args = option.args.as_slice();

    match name {
        OptionName::Format => apply_format_option(po, args, ctx.save_support),
        OptionName::Resize => apply_resize_option(po, args),
        OptionName::ResizingType => apply_resizing_type_option(po, args),
        OptionName::Size => apply_size_option(po, args),
        OptionName::Width => apply_width_option(po, args),
        OptionName::Height => apply_height_option(po, args),
        OptionName::Enlarge => apply_enlarge_option(po, args),
        OptionName::Extend => apply_extend_option(po, args),
        OptionName::Dpr => apply_dpr_option(po, args),
        OptionName::Gravity => parse_gravity(&mut po.gravity, args),
        OptionName::Crop => apply_crop_option(po, args),
        OptionName::Quality => apply_quality_option(po, args),
        OptionName::Background => apply_background_option(po, args),
        OptionName::Blur => apply_blur_option(po, args),
        OptionName::Sharpen => apply_sharpen_option(po, args),
        OptionName::Watermark => apply_watermark_option(po, args),
        OptionName::Preset => apply_preset_option(po, args, ctx),
        OptionName::CacheBuster => {
            po.cache_buster = single_arg("cache buster", args)?.to_string();
            Ok(())
        }
        OptionName::Filename => {
            po.filename = single_arg("filename", args)?.to_string();
            Ok(())
        }
    }
}

/// Options that take exactly one argument.
fn single_arg<'a>(option: &str, args: &'a [String]) -> ParseResult<&'a str> {
    match args {
        [arg] => Ok(arg.as_str()),
        _ => Err(ParseError::invalid_arguments(option, args)),
    }
}

fn check_arity(option: &str, args: &[String], max: usize) -> ParseResult<()> {
    if args.is_empty() || args.len() > max {
        return Err(ParseError::invalid_arguments(option, args));
    }
    Ok(())
}

/// Positional argument `i`, or `None` when absent or blank.
fn non_empty(args: &[String], i: usize) -> Option<&str> {
    args.get(i).map(String::as_str).filter(|arg| !arg.is_empty())
}

pub fn apply_width_option(po: &mut ProcessingOptions, args: &[String]) -> ParseResult<()> {
    po.width = parse_dimension("width", single_arg("width", args)?)?;
    Ok(())
}

pub fn apply_height_option(po: &mut ProcessingOptions, args: &[String]) -> ParseResult<()> {
    po.height = parse_dimension("height", single_arg("height", args)?)?;
    Ok(())
}

pub fn apply_enlarge_option(po: &mut ProcessingOptions, args: &[String]) -> ParseResult<()> {
    po.enlarge = parse_bool_option(single_arg("enlarge", args)?);
    Ok(())
}

fn apply_extend_option(po: &mut ProcessingOptions, args: &[String]) -> ParseResult<()> {
    po.extend = parse_bool_option(single_arg("extend", args)?);
    Ok(())
}

/// `size:width:height:enlarge:extend`, blank positions are left unchanged.
fn apply_size_option(po: &mut ProcessingOptions, args: &[String]) -> ParseResult<()> {
    check_arity("size", args, 4)?;

    if let Some(width) = non_empty(args, 0) {
        po.width = parse_dimension("width", width)?;
    }
    if let Some(height) = non_empty(args, 1) {
        po.height = parse_dimension("height", height)?;
    }
    if let Some(enlarge) = non_empty(args, 2) {
        po.enlarge = parse_bool_option(enlarge);
    }
    if let Some(extend) = non_empty(args, 3) {
        po.extend = parse_bool_option(extend);
    }

    Ok(())
}

fn apply_resizing_type_option(po: &mut ProcessingOptions, args: &[String]) -> ParseResult<()> {
    let arg = single_arg("resizing type", args)?;
    po.resizing_type = ResizeType::from_name(arg)
        .ok_or_else(|| ParseError::invalid_argument(format!("Invalid resize type: {}", arg)))?;
    Ok(())
}

/// `resize:type:width:height:enlarge:extend`, blank positions are left unchanged.
fn apply_resize_option(po: &mut ProcessingOptions, args: &[String]) -> ParseResult<()> {
    check_arity("resize", args, 5)?;

    if !args[0].is_empty() {
        apply_resizing_type_option(po, &args[0..1])?;
    }

    if args.len() > 1 {
        apply_size_option(po, &args[1..])?;
    }

    Ok(())
}

fn apply_dpr_option(po: &mut ProcessingOptions, args: &[String]) -> ParseResult<()> {
    let arg = single_arg("dpr", args)?;
    po.dpr = arg
        .parse::<f64>()
        .ok()
        .filter(|dpr| *dpr > 0.0)
        .ok_or_else(|| ParseError::invalid_argument(format!("Invalid dpr: {}", arg)))?;
    Ok(())
}

/// `crop:width:height[:gravity...]`; the crop gravity is independent of the main one.
fn apply_crop_option(po: &mut ProcessingOptions, args: &[String]) -> ParseResult<()> {
    check_arity("crop", args, 5)?;

    if let Some(width) = non_empty(args, 0) {
        po.crop.width = parse_dimension("crop width", width)?;
    }
    if let Some(height) = non_empty(args, 1) {
        po.crop.height = parse_dimension("crop height", height)?;
    }
    if let Some(gravity) = args.get(2..).filter(|rest| rest.iter().any(|arg| !arg.is_empty())) {
        parse_gravity(&mut po.crop.gravity, gravity)?;
    }

    Ok(())
}

fn apply_quality_option(po: &mut ProcessingOptions, args: &[String]) -> ParseResult<()> {
    let arg = single_arg("quality", args)?;
    po.quality = arg
        .parse::<u8>()
        .ok()
        .filter(|quality| (1..=100).contains(quality))
        .ok_or_else(|| ParseError::invalid_argument(format!("Invalid quality: {}", arg)))?;
    Ok(())
}

/// `bg:<hex>` (blank disables flattening) or `bg:r:g:b`.
fn apply_background_option(po: &mut ProcessingOptions, args: &[String]) -> ParseResult<()> {
    match args {
        [hex] if hex.is_empty() => {
            po.flatten = false;
        }
        [hex] => {
            let color = color_from_hex(hex).map_err(|err| {
                ParseError::invalid_argument(format!("Invalid background argument: {}", err))
            })?;
            po.flatten = true;
            po.background = color;
        }
        [r, g, b] => {
            po.flatten = true;
            po.background.r = parse_channel("red", r)?;
            po.background.g = parse_channel("green", g)?;
            po.background.b = parse_channel("blue", b)?;
        }
        _ => return Err(ParseError::invalid_arguments("background", args)),
    }

    Ok(())
}

fn parse_channel(channel: &str, arg: &str) -> ParseResult<u8> {
    arg.parse::<u8>().map_err(|_| {
        ParseError::invalid_argument(format!("Invalid background {} channel: {}", channel, arg))
    })
}

fn apply_blur_option(po: &mut ProcessingOptions, args: &[String]) -> ParseResult<()> {
    po.blur = parse_non_negative("blur", single_arg("blur", args)?)?;
    Ok(())
}

fn apply_sharpen_option(po: &mut ProcessingOptions, args: &[String]) -> ParseResult<()> {
    po.sharpen = parse_non_negative("sharpen", single_arg("sharpen", args)?)?;
    Ok(())
}

fn parse_non_negative(name: &str, arg: &str) -> ParseResult<f32> {
    arg.parse::<f32>()
        .ok()
        .filter(|value| *value >= 0.0)
        .ok_or_else(|| ParseError::invalid_argument(format!("Invalid {}: {}", name, arg)))
}

/// `wm:opacity:position:x_offset:y_offset:scale`
fn apply_watermark_option(po: &mut ProcessingOptions, args: &[String]) -> ParseResult<()> {
    check_arity("watermark", args, 7)?;

    let opacity = args[0]
        .parse::<f64>()
        .ok()
        .filter(|opacity| (0.0..=1.0).contains(opacity))
        .ok_or_else(|| {
            ParseError::invalid_argument(format!("Invalid watermark opacity: {}", args[0]))
        })?;
    po.watermark.enabled = opacity > 0.0;
    po.watermark.opacity = opacity;

    if let Some(position) = non_empty(args, 1) {
        if position == "re" {
            po.watermark.replicate = true;
        } else {
            po.watermark.gravity = GravityType::from_name(position)
                .filter(|g| !matches!(g, GravityType::Smart | GravityType::FocusPoint))
                .ok_or_else(|| {
                    ParseError::invalid_argument(format!(
                        "Invalid watermark position: {}",
                        position
                    ))
                })?;
        }
    }

    if let Some(x) = non_empty(args, 2) {
        po.watermark.offset_x = x.parse::<i32>().map_err(|_| {
            ParseError::invalid_argument(format!("Invalid watermark X offset: {}", x))
        })?;
    }

    if let Some(y) = non_empty(args, 3) {
        po.watermark.offset_y = y.parse::<i32>().map_err(|_| {
            ParseError::invalid_argument(format!("Invalid watermark Y offset: {}", y))
        })?;
    }

    if let Some(scale) = non_empty(args, 4) {
        po.watermark.scale = scale
            .parse::<f64>()
            .ok()
            .filter(|scale| *scale >= 0.0)
            .ok_or_else(|| {
                ParseError::invalid_argument(format!("Invalid watermark scale: {}", scale))
            })?;
    }

    Ok(())
}

/// Resolve and set the output format. A known but unsaveable type is rejected.
pub fn apply_format_option(
    po: &mut ProcessingOptions,
    args: &[String],
    save_support: &dyn SaveSupport,
) -> ParseResult<()> {
    let arg = single_arg("format", args)?;

    let format = ImageType::from_name(arg)
        .ok_or_else(|| ParseError::invalid_argument(format!("Invalid image format: {}", arg)))?;

    if !save_support.can_save(format) {
        return Err(ParseError::new(
            ErrorKind::UnsupportedFormat,
            format!("Resulting image format is not supported: {}", format),
        ));
    }

    po.format = format;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::RgbColor;

    struct SaveAll;

    impl SaveSupport for SaveAll {
        fn can_save(&self, _image_type: ImageType) -> bool {
            true
        }
    }

    struct SaveNothing;

    impl SaveSupport for SaveNothing {
        fn can_save(&self, _image_type: ImageType) -> bool {
            false
        }
    }

    fn apply(po: &mut ProcessingOptions, segment: &str) -> ParseResult<()> {
        let presets = Presets::new();
        let ctx = OptionContext {
            presets: &presets,
            save_support: &SaveAll,
        };
        let option = UrlOption::parse(segment).expect("option token");
        apply_processing_option(po, &option, &ctx)
    }

    fn po() -> ProcessingOptions {
        ProcessingOptions::baseline(80)
    }

    #[test]
    fn test_aliases_resolve_to_same_option() {
        let pairs = [
            ("format", "f"),
            ("resize", "rs"),
            ("resizing_type", "rt"),
            ("size", "s"),
            ("width", "w"),
            ("height", "h"),
            ("enlarge", "el"),
            ("extend", "ex"),
            ("gravity", "g"),
            ("crop", "c"),
            ("quality", "q"),
            ("background", "bg"),
            ("blur", "bl"),
            ("sharpen", "sh"),
            ("watermark", "wm"),
            ("preset", "pr"),
            ("cachebuster", "cb"),
            ("filename", "fn"),
        ];
        for (name, alias) in pairs {
            assert_eq!(OptionName::from_name(name), OptionName::from_name(alias));
            assert!(OptionName::from_name(name).is_some(), "{name}");
        }
        assert_eq!(OptionName::from_name("ext"), Some(OptionName::Format));
        assert_eq!(OptionName::from_name("dpr"), Some(OptionName::Dpr));
        assert_eq!(OptionName::from_name("RS"), None);
    }

    #[test]
    fn test_unknown_option() {
        let mut po = po();
        let err = apply(&mut po, "rotate:90").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownOption);
        assert_eq!(err.detail, "Unknown processing option: rotate");
    }

    #[test]
    fn test_resize_sparse_arguments() {
        let mut po = po();
        apply(&mut po, "rs:fill:300:200:1:1").unwrap();
        assert_eq!(po.resizing_type, ResizeType::Fill);
        assert_eq!((po.width, po.height), (300, 200));
        assert!(po.enlarge);
        assert!(po.extend);

        apply(&mut po, "resize:fit::150").unwrap();
        assert_eq!(po.resizing_type, ResizeType::Fit);
        assert_eq!(po.width, 300);
        assert_eq!(po.height, 150);

        apply(&mut po, "resize::50").unwrap();
        assert_eq!(po.resizing_type, ResizeType::Fit);
        assert_eq!(po.width, 50);
    }

    #[test]
    fn test_resize_errors() {
        let mut po = po();
        assert!(apply(&mut po, "rs:fill:1:2:1:1:extra").is_err());
        let err = apply(&mut po, "rs:stretch").unwrap_err();
        assert_eq!(err.detail, "Invalid resize type: stretch");
        let err = apply(&mut po, "rs:fit:-1").unwrap_err();
        assert_eq!(err.detail, "Invalid width: -1");
    }

    #[test]
    fn test_size_and_dimensions() {
        let mut po = po();
        apply(&mut po, "s:100:200").unwrap();
        assert_eq!((po.width, po.height), (100, 200));

        apply(&mut po, "w:10").unwrap();
        apply(&mut po, "h:20").unwrap();
        assert_eq!((po.width, po.height), (10, 20));

        assert!(apply(&mut po, "w:10:20").is_err());
        assert!(apply(&mut po, "s:1:2:3:4:5").is_err());
        assert!(apply(&mut po, "h:abc").is_err());
    }

    #[test]
    fn test_enlarge_is_permissive() {
        let mut po = po();
        apply(&mut po, "el:1").unwrap();
        assert!(po.enlarge);
        apply(&mut po, "el:maybe").unwrap();
        assert!(!po.enlarge);
    }

    #[test]
    fn test_dpr() {
        let mut po = po();
        apply(&mut po, "dpr:12.5").unwrap();
        assert_eq!(po.dpr, 12.5);
        assert!(apply(&mut po, "dpr:0").is_err());
        assert!(apply(&mut po, "dpr:-1").is_err());
        assert!(apply(&mut po, "dpr:x").is_err());
    }

    #[test]
    fn test_crop_uses_own_gravity() {
        let mut po = po();
        apply(&mut po, "c:100:50:nowe:5:6").unwrap();
        assert_eq!((po.crop.width, po.crop.height), (100, 50));
        assert_eq!(po.crop.gravity.gravity_type, GravityType::NorthWest);
        assert_eq!((po.crop.gravity.x, po.crop.gravity.y), (5.0, 6.0));
        assert_eq!(po.gravity.gravity_type, GravityType::Center);

        apply(&mut po, "crop::75").unwrap();
        assert_eq!((po.crop.width, po.crop.height), (100, 75));

        let err = apply(&mut po, "crop:-1").unwrap_err();
        assert_eq!(err.detail, "Invalid crop width: -1");
        assert!(apply(&mut po, "crop:1:1:xx").is_err());
    }

    #[test]
    fn test_crop_rejects_offsets_without_gravity() {
        let mut po = po();

        let err = apply(&mut po, "crop:10:10::5").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        assert_eq!(err.detail, "Invalid gravity: ");
        assert!(apply(&mut po, "c:10:10::5:7").is_err());

        let mut po = self::po();
        apply(&mut po, "c:10:10::").unwrap();
        assert_eq!((po.crop.width, po.crop.height), (10, 10));
        assert_eq!(po.crop.gravity.gravity_type, GravityType::Unknown);
    }

    #[test]
    fn test_quality_range() {
        let mut po = po();
        apply(&mut po, "q:1").unwrap();
        assert_eq!(po.quality, 1);
        apply(&mut po, "quality:100").unwrap();
        assert_eq!(po.quality, 100);

        for bad in ["q:0", "q:101", "q:-5", "q:abc", "q:"] {
            let err = apply(&mut po, bad).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidArgument, "{bad}");
        }
        assert_eq!(po.quality, 100);
    }

    #[test]
    fn test_background_shapes() {
        let mut po = po();
        apply(&mut po, "bg:ff0000").unwrap();
        assert!(po.flatten);
        assert_eq!(po.background, RgbColor::new(255, 0, 0));

        apply(&mut po, "bg:").unwrap();
        assert!(!po.flatten);

        apply(&mut po, "bg:10:20:30").unwrap();
        assert!(po.flatten);
        assert_eq!(po.background, RgbColor::new(10, 20, 30));

        let err = apply(&mut po, "bg:10:20:256").unwrap_err();
        assert_eq!(err.detail, "Invalid background blue channel: 256");
        assert!(apply(&mut po, "bg:10:20").is_err());
        assert!(apply(&mut po, "bg:zzz").is_err());
    }

    #[test]
    fn test_blur_and_sharpen() {
        let mut po = po();
        apply(&mut po, "bl:2.5").unwrap();
        apply(&mut po, "sh:0.7").unwrap();
        assert_eq!(po.blur, 2.5);
        assert_eq!(po.sharpen, 0.7);
        assert!(apply(&mut po, "bl:-1").is_err());
        assert!(apply(&mut po, "sh:NaN").is_err());
    }

    #[test]
    fn test_watermark() {
        let mut po = po();
        apply(&mut po, "wm:0.5:soea:10:-20:0.25").unwrap();
        assert!(po.watermark.enabled);
        assert_eq!(po.watermark.opacity, 0.5);
        assert_eq!(po.watermark.gravity, GravityType::SouthEast);
        assert_eq!(po.watermark.offset_x, 10);
        assert_eq!(po.watermark.offset_y, -20);
        assert_eq!(po.watermark.scale, 0.25);
        assert!(!po.watermark.replicate);

        apply(&mut po, "wm:1:re").unwrap();
        assert!(po.watermark.replicate);

        apply(&mut po, "wm:0").unwrap();
        assert!(!po.watermark.enabled);
    }

    #[test]
    fn test_watermark_rejects_smart_and_focus_point() {
        let mut po = po();
        for bad in ["wm:1:sm", "wm:1:fp", "wm:1:up"] {
            let err = apply(&mut po, bad).unwrap_err();
            assert!(err.detail.starts_with("Invalid watermark position"), "{bad}");
        }
        assert!(apply(&mut po, "wm:1.5").is_err());
        assert!(apply(&mut po, "wm:1:ce:1.5").is_err());
        assert!(apply(&mut po, "wm:1:ce:0:0:-1").is_err());
    }

    #[test]
    fn test_format() {
        let mut po = po();
        apply(&mut po, "f:png").unwrap();
        assert_eq!(po.format, ImageType::Png);
        apply(&mut po, "ext:jpg").unwrap();
        assert_eq!(po.format, ImageType::Jpeg);

        let err = apply(&mut po, "format:psd").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);

        let err = apply(&mut po, "f:JPG").unwrap_err();
        assert_eq!(err.detail, "Invalid image format: JPG");
        assert_eq!(po.format, ImageType::Jpeg);

        let err = apply_format_option(&mut po, &["webp".to_string()], &SaveNothing).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedFormat);
        assert_eq!(po.format, ImageType::Jpeg);
    }

    #[test]
    fn test_opaque_strings() {
        let mut po = po();
        apply(&mut po, "cb:abc123").unwrap();
        apply(&mut po, "fn:holiday").unwrap();
        assert_eq!(po.cache_buster, "abc123");
        assert_eq!(po.filename, "holiday");
        assert!(apply(&mut po, "cb:a:b").is_err());
    }

    #[test]
    fn test_empty_argument_list_is_rejected() {
        let mut po = po();
        let presets = Presets::new();
        let ctx = OptionContext {
            presets: &presets,
            save_support: &SaveAll,
        };
        for name in ["w", "rs", "c", "wm", "bg", "q", "g"] {
            let option = UrlOption::new(name, Vec::new());
            assert!(apply_processing_option(&mut po, &option, &ctx).is_err(), "{name}");
        }
    }
}
