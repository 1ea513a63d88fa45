//! Request path parsing
//!
//! `/<signature>/<options or presets>/<source url>[.ext]`
//!
//! Three grammars follow the signature segment:
//!
//! * presets only (`only_presets`): `preset1:preset2/<url>`
//! * basic, when the first segment is a resizing type: `type/width/height/gravity/enlarge/<url>`
//! * advanced (default): `name:arg:arg/.../<url>`

use crate::defaults::{default_processing_options, ProcessingHeaders};
use crate::diff::OptionsDiff;
use crate::gravity::parse_gravity;
use crate::options::{ProcessingOptions, ResizeType};
use crate::presets::{apply_preset_option, validate_presets};
use crate::setters::{
    apply_enlarge_option, apply_format_option, apply_height_option, apply_processing_options,
    apply_width_option, OptionContext,
};
use crate::url_decoder::decode_url;
use imgrelay_core::{
    CodecSaveSupport, Config, ErrorKind, ParseError, ParseResult, RequestError, SaveSupport,
    UrlOption, UrlOptions,
};
use serde::Serialize;
use std::sync::Arc;

/// Minimum segment count of the basic grammar, excluding the signature
const BASIC_MIN_SEGMENTS: usize = 6;

/// Verifies the signature segment against the rest of the path.
pub trait PathValidator: Send + Sync {
    fn validate_path(&self, signature: &str, path: &str) -> Result<(), anyhow::Error>;
}

/// Parse result handed to the processing pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRequest {
    pub source_url: String,
    pub options: ProcessingOptions,
}

/// Turns request paths into [`ImageRequest`]s.
///
/// Holds the read-only configuration and the baseline options template, both built
/// once at startup and shared by every request.
#[derive(Clone)]
pub struct RequestParser {
    config: Arc<Config>,
    template: ProcessingOptions,
    save_support: Arc<dyn SaveSupport>,
    path_validator: Option<Arc<dyn PathValidator>>,
}

impl RequestParser {
    pub fn new(config: Arc<Config>) -> Self {
        let template = ProcessingOptions::baseline(config.quality);

        Self {
            config,
            template,
            save_support: Arc::new(CodecSaveSupport),
            path_validator: None,
        }
    }

    pub fn with_save_support(mut self, save_support: Arc<dyn SaveSupport>) -> Self {
        self.save_support = save_support;
        self
    }

    pub fn with_path_validator(mut self, path_validator: Arc<dyn PathValidator>) -> Self {
        self.path_validator = Some(path_validator);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Baseline options every request starts from
    pub fn template(&self) -> &ProcessingOptions {
        &self.template
    }

    /// Fail fast on preset definitions that could never be applied.
    pub fn validate_presets(&self) -> Result<(), anyhow::Error> {
        validate_presets(
            &self.config.presets,
            self.save_support.as_ref(),
            self.config.quality,
        )
    }

    /// Options that differ from the baseline template
    pub fn diff(&self, options: &ProcessingOptions) -> OptionsDiff {
        OptionsDiff::between(&self.template, options)
    }

    /// Parse a raw (still percent-escaped) request path.
    pub fn parse(
        &self,
        raw_path: &str,
        headers: &ProcessingHeaders,
    ) -> Result<ImageRequest, RequestError> {
        let parts: Vec<String> = raw_path
            .strip_prefix('/')
            .unwrap_or(raw_path)
            .split('/')
            .map(str::to_string)
            .collect();

        if parts.len() < 2 {
            return Err(ParseError::new(
                ErrorKind::InvalidPath,
                format!("Invalid path: {}", raw_path),
            )
            .into());
        }

        if !self.config.allow_insecure {
            self.check_signature(raw_path, &parts[0])?;
        }

        let ctx = OptionContext {
            presets: &self.config.presets,
            save_support: self.save_support.as_ref(),
        };

        let segments = &parts[1..];
        let request = if self.config.only_presets {
            self.parse_path_presets(segments, headers, &ctx)
        } else if ResizeType::from_name(&segments[0]).is_some() {
            self.parse_path_basic(segments, headers, &ctx)
        } else {
            self.parse_path_advanced(segments, headers, &ctx)
        }?;

        tracing::debug!(
            source_url = %request.source_url,
            options = %self.diff(&request.options),
            "Parsed image request"
        );

        Ok(request)
    }

    fn check_signature(&self, raw_path: &str, signature: &str) -> Result<(), RequestError> {
        let validator = self.path_validator.as_ref().ok_or_else(|| {
            RequestError::Forbidden("Signature validation is not configured".to_string())
        })?;

        let signed_path = raw_path
            .strip_prefix(&format!("/{}", signature))
            .unwrap_or(raw_path);

        validator
            .validate_path(signature, signed_path)
            .map_err(|e| RequestError::Forbidden(e.to_string()))
    }

    fn defaults(
        &self,
        headers: &ProcessingHeaders,
        ctx: &OptionContext<'_>,
    ) -> ParseResult<ProcessingOptions> {
        default_processing_options(&self.template, &self.config, headers, ctx)
    }

    fn parse_path_advanced(
        &self,
        segments: &[String],
        headers: &ProcessingHeaders,
        ctx: &OptionContext<'_>,
    ) -> ParseResult<ImageRequest> {
        let mut po = self.defaults(headers, ctx)?;

        let (options, url_parts) = parse_url_options(segments);
        apply_processing_options(&mut po, &options, ctx)?;

        self.finish(po, url_parts, ctx)
    }

    fn parse_path_presets(
        &self,
        segments: &[String],
        headers: &ProcessingHeaders,
        ctx: &OptionContext<'_>,
    ) -> ParseResult<ImageRequest> {
        let mut po = self.defaults(headers, ctx)?;

        let presets: Vec<String> = segments[0].split(':').map(str::to_string).collect();
        apply_preset_option(&mut po, &presets, ctx)?;

        self.finish(po, &segments[1..], ctx)
    }

    fn parse_path_basic(
        &self,
        segments: &[String],
        headers: &ProcessingHeaders,
        ctx: &OptionContext<'_>,
    ) -> ParseResult<ImageRequest> {
        if segments.len() < BASIC_MIN_SEGMENTS {
            return Err(ParseError::new(
                ErrorKind::InvalidPath,
                format!("Invalid basic URL format arguments: {}", segments.join("/")),
            ));
        }

        let mut po = self.defaults(headers, ctx)?;

        if let Some(resizing_type) = ResizeType::from_name(&segments[0]) {
            po.resizing_type = resizing_type;
        }
        apply_width_option(&mut po, &segments[1..2])?;
        apply_height_option(&mut po, &segments[2..3])?;

        let gravity: Vec<String> = segments[3].split(':').map(str::to_string).collect();
        parse_gravity(&mut po.gravity, &gravity)?;

        apply_enlarge_option(&mut po, &segments[4..5])?;

        self.finish(po, &segments[5..], ctx)
    }

    /// Decode the source URL; an explicit extension overrides any `format` option.
    fn finish(
        &self,
        mut po: ProcessingOptions,
        url_parts: &[String],
        ctx: &OptionContext<'_>,
    ) -> ParseResult<ImageRequest> {
        let decoded = decode_url(url_parts, &self.config.base_url)?;

        if let Some(extension) = decoded.extension {
            apply_format_option(&mut po, &[extension], ctx.save_support)?;
        }

        Ok(ImageRequest {
            source_url: decoded.url,
            options: po,
        })
    }
}

/// Split leading `name:args` segments from the source URL segments. The first
/// segment without a colon starts the URL; if every segment has one, the URL part
/// is empty.
pub fn parse_url_options(segments: &[String]) -> (UrlOptions, &[String]) {
    let mut options = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate() {
        match UrlOption::parse(segment) {
            Some(option) => options.push(option),
            None => return (options, &segments[i..]),
        }
    }

    (options, &segments[segments.len()..])
}
