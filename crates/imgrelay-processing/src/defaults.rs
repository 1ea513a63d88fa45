//! Per-request default options: baseline template, client hints and the `default` preset.

use crate::options::ProcessingOptions;
use crate::presets::{apply_preset_option, DEFAULT_PRESET};
use crate::setters::OptionContext;
use imgrelay_core::{Config, ParseResult};

/// Upper bound for a DPR supplied through client hints
pub const MAX_CLIENT_HINT_DPR: f64 = 8.0;

/// Request headers that influence the defaults. Absent headers are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingHeaders {
    pub accept: String,
    pub width: String,
    pub viewport_width: String,
    pub dpr: String,
}

pub fn default_processing_options(
    template: &ProcessingOptions,
    config: &Config,
    headers: &ProcessingHeaders,
    ctx: &OptionContext<'_>,
) -> ParseResult<ProcessingOptions> {
    let mut po = template.clone();

    if headers.accept.contains("image/webp") {
        po.prefer_webp = config.enable_webp_detection || config.enforce_webp;
        po.enforce_webp = config.enforce_webp;
    }

    if config.enable_client_hints {
        if let Ok(viewport_width) = headers.viewport_width.parse::<u32>() {
            po.width = viewport_width;
        }
        if let Ok(width) = headers.width.parse::<u32>() {
            po.width = width;
        }
        if let Ok(dpr) = headers.dpr.parse::<f64>() {
            if dpr > 0.0 && dpr <= MAX_CLIENT_HINT_DPR {
                po.dpr = dpr;
            }
        }
    }

    if ctx.presets.contains(DEFAULT_PRESET) {
        apply_preset_option(&mut po, &[DEFAULT_PRESET.to_string()], ctx)?;
    }

    Ok(po)
}
