//! Preset expansion
//!
//! A preset name expands in place into its option list, applied through the same
//! path as URL options. Each name expands at most once per request, which bounds
//! recursion when presets reference each other.

use crate::options::ProcessingOptions;
use crate::setters::{apply_processing_options, OptionContext};
use imgrelay_core::{ErrorKind, ParseError, ParseResult, Presets, SaveSupport};

pub const DEFAULT_PRESET: &str = "default";

pub fn apply_preset_option(
    po: &mut ProcessingOptions,
    names: &[String],
    ctx: &OptionContext<'_>,
) -> ParseResult<()> {
    for name in names {
        let options = ctx.presets.get(name).ok_or_else(|| {
            ParseError::new(ErrorKind::UnknownPreset, format!("Unknown preset: {}", name))
        })?;

        if po.is_preset_used(name) {
            tracing::warn!(preset = %name, "Recursive preset usage is detected");
            continue;
        }

        po.preset_used(name);
        apply_processing_options(po, options, ctx)?;
    }

    Ok(())
}

/// Apply every preset to a blank options value so that broken definitions are
/// reported at startup instead of on the first request that uses them.
pub fn validate_presets(
    presets: &Presets,
    save_support: &dyn SaveSupport,
    quality: u8,
) -> Result<(), anyhow::Error> {
    let ctx = OptionContext {
        presets,
        save_support,
    };

    for (name, _) in presets.iter() {
        let mut po = ProcessingOptions::baseline(quality);
        apply_preset_option(&mut po, &[name.to_string()], &ctx)
            .map_err(|e| anyhow::anyhow!("Invalid preset '{}': {}", name, e))?;
    }

    Ok(())
}
