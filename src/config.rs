//! Expression configuration
//!
//! Configuration arrives as a palette plus a flat map of numeric parameters.
//! Nothing here is ever rejected: missing keys fall back to defaults and
//! out-of-range values are normalized by the expression that reads them.

use embassy_time::Duration;
use heapless::{LinearMap, Vec};

use crate::color::{Color, WHITE};
use crate::expression::AutoTrigger;

/// Maximum number of parameters per expression
pub const MAX_PARAMETERS: usize = 16;

/// Maximum number of palette colors per expression
pub const MAX_PALETTE: usize = 8;

/// Numeric parameters keyed by name
pub type Parameters<'a> = LinearMap<&'a str, u32, MAX_PARAMETERS>;

/// Ordered palette; insertion order is the cycling order
pub type Palette = Vec<Color, MAX_PALETTE>;

pub const PARAM_INTERVAL_MIN: &str = "intervalMin";
pub const PARAM_INTERVAL_MAX: &str = "intervalMax";

static NO_PARAMETERS: Parameters<'static> = LinearMap::new();

/// Configuration of a single expression
#[derive(Debug, Clone, Copy)]
pub struct ExpressionConfig<'a> {
    /// Palette colors, extra colors beyond [`MAX_PALETTE`] are ignored
    pub colors: &'a [Color],
    /// Variant specific parameters
    pub parameters: &'a Parameters<'a>,
}

impl<'a> ExpressionConfig<'a> {
    pub const fn new(colors: &'a [Color], parameters: &'a Parameters<'a>) -> Self {
        Self { colors, parameters }
    }

    /// Configuration with a palette and default parameters
    pub fn with_colors(colors: &'a [Color]) -> Self {
        Self::new(colors, &NO_PARAMETERS)
    }

    /// Read a parameter, falling back to `default` when absent
    pub fn parameter(&self, key: &str, default: u32) -> u32 {
        self.parameters.get(key).copied().unwrap_or(default)
    }

    /// Read a parameter if present
    pub fn optional_parameter(&self, key: &str) -> Option<u32> {
        self.parameters.get(key).copied()
    }

    /// Palette truncated to [`MAX_PALETTE`] colors
    pub fn palette(&self) -> Palette {
        let count = self.colors.len().min(MAX_PALETTE);
        let mut palette = Palette::new();
        let _ = palette.extend_from_slice(&self.colors[..count]);
        palette
    }

    /// Palette that is never empty, white when no colors are configured
    pub fn palette_or_white(&self) -> Palette {
        let mut palette = self.palette();
        if palette.is_empty() {
            let _ = palette.push(WHITE);
        }
        palette
    }

    /// Automatic trigger interval, in seconds, when both bounds are given
    pub fn auto_trigger(&self) -> Option<AutoTrigger> {
        let min = self.optional_parameter(PARAM_INTERVAL_MIN)?;
        let max = self.optional_parameter(PARAM_INTERVAL_MAX)?;

        Some(AutoTrigger::new(
            Duration::from_secs(u64::from(min)),
            Duration::from_secs(u64::from(max)),
        ))
    }
}
