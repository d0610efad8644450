use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

// ── Canvas ──────────────────────────────────────────────────────────
pub const GRID_DIVISION: u32 = 4;
pub const IMAGE_WIDTH: u32 = 400;
pub const PIXELS_PER_BEAT: u32 = 200;
pub const VERTICAL_PADDING_BEATS: f64 = 1.0 / GRID_DIVISION as f64;

// ── Lanes ───────────────────────────────────────────────────────────
pub const LANE_COUNT: u8 = 4;
/// Lanes are three gaps wide, with a gap on each side of every lane.
const LANE_UNITS: u32 = 3 * LANE_COUNT as u32 + LANE_COUNT as u32 + 1;
pub const LANE_WIDTH: f32 = (IMAGE_WIDTH * 3 / LANE_UNITS) as f32;
pub const LANE_GAP: f32 = (IMAGE_WIDTH / LANE_UNITS) as f32;
pub const LANE_SHADOW_RGBA: [u8; 4] = [0x00, 0x00, 0x00, 0x0A];

// ── Grid lines ──────────────────────────────────────────────────────
pub const MAJOR_GRIDLINE_RGBA: [u8; 4] = [0x33, 0x33, 0x33, 0xFF];
pub const MINOR_GRIDLINE_RGBA: [u8; 4] = [0x55, 0x55, 0x55, 0xFF];
pub const MAJOR_GRIDLINE_THICKNESS: f32 = 1.5;
pub const MINOR_GRIDLINE_THICKNESS: f32 = 1.0;
pub const GRIDLINE_OFFSET: f32 = PIXELS_PER_BEAT as f32 / GRID_DIVISION as f32;

// ── Runes ───────────────────────────────────────────────────────────
pub const RUNE_WIDTH: f32 = 3.0 * LANE_GAP;
pub const RUNE_HEIGHT: f32 = 3.0 * LANE_GAP;
pub const RUNE_SPRITE_SIZE: u32 = 128;
pub const BACKGROUND_TILE_SIZE: u32 = 64;
/// Sub-beat lattice; a multiple of 2, 3, 4 and 6.
pub const BEAT_DIVISION_RESOLUTION: u32 = 64 * 6;

// ── Input limits ────────────────────────────────────────────────────
pub const MAX_NOTES: usize = 50;
pub const MAX_BEATS: u32 = 5;

/// Top-level configuration structure for the command line application.
///
/// Drawing constants above are fixed; only the surrounding tooling is
/// configurable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output: OutputConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Reads a JSON configuration file, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "config file not found, using defaults");
            return Ok(Self::default());
        }

        let data = std::fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

/// Settings applied when writing rendered images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when the output path has no recognisable extension.
    pub default_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "png".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
