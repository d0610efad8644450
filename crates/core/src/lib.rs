//! Core library for the Rune Visualiser.
//!
//! Turns a decoded rune string chart into a still image: the tempo context is
//! resolved, note times are normalised to canonical beats, the layout engine
//! sizes the canvas and places each rune, and the renderer paints the layers.
//! Every render is self-contained; the crate performs no I/O unless asked to
//! save an image.

pub mod assets;
pub mod chart;
pub mod config;
pub mod error;
pub mod glyph;
pub mod layout;
pub mod render;
pub mod timeline;

pub use assets::AssetStore;
pub use chart::{Chart, Note, TempoChange};
pub use config::{AppConfig, LogConfig, OutputConfig};
pub use error::{Result, RuneVizError};
pub use glyph::{BeatFraction, Glyph};
pub use layout::{GridLine, GridLineKind, NotePlacement, RenderWindow};
pub use render::{format_for_path, parse_format, render_chart, RenderedImage, Renderer};
pub use timeline::TempoContext;

pub use image::ImageFormat;
