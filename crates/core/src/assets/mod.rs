use std::{collections::HashMap, f32::consts::TAU, fmt};

use tiny_skia::{ColorU8, FillRule, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use crate::{
    config::{BACKGROUND_TILE_SIZE, RUNE_SPRITE_SIZE},
    glyph::Glyph,
    Result, RuneVizError,
};

const WATER_DEEP: [f32; 3] = [24.0, 78.0, 122.0];
const WATER_LIGHT: [f32; 3] = [64.0, 142.0, 186.0];
const RUNE_OUTLINE_RGBA: [u8; 4] = [0x1A, 0x1A, 0x1A, 0xFF];
const RUNE_HIGHLIGHT_RGBA: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xB0];

/// Sprites used by the renderer. They are generated once and shared by every
/// render made through the same store.
pub struct AssetStore {
    background: Pixmap,
    runes: HashMap<Glyph, Pixmap>,
}

impl AssetStore {
    pub fn generate() -> Result<Self> {
        let background = water_tile(BACKGROUND_TILE_SIZE)?;
        let runes = Glyph::ALL
            .iter()
            .map(|&glyph| rune_sprite(glyph, RUNE_SPRITE_SIZE).map(|sprite| (glyph, sprite)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self { background, runes })
    }

    /// Seamless tile painted under the whole canvas.
    pub fn background(&self) -> &Pixmap {
        &self.background
    }

    pub fn rune(&self, glyph: Glyph) -> Result<&Pixmap> {
        self.runes
            .get(&glyph)
            .ok_or_else(|| RuneVizError::Render(format!("no sprite for rune {glyph:?}")))
    }
}

impl fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetStore")
            .field("background", &(self.background.width(), self.background.height()))
            .field("runes", &self.runes.len())
            .finish()
    }
}

/// Fill colour of each rune shape.
pub fn rune_color(glyph: Glyph) -> [u8; 4] {
    match glyph {
        Glyph::OnBeat => [0xE5, 0x3B, 0x3B, 0xFF],
        Glyph::Quarter => [0x3B, 0x6E, 0xE5, 0xFF],
        Glyph::Third => [0x9B, 0x4B, 0xD8, 0xFF],
        Glyph::Half => [0x3B, 0xB5, 0x4A, 0xFF],
        Glyph::TwoThirds => [0xE5, 0x5C, 0xB8, 0xFF],
        Glyph::ThreeQuarters => [0xE5, 0xC0, 0x3B, 0xFF],
        Glyph::Irregular => [0x88, 0x88, 0x88, 0xFF],
    }
}

pub(crate) fn solid_paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    paint.anti_alias = true;
    paint
}

fn allocate(width: u32, height: u32, what: &str) -> Result<Pixmap> {
    Pixmap::new(width, height)
        .ok_or_else(|| RuneVizError::Render(format!("failed to allocate {width}x{height} {what}")))
}

fn water_tile(size: u32) -> Result<Pixmap> {
    let mut tile = allocate(size, size, "background tile")?;
    let extent = size as f32;

    for (index, pixel) in tile.pixels_mut().iter_mut().enumerate() {
        let x = (index as u32 % size) as f32 / extent;
        let y = (index as u32 / size) as f32 / extent;
        // Whole periods along both axes so neighbouring tiles line up.
        let ripple = (TAU * (x + 2.0 * y)).sin() * 0.3 + (TAU * (2.0 * x - y)).cos() * 0.2;
        let mix = (ripple + 0.5).clamp(0.0, 1.0);

        let channel =
            |i: usize| (WATER_DEEP[i] + (WATER_LIGHT[i] - WATER_DEEP[i]) * mix).round() as u8;
        *pixel = ColorU8::from_rgba(channel(0), channel(1), channel(2), 0xFF).premultiply();
    }

    Ok(tile)
}

fn diamond(center: f32, radius: f32) -> Result<Path> {
    let mut builder = PathBuilder::new();
    builder.move_to(center, center - radius);
    builder.line_to(center + radius, center);
    builder.line_to(center, center + radius);
    builder.line_to(center - radius, center);
    builder.close();
    builder
        .finish()
        .ok_or_else(|| RuneVizError::Render("degenerate rune outline".to_string()))
}

fn rune_sprite(glyph: Glyph, size: u32) -> Result<Pixmap> {
    let mut sprite = allocate(size, size, "rune sprite")?;
    let center = size as f32 / 2.0;
    let outline_width = size as f32 / 20.0;
    let body = diamond(center, center - outline_width)?;

    sprite.fill_path(
        &body,
        &solid_paint(rune_color(glyph)),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
    let stroke = Stroke {
        width: outline_width,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    sprite.stroke_path(
        &body,
        &solid_paint(RUNE_OUTLINE_RGBA),
        &stroke,
        Transform::identity(),
        None,
    );

    if glyph == Glyph::Irregular {
        let arm = center * 0.35;
        let mut builder = PathBuilder::new();
        builder.move_to(center - arm, center - arm);
        builder.line_to(center + arm, center + arm);
        builder.move_to(center + arm, center - arm);
        builder.line_to(center - arm, center + arm);
        let cross = builder
            .finish()
            .ok_or_else(|| RuneVizError::Render("degenerate irregular mark".to_string()))?;
        sprite.stroke_path(
            &cross,
            &solid_paint(RUNE_OUTLINE_RGBA),
            &stroke,
            Transform::identity(),
            None,
        );
    } else {
        let highlight = diamond(center, center * 0.35)?;
        sprite.fill_path(
            &highlight,
            &solid_paint(RUNE_HIGHLIGHT_RGBA),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    Ok(sprite)
}
