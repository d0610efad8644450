use std::{fmt, io::Cursor, path::Path};

use image::{DynamicImage, ImageFormat, RgbaImage};
use tiny_skia::{
    FilterQuality, LineCap, Paint, PathBuilder, Pattern, Pixmap, PixmapPaint, Rect, SpreadMode,
    Stroke, Transform,
};

use crate::{
    assets::{solid_paint, AssetStore},
    chart::{Chart, Note},
    config::{
        LANE_SHADOW_RGBA, LANE_WIDTH, MAJOR_GRIDLINE_RGBA, MAJOR_GRIDLINE_THICKNESS,
        MINOR_GRIDLINE_RGBA, MINOR_GRIDLINE_THICKNESS, RUNE_HEIGHT, RUNE_WIDTH,
    },
    layout::{lane_shadow_centers, GridLineKind, RenderWindow},
    Result, RuneVizError,
};

/// Output formats the renderer can be asked for.
pub const SUPPORTED_FORMATS: [ImageFormat; 3] =
    [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Bmp];

/// Paints charts onto a fresh canvas per call. The sprites are shared, so one
/// renderer can serve any number of renders, from any thread.
#[derive(Debug)]
pub struct Renderer {
    assets: AssetStore,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        Ok(Self::with_assets(AssetStore::generate()?))
    }

    pub fn with_assets(assets: AssetStore) -> Self {
        Self { assets }
    }

    /// Validates `chart` and paints it. Nothing is allocated for a rejected
    /// chart.
    pub fn render(&self, chart: &Chart) -> Result<RenderedImage> {
        let window = RenderWindow::compute(chart)?;
        let mut canvas = Pixmap::new(window.canvas_width, window.canvas_height).ok_or_else(|| {
            RuneVizError::Render(format!(
                "failed to allocate {}x{} canvas",
                window.canvas_width, window.canvas_height
            ))
        })?;

        self.draw_background(&mut canvas)?;
        draw_lane_shadows(&mut canvas)?;
        draw_grid_lines(&mut canvas, &window)?;
        self.draw_notes(&mut canvas, &window, &chart.notes)?;

        tracing::debug!(
            width = canvas.width(),
            height = canvas.height(),
            notes = chart.notes.len(),
            "rendered chart"
        );
        Ok(RenderedImage {
            window,
            pixmap: canvas,
        })
    }

    fn draw_background(&self, canvas: &mut Pixmap) -> Result<()> {
        let mut paint = Paint::default();
        paint.shader = Pattern::new(
            self.assets.background().as_ref(),
            SpreadMode::Repeat,
            FilterQuality::Nearest,
            1.0,
            Transform::identity(),
        );
        let rect = canvas_rect(canvas)?;
        canvas.fill_rect(rect, &paint, Transform::identity(), None);
        Ok(())
    }

    fn draw_notes(&self, canvas: &mut Pixmap, window: &RenderWindow, notes: &[Note]) -> Result<()> {
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };

        for note in notes {
            let placement = window.place_note(note);
            let sprite = self.assets.rune(placement.glyph)?;
            tracing::trace!(
                lane = note.lane,
                beat = placement.beat,
                glyph = ?placement.glyph,
                "placing rune"
            );

            let transform = Transform::from_row(
                RUNE_WIDTH / sprite.width() as f32,
                0.0,
                0.0,
                RUNE_HEIGHT / sprite.height() as f32,
                placement.x,
                placement.y,
            );
            canvas.draw_pixmap(0, 0, sprite.as_ref(), &paint, transform, None);
        }

        Ok(())
    }
}

fn canvas_rect(canvas: &Pixmap) -> Result<Rect> {
    Rect::from_xywh(0.0, 0.0, canvas.width() as f32, canvas.height() as f32)
        .ok_or_else(|| RuneVizError::Render("canvas has no area".to_string()))
}

fn stroke_line(
    canvas: &mut Pixmap,
    from: (f32, f32),
    to: (f32, f32),
    paint: &Paint<'_>,
    stroke: &Stroke,
) -> Result<()> {
    let mut builder = PathBuilder::new();
    builder.move_to(from.0, from.1);
    builder.line_to(to.0, to.1);
    let path = builder
        .finish()
        .ok_or_else(|| RuneVizError::Render("degenerate line".to_string()))?;
    canvas.stroke_path(&path, paint, stroke, Transform::identity(), None);
    Ok(())
}

fn draw_lane_shadows(canvas: &mut Pixmap) -> Result<()> {
    let paint = solid_paint(LANE_SHADOW_RGBA);
    let stroke = Stroke {
        width: LANE_WIDTH,
        line_cap: LineCap::Butt,
        ..Stroke::default()
    };
    let height = canvas.height() as f32;

    for x in lane_shadow_centers() {
        stroke_line(canvas, (x, 0.0), (x, height), &paint, &stroke)?;
    }
    Ok(())
}

fn draw_grid_lines(canvas: &mut Pixmap, window: &RenderWindow) -> Result<()> {
    let major = solid_paint(MAJOR_GRIDLINE_RGBA);
    let minor = solid_paint(MINOR_GRIDLINE_RGBA);
    let major_stroke = Stroke {
        width: MAJOR_GRIDLINE_THICKNESS,
        ..Stroke::default()
    };
    let minor_stroke = Stroke {
        width: MINOR_GRIDLINE_THICKNESS,
        ..Stroke::default()
    };
    let width = canvas.width() as f32;

    for line in window.grid_lines() {
        let (paint, stroke) = match line.kind {
            GridLineKind::Major => (&major, &major_stroke),
            GridLineKind::Minor => (&minor, &minor_stroke),
        };
        stroke_line(canvas, (0.0, line.y), (width, line.y), paint, stroke)?;
    }
    Ok(())
}

/// Raster produced by a single render, ready to be encoded.
#[derive(Clone)]
pub struct RenderedImage {
    window: RenderWindow,
    pixmap: Pixmap,
}

impl RenderedImage {
    pub fn window(&self) -> &RenderWindow {
        &self.window
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied RGBA pixels as painted.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        let data = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect();
        RgbaImage::from_raw(self.width(), self.height(), data).ok_or_else(|| {
            RuneVizError::Render("pixel buffer does not match canvas size".to_string())
        })
    }

    /// Encodes the image in `format`. Formats without an alpha channel receive
    /// the flattened RGB image.
    pub fn encode(&self, format: ImageFormat) -> Result<Vec<u8>> {
        let image = DynamicImage::ImageRgba8(self.to_rgba_image()?);
        let image = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
            _ => image,
        };

        let mut cursor = Cursor::new(Vec::new());
        image.write_to(&mut cursor, format)?;
        Ok(cursor.into_inner())
    }

    /// Writes the image to `path` in the format named by its extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = format_for_path(path)?;
        std::fs::write(path, self.encode(format)?)?;
        Ok(())
    }
}

impl fmt::Debug for RenderedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedImage")
            .field("window", &self.window)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Looks up a supported output format by extension or name (`png`, `jpg`, ...).
pub fn parse_format(name: &str) -> Result<ImageFormat> {
    ImageFormat::from_extension(name.trim_start_matches('.'))
        .filter(|format| SUPPORTED_FORMATS.contains(format))
        .ok_or_else(|| RuneVizError::UnsupportedFormat(name.to_string()))
}

pub fn format_for_path(path: &Path) -> Result<ImageFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| RuneVizError::UnsupportedFormat(path.display().to_string()))?;
    parse_format(extension)
}

/// Renders `chart` with a freshly generated sprite set.
pub fn render_chart(chart: &Chart) -> Result<RenderedImage> {
    Renderer::new()?.render(chart)
}
