//! Canvas geometry for a single render.
//!
//! Time flows from the bottom of the canvas to the top. The window opens one
//! grid division before the beat holding the first note and closes one grid
//! division after the last rendered beat.

use serde::{Deserialize, Serialize};

use crate::{
    chart::{Chart, Note},
    config::{
        GRIDLINE_OFFSET, GRID_DIVISION, IMAGE_WIDTH, LANE_COUNT, LANE_GAP, LANE_WIDTH, MAX_BEATS,
        PIXELS_PER_BEAT, RUNE_HEIGHT, VERTICAL_PADDING_BEATS,
    },
    glyph::Glyph,
    timeline::TempoContext,
    Result, RuneVizError,
};

/// Everything the renderer needs to know about the visible time window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderWindow {
    pub tempo: TempoContext,
    pub total_beats: u32,
    /// Region-relative time at the top padding edge.
    pub start_time: f64,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl RenderWindow {
    /// Validates `chart` and derives the window it will be drawn in.
    pub fn compute(chart: &Chart) -> Result<Self> {
        chart.validate()?;
        let (first, last) = match (chart.first_note(), chart.last_note()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(RuneVizError::EmptyChart),
        };

        let tempo = TempoContext::resolve(&chart.tempo_changes, first);
        let total_beats = tempo.total_beats(first, last);
        if total_beats > MAX_BEATS {
            return Err(RuneVizError::TooManyBeats {
                beats: total_beats,
                max: MAX_BEATS,
            });
        }

        let window = Self {
            tempo,
            total_beats,
            start_time: tempo.start_time(first),
            canvas_width: IMAGE_WIDTH,
            canvas_height: canvas_height(total_beats),
        };
        tracing::debug!(
            global_bpm = tempo.global_bpm,
            local_bpm = tempo.local_bpm,
            total_beats,
            height = window.canvas_height,
            "computed render window"
        );
        Ok(window)
    }

    /// Canonical beat at the top padding edge.
    pub fn start_beat(&self) -> f64 {
        self.tempo.to_canonical(self.start_time)
    }

    pub fn place_note(&self, note: &Note) -> NotePlacement {
        let beat = self.tempo.to_canonical(note.time);
        let distance = (beat - self.start_beat()) * PIXELS_PER_BEAT as f64;
        let offset = distance as f32 + RUNE_HEIGHT / 2.0;

        NotePlacement {
            x: lane_x(note.lane),
            y: self.canvas_height as f32 - offset,
            beat,
            glyph: Glyph::for_beat(beat),
        }
    }

    pub fn place_notes(&self, notes: &[Note]) -> Vec<NotePlacement> {
        notes.iter().map(|note| self.place_note(note)).collect()
    }

    /// Horizontal grid lines from the top padding edge downwards.
    pub fn grid_lines(&self) -> Vec<GridLine> {
        let top = VERTICAL_PADDING_BEATS as f32 * PIXELS_PER_BEAT as f32;
        (0..=self.total_beats * GRID_DIVISION)
            .map(|index| GridLine {
                y: top + index as f32 * GRIDLINE_OFFSET,
                kind: if index % GRID_DIVISION == 0 {
                    GridLineKind::Major
                } else {
                    GridLineKind::Minor
                },
            })
            .collect()
    }
}

/// Top-left corner and rune of a placed note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NotePlacement {
    pub x: f32,
    pub y: f32,
    /// Canonical beat of the note.
    pub beat: f64,
    pub glyph: Glyph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridLineKind {
    Major,
    Minor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub y: f32,
    pub kind: GridLineKind,
}

pub fn canvas_height(total_beats: u32) -> u32 {
    let beats = total_beats as f64 + 2.0 * VERTICAL_PADDING_BEATS;
    (PIXELS_PER_BEAT as f64 * beats).ceil() as u32
}

/// Left edge of the rune column for `lane`.
pub fn lane_x(lane: u8) -> f32 {
    LANE_GAP * (4 * lane as u32 + 1) as f32
}

/// Horizontal centres of the lane shadows.
pub fn lane_shadow_centers() -> Vec<f32> {
    (0..LANE_COUNT)
        .map(|lane| lane_x(lane) + LANE_WIDTH / 2.0)
        .collect()
}
