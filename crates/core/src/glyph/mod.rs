use serde::{Deserialize, Serialize};

use crate::config::BEAT_DIVISION_RESOLUTION;

/// Position of a note inside its beat, snapped to the sub-beat lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeatFraction {
    Whole,
    Sixth,
    Quarter,
    Third,
    Half,
    TwoThirds,
    ThreeQuarters,
    FiveSixths,
    /// No lattice point matched.
    Irregular,
}

const R: u32 = BEAT_DIVISION_RESOLUTION;

const LATTICE: [(u32, BeatFraction); 8] = [
    (0, BeatFraction::Whole),
    (R / 6, BeatFraction::Sixth),
    (R / 4, BeatFraction::Quarter),
    (R / 3, BeatFraction::Third),
    (R / 2, BeatFraction::Half),
    (R * 2 / 3, BeatFraction::TwoThirds),
    (R * 3 / 4, BeatFraction::ThreeQuarters),
    (R * 5 / 6, BeatFraction::FiveSixths),
];

impl BeatFraction {
    /// Classifies a canonical beat value by its fractional part.
    pub fn for_beat(beat: f64) -> Self {
        let index = lattice_index(beat);
        LATTICE
            .iter()
            .find(|(point, _)| *point == index)
            .map(|(_, fraction)| *fraction)
            .unwrap_or(BeatFraction::Irregular)
    }

    pub fn glyph(self) -> Glyph {
        match self {
            BeatFraction::Whole => Glyph::OnBeat,
            BeatFraction::Quarter => Glyph::Quarter,
            BeatFraction::Third | BeatFraction::FiveSixths => Glyph::Third,
            BeatFraction::Half => Glyph::Half,
            BeatFraction::Sixth | BeatFraction::TwoThirds => Glyph::TwoThirds,
            BeatFraction::ThreeQuarters => Glyph::ThreeQuarters,
            BeatFraction::Irregular => Glyph::Irregular,
        }
    }
}

/// Visual rune shape. Several beat fractions share a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Glyph {
    OnBeat,
    Quarter,
    Third,
    Half,
    TwoThirds,
    ThreeQuarters,
    Irregular,
}

impl Glyph {
    pub const ALL: [Glyph; 7] = [
        Glyph::OnBeat,
        Glyph::Quarter,
        Glyph::Third,
        Glyph::Half,
        Glyph::TwoThirds,
        Glyph::ThreeQuarters,
        Glyph::Irregular,
    ];

    /// Selects the rune drawn for a note at `beat` canonical beats.
    pub fn for_beat(beat: f64) -> Self {
        BeatFraction::for_beat(beat).glyph()
    }
}

/// Closest lattice numerator for the fractional part of `beat`.
fn lattice_index(beat: f64) -> u32 {
    let resolution = BEAT_DIVISION_RESOLUTION as f64;
    let numerator = ((beat - beat.floor()) * resolution).round_ties_even() as u32;
    numerator % BEAT_DIVISION_RESOLUTION
}
