//! Tempo resolution and beat-time normalisation.
//!
//! Chart timestamps are stored relative to the tempo region active when they
//! were written. Layout works in canonical beats measured at the chart's
//! global tempo, so every timestamp passes through a [`TempoContext`] first.

use serde::{Deserialize, Serialize};

use crate::{
    chart::{Note, TempoChange},
    config::{BEAT_DIVISION_RESOLUTION, VERTICAL_PADDING_BEATS},
};

/// Tempo assumed when the chart has no tempo change at song start.
pub const DEFAULT_BPM: f64 = 120.0;
/// Tolerance, in beats, used when comparing tempo change start times.
pub const TEMPO_EPSILON: f64 = 0.0001;
/// Keeps a note sitting exactly on a beat boundary from opening another beat.
const SPAN_EPSILON: f64 = 0.001;

/// The two tempo values needed to place the rendered notes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoContext {
    /// Tempo active at song start.
    pub global_bpm: f64,
    /// Tempo active at the first rendered note.
    pub local_bpm: f64,
    /// Start time of the local tempo region.
    pub local_start: f64,
}

impl TempoContext {
    /// Resolves the global and local tempo for a chart whose first note is
    /// `first_note`.
    pub fn resolve(tempo_changes: &[TempoChange], first_note: &Note) -> Self {
        let global_bpm = tempo_changes
            .iter()
            .find(|change| change.start_time <= TEMPO_EPSILON)
            .map(|change| change.bpm)
            .unwrap_or(DEFAULT_BPM);

        let (local_bpm, local_start) = tempo_changes
            .iter()
            .rev()
            .find(|change| change.start_time <= first_note.time + TEMPO_EPSILON)
            .map(|change| (change.bpm, change.start_time))
            .unwrap_or((global_bpm, 0.0));

        Self {
            global_bpm,
            local_bpm,
            local_start,
        }
    }

    /// Ratio between the global and local tempo.
    pub fn scale_factor(&self) -> f64 {
        self.global_bpm / self.local_bpm
    }

    /// Returns `true` when canonical and raw times coincide.
    pub fn is_identity(&self) -> bool {
        self.global_bpm == self.local_bpm && self.local_start == 0.0
    }

    /// Converts a region-relative timestamp into canonical beats.
    pub fn to_canonical(&self, time: f64) -> f64 {
        (time - self.local_start) * self.scale_factor()
    }

    /// Inverse of [`TempoContext::to_canonical`].
    pub fn from_canonical(&self, beat: f64) -> f64 {
        beat / self.scale_factor() + self.local_start
    }

    /// Number of whole beats the notes between `first` and `last` occupy.
    pub fn total_beats(&self, first: &Note, last: &Note) -> u32 {
        let first_beat = self.to_canonical(first.time).floor();
        let last_beat = (snap_to_lattice(self.to_canonical(last.time)) - SPAN_EPSILON).ceil();

        (last_beat - first_beat).max(0.0) as u32
    }

    /// Region-relative time at the top edge of the rendered window, one grid
    /// division before the beat holding `first`.
    pub fn start_time(&self, first: &Note) -> f64 {
        let start = self.to_canonical(first.time).floor() - VERTICAL_PADDING_BEATS;
        self.from_canonical(start)
    }
}

/// Rounds a beat value to the closest point of the sub-beat lattice.
pub fn snap_to_lattice(beat: f64) -> f64 {
    let resolution = BEAT_DIVISION_RESOLUTION as f64;
    (beat * resolution).round_ties_even() / resolution
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(time: f64) -> Note {
        Note::new(time, 0)
    }

    #[test]
    fn defaults_to_120_without_tempo_changes() {
        let tempo = TempoContext::resolve(&[], &note(1.0));
        assert_eq!(tempo.global_bpm, DEFAULT_BPM);
        assert_eq!(tempo.local_bpm, DEFAULT_BPM);
        assert_eq!(tempo.local_start, 0.0);
        assert!(tempo.is_identity());
    }

    #[test]
    fn single_region_is_identity() {
        let tempo = TempoContext::resolve(&[TempoChange::new(0.0, 150.0)], &note(3.25));
        assert_eq!(tempo.global_bpm, 150.0);
        assert_eq!(tempo.local_bpm, 150.0);
        for time in [0.0, 1.5, 3.25, 4.875] {
            assert_eq!(tempo.to_canonical(time), time);
        }
    }

    #[test]
    fn picks_latest_region_before_first_note() {
        let changes = [
            TempoChange::new(0.0, 120.0),
            TempoChange::new(2.0, 240.0),
            TempoChange::new(8.0, 60.0),
        ];
        let tempo = TempoContext::resolve(&changes, &note(3.0));
        assert_eq!(tempo.global_bpm, 120.0);
        assert_eq!(tempo.local_bpm, 240.0);
        assert_eq!(tempo.local_start, 2.0);
    }

    #[test]
    fn region_starting_at_first_note_is_included() {
        let changes = [TempoChange::new(0.0, 120.0), TempoChange::new(4.0, 60.0)];
        let tempo = TempoContext::resolve(&changes, &note(4.0));
        assert_eq!(tempo.local_bpm, 60.0);
        assert_eq!(tempo.local_start, 4.0);
        assert_eq!(tempo.total_beats(&note(4.0), &note(6.5)), 5);
    }

    #[test]
    fn global_tempo_tolerates_tiny_offsets() {
        let tempo = TempoContext::resolve(&[TempoChange::new(0.00005, 90.0)], &note(0.0));
        assert_eq!(tempo.global_bpm, 90.0);
    }

    #[test]
    fn late_first_region_falls_back_to_global() {
        let tempo = TempoContext::resolve(&[TempoChange::new(6.0, 180.0)], &note(2.0));
        assert_eq!(tempo.global_bpm, DEFAULT_BPM);
        assert_eq!(tempo.local_bpm, DEFAULT_BPM);
    }

    #[test]
    fn rescales_by_tempo_ratio() {
        let changes = [TempoChange::new(0.0, 120.0), TempoChange::new(2.0, 240.0)];
        let tempo = TempoContext::resolve(&changes, &note(3.0));
        assert_eq!(tempo.scale_factor(), 0.5);
        for raw in [3.0, 3.5, 5.0, 6.0] {
            assert_eq!(tempo.to_canonical(raw), 0.5 * (raw - 2.0));
            assert_eq!(tempo.from_canonical(tempo.to_canonical(raw)), raw);
        }
    }

    #[test]
    fn beat_boundary_does_not_open_next_beat() {
        let tempo = TempoContext::resolve(&[], &note(1.0));
        assert_eq!(tempo.total_beats(&note(1.0), &note(3.0)), 2);
        assert_eq!(tempo.total_beats(&note(1.0), &note(3.0 + 1e-6)), 2);
        assert_eq!(tempo.total_beats(&note(1.0), &note(3.01)), 3);
        assert_eq!(tempo.total_beats(&note(1.5), &note(1.5)), 1);
        assert_eq!(tempo.total_beats(&note(2.0), &note(2.0)), 0);
    }

    #[test]
    fn reversed_notes_never_go_negative() {
        let tempo = TempoContext::resolve(&[], &note(4.0));
        assert_eq!(tempo.total_beats(&note(4.0), &note(1.0)), 0);
    }

    #[test]
    fn start_time_leaves_padding() {
        let tempo = TempoContext::resolve(&[], &note(2.6));
        assert_eq!(tempo.start_time(&note(2.6)), 1.75);

        let changes = [TempoChange::new(0.0, 120.0), TempoChange::new(2.0, 240.0)];
        let first = note(5.0);
        let tempo = TempoContext::resolve(&changes, &first);
        // canonical(5.0) = 1.5, floor minus padding = 0.75
        assert_eq!(tempo.to_canonical(tempo.start_time(&first)), 0.75);
    }

    #[test]
    fn snaps_to_nearest_lattice_point() {
        assert_eq!(snap_to_lattice(1.0 / 3.0 + 1e-6), 128.0 / 384.0);
        assert_eq!(snap_to_lattice(2.5), 2.5);
    }
}
