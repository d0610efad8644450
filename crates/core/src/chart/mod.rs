use serde::{Deserialize, Serialize};

use crate::{
    config::{LANE_COUNT, MAX_NOTES},
    Result, RuneVizError,
};

/// A single rune. `time` is in beats relative to the tempo region active at
/// that point of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub time: f64,
    pub lane: u8,
}

impl Note {
    pub fn new(time: f64, lane: u8) -> Self {
        Self { time, lane }
    }
}

/// Start of a tempo region. The region lasts until the next change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoChange {
    pub start_time: f64,
    pub bpm: f64,
}

impl TempoChange {
    pub fn new(start_time: f64, bpm: f64) -> Self {
        Self { start_time, bpm }
    }
}

/// Decoded rune string: notes in render order plus the tempo map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub notes: Vec<Note>,
    #[serde(default)]
    pub tempo_changes: Vec<TempoChange>,
}

impl Chart {
    pub fn new(notes: Vec<Note>, tempo_changes: Vec<TempoChange>) -> Self {
        Self {
            notes,
            tempo_changes,
        }
    }

    /// Parses a decoded chart from its JSON representation. Malformed charts
    /// are reported as input rejections.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(RuneVizError::InvalidChart)
    }

    pub fn first_note(&self) -> Option<&Note> {
        self.notes.first()
    }

    pub fn last_note(&self) -> Option<&Note> {
        self.notes.last()
    }

    /// Checks the structural limits that do not depend on tempo. The beat span
    /// limit is enforced by [`crate::RenderWindow::compute`].
    pub fn validate(&self) -> Result<()> {
        if self.notes.len() > MAX_NOTES {
            return Err(RuneVizError::TooManyNotes {
                count: self.notes.len(),
                max: MAX_NOTES,
            });
        }
        if self.notes.is_empty() {
            return Err(RuneVizError::EmptyChart);
        }

        if let Some((index, note)) = self
            .notes
            .iter()
            .enumerate()
            .find(|(_, note)| note.lane >= LANE_COUNT)
        {
            return Err(RuneVizError::InvalidLane {
                index,
                lane: note.lane,
            });
        }

        if let Some((index, change)) = self
            .tempo_changes
            .iter()
            .enumerate()
            .find(|(_, change)| !(change.bpm.is_finite() && change.bpm > 0.0))
        {
            return Err(RuneVizError::InvalidTempo {
                index,
                bpm: change.bpm,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(count: usize) -> Vec<Note> {
        (0..count)
            .map(|i| Note::new(i as f64 * 0.05, (i % 4) as u8))
            .collect()
    }

    #[test]
    fn parses_json_without_tempo_changes() {
        let chart = Chart::from_json(r#"{ "notes": [{ "time": 1.5, "lane": 2 }] }"#).unwrap();
        assert_eq!(chart.notes, vec![Note::new(1.5, 2)]);
        assert!(chart.tempo_changes.is_empty());
    }

    #[test]
    fn unparsable_lanes_are_input_rejections() {
        for lane in ["-1", "300", "\"left\""] {
            let json = format!(r#"{{ "notes": [{{ "time": 0.0, "lane": {lane} }}] }}"#);
            let err = Chart::from_json(&json).unwrap_err();
            assert!(matches!(err, RuneVizError::InvalidChart(_)), "lane {lane}: {err}");
            assert!(err.is_input_rejection());
        }
    }

    #[test]
    fn out_of_range_lane_and_unparsable_lane_share_a_class() {
        let parsed = Chart::from_json(r#"{ "notes": [{ "time": 0.0, "lane": 4 }] }"#).unwrap();
        let invalid = parsed.validate().unwrap_err();
        let malformed =
            Chart::from_json(r#"{ "notes": [{ "time": 0.0, "lane": -1 }] }"#).unwrap_err();
        assert!(invalid.is_input_rejection());
        assert_eq!(invalid.is_input_rejection(), malformed.is_input_rejection());
    }

    #[test]
    fn rejects_empty_chart() {
        let err = Chart::default().validate().unwrap_err();
        assert!(matches!(err, RuneVizError::EmptyChart));
    }

    #[test]
    fn note_count_boundary() {
        assert!(Chart::new(notes(50), Vec::new()).validate().is_ok());

        let err = Chart::new(notes(51), Vec::new()).validate().unwrap_err();
        assert!(matches!(
            err,
            RuneVizError::TooManyNotes { count: 51, max: 50 }
        ));
    }

    #[test]
    fn rejects_out_of_range_lane() {
        let chart = Chart::new(vec![Note::new(0.0, 1), Note::new(0.5, 4)], Vec::new());
        let err = chart.validate().unwrap_err();
        assert!(matches!(err, RuneVizError::InvalidLane { index: 1, lane: 4 }));
    }

    #[test]
    fn rejects_non_positive_bpm() {
        let chart = Chart::new(notes(1), vec![TempoChange::new(0.0, 0.0)]);
        assert!(matches!(
            chart.validate(),
            Err(RuneVizError::InvalidTempo { index: 0, .. })
        ));
    }
}
