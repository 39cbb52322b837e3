//! Session log: immutable snapshots of the measurement state.
//!
//! One entry is derived after every state-changing transition. Entries are
//! never edited; the log only grows or is cleared as a whole.

use crate::catalog::lookup_chart;
use crate::format::{format_axis, format_lens, format_pd};
use crate::RefractionState;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Formatted refraction for one eye, as written to the log
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EyeSnapshot {
    pub sphere: String,
    pub cylinder: String,
    pub axis: String,
    pub add: String,
}

/// Columns reserved for voice transcription; never filled in here
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VoiceAnnotation {
    pub speaker: String,
    pub utterance_text: String,
    pub translation_in_en: String,
    pub speaker_intent: String,
    pub detected_language: String,
    pub patient_confidence_score: String,
    pub hesitation_markers: String,
    pub requires_verification: String,
}

/// One row of the session log
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub right: EyeSnapshot,
    pub left: EyeSnapshot,
    pub pd: String,
    pub chart_number: String,
    pub occluder_state: String,
    pub chart_display: String,
    pub voice: VoiceAnnotation,
}

fn eye_snapshot(value: &crate::RefractionValue) -> EyeSnapshot {
    EyeSnapshot {
        sphere: format_lens(value.sphere),
        cylinder: format_lens(value.cylinder),
        axis: format_axis(value.axis),
        add: format_lens(value.add),
    }
}

/// Derive a log entry from a state snapshot
///
/// Pure: the same state, chart and timestamp always give the same entry.
pub fn snapshot_log_entry(
    state: &RefractionState,
    chart_id: &str,
    now: DateTime<Utc>,
) -> LogEntry {
    let chart = lookup_chart(chart_id);

    LogEntry {
        timestamp: now,
        right: eye_snapshot(&state.eyes.right),
        left: eye_snapshot(&state.eyes.left),
        pd: format_pd(state.pd.total()),
        chart_number: chart.category_label,
        occluder_state: state.occlusion.describe().to_string(),
        chart_display: chart.display_label,
        voice: VoiceAnnotation::default(),
    }
}

/// Append-only sequence of log entries
#[derive(Clone, Debug, Default)]
pub struct SessionLog {
    entries: Vec<LogEntry>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        tracing::debug!("Cleared {} log entries", dropped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Eye, PdLayout};
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_snapshot_of_defaults() {
        let state = RefractionState::initial(PdLayout::Split, "E-1.0");
        let entry = snapshot_log_entry(&state, &state.chart_id, fixed_time());

        assert_eq!(entry.timestamp, fixed_time());
        assert_eq!(entry.right.sphere, "+0.00");
        assert_eq!(entry.right.axis, "180");
        assert_eq!(entry.left.add, "+0.00");
        assert_eq!(entry.pd, "64.0");
        assert_eq!(entry.chart_number, "E Chart");
        assert_eq!(entry.chart_display, "1.0");
        assert_eq!(entry.occluder_state, "None");
        assert_eq!(entry.voice, VoiceAnnotation::default());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = RefractionState::initial(PdLayout::Single, "special-rg");
        state.eyes.right.sphere = -2.5;
        state.eyes.left.cylinder = -0.75;
        state.eyes.left.axis = 90.0;
        state.occlusion.toggle(Eye::Left);

        let entry = snapshot_log_entry(&state, &state.chart_id, fixed_time());

        assert_eq!(entry.right.sphere, "-2.50");
        assert_eq!(entry.left.cylinder, "-0.75");
        assert_eq!(entry.left.axis, "90");
        assert_eq!(entry.occluder_state, "Left");
        assert_eq!(entry.chart_number, "Duochrome Chart");
    }

    #[test]
    fn test_session_log_append_and_clear() {
        let state = RefractionState::initial(PdLayout::Split, "E-1.0");
        let mut log = SessionLog::new();
        assert!(log.is_empty());

        log.append(snapshot_log_entry(&state, "E-1.0", fixed_time()));
        log.append(snapshot_log_entry(&state, "C-0.5", fixed_time()));
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[1].chart_number, "C Chart");

        log.clear();
        assert!(log.is_empty());
    }
}
