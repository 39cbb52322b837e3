//! CSV export of the session log.
//!
//! Column order is fixed by [`HEADERS`]. Files are written to a temp file in
//! the target directory and renamed into place, so a partially written export
//! is never left under the final name.

use crate::config::{Delimiter, ExportConfig};
use crate::log::LogEntry;
use crate::{Error, Result};
use chrono::{NaiveDate, SecondsFormat};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Header row, in column order; matches the field names of [`CsvRow`]
pub const HEADERS: [&str; 21] = [
    "timestamp",
    "R_SPH",
    "R_CYL",
    "R_AXIS",
    "R_ADD",
    "L_SPH",
    "L_CYL",
    "L_AXIS",
    "L_ADD",
    "PD",
    "Chart_Number",
    "Occluder_State",
    "Chart_Display",
    "Speaker",
    "Utterance_Text",
    "Translation_in_En",
    "Speaker_Intent",
    "Detected_Language",
    "Patient_Confidence_Score",
    "Hesitation_Markers",
    "Requires_Verification",
];

/// Outcome of an export request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportStatus {
    /// The log was empty; nothing was written
    NothingToExport,
    Written { path: PathBuf, rows: usize },
}

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    timestamp: String,
    #[serde(rename = "R_SPH")]
    right_sphere: &'a str,
    #[serde(rename = "R_CYL")]
    right_cylinder: &'a str,
    #[serde(rename = "R_AXIS")]
    right_axis: &'a str,
    #[serde(rename = "R_ADD")]
    right_add: &'a str,
    #[serde(rename = "L_SPH")]
    left_sphere: &'a str,
    #[serde(rename = "L_CYL")]
    left_cylinder: &'a str,
    #[serde(rename = "L_AXIS")]
    left_axis: &'a str,
    #[serde(rename = "L_ADD")]
    left_add: &'a str,
    #[serde(rename = "PD")]
    pd: &'a str,
    #[serde(rename = "Chart_Number")]
    chart_number: &'a str,
    #[serde(rename = "Occluder_State")]
    occluder_state: &'a str,
    #[serde(rename = "Chart_Display")]
    chart_display: &'a str,
    #[serde(rename = "Speaker")]
    speaker: &'a str,
    #[serde(rename = "Utterance_Text")]
    utterance_text: &'a str,
    #[serde(rename = "Translation_in_En")]
    translation_in_en: &'a str,
    #[serde(rename = "Speaker_Intent")]
    speaker_intent: &'a str,
    #[serde(rename = "Detected_Language")]
    detected_language: &'a str,
    #[serde(rename = "Patient_Confidence_Score")]
    patient_confidence_score: &'a str,
    #[serde(rename = "Hesitation_Markers")]
    hesitation_markers: &'a str,
    #[serde(rename = "Requires_Verification")]
    requires_verification: &'a str,
}

impl<'a> From<&'a LogEntry> for CsvRow<'a> {
    fn from(entry: &'a LogEntry) -> Self {
        let voice = &entry.voice;
        CsvRow {
            timestamp: entry
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            right_sphere: &entry.right.sphere,
            right_cylinder: &entry.right.cylinder,
            right_axis: &entry.right.axis,
            right_add: &entry.right.add,
            left_sphere: &entry.left.sphere,
            left_cylinder: &entry.left.cylinder,
            left_axis: &entry.left.axis,
            left_add: &entry.left.add,
            pd: &entry.pd,
            chart_number: &entry.chart_number,
            occluder_state: &entry.occluder_state,
            chart_display: &entry.chart_display,
            speaker: &voice.speaker,
            utterance_text: &voice.utterance_text,
            translation_in_en: &voice.translation_in_en,
            speaker_intent: &voice.speaker_intent,
            detected_language: &voice.detected_language,
            patient_confidence_score: &voice.patient_confidence_score,
            hesitation_markers: &voice.hesitation_markers,
            requires_verification: &voice.requires_verification,
        }
    }
}

/// Write the header and one row per entry
pub fn write_csv<W: Write>(entries: &[LogEntry], delimiter: Delimiter, writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    // serialize() only emits the header alongside the first row
    if entries.is_empty() {
        writer.write_record(HEADERS)?;
    }
    for entry in entries {
        writer.serialize(CsvRow::from(entry))?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the log as CSV text
pub fn to_csv_string(entries: &[LogEntry], delimiter: Delimiter) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(entries, delimiter, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// `refraction_logs_YYYY-MM-DD.csv` (or `.tsv`)
pub fn export_file_name(date: NaiveDate, delimiter: Delimiter) -> String {
    format!(
        "refraction_logs_{}.{}",
        date.format("%Y-%m-%d"),
        delimiter.file_extension()
    )
}

/// Export the log into `config.output_dir`
///
/// An empty log is reported as [`ExportStatus::NothingToExport`] and leaves
/// the filesystem untouched. An existing export for the same date is
/// replaced.
pub fn export_to_dir(
    entries: &[LogEntry],
    config: &ExportConfig,
    date: NaiveDate,
) -> Result<ExportStatus> {
    if entries.is_empty() {
        tracing::info!("No log entries to export");
        return Ok(ExportStatus::NothingToExport);
    }

    let path = config
        .output_dir
        .join(export_file_name(date, config.delimiter));
    write_atomically(entries, config.delimiter, &path)?;

    tracing::info!("Exported {} log entries to {:?}", entries.len(), path);
    Ok(ExportStatus::Written {
        path,
        rows: entries.len(),
    })
}

fn write_atomically(entries: &[LogEntry], delimiter: Delimiter, path: &Path) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| std::io::Error::other("export path missing parent"))?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    {
        let writer = std::io::BufWriter::new(temp.as_file());
        write_csv(entries, delimiter, writer)?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
