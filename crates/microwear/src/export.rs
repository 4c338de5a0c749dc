//! `;`-separated tables of counts and metrics for spreadsheet tools.

use std::io;

use crate::category::Category;
use crate::config::StatsConfig;
use crate::error::ExportError;
use crate::metrics::MetricsRecord;
use crate::project::{Project, Sample};

const DELIMITER: u8 = b';';
const AVERAGE_COUNT_DECIMALS: usize = 2;

/// Which table to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportMode {
    /// Raw feature counts per category, one row per sample.
    Counts,
    /// Metrics, one row per sample.
    Stats,
    /// Counts followed by metrics, one row per sample.
    #[default]
    Full,
    /// Mean counts and metrics, one row per specimen.
    Average,
}

impl ExportMode {
    fn has_counts(self) -> bool {
        matches!(self, Self::Counts | Self::Full)
    }

    fn has_stats(self) -> bool {
        matches!(self, Self::Stats | Self::Full)
    }
}

/// Column headers for `mode`.
pub fn header(mode: ExportMode) -> Vec<String> {
    let labels = Category::ALL.iter().map(|c| c.label().to_string());
    let keys = MetricsRecord::KEYS.iter().map(|k| k.to_string());
    match mode {
        ExportMode::Average => ["Id", "Species", "Age"]
            .into_iter()
            .map(String::from)
            .chain(labels)
            .chain(keys)
            .chain(std::iter::once("Mag".to_string()))
            .collect(),
        _ => {
            let mut cols: Vec<String> = ["Group", "Sample Name", "Calibrated"]
                .into_iter()
                .map(String::from)
                .collect();
            if mode.has_counts() {
                cols.extend(labels);
            }
            if mode.has_stats() {
                cols.extend(keys);
            }
            cols
        }
    }
}

/// Write the table for `project` to `writer`.
pub fn write_table<W: io::Write>(
    project: &Project,
    mode: ExportMode,
    config: &StatsConfig,
    writer: W,
) -> Result<(), ExportError> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote_style(csv::QuoteStyle::NonNumeric)
        .from_writer(writer);
    out.write_record(header(mode))?;

    let mut rows = 0usize;
    if mode == ExportMode::Average {
        for avg in project.specimen_averages(config) {
            let mut row = vec![avg.id, avg.species, avg.age];
            row.extend(
                avg.counts
                    .iter()
                    .map(|v| format!("{:.*}", AVERAGE_COUNT_DECIMALS, v)),
            );
            row.extend(metric_cells(&avg.metrics));
            row.push(avg.mag);
            out.write_record(&row)?;
            rows += 1;
        }
    } else {
        for sample in &project.samples {
            out.write_record(sample_row(project, sample, mode, config))?;
            rows += 1;
        }
    }
    out.flush()?;
    tracing::debug!("exported {:?} table with {} rows", mode, rows);
    Ok(())
}

/// Render the table into a string.
pub fn table_to_string(
    project: &Project,
    mode: ExportMode,
    config: &StatsConfig,
) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_table(project, mode, config, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ExportError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn sample_row(project: &Project, sample: &Sample, mode: ExportMode, config: &StatsConfig) -> Vec<String> {
    // Reports the scale the metrics were computed with, not the stored flag.
    let calibrated = if sample.is_calibrated() { "Yes" } else { "No" };
    let mut row = vec![
        project.group_of(sample).to_string(),
        sample.name.clone(),
        calibrated.to_string(),
    ];
    if mode.has_counts() {
        let counts = sample.counts();
        row.extend(Category::ALL.iter().map(|&c| counts.get(c).to_string()));
    }
    if mode.has_stats() {
        row.extend(metric_cells(&sample.stats(config)));
    }
    row
}

fn metric_cells(record: &MetricsRecord) -> impl Iterator<Item = String> + '_ {
    record
        .fields()
        .into_iter()
        .zip(MetricsRecord::DECIMALS.iter())
        .map(|((_, v), &decimals)| format!("{:.*}", decimals, v))
}
