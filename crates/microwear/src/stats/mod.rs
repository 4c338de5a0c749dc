//! Statistics engine: annotated features + calibration → [`MetricsRecord`].
//!
//! The engine is a pure function of its arguments. It allocates only local
//! working memory, never fails and never emits non-finite values, so it can
//! be called concurrently for many samples.
//!
//! Stages:
//! 1. **Frame** – resolve the analysed pixel rectangle and its area.
//! 2. **Filter** – split pits from scratches and drop categories excluded
//!    from statistics (puncture pits, gouges).
//! 3. **Pits / scratches** – sizing, severity, orientation, grid occupancy.
//! 4. **Derived** – ratios, densities, normalized severities, heterogeneity.
//! 5. **Complexity** – intersection counts and local complexity variation.

mod complexity;
mod frame;
mod orientation;
mod pits;
mod scratches;

use crate::annotation::Annotation;
use crate::calibration::Calibration;
use crate::category::FeatureClass;
use crate::config::StatsConfig;
use crate::metrics::MetricsRecord;

use complexity::{complexity_heterogeneity, count_intersections, per_area, texture_complexity_index};
use frame::AnalysisFrame;
use pits::{PitMeasure, PitSummary};
use scratches::{ScratchMeasure, ScratchSummary};

/// Compute all metrics with the default constants.
///
/// `calibration` may be `None` (raw pixel units).
///
/// ```
/// use microwear::{compute_stats, Annotation, Calibration, Category};
///
/// let items = vec![
///     Annotation::point(Category::Sp, 10.0, 10.0),
///     Annotation::line(Category::Fs, [0.0, 0.0], [40.0, 0.0]),
/// ];
/// let stats = compute_stats(&items, Some(&Calibration::new(2.0)));
/// assert_eq!(stats.crushing_index, 2.0);
/// assert_eq!(stats.ps_ratio, 1.0);
/// ```
pub fn compute_stats(items: &[Annotation], calibration: Option<&Calibration>) -> MetricsRecord {
    compute_stats_with_config(items, calibration, &StatsConfig::default())
}

/// Compute all metrics with explicit engine constants.
pub fn compute_stats_with_config(
    items: &[Annotation],
    calibration: Option<&Calibration>,
    config: &StatsConfig,
) -> MetricsRecord {
    if items.is_empty() {
        return MetricsRecord::default();
    }

    let scale = Calibration::effective(calibration);
    let frame = AnalysisFrame::resolve(items, &scale, &config.grid);

    let relevant = items.iter().filter(|item| item.is_statistically_relevant());
    let mut pits: Vec<PitMeasure> = Vec::new();
    let mut scratches: Vec<ScratchMeasure> = Vec::new();
    for item in relevant {
        match item.shape.class() {
            FeatureClass::Pit => pits.extend(PitMeasure::from_annotation(
                item,
                &scale,
                &config.pits,
                &config.complexity,
            )),
            FeatureClass::Scratch => {
                scratches.extend(ScratchMeasure::from_annotation(item, &scale, &config.scratches))
            }
        }
    }

    let pit_summary = PitSummary::compute(&pits, &frame, &config.pits, config.grid.pit_cells);
    let scratch_summary = ScratchSummary::compute(
        &scratches,
        &frame,
        &config.scratches,
        config.grid.scratch_cells,
    );

    let n_pits = pit_summary.count as f64;
    let n_scratches = scratch_summary.count as f64;
    let n_features = n_pits + n_scratches;

    let ps_ratio = if scratch_summary.count > 0 {
        n_pits / n_scratches
    } else {
        n_pits
    };

    let severity_pits = pit_summary.total_area_um2;
    let severity_scratches = scratch_summary.total_area_um2;
    let severity_total = severity_pits + severity_scratches;
    let as_percent_of_frame = |area_um2: f64| {
        if frame.area_um2 > 0.0 {
            100.0 * area_um2 / frame.area_um2
        } else {
            0.0
        }
    };

    let anisotropy = scratch_summary.orientation.resultant();
    let vector_consistency = scratch_summary.orientation.consistency();

    let density_pits = per_area(n_pits, frame.area_mm2);
    let intersection_count = count_intersections(&scratches, &pits) as f64;
    let intersection_density = per_area(intersection_count, frame.area_mm2);

    let pit_het = pit_summary.occupancy.coefficient_of_variation();
    let scratch_het = scratch_summary.coverage.coefficient_of_variation();

    let record = MetricsRecord {
        crushing_index: pit_summary.mean_diameter_um,
        perc_measured_pits: pit_summary.perc_large,
        max_pit_diameter: pit_summary.max_diameter_um,
        severity_pits,
        mean_scratch_width: scratch_summary.mean_width_um,
        aspect_ratio: scratch_summary.mean_aspect_ratio,
        measured_aspect_ratio: scratch_summary.measured_aspect_ratio,
        severity_scratches,
        ps_ratio,
        anisotropy,
        vector_consistency,
        mean_orient: scratch_summary.orientation.mean_degrees(),
        bg_abrasion: per_area(scratch_summary.total_length_um / 1000.0, frame.area_mm2),
        severity_total,
        severity_ratio: ratio_or_zero(severity_pits, severity_scratches),
        mean_feature_severity: ratio_or_zero(severity_total, n_features),
        durophagy_index: ps_ratio * pit_summary.mean_diameter_um,
        density_pits,
        density_scratches: per_area(n_scratches, frame.area_mm2),
        density_total: per_area(n_features, frame.area_mm2),
        severity_pitsn: as_percent_of_frame(severity_pits),
        severity_scratchesn: as_percent_of_frame(severity_scratches),
        severity_totaln: as_percent_of_frame(severity_total),
        pit_het,
        scratch_het,
        global_het: (pit_het + scratch_het) / 2.0,
        intersection_count,
        intersection_density,
        texture_complexity_index: texture_complexity_index(
            intersection_density,
            vector_consistency,
            density_pits,
            &config.complexity,
        ),
        complexity_het: complexity_heterogeneity(
            &scratches,
            &pits,
            &frame,
            config.grid.scratch_cells,
            &config.complexity,
        ),
        mfd: ratio_or_zero(
            pit_summary.sum_diameter_um + scratch_summary.sum_width_um,
            n_features,
        ),
    };

    tracing::debug!(
        "stats: {} items -> {} pits, {} scratches, frame {:.0}x{:.0}px ({:.4} mm²), {} intersections",
        items.len(),
        pit_summary.count,
        scratch_summary.count,
        frame.width_px,
        frame.height_px,
        frame.area_mm2,
        intersection_count,
    );

    finite_or_zero(record)
}

fn ratio_or_zero(num: f64, den: f64) -> f64 {
    if den != 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Replace any non-finite metric (e.g. from non-finite input coordinates)
/// with 0.
fn finite_or_zero(record: MetricsRecord) -> MetricsRecord {
    if record.is_finite() {
        return record;
    }
    tracing::warn!("non-finite metrics replaced with 0; check input coordinates");
    let values: Vec<f64> = record
        .fields()
        .into_iter()
        .map(|(_, v)| if v.is_finite() { v } else { 0.0 })
        .collect();
    MetricsRecord::from_values(&values)
}
