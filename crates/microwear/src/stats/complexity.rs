//! Intersection-based texture complexity.

use crate::config::ComplexityParams;
use crate::geometry::{segment_hits_circle, segments_cross};
use crate::grid::{coefficient_of_variation, GridLayout};

use super::frame::AnalysisFrame;
use super::orientation::AxialAccumulator;
use super::pits::PitMeasure;
use super::scratches::ScratchMeasure;

/// Scratch–scratch crossings plus scratch–pit contacts.
///
/// Quadratic in the number of scratches.
pub(crate) fn count_intersections(scratches: &[ScratchMeasure], pits: &[PitMeasure]) -> usize {
    let mut count = 0;
    for (i, s) in scratches.iter().enumerate() {
        count += scratches[i + 1..]
            .iter()
            .filter(|t| segments_cross(&s.segment, &t.segment))
            .count();
        count += pits
            .iter()
            .filter(|p| segment_hits_circle(&s.segment, p.center, p.contact_radius_px))
            .count();
    }
    count
}

/// `intersection_density × vector_consistency + pit_density × weight`.
pub(crate) fn texture_complexity_index(
    intersection_density: f64,
    vector_consistency: f64,
    pit_density: f64,
    params: &ComplexityParams,
) -> f64 {
    intersection_density * vector_consistency + pit_density * params.pit_density_weight
}

#[inline]
pub(crate) fn per_area(count: f64, area_mm2: f64) -> f64 {
    if area_mm2 > 0.0 {
        count / area_mm2
    } else {
        0.0
    }
}

/// Coefficient of variation of the texture complexity index evaluated
/// independently in each cell of an `n × n` grid.
///
/// Pits are assigned by center and scratches by midpoint; only items of the
/// same cell are tested against each other.
pub(crate) fn complexity_heterogeneity(
    scratches: &[ScratchMeasure],
    pits: &[PitMeasure],
    frame: &AnalysisFrame,
    grid_cells: usize,
    params: &ComplexityParams,
) -> f64 {
    let layout = GridLayout::new(grid_cells, frame.width_px, frame.height_px);
    let n = layout.n;
    let mut local_scratches: Vec<Vec<ScratchMeasure>> = vec![Vec::new(); layout.n_cells()];
    let mut local_pits: Vec<Vec<PitMeasure>> = vec![Vec::new(); layout.n_cells()];

    for s in scratches {
        let (col, row) = layout.cell_of(s.segment.midpoint());
        local_scratches[row * n + col].push(*s);
    }
    for p in pits {
        let (col, row) = layout.cell_of(p.center);
        local_pits[row * n + col].push(*p);
    }

    let cell_area_mm2 = frame.cell_area_mm2(n);
    let local_index: Vec<f64> = local_scratches
        .iter()
        .zip(&local_pits)
        .map(|(cell_scratches, cell_pits)| {
            let intersections = count_intersections(cell_scratches, cell_pits) as f64;
            let consistency: AxialAccumulator =
                cell_scratches.iter().map(|s| s.segment.angle()).collect();
            texture_complexity_index(
                per_area(intersections, cell_area_mm2),
                consistency.consistency(),
                per_area(cell_pits.len() as f64, cell_area_mm2),
                params,
            )
        })
        .collect();

    coefficient_of_variation(&local_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{EffectiveScale, FieldOfView};
    use crate::config::{GridParams, PitParams, ScratchParams};
    use crate::test_utils::{line, point};
    use crate::{Annotation, Category};

    fn scratch(a: [f64; 2], b: [f64; 2]) -> ScratchMeasure {
        ScratchMeasure::from_annotation(
            &line(Category::Fs, a, b),
            &EffectiveScale::RAW,
            &ScratchParams::default(),
        )
        .expect("line")
    }

    fn pit(item: &Annotation) -> PitMeasure {
        PitMeasure::from_annotation(
            item,
            &EffectiveScale::RAW,
            &PitParams::default(),
            &ComplexityParams::default(),
        )
        .expect("pit")
    }

    fn frame(side: f64) -> AnalysisFrame {
        let scale = EffectiveScale {
            field_of_view: Some(FieldOfView::new(side, side)),
            ..EffectiveScale::RAW
        };
        AnalysisFrame::resolve(&[], &scale, &GridParams::default())
    }

    #[test]
    fn cross_counts_once() {
        let s = [
            scratch([2.0, 5.0], [8.0, 5.0]),
            scratch([5.0, 2.0], [5.0, 8.0]),
        ];
        assert_eq!(count_intersections(&s, &[]), 1);
    }

    #[test]
    fn parallel_scratches_do_not_intersect() {
        let s = [
            scratch([0.0, 0.0], [10.0, 0.0]),
            scratch([0.0, 3.0], [10.0, 3.0]),
        ];
        assert_eq!(count_intersections(&s, &[]), 0);
    }

    #[test]
    fn scratch_through_pit_counts() {
        let s = [scratch([2.0, 5.0], [8.0, 5.0])];
        let p = [pit(&point(Category::Sp, 5.0, 5.0))];
        assert_eq!(count_intersections(&s, &p), 1);
        let far = [pit(&point(Category::Sp, 5.0, 50.0))];
        assert_eq!(count_intersections(&s, &far), 0);
    }

    #[test]
    fn empty_scene_has_no_heterogeneity() {
        let het = complexity_heterogeneity(&[], &[], &frame(200.0), 9, &ComplexityParams::default());
        assert_eq!(het, 0.0);
    }

    #[test]
    fn concentrated_complexity_is_heterogeneous() {
        let s = [
            scratch([0.2, 0.5], [0.8, 0.5]),
            scratch([0.5, 0.2], [0.5, 0.8]),
        ];
        let het = complexity_heterogeneity(&s, &[], &frame(200.0), 9, &ComplexityParams::default());
        // One hot cell out of 81: CV = sqrt(80).
        assert!((het - 80f64.sqrt()).abs() < 1e-9, "het = {het}");
    }

    #[test]
    fn one_pit_per_cell_is_uniform() {
        let side = 900.0;
        let mut pits = Vec::new();
        for row in 0..9 {
            for col in 0..9 {
                let x = col as f64 * 100.0 + 50.0;
                let y = row as f64 * 100.0 + 50.0;
                pits.push(pit(&point(Category::Sp, x, y)));
            }
        }
        let het = complexity_heterogeneity(&[], &pits, &frame(side), 9, &ComplexityParams::default());
        assert!(het.abs() < 1e-12);
    }

    #[test]
    fn zero_area_yields_zero_density() {
        assert_eq!(per_area(3.0, 0.0), 0.0);
        assert_eq!(per_area(3.0, 0.5), 6.0);
    }
}
