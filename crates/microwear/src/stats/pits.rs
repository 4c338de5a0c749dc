//! Pit sizing, severity and occupancy.

use std::f64::consts::PI;

use crate::annotation::{Annotation, Shape};
use crate::calibration::EffectiveScale;
use crate::config::{ComplexityParams, PitParams};
use crate::grid::{Grid, GridLayout};

use super::frame::AnalysisFrame;

/// One statistically relevant pit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PitMeasure {
    /// Center in pixels.
    pub center: [f64; 2],
    /// Diameter in µm.
    pub diameter_um: f64,
    /// Radius in pixels used for contact tests.
    pub contact_radius_px: f64,
}

impl PitMeasure {
    /// `None` for non-pit shapes.
    pub fn from_annotation(
        item: &Annotation,
        scale: &EffectiveScale,
        params: &PitParams,
        complexity: &ComplexityParams,
    ) -> Option<Self> {
        let diameter_um = match item.shape {
            Shape::Point { .. } => params.standard_diameter_um,
            Shape::Circle { r, .. } => item
                .shape
                .measured_width()
                .unwrap_or_else(|| sanitize(2.0 * r / scale.pixels_per_unit)),
            Shape::Line { .. } => return None,
        };
        let contact_radius_px = scale
            .unit_to_px(diameter_um * 0.5)
            .max(complexity.min_pit_radius_px);
        Some(Self {
            center: item.shape.center(),
            diameter_um,
            contact_radius_px,
        })
    }

    pub fn area_um2(&self) -> f64 {
        let r = self.diameter_um * 0.5;
        PI * r * r
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// Aggregated pit statistics.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PitSummary {
    pub count: usize,
    pub mean_diameter_um: f64,
    pub max_diameter_um: f64,
    pub perc_large: f64,
    pub total_area_um2: f64,
    pub sum_diameter_um: f64,
    pub occupancy: Grid,
}

impl PitSummary {
    pub fn compute(
        pits: &[PitMeasure],
        frame: &AnalysisFrame,
        params: &PitParams,
        grid_cells: usize,
    ) -> Self {
        let layout = GridLayout::new(grid_cells, frame.width_px, frame.height_px);
        let mut occupancy = Grid::new(layout.n);

        let mut sum_diameter_um = 0.0;
        let mut max_diameter_um = 0.0f64;
        let mut n_large = 0usize;
        let mut total_area_um2 = 0.0;

        for pit in pits {
            sum_diameter_um += pit.diameter_um;
            max_diameter_um = max_diameter_um.max(pit.diameter_um);
            if pit.diameter_um > params.large_threshold_um {
                n_large += 1;
            }
            total_area_um2 += pit.area_um2();
            let (col, row) = layout.cell_of(pit.center);
            occupancy.add(col, row, 1.0);
        }

        let count = pits.len();
        let (mean_diameter_um, perc_large) = if count > 0 {
            (
                sum_diameter_um / count as f64,
                100.0 * n_large as f64 / count as f64,
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            count,
            mean_diameter_um,
            max_diameter_um,
            perc_large,
            total_area_um2,
            sum_diameter_um,
            occupancy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Calibration;
    use crate::category::Category;
    use crate::config::GridParams;
    use approx::assert_relative_eq;

    fn measure(item: &Annotation, ppu: f64) -> PitMeasure {
        let cal = Calibration::new(ppu);
        let scale = Calibration::effective(Some(&cal));
        PitMeasure::from_annotation(
            item,
            &scale,
            &PitParams::default(),
            &ComplexityParams::default(),
        )
        .expect("pit shape")
    }

    #[test]
    fn point_uses_standard_diameter() {
        let pit = measure(&Annotation::point(Category::Sp, 1.0, 1.0), 3.0);
        assert_eq!(pit.diameter_um, 2.0);
        assert_relative_eq!(pit.area_um2(), PI);
        // 1 µm radius at 3 px/µm.
        assert_relative_eq!(pit.contact_radius_px, 3.0);
    }

    #[test]
    fn circle_radius_is_converted_by_scale() {
        let pit = measure(&Annotation::circle(Category::Lp, 0.0, 0.0, 6.0), 2.0);
        assert_relative_eq!(pit.diameter_um, 6.0);
    }

    #[test]
    fn measured_width_overrides_radius() {
        let item = Annotation::circle(Category::Lp, 0.0, 0.0, 50.0).with_width(3.5);
        assert_eq!(measure(&item, 2.0).diameter_um, 3.5);
    }

    #[test]
    fn contact_radius_has_a_floor() {
        let item = Annotation::circle(Category::Sp, 0.0, 0.0, 0.1);
        assert_eq!(measure(&item, 1.0).contact_radius_px, 1.0);
    }

    #[test]
    fn lines_are_not_pits() {
        let scale = Calibration::effective(None);
        let item = Annotation::line(Category::Fs, [0.0, 0.0], [1.0, 1.0]);
        assert!(PitMeasure::from_annotation(
            &item,
            &scale,
            &PitParams::default(),
            &ComplexityParams::default()
        )
        .is_none());
    }

    #[test]
    fn summary_counts_large_pits_strictly() {
        let frame = AnalysisFrame::resolve(&[], &Calibration::effective(None), &GridParams::default());
        let pits = [
            measure(&Annotation::circle(Category::Lp, 5.0, 5.0, 2.0), 1.0),
            measure(&Annotation::circle(Category::Lp, 15.0, 5.0, 2.5), 1.0),
        ];
        let s = PitSummary::compute(&pits, &frame, &PitParams::default(), 10);
        assert_eq!(s.count, 2);
        assert_relative_eq!(s.mean_diameter_um, 4.5);
        assert_relative_eq!(s.max_diameter_um, 5.0);
        assert_relative_eq!(s.perc_large, 50.0);
        assert_eq!(s.occupancy.get(0, 0), 2.0);
    }

    #[test]
    fn empty_summary_is_zero() {
        let frame = AnalysisFrame::resolve(&[], &Calibration::effective(None), &GridParams::default());
        let s = PitSummary::compute(&[], &frame, &PitParams::default(), 10);
        assert_eq!(s.mean_diameter_um, 0.0);
        assert_eq!(s.perc_large, 0.0);
        assert_eq!(s.occupancy.coefficient_of_variation(), 0.0);
    }
}
