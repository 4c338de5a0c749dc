//! Scratch sizing, severity, orientation and grid coverage.

use crate::annotation::Annotation;
use crate::calibration::EffectiveScale;
use crate::config::ScratchParams;
use crate::geometry::{segment_touches_rect, Segment};
use crate::grid::{Grid, GridLayout};

use super::frame::AnalysisFrame;
use super::orientation::AxialAccumulator;

/// One statistically relevant scratch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScratchMeasure {
    /// Segment in pixels.
    pub segment: Segment,
    /// Length in µm.
    pub length_um: f64,
    /// Width in µm, measured or standard.
    pub width_um: f64,
    pub is_measured: bool,
}

impl ScratchMeasure {
    /// `None` for pit shapes.
    pub fn from_annotation(
        item: &Annotation,
        scale: &EffectiveScale,
        params: &ScratchParams,
    ) -> Option<Self> {
        let segment = item.shape.segment()?;
        let length_um = scale.px_to_unit(segment.length());
        let length_um = if length_um.is_finite() { length_um } else { 0.0 };
        let (width_um, is_measured) = match item.shape.measured_width() {
            Some(w) => (w, true),
            None => (params.standard_width_um, false),
        };
        Some(Self {
            segment,
            length_um,
            width_um,
            is_measured,
        })
    }

    /// Footprint in µm²: elliptical for measured scratches, rectangular otherwise.
    pub fn area_um2(&self, params: &ScratchParams) -> f64 {
        let rect = self.length_um * self.width_um;
        if self.is_measured {
            rect * params.shape_coeff
        } else {
            rect
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.width_um > 0.0 {
            self.length_um / self.width_um
        } else {
            0.0
        }
    }
}

/// Aggregated scratch statistics.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScratchSummary {
    pub count: usize,
    pub total_length_um: f64,
    pub sum_width_um: f64,
    pub mean_width_um: f64,
    pub total_area_um2: f64,
    pub mean_aspect_ratio: f64,
    pub measured_aspect_ratio: f64,
    pub orientation: AxialAccumulator,
    pub coverage: Grid,
}

impl ScratchSummary {
    pub fn compute(
        scratches: &[ScratchMeasure],
        frame: &AnalysisFrame,
        params: &ScratchParams,
        grid_cells: usize,
    ) -> Self {
        let layout = GridLayout::new(grid_cells, frame.width_px, frame.height_px);
        let mut coverage = Grid::new(layout.n);
        let mut orientation = AxialAccumulator::default();

        let mut total_length_um = 0.0;
        let mut sum_width_um = 0.0;
        let mut total_area_um2 = 0.0;
        let mut sum_ar = 0.0;
        let mut sum_measured_ar = 0.0;
        let mut n_measured = 0usize;

        for s in scratches {
            total_length_um += s.length_um;
            sum_width_um += s.width_um;
            total_area_um2 += s.area_um2(params);
            let ar = s.aspect_ratio();
            sum_ar += ar;
            if s.is_measured {
                sum_measured_ar += ar;
                n_measured += 1;
            }
            orientation.push(s.segment.angle());
            mark_coverage(&mut coverage, &layout, &s.segment);
        }

        let count = scratches.len();
        let per_scratch = |v: f64| if count > 0 { v / count as f64 } else { 0.0 };
        Self {
            count,
            total_length_um,
            sum_width_um,
            mean_width_um: per_scratch(sum_width_um),
            total_area_um2,
            mean_aspect_ratio: per_scratch(sum_ar),
            measured_aspect_ratio: if n_measured > 0 {
                sum_measured_ar / n_measured as f64
            } else {
                0.0
            },
            orientation,
            coverage,
        }
    }
}

/// Count the segment once in every cell it touches. Only cells inside the
/// segment's bounding-box span are tested.
fn mark_coverage(grid: &mut Grid, layout: &GridLayout, segment: &Segment) {
    let (min, max) = segment.bounds();
    let (cols, rows) = layout.cell_span(min, max);
    for row in rows {
        for col in cols.clone() {
            if segment_touches_rect(segment, &layout.cell_rect(col, row)) {
                grid.add(col, row, 1.0);
            }
        }
    }
}
