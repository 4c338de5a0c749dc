//! Analysis frame: the pixel rectangle all densities and grids refer to.

use crate::annotation::Annotation;
use crate::calibration::EffectiveScale;
use crate::config::GridParams;

const UM2_PER_MM2: f64 = 1_000_000.0;

/// Pixel extent of the analysed surface and its physical area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AnalysisFrame {
    pub width_px: f64,
    pub height_px: f64,
    /// Physical area in µm².
    pub area_um2: f64,
    /// Physical area in mm².
    pub area_mm2: f64,
}

impl AnalysisFrame {
    /// Field of view when the calibration provides one; otherwise the item
    /// extent inflated by the configured margin, floored at `min_frame_px`.
    pub fn resolve(items: &[Annotation], scale: &EffectiveScale, params: &GridParams) -> Self {
        let (width_px, height_px) = match scale.field_of_view {
            Some(fov) => (fov.width, fov.height),
            None => {
                let (max_x, max_y) = items.iter().fold((0.0f64, 0.0f64), |(mx, my), item| {
                    let [x, y] = item.shape.max_xy();
                    (finite_max(mx, x), finite_max(my, y))
                });
                (
                    (max_x * params.frame_inflation).max(params.min_frame_px),
                    (max_y * params.frame_inflation).max(params.min_frame_px),
                )
            }
        };
        Self::from_pixels(width_px, height_px, scale)
    }

    fn from_pixels(width_px: f64, height_px: f64, scale: &EffectiveScale) -> Self {
        let ppu = scale.pixels_per_unit;
        let area_um2 = (width_px * height_px) / (ppu * ppu);
        let area_um2 = if area_um2.is_finite() && area_um2 > 0.0 {
            area_um2
        } else {
            0.0
        };
        Self {
            width_px,
            height_px,
            area_um2,
            area_mm2: area_um2 / UM2_PER_MM2,
        }
    }

    /// Area of one cell of an `n × n` grid, in mm².
    pub fn cell_area_mm2(&self, n: usize) -> f64 {
        let n = n.max(1) as f64;
        self.area_mm2 / (n * n)
    }
}

fn finite_max(acc: f64, v: f64) -> f64 {
    if v.is_finite() {
        acc.max(v)
    } else {
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Calibration;
    use crate::category::Category;
    use approx::assert_relative_eq;

    #[test]
    fn small_scene_is_floored() {
        let items = vec![Annotation::point(Category::Sp, 10.0, 20.0)];
        let scale = Calibration::effective(None);
        let frame = AnalysisFrame::resolve(&items, &scale, &GridParams::default());
        assert_eq!(frame.width_px, 1000.0);
        assert_eq!(frame.height_px, 1000.0);
        assert_relative_eq!(frame.area_mm2, 1.0);
    }

    #[test]
    fn large_scene_is_inflated() {
        let items = vec![Annotation::line(
            Category::Fs,
            [0.0, 0.0],
            [2000.0, 500.0],
        )];
        let scale = Calibration::effective(None);
        let frame = AnalysisFrame::resolve(&items, &scale, &GridParams::default());
        assert_relative_eq!(frame.width_px, 2200.0, epsilon = 1e-9);
        assert_eq!(frame.height_px, 1000.0);
    }

    #[test]
    fn field_of_view_wins_and_scales_area() {
        let cal = Calibration::new(2.0).with_field_of_view(200.0, 200.0);
        let scale = Calibration::effective(Some(&cal));
        let frame = AnalysisFrame::resolve(&[], &scale, &GridParams::default());
        assert_eq!(frame.width_px, 200.0);
        // 200 px / 2 ppu = 100 µm per side.
        assert_relative_eq!(frame.area_um2, 10_000.0);
        assert_relative_eq!(frame.area_mm2, 0.01);
        assert_relative_eq!(frame.cell_area_mm2(10), 0.0001);
    }
}
