//! Pixel-to-micrometre calibration.
//!
//! Calibration is advisory: anything unusable degrades to raw pixel units
//! (`ppu = 1`) instead of failing.

/// Field of view of the analysed micrograph, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldOfView {
    pub width: f64,
    pub height: f64,
}

impl FieldOfView {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub(crate) fn is_usable(&self) -> bool {
        self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0
    }
}

/// Scale descriptor for one micrograph.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Calibration {
    /// Whether the user actually calibrated the image.
    pub calibrated: bool,
    /// Pixels per physical unit (µm).
    #[serde(rename = "ppu", default)]
    pub pixels_per_unit: Option<f64>,
    /// Unit name shown by the annotation tool, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Analysis frame in pixels; when absent the frame is derived from the items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_view: Option<FieldOfView>,
}

impl Calibration {
    /// Calibrated scale of `pixels_per_unit` pixels per µm.
    pub fn new(pixels_per_unit: f64) -> Self {
        Self {
            calibrated: true,
            pixels_per_unit: Some(pixels_per_unit),
            unit: None,
            field_of_view: None,
        }
    }

    /// Raw pixel units.
    pub fn uncalibrated() -> Self {
        Self {
            calibrated: false,
            pixels_per_unit: Some(1.0),
            unit: None,
            field_of_view: None,
        }
    }

    pub fn with_field_of_view(mut self, width: f64, height: f64) -> Self {
        self.field_of_view = Some(FieldOfView::new(width, height));
        self
    }

    /// Scale actually used by the engine.
    pub fn effective(calibration: Option<&Calibration>) -> EffectiveScale {
        let Some(cal) = calibration else {
            return EffectiveScale::RAW;
        };
        let field_of_view = cal.field_of_view.filter(FieldOfView::is_usable);
        if !cal.calibrated {
            return EffectiveScale {
                field_of_view,
                ..EffectiveScale::RAW
            };
        }
        match cal.pixels_per_unit {
            Some(ppu) if ppu.is_finite() && ppu > 0.0 => EffectiveScale {
                pixels_per_unit: ppu,
                calibrated: true,
                field_of_view,
            },
            other => {
                tracing::warn!(
                    "invalid pixels_per_unit {:?}; falling back to raw pixel units",
                    other
                );
                EffectiveScale {
                    field_of_view,
                    ..EffectiveScale::RAW
                }
            }
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::uncalibrated()
    }
}

/// Sanitized scale: always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveScale {
    pub pixels_per_unit: f64,
    pub calibrated: bool,
    pub field_of_view: Option<FieldOfView>,
}

impl EffectiveScale {
    pub const RAW: Self = Self {
        pixels_per_unit: 1.0,
        calibrated: false,
        field_of_view: None,
    };

    #[inline]
    pub fn px_to_unit(&self, px: f64) -> f64 {
        px / self.pixels_per_unit
    }

    #[inline]
    pub fn unit_to_px(&self, units: f64) -> f64 {
        units * self.pixels_per_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_calibration_is_raw_pixels() {
        assert_eq!(Calibration::effective(None), EffectiveScale::RAW);
    }

    #[test]
    fn invalid_scales_fall_back_to_one() {
        for ppu in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let eff = Calibration::effective(Some(&Calibration::new(ppu)));
            assert_eq!(eff.pixels_per_unit, 1.0);
            assert!(!eff.calibrated);
        }
        let missing = Calibration {
            pixels_per_unit: None,
            ..Calibration::new(1.0)
        };
        assert_eq!(Calibration::effective(Some(&missing)).pixels_per_unit, 1.0);
    }

    #[test]
    fn uncalibrated_ignores_stored_scale() {
        let cal = Calibration {
            calibrated: false,
            ..Calibration::new(4.0)
        };
        assert_eq!(Calibration::effective(Some(&cal)).pixels_per_unit, 1.0);
    }

    #[test]
    fn field_of_view_survives_fallback() {
        let cal = Calibration::new(f64::NAN).with_field_of_view(200.0, 100.0);
        let eff = Calibration::effective(Some(&cal));
        assert_eq!(eff.field_of_view, Some(FieldOfView::new(200.0, 100.0)));
    }

    #[test]
    fn degenerate_field_of_view_is_ignored() {
        let cal = Calibration::new(2.0).with_field_of_view(0.0, 100.0);
        assert_eq!(Calibration::effective(Some(&cal)).field_of_view, None);
    }

    #[test]
    fn parses_sample_calibration_block() {
        let raw = r#"{"ppu": 2.5, "unit": "µm", "calibrated": true}"#;
        let cal: Calibration = serde_json::from_str(raw).expect("valid calibration");
        assert_eq!(cal.pixels_per_unit, Some(2.5));
        assert_eq!(Calibration::effective(Some(&cal)).pixels_per_unit, 2.5);
    }
}
