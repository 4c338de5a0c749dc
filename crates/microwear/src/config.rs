//! Tunable constants of the statistics engine.
//!
//! Defaults are the empirically chosen values the published indices were
//! calibrated against; changing them makes results incomparable.

/// Pit sizing parameters (µm).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PitParams {
    /// Diameter assumed for point pits without a measurement.
    pub standard_diameter_um: f64,
    /// Pits strictly wider than this count towards `percMeasuredPits`.
    pub large_threshold_um: f64,
}

impl Default for PitParams {
    fn default() -> Self {
        Self {
            standard_diameter_um: 2.0,
            large_threshold_um: 4.0,
        }
    }
}

/// Scratch sizing parameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScratchParams {
    /// Width (µm) assumed for scratches without a measurement.
    pub standard_width_um: f64,
    /// Elliptical area correction applied to measured scratches.
    pub shape_coeff: f64,
}

impl Default for ScratchParams {
    fn default() -> Self {
        Self {
            standard_width_um: 1.0,
            shape_coeff: std::f64::consts::FRAC_PI_4,
        }
    }
}

/// Analysis frame and grid resolution.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridParams {
    /// Cells per side of the pit occupancy grid.
    pub pit_cells: usize,
    /// Cells per side of the scratch coverage and local complexity grids.
    pub scratch_cells: usize,
    /// Lower bound of a derived frame side, in pixels.
    pub min_frame_px: f64,
    /// Multiplicative margin applied to the item extent.
    pub frame_inflation: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            pit_cells: 10,
            scratch_cells: 9,
            min_frame_px: 1000.0,
            frame_inflation: 1.1,
        }
    }
}

/// Weights of the texture complexity index.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ComplexityParams {
    /// Weight of pit density in `textureComplexityIndex`.
    pub pit_density_weight: f64,
    /// Minimum pit radius (px) used for scratch–pit intersection tests.
    pub min_pit_radius_px: f64,
}

impl Default for ComplexityParams {
    fn default() -> Self {
        Self {
            pit_density_weight: 0.5,
            min_pit_radius_px: 1.0,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub pits: PitParams,
    pub scratches: ScratchParams,
    pub grid: GridParams,
    pub complexity: ComplexityParams,
}

impl StatsConfig {
    /// Load a (possibly partial) configuration from JSON; omitted fields keep
    /// their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, crate::LoadError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: &std::path::Path) -> Result<Self, crate::LoadError> {
        let data = std::fs::read_to_string(path).map_err(|e| crate::LoadError::io(path, e))?;
        Self::from_json_str(&data)
    }
}
