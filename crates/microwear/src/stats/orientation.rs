//! Axial circular statistics of scratch directions.
//!
//! Scratches have no sense, only a direction, so angles are doubled before
//! averaging and the mean is halved back into `[0, 180)` degrees.

/// Running sum of doubled-angle unit vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct AxialAccumulator {
    sum_cos: f64,
    sum_sin: f64,
    n: usize,
}

impl AxialAccumulator {
    /// Add a direction given in radians.
    pub fn push(&mut self, theta: f64) {
        if !theta.is_finite() {
            return;
        }
        let doubled = 2.0 * theta;
        self.sum_cos += doubled.cos();
        self.sum_sin += doubled.sin();
        self.n += 1;
    }

    /// Mean resultant length `R` in `[0, 1]`; 0 without samples.
    pub fn resultant(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        (self.sum_cos.hypot(self.sum_sin) / self.n as f64).clamp(0.0, 1.0)
    }

    /// `1 - R`, or 0 when there are no samples.
    pub fn consistency(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            1.0 - self.resultant()
        }
    }

    /// Mean axial direction in degrees within `[0, 180)`.
    pub fn mean_degrees(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        let mut deg = (self.sum_sin.atan2(self.sum_cos) * 0.5).to_degrees();
        if deg < 0.0 {
            deg += 180.0;
        }
        if deg >= 180.0 {
            deg -= 180.0;
        }
        deg
    }
}

impl FromIterator<f64> for AxialAccumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::default();
        for theta in iter {
            acc.push(theta);
        }
        acc
    }
}
