//! Square spatial grids over the analysis frame and their evenness measure.

use crate::geometry::Rect;

/// Partition of a `width × height` pixel frame into `n × n` equal cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub n: usize,
    pub width: f64,
    pub height: f64,
}

impl GridLayout {
    pub fn new(n: usize, width: f64, height: f64) -> Self {
        Self {
            n: n.max(1),
            width,
            height,
        }
    }

    pub fn cell_width(&self) -> f64 {
        self.width / self.n as f64
    }

    pub fn cell_height(&self) -> f64 {
        self.height / self.n as f64
    }

    /// Cell index along one axis, clipped to `[0, n - 1]`.
    fn axis_index(&self, coord: f64, cell_size: f64) -> usize {
        let last = self.n - 1;
        if !(cell_size > 0.0) || !coord.is_finite() {
            return 0;
        }
        let idx = (coord / cell_size).floor();
        if idx <= 0.0 {
            0
        } else if idx >= last as f64 {
            last
        } else {
            idx as usize
        }
    }

    /// `(col, row)` of the cell containing `p`; out-of-frame points are
    /// clipped onto the border cells.
    pub fn cell_of(&self, p: [f64; 2]) -> (usize, usize) {
        (
            self.axis_index(p[0], self.cell_width()),
            self.axis_index(p[1], self.cell_height()),
        )
    }

    /// Inclusive `(col, row)` ranges of cells overlapped by a bounding box.
    pub fn cell_span(
        &self,
        min: [f64; 2],
        max: [f64; 2],
    ) -> (std::ops::RangeInclusive<usize>, std::ops::RangeInclusive<usize>) {
        let (c0, r0) = self.cell_of(min);
        let (c1, r1) = self.cell_of(max);
        (c0..=c1, r0..=r1)
    }

    pub fn cell_rect(&self, col: usize, row: usize) -> Rect {
        let cw = self.cell_width();
        let ch = self.cell_height();
        let x0 = col as f64 * cw;
        let y0 = row as f64 * ch;
        Rect::new([x0, y0], [x0 + cw, y0 + ch])
    }

    pub fn n_cells(&self) -> usize {
        self.n * self.n
    }
}

/// Row-major accumulator with one value per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    n: usize,
    cells: Vec<f64>,
}

impl Grid {
    pub fn new(n: usize) -> Self {
        let n = n.max(1);
        Self {
            n,
            cells: vec![0.0; n * n],
        }
    }

    pub fn add(&mut self, col: usize, row: usize, value: f64) {
        if col < self.n && row < self.n {
            self.cells[row * self.n + col] += value;
        }
    }

    pub fn get(&self, col: usize, row: usize) -> f64 {
        self.cells[row * self.n + col]
    }

    pub fn values(&self) -> &[f64] {
        &self.cells
    }

    /// Coefficient of variation of the cell values.
    pub fn coefficient_of_variation(&self) -> f64 {
        coefficient_of_variation(&self.cells)
    }
}

/// Population standard deviation over mean; 0 for an empty or all-zero set.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean == 0.0 || !mean.is_finite() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let cv = variance.sqrt() / mean;
    if cv.is_finite() {
        cv
    } else {
        0.0
    }
}
