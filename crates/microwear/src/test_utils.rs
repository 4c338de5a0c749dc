//! Shared builders for unit tests.

use crate::{Annotation, Calibration, Category};

pub(crate) fn point(category: Category, x: f64, y: f64) -> Annotation {
    Annotation::point(category, x, y)
}

pub(crate) fn circle(category: Category, x: f64, y: f64, r: f64) -> Annotation {
    Annotation::circle(category, x, y, r)
}

pub(crate) fn line(category: Category, a: [f64; 2], b: [f64; 2]) -> Annotation {
    Annotation::line(category, a, b)
}

/// 1 px/µm with a square field of view of `side` pixels.
pub(crate) fn square_fov(side: f64) -> Calibration {
    Calibration::new(1.0).with_field_of_view(side, side)
}

/// One pit at the center of every cell of an `n × n` grid over a square
/// frame of `side` pixels.
pub(crate) fn pit_per_cell(n: usize, side: f64) -> Vec<Annotation> {
    let cell = side / n as f64;
    let mut items = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            items.push(point(
                Category::Sp,
                (col as f64 + 0.5) * cell,
                (row as f64 + 0.5) * cell,
            ));
        }
    }
    items
}
