//! microwear — texture statistics for dental microwear micrographs.
//!
//! Features (pits and scratches) are annotated on a micrograph as points,
//! circles and line segments, each tagged with a [`Category`]. The engine
//! turns one sample's annotations plus an optional [`Calibration`] into a
//! flat [`MetricsRecord`] of sizing, severity, orientation, density,
//! heterogeneity and complexity metrics.
//!
//! 1. **Ingest** – [`Sample`] / [`Project`] JSON documents.
//! 2. **Compute** – [`compute_stats`], a pure function safe to call from
//!    many threads.
//! 3. **Export** – [`write_table`] renders `;`-separated tables per sample
//!    or averaged per specimen.
//!
//! Engine constants live in [`StatsConfig`]; its defaults are the reference
//! values.

mod annotation;
mod calibration;
mod category;
mod config;
mod error;
mod export;
pub mod geometry;
pub mod grid;
mod metrics;
mod naming;
mod project;
mod stats;

#[cfg(test)]
mod test_utils;

pub use annotation::{Annotation, Shape};
pub use calibration::{Calibration, EffectiveScale, FieldOfView};
pub use category::{Category, CategoryCounts, FeatureClass};
pub use config::{ComplexityParams, GridParams, PitParams, ScratchParams, StatsConfig};
pub use error::{ExportError, LoadError};
pub use export::{header, table_to_string, write_table, ExportMode};
pub use metrics::MetricsRecord;
pub use naming::SampleName;
pub use project::{
    Project, Sample, SpecimenAverage, SpecimenMetadata, LEGACY_PROJECT_KIND, PROJECT_KIND,
};
pub use stats::{compute_stats, compute_stats_with_config};
