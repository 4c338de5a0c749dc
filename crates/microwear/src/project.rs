//! Samples, projects and per-specimen aggregation.
//!
//! A project is a named list of samples; each sample is one annotated
//! micrograph with its own calibration. Several samples may belong to the
//! same specimen (e.g. different facets of one tooth) and are averaged
//! together for specimen-level tables.

use std::path::Path;

use indexmap::IndexMap;

use crate::annotation::Annotation;
use crate::calibration::Calibration;
use crate::category::CategoryCounts;
use crate::config::StatsConfig;
use crate::error::LoadError;
use crate::metrics::MetricsRecord;
use crate::naming::SampleName;
use crate::stats::compute_stats_with_config;

/// Document type tag written into project files.
pub const PROJECT_KIND: &str = "microwear_project";
/// Type tag of projects saved by the browser annotation tool.
pub const LEGACY_PROJECT_KIND: &str = "hyaena_project";
const PROJECT_VERSION: u32 = 1;

/// Descriptive metadata of the specimen a sample was taken from.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecimenMetadata {
    pub specimen_id: Option<String>,
    pub species: Option<String>,
    /// Tooth code such as `M1` or `dp4`.
    pub tooth: Option<String>,
    pub side: Option<String>,
    pub part: Option<String>,
    /// Magnification label such as `100x`.
    pub mag: Option<String>,
    /// Explicit age class; inferred from the tooth when blank.
    pub age: Option<String>,
}

impl SpecimenMetadata {
    /// Metadata encoded in a sample or file name (see [`SampleName`]).
    pub fn from_sample_name(name: &str) -> Self {
        let parsed = SampleName::parse(name);
        Self {
            specimen_id: non_blank(parsed.id),
            species: None,
            tooth: non_blank(parsed.tooth),
            side: non_blank(parsed.side),
            part: non_blank(parsed.part),
            mag: non_blank(parsed.mag),
            age: None,
        }
    }

    /// Copy of `self` with blank fields taken from `other`.
    pub fn with_fallback(&self, other: &SpecimenMetadata) -> Self {
        let pick = |own: &Option<String>, fallback: &Option<String>| {
            own.as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
                .or_else(|| fallback.clone())
        };
        Self {
            specimen_id: pick(&self.specimen_id, &other.specimen_id),
            species: pick(&self.species, &other.species),
            tooth: pick(&self.tooth, &other.tooth),
            side: pick(&self.side, &other.side),
            part: pick(&self.part, &other.part),
            mag: pick(&self.mag, &other.mag),
            age: pick(&self.age, &other.age),
        }
    }

    /// Age class label: the explicit age when non-blank, otherwise `J` for
    /// deciduous teeth (codes starting with `d`) and `A` for everything else.
    pub fn age_label(&self) -> String {
        if let Some(age) = self.age.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
            return age.to_string();
        }
        let deciduous = self
            .tooth
            .as_deref()
            .map(str::trim)
            .is_some_and(|t| t.starts_with(['d', 'D']));
        if deciduous { "J" } else { "A" }.to_string()
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// One annotated micrograph.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name; single-sample files carry none and take their file stem.
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default)]
    pub metadata: SpecimenMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration: Option<Calibration>,
    #[serde(default)]
    pub items: Vec<Annotation>,
}

impl Sample {
    pub fn new(name: impl Into<String>, items: Vec<Annotation>) -> Self {
        Self {
            id: None,
            name: name.into(),
            group: None,
            metadata: SpecimenMetadata::default(),
            calibration: None,
            items,
        }
    }

    /// Parse a single sample document.
    pub fn from_json_str(raw: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, LoadError> {
        let data = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let mut sample = Self::from_json_str(&data)?;
        if sample.name.trim().is_empty() {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                sample.name = stem.to_string();
            }
        }
        Ok(sample)
    }

    /// Whether the engine will use a physical scale for this sample.
    ///
    /// A stored `calibrated` flag with an unusable scale reports `false`.
    pub fn is_calibrated(&self) -> bool {
        Calibration::effective(self.calibration.as_ref()).calibrated
    }

    pub fn stats(&self, config: &StatsConfig) -> MetricsRecord {
        compute_stats_with_config(&self.items, self.calibration.as_ref(), config)
    }

    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts::from_items(&self.items)
    }

    /// Stored metadata with blank fields filled from the sample name.
    pub fn resolved_metadata(&self) -> SpecimenMetadata {
        self.metadata
            .with_fallback(&SpecimenMetadata::from_sample_name(&self.name))
    }

    /// Key used to group samples by specimen: the stored specimen ID, else
    /// the ID parsed from the sample name.
    pub fn specimen_key(&self) -> String {
        self.resolved_metadata()
            .specimen_id
            .map(|id| id.trim().to_string())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// Named collection of samples.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Project {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    pub name: String,
    #[serde(default)]
    pub samples: Vec<Sample>,
}

impl Project {
    pub fn new(name: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self {
            kind: Some(PROJECT_KIND.to_string()),
            version: Some(PROJECT_VERSION),
            name: name.into(),
            samples,
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, LoadError> {
        let project: Project = serde_json::from_str(raw)?;
        project.validate()?;
        tracing::debug!(
            "loaded project '{}' with {} samples",
            project.name,
            project.samples.len()
        );
        Ok(project)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, LoadError> {
        let data = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        Self::from_json_str(&data)
    }

    fn validate(&self) -> Result<(), LoadError> {
        if let Some(kind) = self.kind.as_deref() {
            if kind != PROJECT_KIND && kind != LEGACY_PROJECT_KIND {
                return Err(LoadError::UnsupportedProject(format!(
                    "document type '{}' (expected '{}' or '{}')",
                    kind, PROJECT_KIND, LEGACY_PROJECT_KIND
                )));
            }
        }
        if let Some(version) = self.version {
            if version > PROJECT_VERSION {
                return Err(LoadError::UnsupportedProject(format!(
                    "version {} is newer than supported version {}",
                    version, PROJECT_VERSION
                )));
            }
        }
        Ok(())
    }

    /// Group name shown for a sample; the project name when the sample has none.
    pub fn group_of<'a>(&'a self, sample: &'a Sample) -> &'a str {
        sample
            .group
            .as_deref()
            .filter(|g| !g.trim().is_empty())
            .unwrap_or(&self.name)
    }

    /// Samples grouped by specimen, in first-seen order.
    pub fn samples_by_specimen(&self) -> IndexMap<String, Vec<&Sample>> {
        let mut groups: IndexMap<String, Vec<&Sample>> = IndexMap::new();
        for sample in &self.samples {
            groups.entry(sample.specimen_key()).or_default().push(sample);
        }
        groups
    }

    /// Field-by-field mean of counts and metrics per specimen.
    pub fn specimen_averages(&self, config: &StatsConfig) -> Vec<SpecimenAverage> {
        self.samples_by_specimen()
            .into_iter()
            .map(|(id, samples)| {
                let counts: Vec<CategoryCounts> = samples.iter().map(|s| s.counts()).collect();
                let metrics: Vec<MetricsRecord> = samples.iter().map(|s| s.stats(config)).collect();
                let first = samples[0].resolved_metadata();
                SpecimenAverage {
                    id,
                    species: first.species.clone().unwrap_or_default(),
                    age: first.age_label(),
                    mag: first.mag.unwrap_or_default(),
                    n_samples: samples.len(),
                    counts: CategoryCounts::mean_of(&counts),
                    metrics: MetricsRecord::mean_of(&metrics),
                }
            })
            .collect()
    }
}

/// Averaged statistics of all samples of one specimen.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SpecimenAverage {
    pub id: String,
    pub species: String,
    pub age: String,
    pub mag: String,
    pub n_samples: usize,
    /// Mean raw count per category, in `Category::ALL` order.
    pub counts: [f64; 7],
    pub metrics: MetricsRecord,
}
