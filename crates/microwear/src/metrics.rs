//! Flat record of named microwear metrics.
//!
//! Serialized keys are consumed verbatim as table columns downstream, so
//! field renames are breaking changes.

macro_rules! metrics_record {
    ($( $(#[doc = $doc:literal])* $field:ident => $key:literal, $decimals:literal; )+) => {
        /// Derived statistics for one annotated sample.
        ///
        /// Every value is finite; metrics undefined for the input are 0.
        #[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct MetricsRecord {
            $(
                $(#[doc = $doc])*
                #[serde(rename = $key)]
                pub $field: f64,
            )+
        }

        impl MetricsRecord {
            /// Column keys in export order.
            pub const KEYS: &'static [&'static str] = &[$($key),+];

            /// Fixed number of decimals used when a metric is written to a table.
            pub(crate) const DECIMALS: &'static [usize] = &[$($decimals),+];

            /// `(key, value)` pairs in export order.
            pub fn fields(&self) -> Vec<(&'static str, f64)> {
                vec![$(($key, self.$field)),+]
            }

            pub(crate) fn from_values(values: &[f64]) -> Self {
                let mut it = values.iter().copied();
                Self {
                    $($field: it.next().unwrap_or(0.0),)+
                }
            }
        }
    };
}

metrics_record! {
    /// Mean pit diameter (µm).
    crushing_index => "crushingIndex", 2;
    /// Percentage of pits wider than the large-pit threshold.
    perc_measured_pits => "percMeasuredPits", 1;
    /// Largest pit diameter (µm).
    max_pit_diameter => "maxPitDiameter", 2;
    /// Total pit area (µm²).
    severity_pits => "severityPits", 0;
    /// Mean scratch width (µm).
    mean_scratch_width => "meanScratchWidth", 2;
    /// Mean scratch length/width ratio.
    aspect_ratio => "aspectRatio", 2;
    /// Mean length/width ratio over measured scratches only.
    measured_aspect_ratio => "measuredAspectRatio", 2;
    /// Total scratch area (µm²).
    severity_scratches => "severityScratches", 0;
    /// Pit to scratch count ratio.
    ps_ratio => "psRatio", 3;
    /// Resultant length of doubled scratch angles, 1 = parallel.
    anisotropy => "anisotropy", 3;
    /// `1 - anisotropy`.
    vector_consistency => "vectorConsistency", 3;
    /// Mean scratch orientation in degrees, `[0, 180)`.
    mean_orient => "meanOrient", 1;
    /// Scratch length (mm) per analysed area (mm²).
    bg_abrasion => "bgAbrasion", 4;
    severity_total => "severityTotal", 0;
    severity_ratio => "severityRatio", 3;
    mean_feature_severity => "meanFeatureSeverity", 1;
    /// `psRatio × crushingIndex`.
    durophagy_index => "durophagyIndex", 2;
    /// Pits per mm².
    density_pits => "densityPits", 2;
    /// Scratches per mm².
    density_scratches => "densityScratches", 2;
    density_total => "densityTotal", 2;
    /// Pit area as a percentage of the analysed area.
    severity_pitsn => "severityPitsn", 3;
    /// Scratch area as a percentage of the analysed area.
    severity_scratchesn => "severityScratchesn", 3;
    severity_totaln => "severityTotaln", 3;
    /// CV of the 10×10 pit occupancy grid.
    pit_het => "pitHet", 2;
    /// CV of the 9×9 scratch coverage grid.
    scratch_het => "scratchHet", 2;
    global_het => "globalHet", 2;
    /// Scratch–scratch crossings plus scratch–pit contacts (integral).
    intersection_count => "intersectionCount", 0;
    /// Intersections per mm².
    intersection_density => "intersectionDensity", 2;
    texture_complexity_index => "textureComplexityIndex", 2;
    /// CV of the texture complexity index across 9×9 local cells.
    complexity_het => "complexityHet", 2;
    /// Mean feature dimension (µm).
    mfd => "mfd", 2;
}

impl MetricsRecord {
    /// All values finite.
    pub fn is_finite(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_finite())
    }

    /// Field-by-field mean; the zero record for an empty slice.
    pub fn mean_of(records: &[MetricsRecord]) -> MetricsRecord {
        if records.is_empty() {
            return MetricsRecord::default();
        }
        let mut sums = vec![0.0; Self::KEYS.len()];
        for record in records {
            for (acc, (_, v)) in sums.iter_mut().zip(record.fields()) {
                *acc += v;
            }
        }
        let n = records.len() as f64;
        for v in &mut sums {
            *v /= n;
        }
        Self::from_values(&sums)
    }

    /// Look up a metric by its serialized key.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.fields().into_iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique_and_aligned() {
        let mut keys = MetricsRecord::KEYS.to_vec();
        assert_eq!(keys.len(), MetricsRecord::DECIMALS.len());
        assert_eq!(keys.len(), MetricsRecord::default().fields().len());
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), MetricsRecord::KEYS.len());
    }

    #[test]
    fn serialized_keys_match_column_keys() {
        let record = MetricsRecord::default();
        let value = serde_json::to_value(record).expect("serialize");
        let obj = value.as_object().expect("object");
        assert_eq!(obj.len(), MetricsRecord::KEYS.len());
        for key in MetricsRecord::KEYS {
            assert!(obj.contains_key(*key), "missing key {key}");
        }
        assert!(obj.contains_key("percMeasuredPits"));
        assert!(obj.contains_key("severityScratchesn"));
    }

    #[test]
    fn mean_is_field_by_field() {
        let a = MetricsRecord {
            crushing_index: 2.0,
            mfd: 1.0,
            ..Default::default()
        };
        let b = MetricsRecord {
            crushing_index: 4.0,
            mfd: 3.0,
            ..Default::default()
        };
        let mean = MetricsRecord::mean_of(&[a, b]);
        assert_eq!(mean.crushing_index, 3.0);
        assert_eq!(mean.mfd, 2.0);
        assert_eq!(mean.anisotropy, 0.0);
        assert_eq!(MetricsRecord::mean_of(&[]), MetricsRecord::default());
    }

    #[test]
    fn lookup_by_key() {
        let r = MetricsRecord {
            global_het: 0.25,
            ..Default::default()
        };
        assert_eq!(r.get("globalHet"), Some(0.25));
        assert_eq!(r.get("nope"), None);
    }
}
