//! Microwear feature categories.
//!
//! The category set is closed: three pit classes and four scratch classes.
//! Puncture pits and gouges are counted but never enter derived indices.

/// Geometric family a category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureClass {
    Pit,
    Scratch,
}

/// Annotation category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Small pit.
    Sp,
    /// Large pit.
    Lp,
    /// Puncture pit.
    Pp,
    /// Fine scratch.
    Fs,
    /// Coarse scratch.
    Cs,
    /// Hyper-coarse scratch.
    Hcs,
    /// Gouge.
    G,
}

impl Category {
    /// Display order used for raw counts and export columns.
    pub const ALL: [Category; 7] = [
        Category::Sp,
        Category::Lp,
        Category::Pp,
        Category::Fs,
        Category::Cs,
        Category::Hcs,
        Category::G,
    ];

    /// Short tag as stored in annotation files (`"sp"`, `"hcs"`, ...).
    pub fn tag(self) -> &'static str {
        match self {
            Self::Sp => "sp",
            Self::Lp => "lp",
            Self::Pp => "pp",
            Self::Fs => "fs",
            Self::Cs => "cs",
            Self::Hcs => "hcs",
            Self::G => "g",
        }
    }

    /// Column label used in exported tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sp => "Sp",
            Self::Lp => "Lp",
            Self::Pp => "Pp",
            Self::Fs => "Fs",
            Self::Cs => "Cs",
            Self::Hcs => "Hcs",
            Self::G => "G",
        }
    }

    /// Human-readable name.
    pub fn description(self) -> &'static str {
        match self {
            Self::Sp => "small pit",
            Self::Lp => "large pit",
            Self::Pp => "puncture pit",
            Self::Fs => "fine scratch",
            Self::Cs => "coarse scratch",
            Self::Hcs => "hyper-coarse scratch",
            Self::G => "gouge",
        }
    }

    pub fn class(self) -> FeatureClass {
        match self {
            Self::Sp | Self::Lp | Self::Pp => FeatureClass::Pit,
            Self::Fs | Self::Cs | Self::Hcs | Self::G => FeatureClass::Scratch,
        }
    }

    /// Whether features of this category contribute to derived statistics.
    ///
    /// Puncture pits and gouges are kept for raw counts only.
    pub fn is_statistically_relevant(self) -> bool {
        !matches!(self, Self::Pp | Self::G)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Raw number of annotations per category, in [`Category::ALL`] order.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CategoryCounts([usize; 7]);

impl CategoryCounts {
    /// Count every item by category, including statistically excluded ones.
    pub fn from_items(items: &[crate::Annotation]) -> Self {
        let mut counts = Self::default();
        for item in items {
            counts.0[slot(item.category)] += 1;
        }
        counts
    }

    pub fn get(&self, category: Category) -> usize {
        self.0[slot(category)]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// `(category, count)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::ALL.iter().map(move |&c| (c, self.get(c)))
    }

    /// Per-category mean over several samples; zeros for an empty slice.
    pub fn mean_of(counts: &[CategoryCounts]) -> [f64; 7] {
        let mut out = [0.0; 7];
        if counts.is_empty() {
            return out;
        }
        for c in counts {
            for (acc, &v) in out.iter_mut().zip(c.0.iter()) {
                *acc += v as f64;
            }
        }
        let n = counts.len() as f64;
        for v in &mut out {
            *v /= n;
        }
        out
    }
}

fn slot(category: Category) -> usize {
    match category {
        Category::Sp => 0,
        Category::Lp => 1,
        Category::Pp => 2,
        Category::Fs => 3,
        Category::Cs => 4,
        Category::Hcs => 5,
        Category::G => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{circle, line, point};

    #[test]
    fn excluded_categories_are_puncture_pits_and_gouges() {
        let excluded: Vec<_> = Category::ALL
            .iter()
            .filter(|c| !c.is_statistically_relevant())
            .collect();
        assert_eq!(excluded, vec![&Category::Pp, &Category::G]);
    }

    #[test]
    fn classes_split_pits_from_scratches() {
        assert_eq!(Category::Lp.class(), FeatureClass::Pit);
        assert_eq!(Category::Hcs.class(), FeatureClass::Scratch);
        assert_eq!(Category::G.class(), FeatureClass::Scratch);
    }

    #[test]
    fn tags_round_trip_through_serde() {
        for c in Category::ALL {
            let json = serde_json::to_string(&c).expect("serialize");
            assert_eq!(json, format!("\"{}\"", c.tag()));
        }
        let parsed: Result<Category, _> = serde_json::from_str("\"xx\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn counts_include_excluded_categories() {
        let items = vec![
            point(Category::Sp, 1.0, 1.0),
            point(Category::Pp, 2.0, 2.0),
            circle(Category::Lp, 3.0, 3.0, 2.0),
            line(Category::G, [0.0, 0.0], [5.0, 5.0]),
            line(Category::Fs, [0.0, 0.0], [5.0, 0.0]),
            line(Category::Fs, [0.0, 1.0], [5.0, 1.0]),
        ];
        let counts = CategoryCounts::from_items(&items);
        assert_eq!(counts.get(Category::Sp), 1);
        assert_eq!(counts.get(Category::Pp), 1);
        assert_eq!(counts.get(Category::G), 1);
        assert_eq!(counts.get(Category::Fs), 2);
        assert_eq!(counts.get(Category::Hcs), 0);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn mean_of_counts_is_per_category() {
        let a = CategoryCounts::from_items(&vec![point(Category::Sp, 0.0, 0.0); 10]);
        let b = CategoryCounts::from_items(&vec![point(Category::Sp, 0.0, 0.0); 20]);
        let mean = CategoryCounts::mean_of(&[a, b]);
        assert_eq!(mean[0], 15.0);
        assert_eq!(mean[1], 0.0);
        assert_eq!(CategoryCounts::mean_of(&[]), [0.0; 7]);
    }
}
