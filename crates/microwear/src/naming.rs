//! Specimen metadata encoded in micrograph file names.
//!
//! Names look like `NMB-1806_m1_buc_10x_02.jpg`: a specimen ID followed by
//! tooth code, side, cusp part, magnification and a short sequence number,
//! in any order and separated by `_`, `-`, `.` or whitespace.

use std::sync::OnceLock;

use regex::Regex;

const SIDE_KEYWORDS: [&str; 10] = [
    "buc", "ling", "lab", "occ", "mes", "dist", "dx", "sx", "sin", "dex",
];
const PART_KEYWORDS: [&str; 8] = ["trig", "tall", "para", "meta", "met", "proto", "hypo", "ent"];
/// Trailing numbers below this are sequence numbers, not part of the ID.
const MAX_SEQUENCE: u64 = 100;

struct NamePatterns {
    extension: Regex,
    separators: Regex,
    magnification: Regex,
    tooth: Regex,
}

static PATTERNS: OnceLock<NamePatterns> = OnceLock::new();

fn patterns() -> &'static NamePatterns {
    PATTERNS.get_or_init(|| NamePatterns {
        extension: Regex::new(r"\.[^/.]+$").expect("valid regex"),
        separators: Regex::new(r"[_\-\s.]+").expect("valid regex"),
        magnification: Regex::new(r"(?i)^\d+x$").expect("valid regex"),
        tooth: Regex::new(r"(?i)^d?[icpm][1-4]$").expect("valid regex"),
    })
}

/// Fields recovered from a sample or file name. Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleName {
    /// Upper-cased specimen ID; never empty for a non-empty name.
    pub id: String,
    pub tooth: String,
    pub side: String,
    pub part: String,
    pub mag: String,
    pub seq: String,
    /// Name without its extension.
    pub stem: String,
}

impl SampleName {
    pub fn parse(name: &str) -> Self {
        let pats = patterns();
        let stem = pats.extension.replace(name, "").into_owned();

        let mut parsed = Self {
            stem: stem.clone(),
            ..Self::default()
        };
        let mut remaining: Vec<&str> = Vec::new();
        for token in pats.separators.split(&stem).filter(|t| !t.is_empty()) {
            let lower = token.to_lowercase();
            if pats.magnification.is_match(token) {
                parsed.mag = token.to_string();
            } else if pats.tooth.is_match(token) {
                parsed.tooth = token.to_string();
            } else if SIDE_KEYWORDS.iter().any(|k| lower.contains(k)) {
                parsed.side = token.to_string();
            } else if PART_KEYWORDS.iter().any(|k| lower.contains(k)) {
                parsed.part = token.to_string();
            } else {
                remaining.push(token);
            }
        }

        if remaining.len() > 1 {
            if let Some(&last) = remaining.last() {
                let is_sequence = last.bytes().all(|b| b.is_ascii_digit())
                    && last.parse::<u64>().is_ok_and(|v| v < MAX_SEQUENCE);
                if is_sequence {
                    parsed.seq = last.to_string();
                    remaining.pop();
                }
            }
        }

        let id = remaining.join("_");
        parsed.id = if id.is_empty() { stem } else { id }.to_uppercase();
        parsed
    }
}
