// src/catalog/mod.rs
pub mod build;
pub mod store;

pub use build::{build_catalog, BuildWarning, CatalogBuild};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::table::ColumnPath;

/// One regional sizing standard: the display name as it appears in the
/// source table, and its label → inside-diameter (mm) mapping. The short
/// code lives as the catalog key. `full_name` is the field name the
/// persisted artifact has always used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardEntry {
    #[serde(rename = "full_name")]
    pub display_name: String,
    pub sizes: BTreeMap<String, f64>,
}

/// Terminal artifact of the pipeline: short standard code → entry. Built
/// once per refresh and read-only afterwards; a rebuild produces a fresh
/// catalog rather than mutating one in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeCatalog(BTreeMap<String, StandardEntry>);

impl SizeCatalog {
    pub fn get(&self, code: &str) -> Option<&StandardEntry> {
        self.0.get(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StandardEntry)> {
        self.0.iter().map(|(code, entry)| (code.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert `sizes` under `code`, creating the entry if needed. The first
    /// insertion fixes the display name; labels seen again overwrite their
    /// earlier diameter (last write wins). Callers only pass non-empty
    /// mappings, so a populated entry is never replaced by an empty one.
    pub(crate) fn merge(&mut self, code: &str, display_name: &str, sizes: BTreeMap<String, f64>) {
        let entry = self
            .0
            .entry(code.to_string())
            .or_insert_with(|| StandardEntry {
                display_name: display_name.to_string(),
                sizes: BTreeMap::new(),
            });
        entry.sizes.extend(sizes);
    }
}

/// Where the normalizer should look for size labels, and how to file what
/// it finds. Static declarative data: the source's two historic scraper
/// variants differ only in these values, never in pipeline logic.
#[derive(Debug, Clone)]
pub struct ColumnConfig {
    /// Ordered (top-level group, sub-column names) pairs to scan.
    pub groups: Vec<(String, Vec<String>)>,
    /// Column holding the inside diameter every size label pairs against.
    pub diameter_path: ColumnPath,
    /// Trimmed sub-column name → short standard code.
    pub code_by_name: BTreeMap<String, String>,
}

/// Column layout and code table for the Wikipedia ring-size equivalency
/// page, matching the headers as published there.
pub fn wikipedia_config() -> ColumnConfig {
    const UK: &str = "United Kingdom, Ireland, Australia, South Africa and New Zealand";
    const USA: &str = "United States, Canada and Mexico";
    const JAPAN: &str = "East Asia (China, Japan, South Korea), South America";
    const INDIA: &str = "India";
    const ITALY: &str = "Italy, Spain, Netherlands, Switzerland";
    // Header whitespace is collapsed during parsing, so one space here.
    const ISO: &str = "(mm) ISO (Continental Europe)";

    ColumnConfig {
        groups: vec![
            (
                "Sizes".to_string(),
                vec![
                    UK.to_string(),
                    USA.to_string(),
                    JAPAN.to_string(),
                    INDIA.to_string(),
                    ITALY.to_string(),
                ],
            ),
            // ISO sizes are published under the circumference group.
            ("Inside circumference".to_string(), vec![ISO.to_string()]),
        ],
        diameter_path: ColumnPath::nested("Inside diameter", "(mm)"),
        code_by_name: [
            (UK, "UK"),
            (USA, "USA"),
            (JAPAN, "Japan"),
            (INDIA, "India"),
            (ITALY, "Italy"),
            (ISO, "ISO"),
        ]
        .into_iter()
        .map(|(name, code)| (name.to_string(), code.to_string()))
        .collect(),
    }
}
