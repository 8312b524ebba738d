use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use super::{ColumnConfig, SizeCatalog};
use crate::table::{Cell, ColumnPath, RawTable};

/// Non-fatal conditions met while building a catalog. None of these abort
/// the run; the build always returns whatever it managed to assemble.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildWarning {
    #[error("column path {path} not found in table, region skipped")]
    ColumnPathMissing { path: ColumnPath },
    #[error("row {row} of {path}: diameter value {value:?} is not numeric, row dropped")]
    ValueConversion {
        path: ColumnPath,
        row: usize,
        value: String,
    },
    #[error("no short code configured for region {name:?}, its data is discarded")]
    UnmappedRegion { name: String },
}

/// Result of one normalizer run: the (possibly partial) catalog plus every
/// warning hit along the way. An empty catalog with warnings is how a
/// fully-skipped run looks; callers wanting to treat that as fatal decide
/// for themselves.
#[derive(Debug, Default)]
pub struct CatalogBuild {
    pub catalog: SizeCatalog,
    pub warnings: Vec<BuildWarning>,
}

/// Normalize the selected equivalency table into a [`SizeCatalog`].
///
/// Each configured (group, sub-column) pair is resolved independently:
/// missing paths, unconvertible cells, and unmapped region names are
/// logged, recorded, and skipped, so partial coverage of the source table
/// is an expected steady state rather than a failure.
#[tracing::instrument(level = "info", skip_all)]
pub fn build_catalog(table: &RawTable, config: &ColumnConfig) -> CatalogBuild {
    let mut out = CatalogBuild::default();

    // Every region pairs against the same diameter column; without it
    // nothing can be built, so warn once and return the empty catalog.
    let diameters: BTreeMap<usize, &Cell> = match table.series(&config.diameter_path) {
        Some(series) => series.into_iter().collect(),
        None => {
            warn!(path = %config.diameter_path, "diameter column not found, no region can be built");
            out.warnings.push(BuildWarning::ColumnPathMissing {
                path: config.diameter_path.clone(),
            });
            return out;
        }
    };

    for (group, sub_names) in &config.groups {
        for sub_name in sub_names {
            let name = sub_name.trim();
            let path = ColumnPath::nested(group.trim(), name);

            let Some(labels) = table.series(&path) else {
                warn!(%path, "column path not found, skipping region");
                out.warnings.push(BuildWarning::ColumnPathMissing { path });
                continue;
            };

            // Pair label and diameter cells through their shared row index.
            let mut sizes = BTreeMap::new();
            for (row, label_cell) in labels {
                let Some(diameter_cell) = diameters.get(&row) else {
                    continue;
                };
                match diameter_cell.as_f64() {
                    Some(diameter) => {
                        sizes.insert(label_cell.label(), diameter);
                    }
                    None => {
                        let value = diameter_cell.label();
                        warn!(%path, row, value, "diameter not numeric, dropping row");
                        out.warnings.push(BuildWarning::ValueConversion {
                            path: path.clone(),
                            row,
                            value,
                        });
                    }
                }
            }

            let Some(code) = config.code_by_name.get(name) else {
                warn!(name, "no short code configured, discarding region data");
                out.warnings.push(BuildWarning::UnmappedRegion {
                    name: name.to_string(),
                });
                continue;
            };

            if sizes.is_empty() {
                debug!(%path, code, "no usable rows for region");
                continue;
            }

            debug!(%path, code, rows = sizes.len(), "region normalized");
            out.catalog.merge(code, name, sizes);
        }
    }

    out
}
