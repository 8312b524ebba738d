// src/catalog/store.rs
//
// Persisted form of the catalog, so consumers can reuse a refresh without
// re-fetching the source. JSON keyed by short code, entries ordered by key,
// a faithful re-expression of the in-memory catalog.

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};
use tracing::info;

use super::SizeCatalog;

pub fn write_catalog(path: &Path, catalog: &SizeCatalog) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating catalog file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), catalog)
        .with_context(|| format!("writing catalog to {}", path.display()))?;
    info!(path = %path.display(), standards = catalog.len(), "catalog written");
    Ok(())
}

pub fn read_catalog(path: &Path) -> Result<SizeCatalog> {
    let file =
        File::open(path).with_context(|| format!("opening catalog file {}", path.display()))?;
    let catalog = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing catalog from {}", path.display()))?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SizeCatalog;
    use tempfile::tempdir;

    #[test]
    fn round_trip_reproduces_an_identical_catalog() {
        let mut catalog = SizeCatalog::default();
        catalog.merge(
            "UK",
            "United Kingdom",
            [
                ("J".to_string(), 15.5),
                ("½".to_string(), 12.0),
                ("Z1".to_string(), 22.25),
            ]
            .into(),
        );
        catalog.merge("ISO", "(mm) ISO", [("44".to_string(), 14.0)].into());

        let dir = tempdir().unwrap();
        let path = dir.path().join("ring_sizes.json");
        write_catalog(&path, &catalog).unwrap();
        let reloaded = read_catalog(&path).unwrap();

        assert_eq!(reloaded, catalog);
        let codes: Vec<&str> = reloaded.codes().collect();
        assert_eq!(codes, vec!["ISO", "UK"]);
    }

    #[test]
    fn reading_a_missing_file_reports_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = read_catalog(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.json"));
    }
}
