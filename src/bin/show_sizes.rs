use anyhow::{Context, Result};
use ringscraper::{catalog::store::read_catalog, sort::sort_key};
use std::{env, path::Path, process::exit};

fn main() {
    // Expect a catalog path, and optionally a standard code to expand.
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <CATALOG_JSON> [CODE]", args[0]);
        exit(1);
    }
    if let Err(e) = show_sizes(Path::new(&args[1]), args.get(2).map(String::as_str)) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Without a code, list the standards in the catalog. With one, print that
/// standard's sizes in natural order with the diameter each maps to (and
/// the radius a circle-drawing consumer would use).
fn show_sizes(catalog_path: &Path, code: Option<&str>) -> Result<()> {
    let catalog = read_catalog(catalog_path)?;

    let Some(code) = code else {
        for (code, entry) in catalog.iter() {
            println!(
                "{:<6} {} ({} sizes)",
                code,
                entry.display_name,
                entry.sizes.len()
            );
        }
        return Ok(());
    };

    let entry = catalog
        .get(code)
        .with_context(|| format!("standard `{}` not in {}", code, catalog_path.display()))?;

    println!("=== {} — {} ===", code, entry.display_name);
    let mut labels: Vec<&str> = entry.sizes.keys().map(String::as_str).collect();
    labels.sort_by_key(|l| sort_key(l));
    for label in labels {
        let diameter = entry.sizes[label];
        println!(
            "{:>8}  ⌀ {:6.2} mm  (radius {:5.2} mm)",
            label,
            diameter,
            diameter / 2.0
        );
    }
    Ok(())
}
