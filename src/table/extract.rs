use thiserror::Error;
use tracing::{debug, info, warn};

use super::RawTable;

/// Top-level column groups the equivalency table is expected to carry.
/// Matching is case-insensitive against trimmed header names.
const EXPECTED_TOP_LEVEL_GROUPS: [&str; 3] = ["sizes", "inside diameter", "inside circumference"];

/// A candidate counts as the target once it matches this many expected
/// groups. Two tolerates a missing group while still rejecting unrelated
/// tables that coincidentally share one name.
const MATCH_THRESHOLD: usize = 2;

/// When no candidate clears the threshold, fall back to this position in
/// the candidate sequence. On the source page the equivalency table has
/// historically been the third table.
const FALLBACK_TABLE_INDEX: usize = 2;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no tables found in the source document")]
    NoTablesFound,
    #[error(
        "target table not identified among {candidates} candidate(s) \
         and fallback index {fallback} is out of range"
    )]
    TableNotIdentified { candidates: usize, fallback: usize },
}

fn matched_groups(table: &RawTable) -> usize {
    let top_level = table.top_level_names();
    EXPECTED_TOP_LEVEL_GROUPS
        .iter()
        .filter(|expected| top_level.iter().any(|name| name == *expected))
        .count()
}

/// Pick the size/diameter equivalency table out of all tables found on the
/// page. The source schema is externally controlled and occasionally
/// reshaped, so this is deliberately a two-tier strategy — a column-name
/// heuristic first, a positional fallback second — rather than strict
/// schema validation.
#[tracing::instrument(level = "debug", skip(tables), fields(candidates = tables.len()))]
pub fn select_target_table(tables: Vec<RawTable>) -> Result<RawTable, ExtractError> {
    if tables.is_empty() {
        return Err(ExtractError::NoTablesFound);
    }

    let candidates = tables.len();
    let mut chosen = None;
    for (i, table) in tables.iter().enumerate() {
        let matched = matched_groups(table);
        debug!(table = i, matched, "scored candidate table");
        if matched >= MATCH_THRESHOLD {
            info!(table = i, matched, "selected target table by column heuristic");
            chosen = Some(i);
            break;
        }
    }

    let chosen = match chosen {
        Some(i) => i,
        None if FALLBACK_TABLE_INDEX < candidates => {
            warn!(
                table = FALLBACK_TABLE_INDEX,
                "no candidate matched expected columns, using positional fallback"
            );
            FALLBACK_TABLE_INDEX
        }
        None => {
            return Err(ExtractError::TableNotIdentified {
                candidates,
                fallback: FALLBACK_TABLE_INDEX,
            })
        }
    };

    let mut table = tables
        .into_iter()
        .nth(chosen)
        .expect("chosen index is in range");
    table.trim_headers();
    Ok(table)
}
