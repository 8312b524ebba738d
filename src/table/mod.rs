// src/table/mod.rs
pub mod extract;

pub use extract::{select_target_table, ExtractError};

/// Path to one column of a [`RawTable`]. The source tables carry either a
/// flat header row or a two-level one (group header spanning sub-columns),
/// and both shapes survive into the path so lookups stay unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnPath {
    Single(String),
    Nested(String, String),
}

impl ColumnPath {
    pub fn nested(group: impl Into<String>, sub: impl Into<String>) -> Self {
        ColumnPath::Nested(group.into(), sub.into())
    }

    pub fn single(name: impl Into<String>) -> Self {
        ColumnPath::Single(name.into())
    }

    /// Top-level header name (the group for nested paths).
    pub fn top(&self) -> &str {
        match self {
            ColumnPath::Single(name) => name,
            ColumnPath::Nested(group, _) => group,
        }
    }

    /// Same path with every level whitespace-trimmed.
    pub fn trimmed(&self) -> ColumnPath {
        match self {
            ColumnPath::Single(name) => ColumnPath::Single(name.trim().to_string()),
            ColumnPath::Nested(group, sub) => {
                ColumnPath::Nested(group.trim().to_string(), sub.trim().to_string())
            }
        }
    }
}

impl std::fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnPath::Single(name) => write!(f, "{}", name),
            ColumnPath::Nested(group, sub) => write!(f, "{} → {}", group, sub),
        }
    }
}

/// A populated cell. Absent cells are represented as `None` in the row
/// vector, so every variant here carries a real value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    /// Numeric view of the cell. Text cells still count if they parse as a
    /// plain decimal, since the source encodes plenty of numbers as text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Canonical string form, used as the size-label map key. Integral
    /// floats render without a trailing `.0` so `16` and `"16"` collapse to
    /// the same label.
    pub fn label(&self) -> String {
        match self {
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }
}

/// One tabular structure from the source document, header paths plus
/// row-indexed cells. Row identity is the index into `rows`, shared across
/// all columns; that shared index is what lets a size cell be paired with
/// the diameter cell of the same measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub columns: Vec<ColumnPath>,
    pub rows: Vec<Vec<Option<Cell>>>,
}

impl RawTable {
    pub fn new(columns: Vec<ColumnPath>, rows: Vec<Vec<Option<Cell>>>) -> Self {
        RawTable { columns, rows }
    }

    pub fn column_index(&self, path: &ColumnPath) -> Option<usize> {
        self.columns.iter().position(|c| c == path)
    }

    /// Row-indexed series for one column with absent cells removed.
    /// Returns `None` when the path does not exist in this table.
    pub fn series(&self, path: &ColumnPath) -> Option<Vec<(usize, &Cell)>> {
        let idx = self.column_index(path)?;
        Some(
            self.rows
                .iter()
                .enumerate()
                .filter_map(|(row, cells)| {
                    cells.get(idx).and_then(|c| c.as_ref()).map(|c| (row, c))
                })
                .collect(),
        )
    }

    /// Top-level header names, trimmed and lowercased, for heuristic
    /// matching against an expected schema.
    pub fn top_level_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.top().trim().to_lowercase())
            .collect()
    }

    /// Strip whitespace from every header level, single- and two-level
    /// paths alike.
    pub fn trim_headers(&mut self) {
        for col in &mut self.columns {
            *col = col.trimmed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> RawTable {
        RawTable::new(
            vec![
                ColumnPath::nested(" Sizes ", " UK "),
                ColumnPath::nested("Inside diameter", "(mm)"),
                ColumnPath::single("Notes"),
            ],
            vec![
                vec![
                    Some(Cell::Text("J".into())),
                    Some(Cell::Number(15.5)),
                    None,
                ],
                vec![None, Some(Cell::Number(16.0)), None],
                vec![
                    Some(Cell::Text("L".into())),
                    None,
                    Some(Cell::Text("rare".into())),
                ],
            ],
        )
    }

    #[test]
    fn series_drops_absent_cells_and_keeps_row_indices() {
        let table = sample_table();
        let sizes = table
            .series(&ColumnPath::nested(" Sizes ", " UK "))
            .unwrap();
        let rows: Vec<usize> = sizes.iter().map(|(row, _)| *row).collect();
        assert_eq!(rows, vec![0, 2]);

        assert!(table.series(&ColumnPath::single("Missing")).is_none());
    }

    #[test]
    fn trim_headers_cleans_every_level() {
        let mut table = sample_table();
        table.trim_headers();
        assert_eq!(table.columns[0], ColumnPath::nested("Sizes", "UK"));
        assert_eq!(table.top_level_names()[0], "sizes");
    }

    #[test]
    fn cell_label_renders_integral_floats_without_fraction() {
        assert_eq!(Cell::Number(16.0).label(), "16");
        assert_eq!(Cell::Number(16.5).label(), "16.5");
        assert_eq!(Cell::Text("  J ".into()).label(), "J");
    }

    #[test]
    fn text_cells_parse_as_numbers_when_plain_decimals() {
        assert_eq!(Cell::Text("15.5".into()).as_f64(), Some(15.5));
        assert_eq!(Cell::Text("J".into()).as_f64(), None);
    }
}
