// src/fetch/html.rs
//
// Turn raw page HTML into generic RawTable structures. One or two leading
// all-<th> rows form the header; a two-row header becomes nested column
// paths, with `colspan` spreading a group over its sub-columns and a
// `rowspan`-2 cell standing alone as a single-level column.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::table::{Cell, ColumnPath, RawTable};

struct HtmlCell {
    text: String,
    is_header: bool,
    colspan: usize,
    rowspan: usize,
}

fn span(el: &ElementRef, attr: &str) -> usize {
    el.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .max(1)
}

/// Text content with inner whitespace collapsed to single spaces.
fn cell_text(el: &ElementRef) -> String {
    el.text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

fn read_row(row: ElementRef, cells: &Selector) -> Vec<HtmlCell> {
    row.select(cells)
        .map(|el| HtmlCell {
            text: cell_text(&el),
            is_header: el.value().name() == "th",
            colspan: span(&el, "colspan"),
            rowspan: span(&el, "rowspan"),
        })
        .collect()
}

/// Parse every `<table>` in the document, in document order. Tables with no
/// rows at all are dropped; everything else stays so positional fallback
/// indices line up with what the page shows.
pub fn parse_tables(html: &str) -> Vec<RawTable> {
    let tables = Selector::parse("table").expect("selector parses");
    let trs = Selector::parse("tr").expect("selector parses");
    let cells = Selector::parse("th, td").expect("selector parses");

    let doc = Html::parse_document(html);
    doc.select(&tables)
        .filter_map(|table| parse_table(table, &trs, &cells))
        .collect()
}

fn parse_table(table: ElementRef, trs: &Selector, cells: &Selector) -> Option<RawTable> {
    let rows: Vec<Vec<HtmlCell>> = table
        .select(trs)
        .map(|row| read_row(row, cells))
        .collect();
    if rows.is_empty() {
        return None;
    }

    // Leading rows made entirely of <th> cells are the header, two deep at
    // most. A table with no <th> row still gets its first row as a flat
    // header, matching how generic tabular readers treat it.
    let header_depth = rows
        .iter()
        .take(2)
        .take_while(|row| !row.is_empty() && row.iter().all(|c| c.is_header))
        .count();

    let columns = match header_depth {
        2 => nested_columns(&rows[0], &rows[1]),
        _ => rows[0]
            .iter()
            .flat_map(|c| std::iter::repeat(ColumnPath::single(c.text.as_str())).take(c.colspan))
            .collect(),
    };
    if columns.is_empty() {
        return None;
    }

    let body_start = header_depth.max(1);
    let body = body_rows(&rows[body_start..], columns.len());

    debug!(columns = columns.len(), "parsed table");
    Some(RawTable::new(columns, body))
}

/// Combine a group row and a sub-name row into nested paths. Sub-row cells
/// are consumed left to right, `colspan` many per group; a group cell that
/// spans both rows contributes a single-level column instead.
fn nested_columns(groups: &[HtmlCell], subs: &[HtmlCell]) -> Vec<ColumnPath> {
    let mut columns = Vec::new();
    let mut sub_iter = subs.iter();

    for group in groups {
        if group.rowspan >= 2 {
            for _ in 0..group.colspan {
                columns.push(ColumnPath::single(group.text.as_str()));
            }
            continue;
        }
        // Each consumed sub cell covers colspan many of the group's slots.
        let mut remaining = group.colspan;
        while remaining > 0 {
            match sub_iter.next() {
                Some(sub) => {
                    let span = sub.colspan.min(remaining);
                    for _ in 0..span {
                        columns.push(ColumnPath::nested(group.text.as_str(), sub.text.as_str()));
                    }
                    remaining -= span;
                }
                None => {
                    columns.push(ColumnPath::single(group.text.as_str()));
                    remaining -= 1;
                }
            }
        }
    }

    columns
}

/// Lay body rows onto the column grid. A cell with `rowspan` fills its
/// value down into the following rows at the same column positions, so the
/// shared row index stays aligned across columns.
fn body_rows(rows: &[Vec<HtmlCell>], width: usize) -> Vec<Vec<Option<Cell>>> {
    // Per column: rows still owed by a spanning cell, and its value.
    let mut carry: Vec<Option<(usize, Option<Cell>)>> = vec![None; width];
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        let mut cells: Vec<Option<Cell>> = Vec::with_capacity(width);
        let mut source = row.iter();
        while cells.len() < width {
            let pos = cells.len();
            if let Some((owed, value)) = carry[pos].take() {
                cells.push(value.clone());
                if owed > 1 {
                    carry[pos] = Some((owed - 1, value));
                }
                continue;
            }
            match source.next() {
                Some(cell) => {
                    let value = parse_cell(&cell.text);
                    for _ in 0..cell.colspan {
                        if cells.len() == width {
                            break;
                        }
                        let pos = cells.len();
                        cells.push(value.clone());
                        if cell.rowspan > 1 {
                            carry[pos] = Some((cell.rowspan - 1, value.clone()));
                        }
                    }
                }
                None => cells.push(None),
            }
        }
        out.push(cells);
    }

    out
}

fn parse_cell(text: &str) -> Option<Cell> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match text.parse::<f64>() {
        Ok(n) => Some(Cell::Number(n)),
        Err(_) => Some(Cell::Text(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_LEVEL: &str = r#"
        <table>
          <tr>
            <th colspan="2">Sizes</th>
            <th colspan="1">Inside diameter</th>
            <th rowspan="2">Notes</th>
          </tr>
          <tr><th>UK</th><th>USA</th><th>(mm)</th></tr>
          <tr><td>J</td><td>4 3/4</td><td>15.5</td><td></td></tr>
          <tr><td>K</td><td></td><td>16.0</td><td>rare</td></tr>
        </table>"#;

    #[test]
    fn two_level_header_becomes_nested_paths() {
        let tables = parse_tables(TWO_LEVEL);
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(
            table.columns,
            vec![
                ColumnPath::nested("Sizes", "UK"),
                ColumnPath::nested("Sizes", "USA"),
                ColumnPath::nested("Inside diameter", "(mm)"),
                ColumnPath::single("Notes"),
            ]
        );
    }

    #[test]
    fn body_cells_are_typed_and_row_aligned() {
        let table = &parse_tables(TWO_LEVEL)[0];
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], Some(Cell::Text("J".into())));
        assert_eq!(table.rows[0][1], Some(Cell::Text("4 3/4".into())));
        assert_eq!(table.rows[0][2], Some(Cell::Number(15.5)));
        assert_eq!(table.rows[0][3], None);
        assert_eq!(table.rows[1][1], None);
        assert_eq!(table.rows[1][3], Some(Cell::Text("rare".into())));
    }

    #[test]
    fn flat_header_becomes_single_paths() {
        let html = r#"
            <table>
              <tr><th>Size</th><th>mm</th></tr>
              <tr><td>5</td><td>15.7</td></tr>
            </table>"#;
        let table = &parse_tables(html)[0];
        assert_eq!(
            table.columns,
            vec![ColumnPath::single("Size"), ColumnPath::single("mm")]
        );
        assert_eq!(table.rows[0][0], Some(Cell::Number(5.0)));
    }

    #[test]
    fn headerless_table_uses_first_row_as_flat_header() {
        let html = r#"
            <table>
              <tr><td>a</td><td>b</td></tr>
              <tr><td>1</td><td>2</td></tr>
            </table>"#;
        let table = &parse_tables(html)[0];
        assert_eq!(
            table.columns,
            vec![ColumnPath::single("a"), ColumnPath::single("b")]
        );
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn header_whitespace_is_collapsed() {
        let html = r#"
            <table>
              <tr><th colspan="1">Inside circumference</th></tr>
              <tr><th>(mm)
                  ISO (Continental Europe)</th></tr>
              <tr><td>44</td></tr>
            </table>"#;
        let table = &parse_tables(html)[0];
        assert_eq!(
            table.columns[0],
            ColumnPath::nested("Inside circumference", "(mm) ISO (Continental Europe)")
        );
    }

    #[test]
    fn short_rows_are_padded_and_long_rows_truncated() {
        let html = r#"
            <table>
              <tr><th>A</th><th>B</th></tr>
              <tr><td>1</td></tr>
              <tr><td>1</td><td>2</td><td>3</td></tr>
            </table>"#;
        let table = &parse_tables(html)[0];
        assert_eq!(table.rows[0], vec![Some(Cell::Number(1.0)), None]);
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn body_rowspan_fills_down_and_keeps_rows_aligned() {
        let html = r#"
            <table>
              <tr><th>Size</th><th>mm</th></tr>
              <tr><td rowspan="2">J</td><td>15.5</td></tr>
              <tr><td>16.0</td></tr>
              <tr><td>K</td><td>16.5</td></tr>
            </table>"#;
        let table = &parse_tables(html)[0];
        assert_eq!(
            table.rows[0],
            vec![Some(Cell::Text("J".into())), Some(Cell::Number(15.5))]
        );
        // The spanned cell repeats underneath itself; 16.0 stays in the
        // mm column instead of shifting left into the size column.
        assert_eq!(
            table.rows[1],
            vec![Some(Cell::Text("J".into())), Some(Cell::Number(16.0))]
        );
        assert_eq!(
            table.rows[2],
            vec![Some(Cell::Text("K".into())), Some(Cell::Number(16.5))]
        );
    }

    #[test]
    fn body_rowspan_and_colspan_combine() {
        let html = r#"
            <table>
              <tr><th>A</th><th>B</th><th>C</th></tr>
              <tr><td colspan="2" rowspan="2">x</td><td>1</td></tr>
              <tr><td>2</td></tr>
            </table>"#;
        let table = &parse_tables(html)[0];
        let x = || Some(Cell::Text("x".into()));
        assert_eq!(table.rows[0], vec![x(), x(), Some(Cell::Number(1.0))]);
        assert_eq!(table.rows[1], vec![x(), x(), Some(Cell::Number(2.0))]);
    }

    #[test]
    fn wide_sub_cells_count_against_their_group_span() {
        let html = r#"
            <table>
              <tr><th colspan="4">Sizes</th><th rowspan="2">mm</th></tr>
              <tr><th colspan="2">UK</th><th colspan="2">US</th></tr>
              <tr><td>a</td><td>b</td><td>c</td><td>d</td><td>1</td></tr>
            </table>"#;
        let table = &parse_tables(html)[0];
        assert_eq!(
            table.columns,
            vec![
                ColumnPath::nested("Sizes", "UK"),
                ColumnPath::nested("Sizes", "UK"),
                ColumnPath::nested("Sizes", "US"),
                ColumnPath::nested("Sizes", "US"),
                ColumnPath::single("mm"),
            ]
        );
        assert_eq!(table.rows[0].len(), 5);
    }

    #[test]
    fn multiple_tables_keep_document_order() {
        let html = r#"
            <table><tr><th>First</th></tr><tr><td>x</td></tr></table>
            <table><tr><th>Second</th></tr><tr><td>y</td></tr></table>"#;
        let tables = parse_tables(html);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].columns[0], ColumnPath::single("First"));
        assert_eq!(tables[1].columns[0], ColumnPath::single("Second"));
    }
}
