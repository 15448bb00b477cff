use crate::error::{Error, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Rows of trimmed cell text, in document order. The first row is the
/// header. Rows with zero cells survive extraction; `normalize` deals
/// with them.
#[derive(Debug)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

/// A header-labelled table: `rows[i][j]` belongs to column `headers[j]`.
#[derive(Debug)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn column(&self, label: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == label)
    }
}

/// Pull the revenue table out of the document.
///
/// Pages like this carry several tables (navigation, peer comparisons),
/// so a table whose header row equals `expected_headers` wins. When
/// nothing matches — or `expected_headers` is empty — the first table in
/// the document is used, which is what the source page layout has always
/// required.
pub fn extract_table(html: &str, expected_headers: &[String]) -> Result<RawTable> {
    let table_sel = Selector::parse("table").expect("CSS selector for tables should be valid");
    let row_sel = Selector::parse("tr").expect("CSS selector for rows should be valid");
    let cell_sel = Selector::parse("th, td").expect("CSS selector for cells should be valid");

    let doc = Html::parse_document(html);
    let mut first: Option<Vec<Vec<String>>> = None;

    for table in doc.select(&table_sel) {
        let rows = collect_rows(&table, &row_sel, &cell_sel);
        if !expected_headers.is_empty() && rows.first().map(Vec::as_slice) == Some(expected_headers)
        {
            debug!(rows = rows.len(), "matched table by header labels");
            return check_shape(rows);
        }
        if first.is_none() {
            first = Some(rows);
        }
    }

    match first {
        Some(rows) => {
            debug!(
                rows = rows.len(),
                "no header match; falling back to first table"
            );
            check_shape(rows)
        }
        None => Err(Error::Extraction("no <table> element in document".into())),
    }
}

fn collect_rows(table: &ElementRef, row_sel: &Selector, cell_sel: &Selector) -> Vec<Vec<String>> {
    table
        .select(row_sel)
        .map(|tr| {
            tr.select(cell_sel)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect()
        })
        .collect()
}

fn check_shape(rows: Vec<Vec<String>>) -> Result<RawTable> {
    if rows.len() < 2 {
        return Err(Error::Extraction(format!(
            "table has {} row(s); need a header plus at least one data row",
            rows.len()
        )));
    }
    Ok(RawTable { rows })
}

/// Split the header row off and keep the data rows aligned with it.
///
/// Fully empty rows (spacers on the source page) are dropped. A non-empty
/// row whose cell count differs from the header's would silently shift
/// every later column, so it fails the run instead.
pub fn normalize(raw: RawTable) -> Result<DataTable> {
    let mut iter = raw.rows.into_iter();
    let headers = iter
        .next()
        .ok_or_else(|| Error::Extraction("empty table".into()))?;

    let mut rows = Vec::new();
    for (i, row) in iter.enumerate() {
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        if row.len() != headers.len() {
            return Err(Error::Extraction(format!(
                "data row {} has {} cell(s), header has {}",
                i + 1,
                row.len(),
                headers.len()
            )));
        }
        rows.push(row);
    }
    Ok(DataTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    const PAGE: &str = r#"
        <html><body>
          <table>
            <tr><th>Date</th><th>Value</th></tr>
            <tr><td>June 30, 2023</td><td>24.93B</td></tr>
            <tr><td>March 31, 2023</td><td>23.33B</td></tr>
          </table>
        </body></html>"#;

    #[test]
    fn extracts_header_and_data_rows() {
        let raw = extract_table(PAGE, &[]).unwrap();
        assert_eq!(raw.rows.len(), 3);
        assert_eq!(raw.rows[0], strings(&["Date", "Value"]));
        assert_eq!(raw.rows[1], strings(&["June 30, 2023", "24.93B"]));
    }

    #[test]
    fn strips_whitespace_around_cell_text() {
        let html = "<table><tr><th> Date </th></tr><tr><td>\n  1.0B\n</td></tr></table>";
        let raw = extract_table(html, &[]).unwrap();
        assert_eq!(raw.rows[0], strings(&["Date"]));
        assert_eq!(raw.rows[1], strings(&["1.0B"]));
    }

    #[test]
    fn no_table_is_an_extraction_error() {
        let err = extract_table("<html><body><p>nothing here</p></body></html>", &[]).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn single_row_table_is_rejected() {
        let err = extract_table("<table><tr><th>Date</th></tr></table>", &[]).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn header_match_skips_earlier_tables() {
        let html = r#"
            <table><tr><th>Symbol</th><th>Name</th></tr>
                   <tr><td>TSLA</td><td>Tesla</td></tr></table>
            <table><tr><th>Date</th><th>Value</th></tr>
                   <tr><td>June 30, 2023</td><td>24.93B</td></tr></table>"#;
        let expected = strings(&["Date", "Value"]);
        let raw = extract_table(html, &expected).unwrap();
        assert_eq!(raw.rows[0], expected);
        assert_eq!(raw.rows[1][1], "24.93B");
    }

    #[test]
    fn falls_back_to_first_table_when_nothing_matches() {
        let html = r#"
            <table><tr><th>Symbol</th><th>Name</th></tr>
                   <tr><td>TSLA</td><td>Tesla</td></tr></table>"#;
        let raw = extract_table(html, &strings(&["Date", "Value"])).unwrap();
        assert_eq!(raw.rows[0], strings(&["Symbol", "Name"]));
    }

    #[test]
    fn normalize_splits_header_from_data() {
        let raw = extract_table(PAGE, &[]).unwrap();
        let table = normalize(raw).unwrap();
        assert_eq!(table.headers, strings(&["Date", "Value"]));
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.column("Value"), Some(1));
        assert_eq!(table.column("Volume"), None);
    }

    #[test]
    fn normalize_drops_empty_rows() {
        let raw = RawTable {
            rows: vec![
                strings(&["Date", "Value"]),
                vec![],
                strings(&["", ""]),
                strings(&["June 30, 2023", "24.93B"]),
            ],
        };
        let table = normalize(raw).unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn normalize_rejects_misaligned_rows() {
        let raw = RawTable {
            rows: vec![
                strings(&["Date", "Value"]),
                strings(&["June 30, 2023", "24.93B", "extra"]),
            ],
        };
        let err = normalize(raw).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }
}
