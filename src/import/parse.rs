use csv::ReaderBuilder;

use crate::AppResult;

const BOM: char = '\u{feff}';

/// Splits CSV text into rows of cells, header row included.
///
/// Quoting follows RFC 4180: `""` inside a quoted cell is a literal quote and
/// commas inside quotes do not split. Blank lines are skipped; a line with
/// separators but no content (`,`) is still a row. Ragged rows are kept as
/// they are.
pub fn parse(text: &str) -> AppResult<Vec<Vec<String>>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if is_blank_line(&record) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

// The reader already drops empty lines; whitespace-only ones come through as
// a single blank cell.
fn is_blank_line(record: &csv::StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(|cell| cell.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_quoted_cells() {
        let rows = parse("Name,Note\n\"Acme, Inc.\",\"He said \"\"hi\"\"\"").expect("parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], ["Acme, Inc.", "He said \"hi\""]);
    }

    #[test]
    fn drops_blank_lines_and_bom() {
        let rows = parse("\u{feff}Name,Email\n\n   \nAda,ada@example.com\n").expect("parse");
        assert_eq!(rows[0], ["Name", "Email"]);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn quote_inside_unquoted_cell_is_literal() {
        let rows = parse("Note,Flat\nHe said \"hi\",4B").expect("parse");
        assert_eq!(rows[1], ["He said \"hi\"", "4B"]);
    }

    #[test]
    fn separator_only_line_is_a_row() {
        let rows = parse("Name,Email\n , \nBob,bob@example.com").expect("parse");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], [" ", " "]);
    }

    #[test]
    fn keeps_ragged_rows_and_crlf() {
        let rows = parse("a,b,c\r\n1\r\n2,3,4,5").expect("parse");
        assert_eq!(rows[1], ["1"]);
        assert_eq!(rows[2].len(), 4);
    }

    #[test]
    fn empty_text_has_no_rows() {
        assert!(parse("").expect("parse").is_empty());
    }
}
