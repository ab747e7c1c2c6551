//! CSV rendering of export tables.

use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tabex_model::ExportTable;

use crate::error::Result;

/// CSV writer with the export's quoting rules: fields containing the
/// delimiter, quotes or line breaks are quoted and embedded quotes doubled.
pub fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .delimiter(b',')
        .quote(b'"')
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer)
}

/// Writes the header followed by every row.
///
/// A zero-column table is written as one empty line per header and row.
pub fn write_table<W: Write>(table: &ExportTable, mut writer: W) -> Result<()> {
    if table.width() == 0 {
        for _ in 0..=table.len() {
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        return Ok(());
    }
    let mut csv = csv_writer(writer);
    csv.write_record(&table.header)?;
    for row in &table.rows {
        csv.write_record(row.iter().map(ToString::to_string))?;
    }
    csv.flush()?;
    Ok(())
}

pub fn table_to_string(table: &ExportTable) -> Result<String> {
    let mut buffer = Vec::new();
    write_table(table, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use tabex_model::CellValue;

    use super::*;

    fn table(header: &[&str], rows: Vec<Vec<CellValue>>) -> ExportTable {
        let mut table = ExportTable::new(header.iter().map(ToString::to_string).collect());
        for row in rows {
            table.push_row(row).expect("row fits");
        }
        table
    }

    #[test]
    fn quotes_only_when_needed() {
        let table = table(
            &["A", "B"],
            vec![
                vec!["x,1".into(), "say \"hi\"".into()],
                vec!["two\nlines".into(), 7.into()],
                vec![CellValue::Missing, true.into()],
            ],
        );
        let text = table_to_string(&table).expect("render csv");
        assert_eq!(
            text,
            "A,B\n\"x,1\",\"say \"\"hi\"\"\"\n\"two\nlines\",7\n,true\n"
        );
    }

    #[test]
    fn zero_columns_render_empty_lines() {
        let table = table(&[], vec![vec![], vec![]]);
        assert_eq!(table_to_string(&table).expect("render csv"), "\n\n\n");
    }

    #[test]
    fn whole_floats_keep_their_fraction() {
        let table = table(&["Ratio"], vec![vec![5.0.into()], vec![2.5.into()]]);
        assert_eq!(
            table_to_string(&table).expect("render csv"),
            "Ratio\n5.0\n2.5\n"
        );
    }

    #[test]
    fn header_only_when_no_rows() {
        let table = table(&["Name", "Count"], vec![]);
        assert_eq!(table_to_string(&table).expect("render csv"), "Name,Count\n");
    }
}
