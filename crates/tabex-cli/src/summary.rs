use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tabex_cli::pipeline::ExportOutcome;

pub fn print_export_summary(outcome: &ExportOutcome) {
    if let Some(path) = &outcome.path {
        println!("Output: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Model"),
        header_cell("Partial"),
        header_cell("Rows"),
        header_cell("Columns"),
        header_cell("Type"),
    ]);
    apply_table_style(&mut table);
    table.add_row(vec![
        Cell::new(&outcome.model).fg(Color::Cyan),
        Cell::new(&outcome.partial_name),
        Cell::new(outcome.rows).set_alignment(CellAlignment::Right),
        Cell::new(outcome.columns).set_alignment(CellAlignment::Right),
        Cell::new(outcome.file_type).add_attribute(Attribute::Dim),
    ]);
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}
