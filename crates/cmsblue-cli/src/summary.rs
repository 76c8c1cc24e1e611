use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cmsblue_core::{LineRecord, LineType};
use cmsblue_model::SchemaEntry;

use crate::commands::ParseReport;

pub fn print_parse_summary(report: &ParseReport) {
    println!("Input: {}", report.input.display());
    if let Some(path) = &report.output {
        println!("Output: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Segment"),
        header_cell("Shape"),
        header_cell("Entries"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    let mut total = 0usize;
    for row in &report.segments {
        total += row.entries;
        table.add_row(vec![
            Cell::new(&row.name),
            dim_cell(row.shape),
            Cell::new(row.entries),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn print_lines_table(records: &[LineRecord]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Line"),
        header_cell("Type"),
        header_cell("Level"),
        header_cell("Claim"),
        header_cell("Text"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for record in records {
        table.add_row(vec![
            dim_cell(record.sequence_key),
            Cell::new(record.line_number),
            line_type_cell(record.line_type),
            Cell::new(record.level),
            claim_cell(&record.claim_number),
            Cell::new(&record.text),
        ]);
    }
    println!("{table}");
}

pub fn print_schema_table(entries: &[SchemaEntry]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Match"),
        header_cell("Name"),
        header_cell("Level"),
        header_cell("Shape"),
        header_cell("Handler"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for entry in entries {
        let name = if entry.is_section() {
            Cell::new(entry.output_key()).add_attribute(Attribute::Bold)
        } else {
            Cell::new(entry.output_key())
        };
        table.add_row(vec![
            Cell::new(entry.match_path),
            name,
            Cell::new(entry.level),
            Cell::new(entry.shape.label()),
            dim_cell(entry.handler),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn line_type_cell(line_type: LineType) -> Cell {
    match line_type {
        LineType::Header => Cell::new(line_type)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        LineType::Body => Cell::new(line_type),
    }
}

fn claim_cell(claim_number: &str) -> Cell {
    if claim_number.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(claim_number)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).add_attribute(Attribute::Dim)
}
