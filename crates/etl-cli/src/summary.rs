use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::commands::RunResult;

pub fn print_summary(result: &RunResult) {
    eprintln!("Input: {}", result.input.display());
    if result.dry_run {
        eprintln!("Output: (dry run)");
    } else {
        match &result.output {
            Some(path) => eprintln!("Output: {}", path.display()),
            None => eprintln!("Output: stdout"),
        }
    }
    if let Some(path) = result.encodings.as_ref().filter(|_| !result.dry_run) {
        eprintln!("Encodings: {} ({} labels)", path.display(), result.registry.len());
    }
    eprintln!("{}", summary_table(result));
}

/// One row per applied step plus a total row.
pub fn summary_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Step"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Dropped"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    for (index, report) in result.reports.iter().enumerate() {
        table.add_row(vec![
            dim_cell(index + 1),
            step_cell(&report.step),
            Cell::new(report.rows_in),
            Cell::new(report.rows_out),
            count_cell(report.dropped(), Color::Yellow),
        ]);
    }
    let rows_written = result.dataset.row_count();
    table.add_row(vec![
        dim_cell("-"),
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.rows_read).add_attribute(Attribute::Bold),
        Cell::new(rows_written).add_attribute(Attribute::Bold),
        count_cell(result.rows_read.saturating_sub(rows_written), Color::Yellow)
            .add_attribute(Attribute::Bold),
    ]);
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn step_cell(step: &str) -> Cell {
    Cell::new(step).fg(Color::Blue)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
