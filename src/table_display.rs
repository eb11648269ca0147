use crate::catalog::CatalogController;
use crate::tasks::cell_renderer::CellAlign;
use crate::tasks::viewer::{TableBody, TableModel};
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use crossterm::style::Stylize;

/// Print the visible catalog cards
pub fn display_catalog(catalog: &CatalogController) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        ["Image", "Title", "Citation", "URL"]
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );

    for card in catalog.visible_cards() {
        table.add_row(vec![
            Cell::new(card.image_path(catalog.image_dir())),
            Cell::new(&card.title).add_attribute(Attribute::Bold),
            Cell::new(card.citation()),
            Cell::new(&card.url),
        ]);
    }

    if catalog.visible_count() == 0 {
        println!("{}", "No papers match the selected filters.".yellow());
    } else {
        println!("{table}");
    }
    println!(
        "\n{}",
        format!("{} of {} papers", catalog.visible_count(), catalog.total_count()).green()
    );
}

/// Print a task table model; long text is wrapped rather than cut
pub fn display_task_table(title: &str, model: &TableModel) {
    println!("{}", title.blue().bold());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        model
            .headers
            .iter()
            .map(|h| Cell::new(&h.label).add_attribute(Attribute::Bold)),
    );

    match &model.body {
        TableBody::Rows(rows) => {
            for cells in rows {
                table.add_row(cells.iter().map(|cell| {
                    let mut out = Cell::new(&cell.text);
                    if cell.align == CellAlign::Center {
                        out = out.set_alignment(CellAlignment::Center);
                    }
                    if cell.emphasis {
                        out = out.add_attribute(Attribute::Bold);
                    }
                    out
                }));
            }
            println!("{table}");
        }
        TableBody::Empty { colspan, message } => {
            // comfy-table has no column spans; the message goes in the first cell
            let mut row = vec![Cell::new(message)];
            row.extend((1..*colspan).map(|_| Cell::new("")));
            table.add_row(row);
            println!("{table}");
        }
    }
}
