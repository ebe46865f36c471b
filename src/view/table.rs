use std::io::{self, Write};

use crate::model::ViewState;
use crate::viewmodel::{header_line, Row};
use super::shared::{write_line, Highlight};

/// First screen row used by table rows (below header and column titles).
const TABLE_TOP: u16 = 2;

const HELP_HINT: &str =
    " q: Quit | ↑/↓: Move | Space: Select | u: Unselect | a/A: Expand | 1-8: Sort | o: Order | s/S/p/P/k/r: Actions | h: Help | i: Info";

pub fn row_highlight(row: &Row, is_active: bool) -> Highlight {
    if is_active {
        Highlight::Reverse
    } else if row.selected {
        Highlight::Selected
    } else if row.is_process() {
        Highlight::Process
    } else {
        Highlight::None
    }
}

pub fn render_table(out: &mut impl Write, rows: &[Row], view: &ViewState) -> io::Result<()> {
    let width = view.width as usize;
    write_line(
        out,
        1,
        &header_line(view.sort_key, view.sort_descending(), width),
        width,
        Highlight::Bold,
    )?;

    if rows.is_empty() {
        write_line(out, TABLE_TOP + 1, "  No containers found.", width, Highlight::None)?;
        write_line(
            out,
            TABLE_TOP + 3,
            "  Make sure the Docker daemon is running and reachable.",
            width,
            Highlight::Dim,
        )?;
        return Ok(());
    }

    let height = view.table_height();
    let cursor = view.cursor;
    for (line, idx) in cursor.window(rows.len(), height).enumerate() {
        let row = &rows[idx];
        let y = TABLE_TOP + line as u16;
        write_line(out, y, &row.text, width, row_highlight(row, idx == cursor.active))?;
    }
    Ok(())
}

pub fn render_footer(
    out: &mut impl Write,
    status_message: Option<&str>,
    view: &ViewState,
) -> io::Result<()> {
    let y = view.height.saturating_sub(1);
    let width = view.width as usize;
    match status_message {
        Some(msg) => write_line(out, y, &format!(" {}", msg), width, Highlight::Selected),
        None => write_line(out, y, HELP_HINT, width, Highlight::Dim),
    }
}
