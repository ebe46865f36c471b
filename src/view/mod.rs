mod shared;
mod header;
mod table;
mod overlay;

use std::io::{self, Write};

use crossterm::{cursor::MoveTo, queue, terminal::{Clear, ClearType}};

use crate::model::{ContainerRecord, HostInfo, Snapshot, ViewState};
use crate::viewmodel::Row;

pub use shared::{format_duration, pad, write_line, Highlight};

/// Minimum terminal dimensions for usable rendering.
pub const MIN_COLS: u16 = 60;
pub const MIN_ROWS: u16 = 8;

/// Draw calls against the terminal. Everything is queued on `out`; callers flush.
pub struct Presenter;

impl Presenter {
    pub fn clear(out: &mut impl Write) -> io::Result<()> {
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))
    }

    /// If the terminal is too small, draw a notice and return `true` (meaning
    /// "skip normal rendering").
    pub fn render_size_guard(out: &mut impl Write, view: &ViewState) -> io::Result<bool> {
        if view.width >= MIN_COLS && view.height >= MIN_ROWS {
            return Ok(false);
        }
        let msg = format!(
            "Terminal too small ({}x{}). Resize to at least {}x{}.",
            view.width, view.height, MIN_COLS, MIN_ROWS
        );
        let y = view.height / 2;
        write_line(out, y, &msg, view.width as usize, Highlight::Dim)?;
        Ok(true)
    }

    pub fn render_header(
        out: &mut impl Write,
        host: &HostInfo,
        snapshot: &Snapshot,
        view: &ViewState,
    ) -> io::Result<()> {
        header::render_header(out, host, snapshot, view)
    }

    pub fn render_table(out: &mut impl Write, rows: &[Row], view: &ViewState) -> io::Result<()> {
        table::render_table(out, rows, view)
    }

    pub fn render_footer(
        out: &mut impl Write,
        status_message: Option<&str>,
        view: &ViewState,
    ) -> io::Result<()> {
        table::render_footer(out, status_message, view)
    }

    pub fn render_help(out: &mut impl Write, view: &ViewState) -> io::Result<()> {
        overlay::render_help(out, view)
    }

    pub fn render_detail(
        out: &mut impl Write,
        container: Option<&ContainerRecord>,
        view: &ViewState,
    ) -> io::Result<()> {
        overlay::render_detail(out, container, view)
    }
}
