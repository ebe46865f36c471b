use std::io::{self, Write};

use crate::engine::Engine;
use crate::model::Mode;
use crate::view::Presenter;

use super::App;

impl<E: Engine + Clone + 'static> App<E> {
    /// Draw the current frame. Call [`App::layout`] first.
    pub fn draw(&self, out: &mut impl Write) -> io::Result<()> {
        Presenter::clear(out)?;
        if Presenter::render_size_guard(out, &self.view)? {
            return out.flush();
        }

        Presenter::render_header(out, &self.host, &self.snapshot, &self.view)?;
        match self.view.mode {
            Mode::Table => Presenter::render_table(out, &self.rows, &self.view)?,
            Mode::Help => Presenter::render_help(out, &self.view)?,
            Mode::Detail => Presenter::render_detail(out, self.cursor_container(), &self.view)?,
        }
        Presenter::render_footer(out, self.status_message.as_deref(), &self.view)?;
        out.flush()
    }
}
