use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};

/// Fit `prefix + field + suffix` into exactly `width` characters, cutting the
/// tail or padding with spaces. Counts chars, not bytes.
pub fn pad(field: &str, width: usize, prefix: &str, suffix: &str) -> String {
    let mut out: String = prefix
        .chars()
        .chain(field.chars())
        .chain(suffix.chars())
        .take(width)
        .collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

/// Human-readable duration, e.g. "45s", "12m", "3h 4m", "2d 5h".
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        format!("{}h {}m", h, m)
    } else {
        let d = secs / 86400;
        let h = (secs % 86400) / 3600;
        format!("{}d {}h", d, h)
    }
}

/// Rendering attribute for one line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Highlight {
    None,
    /// The cursor row.
    Reverse,
    /// A selected container.
    Selected,
    /// A process row.
    Process,
    Bold,
    Dim,
}

/// Write `text` at row `y`, padded to `width` so highlights span the line.
pub fn write_line(
    out: &mut impl Write,
    y: u16,
    text: &str,
    width: usize,
    highlight: Highlight,
) -> io::Result<()> {
    queue!(out, MoveTo(0, y))?;
    match highlight {
        Highlight::None => {}
        Highlight::Reverse => queue!(out, SetAttribute(Attribute::Reverse))?,
        Highlight::Selected => queue!(out, SetForegroundColor(Color::Yellow), SetAttribute(Attribute::Bold))?,
        Highlight::Process => queue!(out, SetForegroundColor(Color::Cyan))?,
        Highlight::Bold => queue!(out, SetAttribute(Attribute::Bold))?,
        Highlight::Dim => queue!(out, SetForegroundColor(Color::DarkGrey))?,
    }
    queue!(out, Print(pad(text, width, "", "")))?;
    if highlight != Highlight::None {
        queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}
