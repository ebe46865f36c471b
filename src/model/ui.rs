use std::fmt;
use std::str::FromStr;

use crate::cursor::Cursor;

/// Rows taken by the header, column titles and footer.
pub const CHROME_ROWS: usize = 3;

/// Which screen the dashboard is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Table,
    Help,
    Detail,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    Image,
    Id,
    Command,
    Uptime,
    Status,
    Cpu,
    Ram,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::Name,
        SortKey::Image,
        SortKey::Id,
        SortKey::Command,
        SortKey::Uptime,
        SortKey::Status,
        SortKey::Cpu,
        SortKey::Ram,
    ];

    /// Map the digit keys `1`..`8` to a sort key.
    pub fn from_digit(c: char) -> Option<SortKey> {
        let idx = c.to_digit(10)? as usize;
        idx.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Metrics list the largest value first unless reversed.
    pub fn largest_first(self) -> bool {
        matches!(self, SortKey::Uptime | SortKey::Cpu | SortKey::Ram)
    }

    pub fn title(self) -> &'static str {
        match self {
            SortKey::Name => "NAME",
            SortKey::Image => "IMAGE",
            SortKey::Id => "ID",
            SortKey::Command => "COMMAND",
            SortKey::Uptime => "UPTIME",
            SortKey::Status => "STATUS",
            SortKey::Cpu => "CPU %",
            SortKey::Ram => "MEM %",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Name => "name",
            SortKey::Image => "image",
            SortKey::Id => "id",
            SortKey::Command => "command",
            SortKey::Uptime => "uptime",
            SortKey::Status => "status",
            SortKey::Cpu => "cpu",
            SortKey::Ram => "ram",
        };
        f.write_str(s)
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown sort key '{s}' (expected name, image, id, command, uptime, status, cpu or ram)")
            })
    }
}

/// Session-lifetime UI state, mutated only by the event loop.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    pub mode: Mode,
    pub sort_key: SortKey,
    /// Inverts the key's natural order.
    pub sort_reversed: bool,
    /// Overrides every container's `expanded` flag.
    pub show_all_processes: bool,
    pub cursor: Cursor,
    pub width: u16,
    pub height: u16,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            mode: Mode::Table,
            sort_key: SortKey::Name,
            sort_reversed: false,
            show_all_processes: false,
            cursor: Cursor::default(),
            width: 80,
            height: 24,
        }
    }
}

impl ViewState {
    /// Number of table rows that fit between the header and footer.
    pub fn table_height(&self) -> usize {
        (self.height as usize).saturating_sub(CHROME_ROWS)
    }

    /// True when the active sort shows the largest value first.
    pub fn sort_descending(&self) -> bool {
        self.sort_key.largest_first() != self.sort_reversed
    }

    pub fn toggle_mode(&mut self, target: Mode) {
        self.mode = if self.mode == target { Mode::Table } else { target };
    }
}
