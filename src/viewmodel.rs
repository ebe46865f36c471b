//! Sorting and flattening of a snapshot into displayable table rows.

use std::cmp::Ordering;

use crate::model::{Columns, ContainerRecord, Snapshot, SortKey};
use crate::view::pad;

/// Marker column before the name: selection and expansion.
const LEAD_WIDTH: usize = 3;
const NAME_WIDTH: usize = 16;
const ID_WIDTH: usize = 12;
const CPU_WIDTH: usize = 7;
const RAM_WIDTH: usize = 7;
const UPTIME_WIDTH: usize = 10;
const STATUS_WIDTH: usize = 9;
const IMAGE_WIDTH: usize = 18;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Container,
    Process,
}

/// One formatted table line, rebuilt on every redraw.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub text: String,
    pub kind: RowKind,
    /// Only ever true for container rows.
    pub selected: bool,
    /// Id of the container this row belongs to.
    pub container_id: String,
}

impl Row {
    pub fn is_container(&self) -> bool {
        self.kind == RowKind::Container
    }

    pub fn is_process(&self) -> bool {
        self.kind == RowKind::Process
    }
}

/// Natural order for a key: text ascending, metrics largest first.
pub fn compare(key: SortKey, a: &ContainerRecord, b: &ContainerRecord) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Image => a.image.cmp(&b.image),
        SortKey::Id => a.id().cmp(b.id()),
        SortKey::Command => a.common.command.cmp(&b.common.command),
        SortKey::Status => a.common.status.cmp(&b.common.status),
        SortKey::Uptime => b.uptime_secs.cmp(&a.uptime_secs),
        SortKey::Cpu => b.cpu_total.total_cmp(&a.cpu_total),
        SortKey::Ram => b.ram_total.total_cmp(&a.ram_total),
    }
}

/// Stable sort of the containers; `reversed` inverts the natural order while
/// equal keys keep their snapshot order.
pub fn sort_containers(snapshot: &Snapshot, key: SortKey, reversed: bool) -> Vec<&ContainerRecord> {
    let mut sorted: Vec<&ContainerRecord> = snapshot.containers.iter().collect();
    sorted.sort_by(|a, b| {
        let ord = compare(key, a, b);
        if reversed { ord.reverse() } else { ord }
    });
    sorted
}

/// Sorted container rows, each followed by its processes when expanded or
/// when `show_all_processes` is set. Processes keep engine order.
pub fn flatten(
    snapshot: &Snapshot,
    key: SortKey,
    reversed: bool,
    show_all_processes: bool,
    width: usize,
) -> Vec<Row> {
    let mut rows = Vec::new();
    for c in sort_containers(snapshot, key, reversed) {
        let open = show_all_processes || c.expanded;
        let lead = format!(
            "{}{} ",
            if c.selected { '*' } else { ' ' },
            if open { '-' } else { '+' }
        );
        rows.push(Row {
            text: format_line(c, &lead, "", width),
            kind: RowKind::Container,
            selected: c.selected,
            container_id: c.id().to_string(),
        });

        if open {
            for p in &c.processes {
                rows.push(Row {
                    text: format_line(p, "", " └ ", width),
                    kind: RowKind::Process,
                    selected: false,
                    container_id: c.id().to_string(),
                });
            }
        }
    }
    rows
}

/// Format one record into the table layout. `name_prefix` decorates the name
/// column (process rows use it for the tree glyph).
pub fn format_line<C: Columns + ?Sized>(item: &C, lead: &str, name_prefix: &str, width: usize) -> String {
    let common = item.common();
    compose(
        [
            pad(lead, LEAD_WIDTH, "", ""),
            pad(item.name(), NAME_WIDTH, name_prefix, ""),
            pad(&common.id, ID_WIDTH, "", ""),
            pad(&common.cpu, CPU_WIDTH, "", ""),
            pad(&common.ram, RAM_WIDTH, "", ""),
            pad(&common.uptime, UPTIME_WIDTH, "", ""),
            pad(&common.status, STATUS_WIDTH, "", ""),
            pad(item.image(), IMAGE_WIDTH, "", ""),
        ],
        &common.command,
        width,
    )
}

/// Column titles, with a direction arrow on the active sort column.
pub fn header_line(key: SortKey, descending: bool, width: usize) -> String {
    let arrow = if descending { "▼" } else { "▲" };
    let label = |k: SortKey| {
        if k == key {
            format!("{} {arrow}", k.title())
        } else {
            k.title().to_string()
        }
    };
    let title = |k: SortKey, w: usize| pad(&label(k), w, "", "");
    compose(
        [
            pad("", LEAD_WIDTH, "", ""),
            title(SortKey::Name, NAME_WIDTH),
            title(SortKey::Id, ID_WIDTH),
            title(SortKey::Cpu, CPU_WIDTH),
            title(SortKey::Ram, RAM_WIDTH),
            title(SortKey::Uptime, UPTIME_WIDTH),
            title(SortKey::Status, STATUS_WIDTH),
            title(SortKey::Image, IMAGE_WIDTH),
        ],
        &label(SortKey::Command),
        width,
    )
}

/// Join fixed cells with single spaces; the command fills what is left.
fn compose(cells: [String; 8], command: &str, width: usize) -> String {
    let mut line = cells[0].clone();
    line.push_str(&cells[1..].join(" "));
    line.push(' ');
    let used = line.chars().count();
    let rest = width.saturating_sub(used);
    line.push_str(&pad(command, rest, "", ""));
    pad(line.trim_end(), width, "", "")
}
