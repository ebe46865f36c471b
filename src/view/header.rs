use std::io::{self, Write};

use crate::model::{HostInfo, Snapshot, ViewState};
use super::shared::{format_duration, write_line, Highlight};

pub fn header_text(host: &HostInfo, snapshot: &Snapshot, view: &ViewState) -> String {
    let (one, five, fifteen) = host.load_avg;
    let arrow = if view.sort_descending() { "▼" } else { "▲" };
    let mut text = format!(
        " dockpot - {} | {} containers, {} selected | sort: {} {}",
        if host.time.is_empty() { "..." } else { &host.time },
        snapshot.len(),
        snapshot.selected_count(),
        view.sort_key,
        arrow,
    );
    if view.show_all_processes {
        text.push_str(" | all processes");
    }
    // Host figures go last so narrow terminals cut them first.
    text.push_str(&format!(
        " | up {} | load {:.2} {:.2} {:.2}",
        format_duration(host.uptime_secs),
        one,
        five,
        fifteen
    ));
    text
}

pub fn render_header(
    out: &mut impl Write,
    host: &HostInfo,
    snapshot: &Snapshot,
    view: &ViewState,
) -> io::Result<()> {
    let text = header_text(host, snapshot, view);
    write_line(out, 0, &text, view.width as usize, Highlight::Bold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SortKey;

    #[test]
    fn header_summarises_host_and_sort() {
        let host = HostInfo {
            time: "12:00:00".into(),
            uptime_secs: 3 * 86400 + 4 * 3600,
            load_avg: (0.5, 0.25, 1.0),
        };
        let view = ViewState {
            sort_key: SortKey::Cpu,
            show_all_processes: true,
            ..Default::default()
        };
        let text = header_text(&host, &Snapshot::default(), &view);
        assert!(text.contains("dockpot - 12:00:00"));
        assert!(text.contains("up 3d 4h"));
        assert!(text.contains("load 0.50 0.25 1.00"));
        assert!(text.contains("0 containers, 0 selected"));
        assert!(text.contains("sort: cpu ▼"));
        assert!(text.contains("sort: cpu ▼ | all processes"));
    }
}
