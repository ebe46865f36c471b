use std::io::{self, Write};

use crate::model::{ContainerRecord, ViewState};
use super::shared::{pad, write_line, Highlight};

const KEY_BINDINGS: &[(&str, &str)] = &[
    ("q, Ctrl+C", "quit"),
    ("↑ / ↓", "move the cursor"),
    ("Space", "select container and move down"),
    ("u", "unselect all containers"),
    ("a", "expand/collapse processes of the selected containers"),
    ("A", "show/hide processes of every container"),
    ("1 - 8", "sort by name, image, id, command, uptime, status, cpu, ram"),
    ("o", "reverse the sort order"),
    ("s / S", "start / stop"),
    ("p / P", "pause / unpause"),
    ("k / r", "kill / remove"),
    ("h", "toggle this help"),
    ("i", "toggle container details"),
];

pub fn help_lines() -> Vec<String> {
    let mut lines = vec![
        " Key bindings".to_string(),
        String::new(),
    ];
    for (keys, action) in KEY_BINDINGS {
        lines.push(format!("   {}{}", pad(keys, 14, "", ""), action));
    }
    lines.push(String::new());
    lines.push(" Actions apply to the selected containers, or to the one under the cursor.".to_string());
    lines
}

pub fn detail_lines(container: Option<&ContainerRecord>) -> Vec<String> {
    let Some(c) = container else {
        return vec![" No container selected.".to_string()];
    };

    let mut lines = vec![
        format!(" Name:     {}", c.name),
        format!(" Image:    {}", c.image),
        format!(" Id:       {}", c.id()),
        format!(" Status:   {}", c.common.status),
        format!(" Uptime:   {}", c.common.uptime),
        format!(" Command:  {}", c.common.command),
        format!(" CPU %:    {}", c.common.cpu),
        format!(" MEM %:    {}", c.common.ram),
        String::new(),
        format!(" Processes ({})", c.processes.len()),
    ];
    for p in &c.processes {
        lines.push(format!(
            // The command runs to the screen edge; `write_line` cuts it there.
            "   {} {} {} {} {}",
            pad(&p.common.id, 8, "", ""),
            pad(&p.common.uptime, 12, "", ""),
            pad(&p.common.cpu, 6, "", ""),
            pad(&p.common.ram, 6, "", ""),
            p.common.command,
        ));
    }
    lines
}

fn render_lines(out: &mut impl Write, lines: &[String], view: &ViewState) -> io::Result<()> {
    let width = view.width as usize;
    let last = view.height.saturating_sub(1);
    for (i, line) in lines.iter().enumerate() {
        let y = 2 + i as u16;
        if y >= last {
            break;
        }
        let highlight = if i == 0 { Highlight::Bold } else { Highlight::None };
        write_line(out, y, line, width, highlight)?;
    }
    Ok(())
}

pub fn render_help(out: &mut impl Write, view: &ViewState) -> io::Result<()> {
    render_lines(out, &help_lines(), view)
}

pub fn render_detail(
    out: &mut impl Write,
    container: Option<&ContainerRecord>,
    view: &ViewState,
) -> io::Result<()> {
    render_lines(out, &detail_lines(container), view)
}
