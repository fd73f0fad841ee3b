//! TUI widgets for quake-glance.

pub mod chart;
pub mod header;
pub mod sidebar;
pub mod status;
pub mod table;

/// Flattens a rendered buffer to text, one line per row.
#[cfg(test)]
pub(crate) fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
