//! Compact output rendering helpers for the CLI surface.
//!
//! Mutations print machine-readable JSON envelopes; the read commands here
//! render short human-facing lines instead.

use colored::Colorize;

/// Collapse whitespace and bound length for terminal display.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// Render leaderboard rows as `rank. name (points)` lines, podium colored.
pub fn leaderboard_lines(rows: &[(i64, String, i64)]) -> String {
    let mut out = String::new();
    for (i, (member_id, name, points)) in rows.iter().enumerate() {
        let label = if name.is_empty() {
            format!("member {}", member_id)
        } else {
            compact_line(name, 32)
        };
        let line = format!("{}. {} ({} points)", i + 1, label, points);
        let line = match i {
            0 => line.yellow().bold().to_string(),
            1 | 2 => line.white().bold().to_string(),
            _ => line,
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}
