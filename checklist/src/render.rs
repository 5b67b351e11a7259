//! Plain-text rendering of the collection for the terminal.

use std::fmt::Write;

use serde::Serialize;

use crate::core::list::{remaining_count, total_count};
use crate::core::types::Item;

pub const EMPTY_MESSAGE: &str = "Nothing added yet. Add an item to get started.";

/// Counts shown in the header and by `stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub remaining: usize,
}

impl Counts {
    pub fn of(items: &[Item]) -> Self {
        Self {
            total: total_count(items),
            remaining: remaining_count(items),
        }
    }
}

pub fn render_header(counts: Counts) -> String {
    format!("Total: {} • Remaining: {}", counts.total, counts.remaining)
}

/// One row: position, checkbox, title, optional `#category`, short id.
pub fn render_item(position: usize, item: &Item) -> String {
    let mark = if item.done { 'x' } else { ' ' };
    let mut row = format!("{position:>3}. [{mark}] {}", item.title);
    if let Some(category) = &item.category {
        let _ = write!(row, " #{category}");
    }
    let _ = write!(row, "  ({})", item.id.short());
    row
}

/// Header, blank line, then rows (or the empty message).
pub fn render_list(items: &[Item]) -> String {
    let mut out = render_header(Counts::of(items));
    out.push_str("\n\n");
    if items.is_empty() {
        out.push_str(EMPTY_MESSAGE);
        out.push('\n');
        return out;
    }
    for (idx, item) in items.iter().enumerate() {
        out.push_str(&render_item(idx + 1, item));
        out.push('\n');
    }
    out
}
