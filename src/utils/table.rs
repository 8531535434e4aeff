//! Table rendering utilities for CLI outputs.

use regex::Regex;
use std::sync::OnceLock;
use unicode_width::UnicodeWidthStr;

fn visible_width(s: &str) -> usize {
    static ANSI: OnceLock<Option<Regex>> = OnceLock::new();
    match ANSI.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok()) {
        Some(re) => UnicodeWidthStr::width(re.replace_all(s, "").as_ref()),
        None => UnicodeWidthStr::width(s),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub header: String,
    pub align: Align,
}

impl Column {
    pub fn left(header: &str) -> Self {
        Self { header: header.to_string(), align: Align::Left }
    }

    pub fn right(header: &str) -> Self {
        Self { header: header.to_string(), align: Align::Right }
    }
}

/// Column widths follow the widest visible cell, ANSI codes excluded.
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|cell| visible_width(cell))
                    .chain(std::iter::once(visible_width(&c.header)))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn push_cell(out: &mut String, cell: &str, width: usize, align: Align) {
        let pad = " ".repeat(width.saturating_sub(visible_width(cell)));
        match align {
            Align::Left => {
                out.push_str(cell);
                out.push_str(&pad);
            }
            Align::Right => {
                out.push_str(&pad);
                out.push_str(cell);
            }
        }
        out.push_str("  ");
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        for (col, &w) in self.columns.iter().zip(&widths) {
            Self::push_cell(&mut out, &col.header, w, col.align);
        }
        out.push('\n');

        let total: usize = widths.iter().map(|w| w + 2).sum();
        out.push_str(&"-".repeat(total.saturating_sub(2)));
        out.push('\n');

        for row in &self.rows {
            for (i, (col, &w)) in self.columns.iter().zip(&widths).enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                Self::push_cell(&mut out, cell, w, col.align);
            }
            out.push('\n');
        }

        out
    }

    pub fn print(&self) {
        print!("{}", self.render());
    }
}
