/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Stock color: negative (over-booked) → red, zero → grey, otherwise reset.
pub fn color_for_on_hand(value: i64) -> &'static str {
    if value < 0 {
        RED
    } else if value == 0 {
        GREY
    } else {
        RESET
    }
}

/// Grey out empty cells and placeholders.
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "--" || v == "--:--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

/// ✔ in green / ✘ in grey for checklist flags.
pub fn colorize_flag(flag: bool) -> String {
    if flag {
        format!("{GREEN}✔{RESET}")
    } else {
        format!("{GREY}✘{RESET}")
    }
}
