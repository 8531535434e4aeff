use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;

const OP_WIDTH: usize = 60;

fn strip_ansi(re: &Regex, s: &str) -> String {
    re.replace_all(s, "").into_owned()
}

fn color_for_operation(op: &str) -> Colour {
    match op {
        "event_create" | "product_create" | "staff_add" | "stock_in" => Colour::Green,
        "event_delete" | "product_delete" | "hours_reset" => Colour::Red,
        "event_update" | "product_update" => Colour::Yellow,
        "bind" | "unbind" | "checklist" | "stock_out" => Colour::Cyan,
        "clock_in" | "clock_out" => Colour::RGB(255, 153, 51),
        "migration_applied" => Colour::Purple,
        "backup" | "init" => Colour::Blue,
        other if other.starts_with("staff_") => Colour::Yellow,
        _ => Colour::White,
    }
}

#[derive(Debug)]
pub struct LogLine {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

pub struct LogLogic;

impl LogLogic {
    /// Most recent `limit` audit rows (all when `None`), oldest first.
    pub fn lines(pool: &DbPool, limit: Option<usize>) -> AppResult<Vec<LogLine>> {
        let limit = limit.map(|n| n as i64).unwrap_or(-1);
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, COALESCE(target, ''), message FROM (
                SELECT * FROM log ORDER BY id DESC LIMIT ?1
             ) ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([limit], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%F %T").to_string())
                .unwrap_or(raw_date);

            Ok(LogLine {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get(3)?,
                message: row.get(4)?,
            })
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn print_log(pool: &DbPool, limit: Option<usize>) -> AppResult<()> {
        let entries = Self::lines(pool, limit)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let ansi = Regex::new(r"\x1B\[[0-9;]*[mK]")
            .map_err(|e| crate::errors::AppError::Config(e.to_string()))?;

        let op_target = |l: &LogLine| {
            if l.target.is_empty() {
                l.operation.clone()
            } else {
                format!("{} ({})", l.operation, l.target)
            }
        };

        let op_w = entries
            .iter()
            .map(|l| op_target(l).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH);
        let id_w = entries.iter().map(|l| l.id.to_string().len()).max().unwrap_or(1);
        let date_w = entries.iter().map(|l| l.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for l in &entries {
            let color = color_for_operation(&l.operation);

            let mut visible = op_target(l);
            if visible.chars().count() > OP_WIDTH {
                visible = visible.chars().take(OP_WIDTH - 3).collect::<String>() + "...";
            }

            // only the operation word is colored
            let painted = match visible.split_once(' ') {
                Some((op, rest)) => format!("{} {}", color.paint(op), rest),
                None => color.paint(visible.as_str()).to_string(),
            };

            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&ansi, &painted).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                l.id, l.date, painted, padding, l.message,
            );
        }

        Ok(())
    }
}
