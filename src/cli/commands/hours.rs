use crate::cli::parser::{Cli, Commands, HoursCmd};
use crate::cli::session::Session;
use crate::config::Config;
use crate::core::notify::{Change, ChangeKind, EntityKind};
use crate::core::policy::{ResetScope, require};
use crate::core::scheduler::Scheduler;
use crate::core::timesheet::Timesheet;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info, success, warning};
use crate::utils::mins2readable;
use crate::utils::table::{Column, Table};

/// Whose clock is being punched: self, or another member for privileged actors.
fn target_staff(s: &Session, staff: Option<i64>) -> AppResult<i64> {
    match staff {
        Some(id) if id != s.actor.staff_id => {
            require(s.actor.is_privileged(), &s.actor, "track time for someone else")?;
            Ok(id)
        }
        _ => Ok(s.actor.staff_id),
    }
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Hours { action } = &cli.command {
        let mut s = Session::open(cli, cfg)?;

        match action {
            HoursCmd::In { event, staff } => {
                let staff_id = target_staff(&s, *staff)?;
                Scheduler::get(&s.pool.conn, *event)?;
                let allowed = s.policy.can_track_time(&s.pool.conn, &s.actor, *event)?;
                require(allowed, &s.actor, "clock in to this event")?;
                let now = Session::now(cli)?;

                let tx = s.pool.transaction()?;
                let entry = Timesheet::clock_in(&tx, *event, staff_id, now)?;
                tx.commit()?;

                s.notifier
                    .notify(&Change::new(EntityKind::Timesheet, entry.id, ChangeKind::Created));
                let start = entry.start.map(|t| t.format("%H:%M").to_string()).unwrap_or_default();
                success(format!("Clocked in to event #{event}; time counts from {start}."));
            }

            HoursCmd::Out { event, staff } => {
                let staff_id = target_staff(&s, *staff)?;
                Scheduler::get(&s.pool.conn, *event)?;
                let allowed = s.policy.can_track_time(&s.pool.conn, &s.actor, *event)?;
                require(allowed, &s.actor, "clock out of this event")?;
                let now = Session::now(cli)?;

                let tx = s.pool.transaction()?;
                let entry = Timesheet::clock_out(&tx, *event, staff_id, now)?;
                tx.commit()?;

                s.notifier
                    .notify(&Change::new(EntityKind::Timesheet, entry.id, ChangeKind::Updated));
                success(format!(
                    "Clocked out of event #{event}: {} credited.",
                    mins2readable(entry.minutes, false, false)
                ));
            }

            HoursCmd::List { staff } => {
                let filter = if s.actor.is_privileged() {
                    *staff
                } else {
                    if staff.is_some_and(|id| id != s.actor.staff_id) {
                        return Err(AppError::Policy("staff can only see their own hours".into()));
                    }
                    Some(s.actor.staff_id)
                };
                if let Some(open) = Timesheet::running_for(&s.pool.conn, s.actor.staff_id)? {
                    info(format!("You are clocked in to event #{}.", open.event_id));
                }
                print_summary(&s, filter)?;
            }

            HoursCmd::Reset { event, all } => {
                let scope = match (event, all) {
                    (Some(_), _) => ResetScope::Event,
                    (None, true) => ResetScope::All,
                    (None, false) => {
                        return Err(AppError::Validation("give --event <ID> or --all".into()));
                    }
                };
                require(s.policy.can_reset_hours(&s.actor, scope), &s.actor, "reset hours")?;

                let tx = s.pool.transaction()?;
                let removed = Timesheet::reset(&tx, *event)?;
                tx.commit()?;

                // id 0 stands for every entry
                let target = event.unwrap_or(0);
                s.notifier
                    .notify(&Change::new(EntityKind::Timesheet, target, ChangeKind::Deleted));
                warning(format!("{removed} timesheet entries removed."));
            }
        }
    }

    Ok(())
}

fn print_summary(s: &Session, staff_filter: Option<i64>) -> AppResult<()> {
    let summary = Timesheet::summary(&s.pool.conn, staff_filter)?;

    if summary.running.is_empty() && summary.per_staff.is_empty() {
        info("No hours recorded.");
        return Ok(());
    }

    if !summary.running.is_empty() {
        header("Clocked in now");
        let mut table = Table::new(vec![
            Column::left("Staff"),
            Column::right("Event"),
            Column::left("Name"),
            Column::left("Since"),
        ]);
        for r in &summary.running {
            table.add_row(vec![
                r.staff_name.clone(),
                format!("#{}", r.event_id),
                r.event_name.clone(),
                r.start.map(|t| t.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_default(),
            ]);
        }
        table.print();
        println!();
    }

    if !summary.per_staff.is_empty() {
        header("Credited hours");
        let mut table = Table::new(vec![
            Column::left("Staff"),
            Column::right("Event"),
            Column::left("Name"),
            Column::left("Date"),
            Column::right("Hours"),
        ]);
        for st in &summary.per_staff {
            for e in &st.events {
                table.add_row(vec![
                    st.staff_name.clone(),
                    format!("#{}", e.event_id),
                    e.event_name.clone(),
                    e.event_date.clone(),
                    mins2readable(e.minutes, false, true),
                ]);
            }
            table.add_row(vec![
                format!("{} total", st.staff_name),
                String::new(),
                String::new(),
                String::new(),
                mins2readable(st.total_minutes, false, true),
            ]);
        }
        table.print();
    }

    Ok(())
}
