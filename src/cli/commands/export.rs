use crate::cli::parser::{Cli, Commands, ExportCmd, ExportOut};
use crate::cli::session::Session;
use crate::config::Config;
use crate::core::policy::require;
use crate::errors::{AppError, AppResult};
use crate::export::ExportLogic;
use crate::export::logic::ExportTarget;

fn target(out: &ExportOut) -> ExportTarget<'_> {
    ExportTarget {
        format: out.format,
        file: &out.file,
        force: out.force,
    }
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Export { what } = &cli.command {
        let s = Session::open(cli, cfg)?;
        let conn = &s.pool.conn;

        match what {
            ExportCmd::Events { out, range } => {
                // crew members only see their own events
                let only = (!s.actor.is_privileged()).then_some(s.actor.staff_id);
                ExportLogic::events(conn, &target(out), range.as_deref(), only)?;
            }

            ExportCmd::Checklist { event, out } => {
                let allowed = s.policy.can_view_event(conn, &s.actor, *event)?;
                require(allowed, &s.actor, "export this checklist")?;
                ExportLogic::checklist(conn, &target(out), *event)?;
            }

            ExportCmd::Hours { out, staff } => {
                let filter = if s.actor.is_privileged() {
                    *staff
                } else {
                    if staff.is_some_and(|id| id != s.actor.staff_id) {
                        return Err(AppError::Policy("staff can only export their own hours".into()));
                    }
                    Some(s.actor.staff_id)
                };
                ExportLogic::hours(conn, &target(out), filter)?;
            }
        }
    }

    Ok(())
}
