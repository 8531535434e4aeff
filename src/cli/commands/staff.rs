use crate::cli::parser::{Cli, Commands, StaffCmd};
use crate::cli::session::Session;
use crate::config::Config;
use crate::core::policy::require;
use crate::core::staff::StaffLogic;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET};
use crate::utils::table::{Column, Table};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Staff { action } = &cli.command {
        let mut s = Session::open(cli, cfg)?;

        if let StaffCmd::List = action {
            require(s.actor.is_privileged(), &s.actor, "list staff")?;
        } else {
            require(
                s.policy.can_manage_staff_credentials(&s.actor),
                &s.actor,
                "manage staff accounts",
            )?;
        }

        match action {
            StaffCmd::Add { login, name, role } => {
                let st = StaffLogic::add(&mut s.pool, login, name.as_deref(), *role)?;
                success(format!("Staff #{} '{}' added as {}.", st.id, st.login, st.role.to_db_str()));
            }

            StaffCmd::Role { id, role } => {
                let st = StaffLogic::set_role(&mut s.pool, *id, *role)?;
                success(format!("'{}' is now {}.", st.login, st.role.to_db_str()));
            }

            StaffCmd::Activate { id } => {
                let st = StaffLogic::set_active(&mut s.pool, *id, true)?;
                success(format!("'{}' activated.", st.login));
            }

            StaffCmd::Deactivate { id } => {
                if *id == s.actor.staff_id {
                    return Err(AppError::Policy("you cannot deactivate yourself".into()));
                }
                let st = StaffLogic::set_active(&mut s.pool, *id, false)?;
                success(format!("'{}' deactivated.", st.login));
            }

            StaffCmd::Grant { id, revoke } => {
                let st = StaffLogic::set_inventory_grant(&mut s.pool, *id, !*revoke)?;
                if st.inventory_grant {
                    success(format!("'{}' may now manage inventory.", st.login));
                } else {
                    success(format!("Inventory permission of '{}' revoked.", st.login));
                }
            }

            StaffCmd::List => {
                let staff = StaffLogic::list(&s.pool.conn)?;
                if staff.is_empty() {
                    info("No staff.");
                    return Ok(());
                }

                let mut table = Table::new(vec![
                    Column::right("ID"),
                    Column::left("Login"),
                    Column::left("Name"),
                    Column::left("Role"),
                    Column::left("Inventory"),
                ]);
                for st in staff {
                    let login = if st.active {
                        st.login.clone()
                    } else {
                        format!("{GREY}{} (inactive){RESET}", st.login)
                    };
                    table.add_row(vec![
                        st.id.to_string(),
                        login,
                        st.display_name.clone().unwrap_or_default(),
                        st.role.to_db_str().to_string(),
                        if st.inventory_grant { "granted" } else { "" }.to_string(),
                    ]);
                }
                table.print();
            }
        }
    }

    Ok(())
}
