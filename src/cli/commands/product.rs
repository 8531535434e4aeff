use crate::cli::parser::{Cli, Commands, ProductCmd};
use crate::cli::session::Session;
use crate::config::Config;
use crate::core::policy::require;
use crate::core::products::{ProductFields, Products};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Product { action } = &cli.command {
        let mut s = Session::open(cli, cfg)?;

        match action {
            ProductCmd::Add {
                name,
                category,
                unit,
            } => {
                require(s.policy.can_manage_inventory(&s.actor), &s.actor, "manage products")?;
                let fields = ProductFields {
                    name: name.clone(),
                    unit: unit.clone().unwrap_or_else(|| cfg.default_unit.clone()),
                    category: *category,
                };
                let p = Products::create(&mut s.pool, s.notifier.as_ref(), &fields)?;
                success(format!("Product #{} '{}' added ({}).", p.id, p.name, p.category.to_db_str()));
            }

            ProductCmd::Edit {
                id,
                name,
                category,
                unit,
            } => {
                require(s.policy.can_manage_inventory(&s.actor), &s.actor, "manage products")?;
                let current = Products::get(&s.pool.conn, *id)?;
                let fields = ProductFields {
                    name: name.clone().unwrap_or(current.name),
                    unit: unit.clone().unwrap_or(current.unit),
                    category: category.unwrap_or(current.category),
                };
                let p = Products::update(&mut s.pool, s.notifier.as_ref(), *id, &fields)?;
                success(format!("Product #{} updated.", p.id));
            }

            ProductCmd::Del { id } => {
                require(s.policy.can_manage_inventory(&s.actor), &s.actor, "manage products")?;
                let p = Products::delete(&mut s.pool, s.notifier.as_ref(), *id)?;
                success(format!("Product #{} '{}' deleted.", p.id, p.name));
            }

            ProductCmd::List => {
                let products = Products::list(&s.pool.conn)?;
                if products.is_empty() {
                    info("No products yet.");
                    return Ok(());
                }

                let mut table = Table::new(vec![
                    Column::right("ID"),
                    Column::left("Name"),
                    Column::left("Category"),
                    Column::left("Unit"),
                ]);
                for p in products {
                    table.add_row(vec![
                        p.id.to_string(),
                        p.name,
                        p.category.to_db_str().to_string(),
                        p.unit,
                    ]);
                }
                table.print();
            }
        }
    }

    Ok(())
}
