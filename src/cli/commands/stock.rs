use crate::cli::parser::{Cli, Commands, StockCmd};
use crate::cli::session::Session;
use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::core::policy::require;
use crate::errors::AppResult;
use crate::models::movement::MovementKind;
use crate::ui::messages::{info, success};
use crate::utils::colors::{RESET, color_for_on_hand};
use crate::utils::table::{Column, Table};

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Stock { action } = &cli.command {
        let mut s = Session::open(cli, cfg)?;

        match action {
            StockCmd::In { product, quantity } => {
                require(s.policy.can_manage_inventory(&s.actor), &s.actor, "receive stock")?;
                let tx = s.pool.transaction()?;
                Ledger::record(&tx, *product, MovementKind::StockIn, *quantity, None)?;
                tx.commit()?;
                let on_hand = Ledger::on_hand(&s.pool.conn, *product)?;
                success(format!("Stock-in of {quantity} recorded; on hand: {on_hand}."));
            }

            StockCmd::Out {
                product,
                quantity,
                event,
            } => {
                require(s.policy.can_manage_inventory(&s.actor), &s.actor, "take stock out")?;
                let tx = s.pool.transaction()?;
                Ledger::record(&tx, *product, MovementKind::StockOut, *quantity, *event)?;
                tx.commit()?;
                let on_hand = Ledger::on_hand(&s.pool.conn, *product)?;
                success(format!("Stock-out of {quantity} recorded; on hand: {on_hand}."));
            }

            StockCmd::Status => {
                let levels = Ledger::stock_levels(&s.pool.conn)?;
                if levels.is_empty() {
                    info("No products yet.");
                    return Ok(());
                }

                let mut table = Table::new(vec![
                    Column::right("ID"),
                    Column::left("Product"),
                    Column::left("Category"),
                    Column::right("On hand"),
                    Column::left("Unit"),
                ]);
                for l in levels {
                    table.add_row(vec![
                        l.product.id.to_string(),
                        l.product.name,
                        l.product.category.to_db_str().to_string(),
                        format!("{}{}{RESET}", color_for_on_hand(l.on_hand), l.on_hand),
                        l.product.unit,
                    ]);
                }
                table.print();
            }

            StockCmd::History { product } => {
                let movements = Ledger::movements(&s.pool.conn, *product)?;
                if movements.is_empty() {
                    info("No stock movements.");
                    return Ok(());
                }

                let mut table = Table::new(vec![
                    Column::right("ID"),
                    Column::left("When"),
                    Column::right("Product"),
                    Column::left("Kind"),
                    Column::right("Qty"),
                    Column::left("Event"),
                ]);
                for m in movements {
                    table.add_row(vec![
                        m.id.to_string(),
                        m.created_at.clone(),
                        m.product_id.to_string(),
                        m.kind.to_db_str().to_string(),
                        m.signed_quantity().to_string(),
                        m.event_id.map(|e| format!("#{e}")).unwrap_or_else(|| "--".into()),
                    ]);
                }
                table.print();
            }
        }
    }

    Ok(())
}
