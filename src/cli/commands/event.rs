use crate::cli::parser::{Cli, Commands, EventArgs, EventCmd};
use crate::cli::session::Session;
use crate::config::Config;
use crate::core::assignment::Assignment;
use crate::core::binding::Binding;
use crate::core::ledger::Ledger;
use crate::core::notify::{Change, ChangeKind, EntityKind};
use crate::core::policy::require;
use crate::core::scheduler::{EventFields, Scheduler};
use crate::core::timesheet::Timesheet;
use crate::errors::{AppError, AppResult};
use crate::export::range::parse_range;
use crate::models::event::Event;
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{colorize_flag, colorize_optional};
use crate::utils::date::parse_date;
use crate::utils::formatting::bold;
use crate::utils::table::{Column, Table};
use crate::utils::time::parse_optional_time;
use std::collections::BTreeMap;

/// Later `--product` flags for the same id win.
fn product_map(pairs: &[(i64, i64)]) -> BTreeMap<i64, i64> {
    pairs.iter().copied().collect()
}

fn required(value: &Option<String>, what: &str) -> AppResult<String> {
    value
        .clone()
        .ok_or_else(|| AppError::Validation(format!("--{what} is required")))
}

fn fields_for_create(args: &EventArgs) -> AppResult<EventFields> {
    Ok(EventFields {
        name: required(&args.name, "name")?,
        date: parse_date(&required(&args.date, "date")?)?,
        start_time: parse_optional_time(args.start.as_deref())?,
        end_time: parse_optional_time(args.end.as_deref())?,
        location: required(&args.location, "location")?,
        note: args.note.clone().unwrap_or_default(),
    })
}

/// Given flags override the stored values.
fn fields_for_edit(args: &EventArgs, current: &Event) -> AppResult<EventFields> {
    Ok(EventFields {
        name: args.name.clone().unwrap_or_else(|| current.name.clone()),
        date: match &args.date {
            Some(d) => parse_date(d)?,
            None => current.date,
        },
        start_time: match &args.start {
            Some(_) => parse_optional_time(args.start.as_deref())?,
            None => current.start_time,
        },
        end_time: match &args.end {
            Some(_) => parse_optional_time(args.end.as_deref())?,
            None => current.end_time,
        },
        location: args.location.clone().unwrap_or_else(|| current.location.clone()),
        note: args.note.clone().unwrap_or_else(|| current.note.clone()),
    })
}

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    if let Commands::Event { action } = &cli.command {
        let mut s = Session::open(cli, cfg)?;

        match action {
            EventCmd::Create(args) => {
                require(s.policy.can_manage_events(&s.actor), &s.actor, "create events")?;
                let fields = fields_for_create(args)?;
                let event = Scheduler::create(
                    &mut s.pool,
                    s.notifier.as_ref(),
                    &fields,
                    &product_map(&args.products),
                    &args.staff,
                )?;
                success(format!("Event #{} '{}' created for {}.", event.id, event.name, event.date_str()));
            }

            EventCmd::Edit {
                id,
                fields: args,
                no_products,
                no_staff,
            } => {
                require(s.policy.can_manage_events(&s.actor), &s.actor, "edit events")?;
                let current = Scheduler::get(&s.pool.conn, *id)?;
                let fields = fields_for_edit(args, &current)?;

                let products = if *no_products {
                    BTreeMap::new()
                } else if args.products.is_empty() {
                    Binding::bindings(&s.pool.conn, *id)?
                        .iter()
                        .map(|b| (b.binding.product_id, b.binding.quantity))
                        .collect()
                } else {
                    product_map(&args.products)
                };

                let crew: Vec<i64> = if *no_staff {
                    Vec::new()
                } else if args.staff.is_empty() {
                    Assignment::assigned_staff(&s.pool.conn, *id)?
                        .iter()
                        .map(|st| st.id)
                        .collect()
                } else {
                    args.staff.clone()
                };

                let event =
                    Scheduler::update(&mut s.pool, s.notifier.as_ref(), *id, &fields, &products, &crew)?;
                success(format!("Event #{} updated.", event.id));
            }

            EventCmd::Del { id } => {
                require(s.policy.can_manage_events(&s.actor), &s.actor, "delete events")?;
                let event = Scheduler::delete(&mut s.pool, s.notifier.as_ref(), *id)?;
                success(format!("Event #{} '{}' deleted; equipment returned to stock.", event.id, event.name));
            }

            EventCmd::List { mine, today, range } => {
                let conn = &s.pool.conn;
                let bounds = range.as_deref().map(parse_range).transpose()?;

                let events = if *today {
                    Scheduler::list_for_day(conn, s.actor.staff_id, Session::now(cli)?.date())?
                } else if *mine || !s.actor.is_privileged() {
                    Scheduler::list_for_staff(conn, s.actor.staff_id)?
                } else {
                    Scheduler::list(conn, bounds)?
                };

                let events: Vec<Event> = events
                    .into_iter()
                    .filter(|e| bounds.is_none_or(|(from, to)| e.date >= from && e.date <= to))
                    .collect();

                if events.is_empty() {
                    info("No events.");
                    return Ok(());
                }
                print_events(&events);
            }

            EventCmd::Show { id } => {
                let conn = &s.pool.conn;
                let allowed = s.policy.can_view_event(conn, &s.actor, *id)?;
                require(allowed, &s.actor, "view this event")?;
                print_event_detail(conn, &Scheduler::get(conn, *id)?)?;
            }

            EventCmd::Check {
                id,
                product,
                loaded,
                done,
            } => {
                let allowed = s.policy.can_view_event(&s.pool.conn, &s.actor, *id)?;
                require(allowed, &s.actor, "update this checklist")?;
                if loaded.is_none() && done.is_none() {
                    return Err(AppError::Validation("give --loaded and/or --done".into()));
                }

                let tx = s.pool.transaction()?;
                let b = Binding::set_checklist(&tx, *id, *product, *loaded, *done)?;
                tx.commit()?;

                s.notifier
                    .notify(&Change::new(EntityKind::Binding, b.id, ChangeKind::Updated));
                success(format!(
                    "Product #{} on event #{}: loaded={} done={}",
                    product, id, b.loaded, b.done
                ));
            }
        }
    }

    Ok(())
}

fn print_events(events: &[Event]) {
    let mut table = Table::new(vec![
        Column::right("ID"),
        Column::left("Date"),
        Column::left("Time"),
        Column::left("Name"),
        Column::left("Location"),
    ]);
    for e in events {
        table.add_row(vec![
            e.id.to_string(),
            e.date_str(),
            colorize_optional(&e.time_window()),
            e.name.clone(),
            e.location.clone(),
        ]);
    }
    table.print();
}

fn print_event_detail(conn: &rusqlite::Connection, e: &Event) -> AppResult<()> {
    header(format!("Event #{}: {}", e.id, e.name));
    println!("{} {}  {}", bold("When:"), e.date_str(), e.time_window());
    println!("{} {}", bold("Where:"), e.location);
    if !e.note.is_empty() {
        println!("{} {}", bold("Note:"), e.note);
    }

    let crew = Assignment::assigned_staff(conn, e.id)?;
    let names: Vec<&str> = crew.iter().map(|st| st.name()).collect();
    println!(
        "{} {}",
        bold("Crew:"),
        if names.is_empty() { "--".to_string() } else { names.join(", ") }
    );

    let entries = Timesheet::entries_for_event(conn, e.id)?;
    let open = entries.iter().filter(|t| t.is_open()).count();
    println!("{} {} entries, {open} running", bold("Timesheet:"), entries.len());
    println!("{} {}", bold("Units out:"), -Ledger::event_net(conn, e.id)?);
    println!();

    let bound = Binding::bindings(conn, e.id)?;
    if bound.is_empty() {
        info("No equipment bound.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::right("ID"),
        Column::left("Product"),
        Column::left("Category"),
        Column::right("Qty"),
        Column::right("On hand"),
        Column::left("Loaded"),
        Column::left("Done"),
    ]);
    for b in bound {
        let on_hand = Ledger::on_hand(conn, b.binding.product_id)?;
        table.add_row(vec![
            b.binding.product_id.to_string(),
            b.product_name,
            b.category.to_db_str().to_string(),
            format!("{} {}", b.binding.quantity, b.unit),
            on_hand.to_string(),
            colorize_flag(b.binding.loaded),
            colorize_flag(b.binding.done),
        ]);
    }
    table.print();
    Ok(())
}
