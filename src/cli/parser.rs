use crate::export::ExportFormat;
use crate::models::product::Category;
use crate::models::staff::Role;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for gigstock
/// CLI application to schedule gigs, track rental stock and staff hours with SQLite
#[derive(Parser)]
#[command(
    name = "gigstock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Event logistics for an audio rental: stock ledger, gig scheduling, crew and hours",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Act as this staff login (defaults to `actor` from the config)
    #[arg(global = true, long = "as", value_name = "LOGIN")]
    pub as_login: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Pretend the current time is "YYYY-MM-DD HH:MM"
    #[arg(global = true, long = "at", hide = true)]
    pub at: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "tail", value_name = "N", help = "Only the last N rows")]
        tail: Option<usize>,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,
    },

    /// Manage the product catalogue
    Product {
        #[command(subcommand)]
        action: ProductCmd,
    },

    /// Record stock movements and inspect on-hand quantities
    Stock {
        #[command(subcommand)]
        action: StockCmd,
    },

    /// Schedule events with their equipment and crew
    Event {
        #[command(subcommand)]
        action: EventCmd,
    },

    /// Manage staff accounts (admin only)
    Staff {
        #[command(subcommand)]
        action: StaffCmd,
    },

    /// Clock in / out of events and review credited hours
    Hours {
        #[command(subcommand)]
        action: HoursCmd,
    },

    /// Export events, loading checklists or hours
    Export {
        #[command(subcommand)]
        what: ExportCmd,
    },
}

#[derive(Subcommand)]
pub enum ProductCmd {
    /// Add a product to the catalogue
    Add {
        name: String,

        #[arg(long, value_parser = parse_category, help = "cabling, monitors, lighting, speakers or tools")]
        category: Category,

        #[arg(long, help = "Unit label (default from config)")]
        unit: Option<String>,
    },

    /// Change name, unit or category of a product
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,

        #[arg(long)]
        unit: Option<String>,
    },

    /// Delete a product that was never used
    Del { id: i64 },

    /// List the catalogue
    List,
}

#[derive(Subcommand)]
pub enum StockCmd {
    /// Receive stock (delivery, return from repair)
    In { product: i64, quantity: i64 },

    /// Take stock out (loss, write-off, manual loan)
    Out {
        product: i64,
        quantity: i64,

        #[arg(long, help = "Tag the movement with an event")]
        event: Option<i64>,
    },

    /// On-hand quantity of every product
    Status,

    /// Ledger movements, newest first
    History {
        #[arg(long)]
        product: Option<i64>,
    },
}

/// Fields shared by `event create` and `event edit`.
#[derive(Args, Clone, Default)]
pub struct EventArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,

    #[arg(long, value_name = "HH:MM")]
    pub start: Option<String>,

    #[arg(long, value_name = "HH:MM")]
    pub end: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub note: Option<String>,

    /// Equipment to bind, repeatable: --product 3=10
    #[arg(long = "product", value_name = "ID=QTY", value_parser = parse_product_qty)]
    pub products: Vec<(i64, i64)>,

    /// Crew member, repeatable: --staff 2 --staff 5
    #[arg(long = "staff", value_name = "ID")]
    pub staff: Vec<i64>,
}

#[derive(Subcommand)]
pub enum EventCmd {
    /// Create an event (name, date and location are required)
    Create(EventArgs),

    /// Edit an event; given products and crew replace the current ones
    Edit {
        id: i64,

        #[command(flatten)]
        fields: EventArgs,

        #[arg(long, help = "Remove all bound products")]
        no_products: bool,

        #[arg(long, help = "Remove the whole crew")]
        no_staff: bool,
    },

    /// Delete an event and return its equipment to stock
    Del { id: i64 },

    /// List events
    List {
        #[arg(long, help = "Only events I am assigned to")]
        mine: bool,

        #[arg(long, help = "Only my events of today")]
        today: bool,

        #[arg(long, help = "Filter by year/month/day or a custom range")]
        range: Option<String>,
    },

    /// Show an event with its crew and loading checklist
    Show { id: i64 },

    /// Tick the loading checklist of one bound product
    Check {
        id: i64,
        product: i64,

        #[arg(long)]
        loaded: Option<bool>,

        #[arg(long)]
        done: Option<bool>,
    },
}

#[derive(Subcommand)]
pub enum StaffCmd {
    /// Create an account
    Add {
        login: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, value_parser = parse_role, default_value = "staff")]
        role: Role,
    },

    /// Change the role of an account
    Role {
        id: i64,

        #[arg(value_parser = parse_role)]
        role: Role,
    },

    Activate { id: i64 },

    Deactivate { id: i64 },

    /// Allow (or with --revoke, disallow) inventory management
    Grant {
        id: i64,

        #[arg(long)]
        revoke: bool,
    },

    List,
}

#[derive(Subcommand)]
pub enum HoursCmd {
    /// Clock in to an event
    In {
        event: i64,

        #[arg(long, help = "Clock in someone else (admin/manager)")]
        staff: Option<i64>,
    },

    /// Clock out of an event
    Out {
        event: i64,

        #[arg(long, help = "Clock out someone else (admin/manager)")]
        staff: Option<i64>,
    },

    /// Running entries and credited totals
    List {
        #[arg(long, help = "Only this staff member")]
        staff: Option<i64>,
    },

    /// Delete timesheet entries of one event, or all of them
    Reset {
        #[arg(long, conflicts_with = "all")]
        event: Option<i64>,

        #[arg(long)]
        all: bool,
    },
}

/// Output options shared by every export.
#[derive(Args)]
pub struct ExportOut {
    #[arg(long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    #[arg(long, value_name = "FILE", help = "Absolute output path")]
    pub file: String,

    #[arg(long, short = 'f', help = "Overwrite an existing file")]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum ExportCmd {
    /// Events with their fields, product count and crew
    Events {
        #[command(flatten)]
        out: ExportOut,

        #[arg(long, value_name = "RANGE", help = "Filter by year/month/day or a custom range")]
        range: Option<String>,
    },

    /// Loading checklist of one event
    Checklist {
        event: i64,

        #[command(flatten)]
        out: ExportOut,
    },

    /// Credited hours per staff member and event
    Hours {
        #[command(flatten)]
        out: ExportOut,

        #[arg(long)]
        staff: Option<i64>,
    },
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::from_code(s).ok_or_else(|| format!("unknown category '{s}'"))
}

fn parse_role(s: &str) -> Result<Role, String> {
    Role::from_code(s).ok_or_else(|| format!("unknown role '{s}' (admin, manager, staff)"))
}

/// `ID=QTY` → (product id, quantity).
pub fn parse_product_qty(s: &str) -> Result<(i64, i64), String> {
    let (id, qty) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=QTY, got '{s}'"))?;
    let id = id.trim().parse().map_err(|_| format!("invalid product id in '{s}'"))?;
    let qty = qty.trim().parse().map_err(|_| format!("invalid quantity in '{s}'"))?;
    Ok((id, qty))
}
