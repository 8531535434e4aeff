pub mod assignment;
pub mod backup;
pub mod binding;
pub mod ledger;
pub mod log;
pub mod notify;
pub mod policy;
pub mod products;
pub mod scheduler;
pub mod staff;
pub mod timesheet;
