pub mod backup;
pub mod config;
pub mod db;
pub mod event;
pub mod export;
pub mod hours;
pub mod init;
pub mod log;
pub mod product;
pub mod staff;
pub mod stock;
