pub mod config;
pub mod core;
pub mod storage;
pub mod store;
pub mod widget;

pub use config::DayboardConfig;
pub use storage::Storage;
