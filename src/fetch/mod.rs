// src/fetch/mod.rs

pub mod cache;
pub mod sheets;
pub mod table;

pub use cache::TabCache;
pub use sheets::SheetsClient;
pub use table::Table;
