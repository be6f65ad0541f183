// src/munge/mod.rs

pub mod filter;
pub mod flatten;
pub mod parse;
pub mod pivot;
pub mod roster;

pub use flatten::{flatten, ChekiRecord};
pub use parse::split_name_group;
pub use pivot::{
    apply_cutoff, monthly_series, pivot, top_n, GroupKey, MonthCount, SummaryRow, SummaryTable,
    OTHERS,
};
pub use roster::Roster;
