// src/chart/mod.rs

pub mod palette;
pub mod spec;

pub use palette::{color_for, FALLBACK_COLOR};
pub use spec::{
    bar, monthly_bar, pie, treemap, BarSpec, ChartKind, MonthlySpec, PieSpec, TreemapSpec,
};
