//! Filtering, aggregation and CSV export for YouTube video statistics.
//!
//! The desktop dashboard in `main.rs` is a thin egui layer over [`data`].

pub mod data;
