/// Data layer: schema, loading, filtering, aggregation and export.
///
/// Architecture:
/// ```text
///        .csv
///          │
///          ▼
///    ┌──────────┐
///    │  loader  │  parse + coerce cells → Table
///    └──────────┘
///          │
///          ▼
///    ┌──────────┐
///    │  Table   │  Vec<Row>, fixed Field schema
///    └──────────┘
///          │        FilterCriteria
///          ▼             │
///    ┌──────────┐        │
///    │  filter  │◀───────┘  → FilteredResult (row indices)
///    └──────────┘
///       │     │
///       ▼     ▼
///  aggregate  export       metrics / chart series / CSV
/// ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
