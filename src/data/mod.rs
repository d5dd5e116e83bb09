/// Data layer: launch table types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<LaunchRecord>, payload extremes
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  site + payload window → subset
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
