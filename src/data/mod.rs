/// Data layer: raw tables, loading, aggregation and selection.
///
/// Architecture:
/// ```text
///  market .csv / .json / .parquet      coordinates .csv / .json
///        │                                   │
///        ▼                                   ▼
///   ┌──────────┐
///   │  loader   │  parse files → Vec<MarketRecord>, Vec<GeoRecord>
///   └──────────┘
///        │
///        ▼
///   ┌───────────────────┐
///   │ AggregationEngine  │  validate, then derive (memoized):
///   └───────────────────┘    yearly means ×3, (year, neighborhood) means,
///        │                   top-N by price, rent means, geo/rent join,
///        ▼                   expensive neighborhood profile
///   ┌──────────┐
///   │  filter   │  neighborhood list / per-neighborhood subsets
///   └──────────┘
/// ```

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

pub use engine::AggregationEngine;
pub use error::{EngineError, SourceTable};
