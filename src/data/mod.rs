/// Data layer: run records, aggregation, caching and summaries.
///
/// Architecture:
/// ```text
///  DIR/data.json + DIR/parameters.json      .mbss.parquet
///        │                                       │
///        ▼                                       │
///   ┌──────────┐                                 │
///   │  loader   │  RunSet + Vec<RunRecord>       │
///   └──────────┘                                 │
///        │                                       │
///        ▼                                       ▼
///   ┌───────────┐   write_cache   ┌─────────────────┐
///   │ aggregate  │ ─────────────▶ │ cache (parquet) │
///   └───────────┘                 └─────────────────┘
///        │ ResultTable  ◀────────────── read_cache
///        ▼
///   ┌──────────┐    ┌──────────┐    ┌──────────┐
///   │  filter   │ ─▶ │  stats   │ ─▶ │  pivot   │  boxes, medians, ratios
///   └──────────┘    └──────────┘    └──────────┘
///        └───────────────┬───────────────┘
///                        ▼
///               ConditionSummary (summary)  one per (RT60, SINR)
/// ```

pub mod aggregate;
pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pivot;
pub mod stats;
pub mod summary;
