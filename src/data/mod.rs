/// Data layer: core types, loading, refinement and row filtering.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  refine   │  trim, blanks → null, numeric unification, renames
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  immutable columns, name → position index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  equality predicate → matching row indices
///   └──────────┘
/// ```
pub mod filter;
pub mod loader;
pub mod model;
pub mod refine;
