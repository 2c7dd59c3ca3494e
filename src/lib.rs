//! Read-only HTTP query service over a climate-impact dataset.
//!
//! ```text
//!  dataset file ──► data::loader ──► data::refine ──► Table
//!                                                      │
//!                                        query::QueryService (Arc, immutable)
//!                                                      │
//!                                    api::router ◄── state::AppState
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod data;
pub mod query;
pub mod state;
