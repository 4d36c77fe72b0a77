//! graphmerge - strategy-driven batch upsert for graph vertices and edges
//!
//! A batch of incoming vertices or edges is matched against storage by key.
//! Unmatched elements are created; matched elements have their properties
//! combined with the stored ones according to a per-property update strategy
//! (`SUM`, `BIGGER`, `SMALLER`, `UNION`, `INTERSECTION`, `APPEND`, `ELIMINATE`).

pub mod api;
pub mod config;
pub mod core;
pub mod storage;
pub mod utils;
