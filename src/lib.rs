//! entity-index - in-memory secondary indexes and candidate selection for JSON entities
//!
//! Number/date range, exact string, substring and full-text indexes behind
//! one manager that turns field predicates into candidate ID sets.

pub mod cli;
pub mod index;
pub mod observability;
