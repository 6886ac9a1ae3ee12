//! Index subsystem
//!
//! In-memory secondary indexes over JSON entities. Indexes are derived state:
//! the host owns the entities and keeps the manager in sync through
//! `add` / `remove` / `update`, or rebuilds it from a full snapshot.
//!
//! # Design Principles
//!
//! - Candidate selection, not matching: results may be supersets and say so
//! - In-memory only: No persistence
//! - Deterministic: ID sets are ordered, traversal order is total
//!
//! # Invariants
//!
//! - A field has at most one index
//! - `Exact` results contain exactly the matching IDs
//! - Sorted caches are rebuilt before any read that depends on them

mod candidates;
mod definition;
mod distance;
mod entity;
mod errors;
mod field;
mod manager;
mod number;
mod predicate;
mod search;
mod string;
mod substring;
mod text;
mod tokenizer;

pub use candidates::{intersect_all, CandidateResult, Exactness, IdSet, ResultShape};
pub use definition::{IndexDefinition, IndexOptions, IndexType, ManagerConfig};
pub use distance::bounded_levenshtein;
pub use entity::{field_value, EntityId};
pub use errors::{ErrorKind, IndexError, IndexResult};
pub use field::{FieldIndex, IndexSnapshot, IndexStats};
pub use manager::{FieldPlan, FieldStatus, IndexManager, PredicateKind, QueryPlan};
pub use number::{date_to_millis, NumberIndex, SortDirection, TraversalOptions};
pub use predicate::{FieldCondition, RangeCondition, Where};
pub use string::StringIndex;
pub use substring::{ngrams, SubstringIndex, DEFAULT_NGRAM_SIZE, MAX_NGRAM_SIZE, MIN_NGRAM_SIZE};
pub use text::{
    TextIndex, TextIndexOptions, DEFAULT_FUZZY_DISTANCE, DEFAULT_MIN_TOKEN_LENGTH,
    MAX_FUZZY_DISTANCE,
};
pub use tokenizer::{tokenizer_by_name, Tokenizer, WhitespaceTokenizer, WordTokenizer};
