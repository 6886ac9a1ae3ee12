//! Index configuration
//!
//! An index manager is configured once with an ordered list of index
//! definitions. Definitions deserialize from JSON:
//!
//! ```json
//! { "idField": "id",
//!   "indexes": [
//!     { "field": "price", "type": "number" },
//!     { "field": "name", "type": "substring", "options": { "ngramSize": 3 } },
//!     { "field": "body", "type": "text",
//!       "options": { "fuzzyDistance": 2, "tokenizer": "whitespace" } } ] }
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::errors::IndexError;
use super::field::FieldIndex;
use super::number::NumberIndex;
use super::string::StringIndex;
use super::substring::{SubstringIndex, DEFAULT_NGRAM_SIZE};
use super::text::{TextIndex, TextIndexOptions, DEFAULT_FUZZY_DISTANCE, DEFAULT_MIN_TOKEN_LENGTH};
use super::tokenizer::{Tokenizer, WordTokenizer};

/// Index variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    Number,
    Date,
    String,
    Substring,
    Text,
}

impl IndexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexType::Number => "number",
            IndexType::Date => "date",
            IndexType::String => "string",
            IndexType::Substring => "substring",
            IndexType::Text => "text",
        }
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IndexType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "number" => Ok(IndexType::Number),
            "date" => Ok(IndexType::Date),
            "string" => Ok(IndexType::String),
            "substring" => Ok(IndexType::Substring),
            "text" => Ok(IndexType::Text),
            other => Err(other.to_string()),
        }
    }
}

/// Per-type options. Options not relevant to a type are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexOptions {
    /// Substring gram length, default 3, clamped to [2, 6]
    pub ngram_size: Option<usize>,
    /// Text tokens shorter than this are dropped, default 3
    pub min_token_length: Option<usize>,
    /// Text fuzzy edit distance, default 1, at most 2
    pub fuzzy_distance: Option<usize>,
    /// Text tokenizer, default `unicode_word`; configured by name
    #[serde(with = "tokenizer_name", skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<Arc<dyn Tokenizer>>,
}

/// Built-in tokenizers (de)serialize as their names
mod tokenizer_name {
    use std::sync::Arc;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::index::tokenizer::{tokenizer_by_name, Tokenizer};

    pub fn serialize<S>(
        tokenizer: &Option<Arc<dyn Tokenizer>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match tokenizer {
            Some(tokenizer) => serializer.serialize_some(tokenizer.name()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Arc<dyn Tokenizer>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|name| {
                tokenizer_by_name(&name)
                    .ok_or_else(|| D::Error::custom(format!("unknown tokenizer '{}'", name)))
            })
            .transpose()
    }
}

impl IndexOptions {
    pub fn ngram_size(mut self, n: usize) -> Self {
        self.ngram_size = Some(n);
        self
    }

    pub fn min_token_length(mut self, n: usize) -> Self {
        self.min_token_length = Some(n);
        self
    }

    pub fn fuzzy_distance(mut self, d: usize) -> Self {
        self.fuzzy_distance = Some(d);
        self
    }

    pub fn tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }
}

/// One configured field index.
///
/// The type is kept as written so unknown types are reported when the
/// manager is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub field: String,
    #[serde(rename = "type")]
    pub index_type: String,
    #[serde(default)]
    pub options: IndexOptions,
}

impl IndexDefinition {
    pub fn new(field: impl Into<String>, index_type: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            index_type: index_type.into(),
            options: IndexOptions::default(),
        }
    }

    pub fn number(field: impl Into<String>) -> Self {
        Self::new(field, IndexType::Number.as_str())
    }

    pub fn date(field: impl Into<String>) -> Self {
        Self::new(field, IndexType::Date.as_str())
    }

    pub fn string(field: impl Into<String>) -> Self {
        Self::new(field, IndexType::String.as_str())
    }

    pub fn substring(field: impl Into<String>) -> Self {
        Self::new(field, IndexType::Substring.as_str())
    }

    pub fn text(field: impl Into<String>) -> Self {
        Self::new(field, IndexType::Text.as_str())
    }

    pub fn with_options(mut self, options: IndexOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve the declared type
    pub fn resolve_type(&self) -> Result<IndexType, IndexError> {
        self.index_type
            .parse()
            .map_err(|index_type| IndexError::UnknownIndexType {
                field: self.field.clone(),
                index_type,
            })
    }

    /// Build the empty index this definition describes
    pub fn build(&self) -> Result<Box<dyn FieldIndex>, IndexError> {
        let field = self.field.clone();
        let index: Box<dyn FieldIndex> = match self.resolve_type()? {
            IndexType::Number => Box::new(NumberIndex::numbers(field)),
            IndexType::Date => Box::new(NumberIndex::dates(field)),
            IndexType::String => Box::new(StringIndex::new(field)),
            IndexType::Substring => Box::new(SubstringIndex::new(
                field,
                self.options.ngram_size.unwrap_or(DEFAULT_NGRAM_SIZE),
            )),
            IndexType::Text => Box::new(TextIndex::new(
                field,
                TextIndexOptions {
                    tokenizer: self
                        .options
                        .tokenizer
                        .clone()
                        .unwrap_or_else(|| Arc::new(WordTokenizer)),
                    min_token_length: self
                        .options
                        .min_token_length
                        .unwrap_or(DEFAULT_MIN_TOKEN_LENGTH),
                    fuzzy_distance: self.options.fuzzy_distance.unwrap_or(DEFAULT_FUZZY_DISTANCE),
                },
            )),
        };
        Ok(index)
    }
}

/// Index manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagerConfig {
    /// Entity field holding the identifier
    pub id_field: String,
    /// Keep a trace of the last `collect_candidates` call
    pub record_query_plan: bool,
    pub indexes: Vec<IndexDefinition>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            record_query_plan: true,
            indexes: Vec::new(),
        }
    }
}

impl ManagerConfig {
    pub fn new(indexes: Vec<IndexDefinition>) -> Self {
        Self {
            indexes,
            ..Self::default()
        }
    }

    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    pub fn without_query_plan(mut self) -> Self {
        self.record_query_plan = false;
        self
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self, IndexError> {
        serde_json::from_value(value.clone()).map_err(|e| IndexError::InvalidConfig(e.to_string()))
    }
}
