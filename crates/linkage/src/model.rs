use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::LinkError;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Which registry a collection was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Erp,
    Broker,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Erp => write!(f, "erp"),
            Self::Broker => write!(f, "broker"),
        }
    }
}

/// Position of a record inside its collection, as loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RowIndex(pub usize);

impl RowIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for RowIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One entity as known to one source system: field name -> value, in the
/// order the fields were loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for in-memory collections.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field, replacing the value in place if it already exists.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// Ordered records with a stable positional index `0..len`.
///
/// `headers` fixes the column order used when the collection is written back
/// out; records loaded from CSV carry exactly these fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl Collection {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            records: Vec::new(),
        }
    }

    /// Build from records alone. Headers are the union of field names in
    /// first-seen order.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for record in &records {
            for (field, _) in record.fields() {
                if !headers.iter().any(|h| h == field) {
                    headers.push(field.to_string());
                }
            }
        }
        Self { headers, records }
    }

    pub fn push(&mut self, record: Record) {
        for (field, _) in record.fields() {
            if !self.headers.iter().any(|h| h == field) {
                self.headers.push(field.to_string());
            }
        }
        self.records.push(record);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: RowIndex) -> Option<&Record> {
        self.records.get(index.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RowIndex, &Record)> {
        self.records.iter().enumerate().map(|(i, r)| (RowIndex(i), r))
    }

    /// Copy the rows at `indices`, in that order. Duplicates are kept.
    pub fn project(&self, indices: &[RowIndex]) -> Result<Collection, LinkError> {
        let mut records = Vec::with_capacity(indices.len());
        for &index in indices {
            let record = self.get(index).ok_or(LinkError::InvalidRowIndex {
                index: index.0,
                len: self.records.len(),
            })?;
            records.push(record.clone());
        }
        Ok(Collection {
            headers: self.headers.clone(),
            records,
        })
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

/// Pre-loaded ERP (query side) and broker (candidate side) collections.
#[derive(Debug, Clone, Default)]
pub struct LinkInput {
    pub erp: Collection,
    pub broker: Collection,
}

/// Derived comparison fields of one record. The original record is untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub index: RowIndex,
    pub name_norm: String,
    pub address_norm: String,
    pub postcode_norm: String,
}

// ---------------------------------------------------------------------------
// Scores + links
// ---------------------------------------------------------------------------

/// Per-field token-set scores (0..=100) and their mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchScore {
    pub name: u8,
    pub address: u8,
    pub total: f64,
}

/// The broker record chosen for one ERP record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub erp_index: RowIndex,
    pub broker_index: RowIndex,
    pub score: MatchScore,
    /// Candidates came from the whole broker collection because no broker
    /// record shared the normalized postcode.
    pub fallback: bool,
    /// Number of candidates sharing the winning score (1 = no tie).
    pub tied: usize,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkSummary {
    pub erp_records: usize,
    pub broker_records: usize,
    pub linked: usize,
    pub blocked: usize,
    pub fallback: usize,
    pub exact_matches: usize,
    pub tied: usize,
    pub distinct_broker_records: usize,
    pub mean_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub parallel: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub meta: LinkMeta,
    pub summary: LinkSummary,
    pub links: Vec<Link>,
    /// Original broker rows in ERP order (`matched[i]` belongs to `links[i]`).
    pub matched: Collection,
}
