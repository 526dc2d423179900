//! Canonical comparison forms for free-text fields.
//!
//! Only case, surrounding whitespace and commas (plus spaces, for postcodes)
//! are touched. Accents, other punctuation and inner runs of spaces survive.

use crate::config::ColumnMapping;
use crate::error::LinkError;
use crate::model::{Collection, NormalizedRecord, Record, RowIndex, Source};

/// Lowercase, drop commas, trim. Used for `name` and `address`.
///
/// Commas go before the trim so that `"x ,"` does not leave a trailing space
/// behind; the result is a fixed point of this function.
pub fn normalize_name(s: &str) -> String {
    s.to_lowercase().replace(',', "").trim().to_string()
}

/// `normalize_name`, then drop every space character.
pub fn normalize_postcode(s: &str) -> String {
    normalize_name(s).replace(' ', "")
}

/// Derive the comparison fields of one record.
pub fn normalize_record(
    source: Source,
    index: RowIndex,
    record: &Record,
    columns: &ColumnMapping,
) -> Result<NormalizedRecord, LinkError> {
    let field = |column: &str| {
        record.get(column).ok_or_else(|| LinkError::MissingField {
            source: source.to_string(),
            row: index.get(),
            field: column.to_string(),
        })
    };

    Ok(NormalizedRecord {
        index,
        name_norm: normalize_name(field(&columns.name)?),
        address_norm: normalize_name(field(&columns.address)?),
        postcode_norm: normalize_postcode(field(&columns.postcode)?),
    })
}

/// Normalize a whole collection. The first record missing a required field
/// aborts with `MissingField`.
pub fn normalize_collection(
    source: Source,
    collection: &Collection,
    columns: &ColumnMapping,
) -> Result<Vec<NormalizedRecord>, LinkError> {
    collection
        .iter()
        .map(|(index, record)| normalize_record(source, index, record, columns))
        .collect()
}
