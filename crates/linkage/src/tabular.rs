//! CSV <-> `Collection` conversion.

use crate::config::ColumnMapping;
use crate::error::LinkError;
use crate::model::{Collection, Record, RowIndex, Source};

/// Load CSV text into a collection, checking that every mapped column exists
/// and that no column name repeats.
///
/// All columns are kept as opaque string fields in header order; empty cells
/// become empty strings.
pub fn read_collection(
    source: Source,
    csv_data: &str,
    columns: &ColumnMapping,
) -> Result<Collection, LinkError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    // Records are keyed by column name, so a repeated name would lose a value.
    for (i, header) in headers.iter().enumerate() {
        if headers[..i].contains(header) {
            return Err(LinkError::DuplicateColumn {
                source: source.to_string(),
                column: header.clone(),
            });
        }
    }

    for column in columns.required() {
        if !headers.iter().any(|h| h == column) {
            return Err(LinkError::MissingColumn {
                source: source.to_string(),
                column: column.to_string(),
            });
        }
    }

    let mut collection = Collection::new(headers.clone());
    for record in reader.records() {
        let record = record?;
        collection.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.as_str(), v))
                .collect::<Record>(),
        );
    }

    log::debug!("{source}: loaded {} row(s), {} column(s)", collection.len(), headers.len());
    Ok(collection)
}

/// Encode a collection as CSV in its header order.
///
/// With `index`, a leading unnamed column carries the given row positions
/// (one per record), the way a dataframe writes its row labels.
pub fn write_collection(
    collection: &Collection,
    index: Option<&[RowIndex]>,
) -> Result<String, LinkError> {
    if let Some(index) = index {
        if index.len() != collection.len() {
            return Err(LinkError::Csv(format!(
                "index column has {} entries for {} rows",
                index.len(),
                collection.len()
            )));
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = Vec::with_capacity(collection.headers().len() + 1);
    if index.is_some() {
        header.push("");
    }
    header.extend(collection.headers().iter().map(String::as_str));
    writer.write_record(&header)?;

    for (i, record) in collection.records().iter().enumerate() {
        let mut row: Vec<String> = Vec::with_capacity(header.len());
        if let Some(index) = index {
            row.push(index[i].to_string());
        }
        for h in collection.headers() {
            row.push(record.get(h).unwrap_or("").to_string());
        }
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LinkError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| LinkError::Csv(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROKER: &str = "\
name,address,postcode,phone
ACME CORP,1 main st,ab1  2cd,111
\"Other, Ltd\",9 Oak Ave,ZZ9 9ZZ,
";

    #[test]
    fn read_basic() {
        let c = read_collection(Source::Broker, BROKER, &ColumnMapping::default()).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.headers(), &["name", "address", "postcode", "phone"]);
        let r = c.get(RowIndex(1)).unwrap();
        assert_eq!(r.get("name"), Some("Other, Ltd"));
        assert_eq!(r.get("phone"), Some(""));
    }

    #[test]
    fn read_rejects_missing_column() {
        let mapping = ColumnMapping {
            postcode: "zip".into(),
            ..ColumnMapping::default()
        };
        let err = read_collection(Source::Erp, BROKER, &mapping).unwrap_err();
        match err {
            LinkError::MissingColumn { source, column } => {
                assert_eq!(source, "erp");
                assert_eq!(column, "zip");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_rejects_duplicate_column() {
        let csv = "name,address,postcode,tag,tag\nAcme,1 Main St,AB1,first,second\n";
        let err = read_collection(Source::Broker, csv, &ColumnMapping::default()).unwrap_err();
        assert_eq!(err.kind(), "duplicate_column");
        assert_eq!(err.to_string(), "broker: duplicate column 'tag'");
    }

    #[test]
    fn read_rejects_duplicate_required_column() {
        let csv = "name,address,postcode,name\nAcme,1 Main St,AB1,Other\n";
        let err = read_collection(Source::Erp, csv, &ColumnMapping::default()).unwrap_err();
        match err {
            LinkError::DuplicateColumn { source, column } => {
                assert_eq!(source, "erp");
                assert_eq!(column, "name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_rejects_ragged_rows() {
        let csv = "name,address,postcode\na,b,c\nd,e\n";
        let err = read_collection(Source::Erp, csv, &ColumnMapping::default()).unwrap_err();
        assert!(matches!(err, LinkError::Csv(_)));
    }

    #[test]
    fn read_header_only() {
        let c = read_collection(Source::Erp, "name,address,postcode\n", &ColumnMapping::default())
            .unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn write_with_index_column() {
        let c = read_collection(Source::Broker, BROKER, &ColumnMapping::default()).unwrap();
        let p = c.project(&[RowIndex(1), RowIndex(0)]).unwrap();
        let out = write_collection(&p, Some(&[RowIndex(1), RowIndex(0)][..])).unwrap();
        assert_eq!(
            out,
            "\
,name,address,postcode,phone
1,\"Other, Ltd\",9 Oak Ave,ZZ9 9ZZ,
0,ACME CORP,1 main st,ab1  2cd,111
"
        );
    }

    #[test]
    fn write_without_index_column() {
        let c = read_collection(Source::Broker, BROKER, &ColumnMapping::default()).unwrap();
        let out = write_collection(&c, None).unwrap();
        assert_eq!(out, BROKER);
    }

    #[test]
    fn write_rejects_mismatched_index() {
        let c = read_collection(Source::Broker, BROKER, &ColumnMapping::default()).unwrap();
        assert!(write_collection(&c, Some(&[RowIndex(0)][..])).is_err());
    }
}
