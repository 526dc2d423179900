use crate::config::LinkConfig;
use crate::error::LinkError;
use crate::linker::{link, project, LinkOptions};
use crate::model::{LinkInput, LinkMeta, LinkReport, RowIndex};
use crate::summary::compute_summary;
use crate::tabular::write_collection;

/// Run linkage per config. Returns links, projected broker rows + summary.
///
/// Either every ERP record is linked or an error is returned; there is no
/// partial result.
pub fn run(config: &LinkConfig, input: &LinkInput) -> Result<LinkReport, LinkError> {
    let options = LinkOptions::from(config);
    let links = link(&input.erp, &input.broker, &options)?;

    // Normalization never touches the loaded records, so the originals are
    // projected directly.
    let matched = project(&input.broker, &links)?;
    let summary = compute_summary(&links, input.erp.len(), input.broker.len());

    Ok(LinkReport {
        meta: LinkMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            parallel: config.parallel,
        },
        summary,
        links,
        matched,
    })
}

/// CSV text of the matched broker rows, optionally led by their original
/// broker positions.
pub fn matched_csv(report: &LinkReport, index_column: bool) -> Result<String, LinkError> {
    let index: Vec<RowIndex> = report.links.iter().map(|l| l.broker_index).collect();
    write_collection(&report.matched, index_column.then_some(index.as_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Collection, Record};

    fn row(name: &str, address: &str, postcode: &str) -> Record {
        Record::new()
            .with("name", name)
            .with("address", address)
            .with("postcode", postcode)
    }

    fn input() -> LinkInput {
        LinkInput {
            erp: Collection::from_records(vec![
                row("Acme Corp", "1 Main St", "AB1 2CD"),
                row("Other Limited", "9 Oak Avenue", "QQ1 1QQ"),
            ]),
            broker: Collection::from_records(vec![
                row("ACME CORP", "1 main st", "ab1  2cd").with("phone", "111"),
                row("Other Ltd", "9 Oak Ave", "ZZ9 9ZZ").with("phone", "222"),
            ]),
        }
    }

    #[test]
    fn run_builds_report() {
        let config = LinkConfig {
            name: "unit".into(),
            ..LinkConfig::default()
        };
        let report = run(&config, &input()).unwrap();
        assert_eq!(report.meta.config_name, "unit");
        assert!(!report.meta.parallel);
        assert_eq!(report.links.len(), 2);
        assert_eq!(report.summary.linked, 2);
        assert_eq!(report.summary.fallback, 1);
        assert_eq!(report.summary.exact_matches, 1);
        assert_eq!(report.matched.records()[1].get("phone"), Some("222"));
    }

    #[test]
    fn matched_csv_with_and_without_index() {
        let report = run(&LinkConfig::default(), &input()).unwrap();
        assert_eq!(
            matched_csv(&report, true).unwrap(),
            ",name,address,postcode,phone\n0,ACME CORP,1 main st,ab1  2cd,111\n1,Other Ltd,9 Oak Ave,ZZ9 9ZZ,222\n"
        );
        assert_eq!(
            matched_csv(&report, false).unwrap(),
            "name,address,postcode,phone\nACME CORP,1 main st,ab1  2cd,111\nOther Ltd,9 Oak Ave,ZZ9 9ZZ,222\n"
        );
    }

    #[test]
    fn report_serializes_matched_rows_as_objects() {
        let report = run(&LinkConfig::default(), &input()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["matched"][0]["name"], "ACME CORP");
        assert_eq!(json["links"][1]["broker_index"], 1);
        assert_eq!(json["links"][1]["fallback"], true);
        assert_eq!(json["summary"]["linked"], 2);
    }
}
