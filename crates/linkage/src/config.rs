use serde::Deserialize;

use crate::error::LinkError;
use crate::model::Source;

pub const DEFAULT_ERP_FILE: &str = "datasets/customer_erp_data.csv";
pub const DEFAULT_BROKER_FILE: &str = "datasets/data_broker_dataset.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "datasets/data_broker_existing_clients_data.csv";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Match ERP records on the rayon pool instead of one by one.
    #[serde(default)]
    pub parallel: bool,
    #[serde(default = "SourceConfig::default_erp")]
    pub erp: SourceConfig,
    #[serde(default = "SourceConfig::default_broker")]
    pub broker: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "custlink".into()
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            parallel: false,
            erp: SourceConfig::default_erp(),
            broker: SourceConfig::default_broker(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// CSV path, relative to the config file's directory.
    pub file: String,
    #[serde(default)]
    pub columns: ColumnMapping,
}

impl SourceConfig {
    fn default_erp() -> Self {
        Self {
            file: DEFAULT_ERP_FILE.into(),
            columns: ColumnMapping::default(),
        }
    }

    fn default_broker() -> Self {
        Self {
            file: DEFAULT_BROKER_FILE.into(),
            columns: ColumnMapping::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Which source column holds each required field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "default_name_column")]
    pub name: String,
    #[serde(default = "default_address_column")]
    pub address: String,
    #[serde(default = "default_postcode_column")]
    pub postcode: String,
}

fn default_name_column() -> String {
    "name".into()
}

fn default_address_column() -> String {
    "address".into()
}

fn default_postcode_column() -> String {
    "postcode".into()
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            name: default_name_column(),
            address: default_address_column(),
            postcode: default_postcode_column(),
        }
    }
}

impl ColumnMapping {
    /// Mapped column names in (name, address, postcode) order.
    pub fn required(&self) -> [&str; 3] {
        [&self.name, &self.address, &self.postcode]
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_file")]
    pub file: String,
    /// Write the original broker row position as a leading unnamed column.
    #[serde(default = "default_index_column")]
    pub index_column: bool,
    /// Optional JSON report path.
    #[serde(default)]
    pub report: Option<String>,
}

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.into()
}

fn default_index_column() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: default_output_file(),
            index_column: default_index_column(),
            report: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl LinkConfig {
    pub fn from_toml(input: &str) -> Result<Self, LinkError> {
        let config: LinkConfig =
            toml::from_str(input).map_err(|e| LinkError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LinkError> {
        for (source, cfg) in [(Source::Erp, &self.erp), (Source::Broker, &self.broker)] {
            if cfg.file.trim().is_empty() {
                return Err(LinkError::ConfigValidation(format!(
                    "{source}: file must not be empty"
                )));
            }

            let cols = cfg.columns.required();
            if let Some(field) = ["name", "address", "postcode"]
                .iter()
                .zip(cols.iter())
                .find(|(_, col)| col.trim().is_empty())
                .map(|(field, _)| field)
            {
                return Err(LinkError::ConfigValidation(format!(
                    "{source}: column for '{field}' must not be empty"
                )));
            }

            for i in 0..cols.len() {
                for j in (i + 1)..cols.len() {
                    if cols[i] == cols[j] {
                        return Err(LinkError::ConfigValidation(format!(
                            "{source}: column '{}' mapped to more than one field",
                            cols[i]
                        )));
                    }
                }
            }
        }

        if self.output.file.trim().is_empty() {
            return Err(LinkError::ConfigValidation(
                "output: file must not be empty".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
name = "ERP vs broker"
parallel = true

[erp]
file = "erp.csv"

[erp.columns]
name = "customer_name"
address = "street"
postcode = "zip"

[broker]
file = "broker.csv"

[output]
file = "out.csv"
index_column = false
report = "report.json"
"#;

    #[test]
    fn parse_full() {
        let config = LinkConfig::from_toml(FULL).unwrap();
        assert_eq!(config.name, "ERP vs broker");
        assert!(config.parallel);
        assert_eq!(config.erp.file, "erp.csv");
        assert_eq!(config.erp.columns.required(), ["customer_name", "street", "zip"]);
        assert_eq!(config.broker.columns, ColumnMapping::default());
        assert_eq!(config.output.file, "out.csv");
        assert!(!config.output.index_column);
        assert_eq!(config.output.report.as_deref(), Some("report.json"));
    }

    #[test]
    fn empty_config_uses_dataset_defaults() {
        let config = LinkConfig::from_toml("").unwrap();
        assert_eq!(config.name, "custlink");
        assert!(!config.parallel);
        assert_eq!(config.erp.file, DEFAULT_ERP_FILE);
        assert_eq!(config.broker.file, DEFAULT_BROKER_FILE);
        assert_eq!(config.output.file, DEFAULT_OUTPUT_FILE);
        assert!(config.output.index_column);
        assert!(config.output.report.is_none());
    }

    #[test]
    fn partial_column_mapping_keeps_defaults() {
        let input = r#"
[broker]
file = "b.csv"
[broker.columns]
postcode = "post_code"
"#;
        let config = LinkConfig::from_toml(input).unwrap();
        assert_eq!(config.broker.columns.required(), ["name", "address", "post_code"]);
    }

    #[test]
    fn reject_source_without_file() {
        let input = r#"
[erp.columns]
name = "n"
"#;
        let err = LinkConfig::from_toml(input).unwrap_err();
        assert!(matches!(err, LinkError::ConfigParse(_)));
    }

    #[test]
    fn reject_duplicate_column_mapping() {
        let input = r#"
[erp]
file = "erp.csv"
[erp.columns]
name = "label"
address = "label"
"#;
        let err = LinkConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("'label' mapped to more than one field"));
    }

    #[test]
    fn reject_empty_paths() {
        let err = LinkConfig::from_toml("[broker]\nfile = \" \"\n").unwrap_err();
        assert!(err.to_string().contains("broker: file must not be empty"));

        let err = LinkConfig::from_toml("[output]\nfile = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("output: file must not be empty"));
    }

    #[test]
    fn reject_empty_column_name() {
        let err = LinkConfig::from_toml("[erp]\nfile = \"e.csv\"\n[erp.columns]\naddress = \"\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("column for 'address'"));
    }
}
