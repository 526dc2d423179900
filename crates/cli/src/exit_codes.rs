//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Domain    | Description                                   |
//! |------|-----------|-----------------------------------------------|
//! | 0    | Universal | Success                                       |
//! | 1    | Universal | General error (unspecified)                   |
//! | 2    | Universal | CLI usage error (bad args, clap rejections)   |
//! | 3    | link      | Invalid config (parse or validation)          |
//! | 4    | link      | Input contract violation (column/field)       |
//! | 5    | link      | Broker collection is empty                    |
//! | 6    | link      | I/O or CSV error                              |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `link_exit_code` or the relevant command

use custlink_linkage::LinkError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
/// Raised by clap itself before any command runs.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Link (3-9)
// =============================================================================

/// Config file failed to parse or validate.
pub const EXIT_LINK_INVALID_CONFIG: u8 = 3;

/// A mapped column is missing from a CSV header, a header repeats a column,
/// or a record lacks a field.
pub const EXIT_LINK_INPUT: u8 = 4;

/// Broker collection has no records; nothing can be linked.
pub const EXIT_LINK_EMPTY_BROKER: u8 = 5;

/// File read/write or CSV decode/encode failure.
pub const EXIT_LINK_IO: u8 = 6;

/// Map a LinkError to its exit code.
pub fn link_exit_code(err: &LinkError) -> u8 {
    match err {
        LinkError::ConfigParse(_) | LinkError::ConfigValidation(_) => EXIT_LINK_INVALID_CONFIG,
        LinkError::MissingColumn { .. }
        | LinkError::DuplicateColumn { .. }
        | LinkError::MissingField { .. } => EXIT_LINK_INPUT,
        LinkError::EmptyBrokerCollection => EXIT_LINK_EMPTY_BROKER,
        LinkError::Csv(_) | LinkError::Io(_) => EXIT_LINK_IO,
        LinkError::InvalidRowIndex { .. } => EXIT_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_LINK_INVALID_CONFIG,
            EXIT_LINK_INPUT,
            EXIT_LINK_EMPTY_BROKER,
            EXIT_LINK_IO,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn link_errors_map_to_codes() {
        assert_eq!(link_exit_code(&LinkError::ConfigParse("x".into())), EXIT_LINK_INVALID_CONFIG);
        assert_eq!(
            link_exit_code(&LinkError::MissingField {
                source: "erp".into(),
                row: 0,
                field: "name".into(),
            }),
            EXIT_LINK_INPUT
        );
        assert_eq!(
            link_exit_code(&LinkError::DuplicateColumn {
                source: "broker".into(),
                column: "tag".into(),
            }),
            EXIT_LINK_INPUT
        );
        assert_eq!(link_exit_code(&LinkError::EmptyBrokerCollection), EXIT_LINK_EMPTY_BROKER);
        assert_eq!(link_exit_code(&LinkError::Io("x".into())), EXIT_LINK_IO);
    }
}
