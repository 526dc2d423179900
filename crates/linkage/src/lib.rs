//! `custlink-linkage`: deterministic fuzzy record linkage.
//!
//! Pure engine crate: receives pre-loaded ERP and broker collections, returns
//! one broker link per ERP record plus the projected broker rows.
//! CSV helpers live in `tabular`; no CLI dependencies.

pub mod blocking;
pub mod config;
pub mod engine;
pub mod error;
pub mod linker;
pub mod model;
pub mod normalize;
pub mod selector;
pub mod similarity;
pub mod summary;
pub mod tabular;

pub use config::LinkConfig;
pub use engine::run;
pub use error::LinkError;
pub use model::{Collection, LinkInput, LinkReport, Record, RowIndex};
