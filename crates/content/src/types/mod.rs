//! Entity and value types for the content store.
//!
//! - [`Organization`], [`Workspace`] - tenants
//! - [`Page`], [`Node`] - the page hierarchy
//! - [`Table`], [`DataRecord`], [`PropertyValue`] - tables and semi-structured records
//! - [`Asset`] - binary asset metadata
//! - [`Quota`] - limits and usage
//! - [`SearchOptions`], [`SearchResult`] - search
//!
//! # Examples
//!
//! ## Defaulting record access
//!
//! ```
//! use mddb_content::ids::TableId;
//! use mddb_content::types::DataRecord;
//!
//! let mut record = DataRecord::new(TableId::new("tasks"));
//! record.set_value("points", 5);
//! assert_eq!(record.get_number("points"), 5.0);
//! assert!(!record.get_bool("done"));
//! assert_eq!(record.get_string("points"), "");
//! ```

mod asset;
mod organization;
mod page;
mod quota;
mod record;
mod search;
mod table;
mod value;

pub use asset::{Asset, DEFAULT_MIME_TYPE, NewAsset};
pub use organization::{Organization, Workspace};
pub use page::{NewPage, Node, Page, PageUpdate};
pub use quota::{Quota, QuotaLimits, QuotaUsage, check_amount, check_count, effective_limits};
pub use record::{DataRecord, ZERO_TIME_SECS, zero_time};
pub use search::{SearchHitKind, SearchOptions, SearchResult};
pub use table::{
    NewTable, Property, PropertyType, Table, TableUpdate, TypedValue, validate_schema,
};
pub use value::PropertyValue;
