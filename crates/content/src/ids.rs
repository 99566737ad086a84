//! Opaque identifier types.
//!
//! Every entity in the store is addressed by its own newtype so that a page ID
//! can never be passed where a table ID is expected. Identifiers are opaque
//! strings: the store allocates UUID v4 values, but any non-empty string
//! loaded from a backing store is accepted.
//!
//! ```
//! use mddb_content::ids::{PageId, WorkspaceId};
//!
//! let ws = WorkspaceId::new("ws-1");
//! assert_eq!(ws.as_str(), "ws-1");
//! assert!(!ws.is_empty());
//!
//! let generated = PageId::generate();
//! assert_ne!(generated, PageId::generate());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from the given string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Allocates a fresh random identifier.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns `true` if the identifier is empty (unset).
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::new(s))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Identifies an organization, the top-level tenant.
    OrganizationId
);
opaque_id!(
    /// Identifies a workspace within an organization.
    WorkspaceId
);
opaque_id!(
    /// Identifies a page in a workspace hierarchy.
    PageId
);
opaque_id!(
    /// Identifies a table in a workspace.
    TableId
);
opaque_id!(
    /// Identifies a data record within a table.
    RecordId
);
opaque_id!(
    /// Identifies a binary asset in a workspace.
    AssetId
);
