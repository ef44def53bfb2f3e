//! Case data model.
//!
//! All live collections are owned by a [`crate::CaseSession`]. Entities carry
//! opaque ids drawn from one process-wide monotonic counter, so an id is never
//! handed out twice, even after the session is reset for the next case.

pub mod action;
pub mod case;
pub mod fishbone;
pub mod five_why;
pub mod taxonomy;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub use action::{
    ActionPlan, ActionStatus, ContainmentAction, ContainmentUpdate, Level, PreventiveAction,
    PreventiveUpdate,
};
pub use case::{CaseDetails, CaseField, Severity};
pub use fishbone::{CategoryUpdate, FishboneAnalysis, FishboneCategory};
pub use five_why::{FiveWhyAnalysis, FiveWhyChain};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_raw_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub(crate) fn next() -> Self {
                Self(next_raw_id())
            }

            /// Wrap a raw id, e.g. one echoed back by an input collaborator.
            #[must_use]
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Identifies a [`FishboneCategory`].
    CategoryId,
    "cat"
);
entity_id!(
    /// Identifies a [`FiveWhyChain`].
    ChainId,
    "why"
);
entity_id!(
    /// Identifies a containment or preventive action.
    ActionId,
    "act"
);

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

/// Lowercase, trim, and fold `_`/space to `-` before matching enum text.
pub(crate) fn normalize(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect()
}
