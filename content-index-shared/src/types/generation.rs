//! Index generations and visibilities.
//!
//! Every logical content set is served by two index generations so that one
//! can be rebuilt while the other keeps serving, and by two visibilities so
//! that restricted content never reaches the public index.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two parallel index copies.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    #[default]
    Primary,
    Secondary,
}

impl Generation {
    pub const ALL: [Generation; 2] = [Generation::Primary, Generation::Secondary];

    /// The generation that is not `self`.
    pub fn other(self) -> Self {
        match self {
            Generation::Primary => Generation::Secondary,
            Generation::Secondary => Generation::Primary,
        }
    }

    pub fn is_primary(self) -> bool {
        self == Generation::Primary
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Generation::Primary => "primary",
            Generation::Secondary => "secondary",
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who may query an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub const ALL: [Visibility; 2] = [Visibility::Public, Visibility::Private];

    pub fn is_private(self) -> bool {
        self == Visibility::Private
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
