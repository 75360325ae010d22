//! Release labels: the `state-product-version` tags carried by work items.
//!
//! # Grammar
//!
//! ```text
//! <state>-[<product>-]<major>.<minor>[.<patch>[.<hotfix>]]
//! ```
//!
//! `state` is one of `proposed`, `targeted`, `committed`. A missing product
//! resolves to the configured default product; missing version components
//! are zero. Labels that do not match are ordinary labels, not errors.
//!
//! - [`codec`] turns label strings into [`ReleaseTag`] values.
//! - [`ordering`] ranks tags (version first, then state priority) and picks
//!   the dominant tag when an item carries tags for several products.

pub mod codec;
pub mod ordering;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Commitment level of a release label.
///
/// Precedence is `committed > targeted > proposed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseState {
    Committed,
    Targeted,
    Proposed,
}

impl ReleaseState {
    pub const ALL: [Self; 3] = [Self::Committed, Self::Targeted, Self::Proposed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Committed => "committed",
            Self::Targeted => "targeted",
            Self::Proposed => "proposed",
        }
    }

    /// Sort priority; lower sorts first.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Committed => 0,
            Self::Targeted => 1,
            Self::Proposed => 2,
        }
    }
}

impl fmt::Display for ReleaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`ReleaseState`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid release state: '{0}'")]
pub struct ParseStateError(pub String);

impl FromStr for ReleaseState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "committed" => Ok(Self::Committed),
            "targeted" => Ok(Self::Targeted),
            "proposed" => Ok(Self::Proposed),
            other => Err(ParseStateError(other.to_string())),
        }
    }
}

/// Four-component release version.
///
/// Field order makes the derived `Ord` lexicographic over
/// `(major, minor, patch, hotfix)`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub hotfix: u32,
}

impl Version {
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32, hotfix: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            hotfix,
        }
    }

    #[must_use]
    pub const fn as_tuple(self) -> (u32, u32, u32, u32) {
        (self.major, self.minor, self.patch, self.hotfix)
    }
}

impl fmt::Display for Version {
    /// `major.minor`, extended with `.patch` and `.hotfix` only when needed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if self.patch != 0 || self.hotfix != 0 {
            write!(f, ".{}", self.patch)?;
        }
        if self.hotfix != 0 {
            write!(f, ".{}", self.hotfix)?;
        }
        Ok(())
    }
}

/// A decoded release label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReleaseTag {
    pub state: ReleaseState,
    pub product: String,
    pub version: Version,
}

impl ReleaseTag {
    pub fn new(state: ReleaseState, product: impl Into<String>, version: Version) -> Self {
        Self {
            state,
            product: product.into(),
            version,
        }
    }
}

impl fmt::Display for ReleaseTag {
    /// Canonical rendering; always names the product.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.state, self.product, self.version)
    }
}
