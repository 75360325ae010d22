//! Label string → [`ReleaseTag`] decoding.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ReleaseState, ReleaseTag, Version};

static RELEASE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(proposed|targeted|committed)-(?:([A-Za-z][A-Za-z0-9_]*(?:-[A-Za-z][A-Za-z0-9_]*)*)-)?(\d+)\.(\d+)(?:\.(\d+)(?:\.(\d+))?)?$",
    )
    .expect("release label pattern is valid")
});

/// Decodes release labels, filling in the configured default product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCodec {
    default_product: String,
}

impl LabelCodec {
    pub fn new(default_product: impl Into<String>) -> Self {
        Self {
            default_product: default_product.into(),
        }
    }

    #[must_use]
    pub fn default_product(&self) -> &str {
        &self.default_product
    }

    /// Decode `label`; `None` for anything that is not a release label.
    #[must_use]
    pub fn decode(&self, label: &str) -> Option<ReleaseTag> {
        decode_label(label, &self.default_product)
    }
}

/// Decode a single release label.
///
/// Non-matching strings, and versions whose components overflow `u32`, yield
/// `None`.
#[must_use]
pub fn decode_label(label: &str, default_product: &str) -> Option<ReleaseTag> {
    let caps = RELEASE_LABEL.captures(label)?;

    let state: ReleaseState = caps.get(1)?.as_str().parse().ok()?;
    let product = caps
        .get(2)
        .map_or(default_product, |m| m.as_str())
        .to_string();

    let component = |idx: usize| -> Option<u32> {
        caps.get(idx).map_or(Some(0), |m| m.as_str().parse().ok())
    };

    let version = Version::new(component(3)?, component(4)?, component(5)?, component(6)?);

    Some(ReleaseTag {
        state,
        product,
        version,
    })
}
