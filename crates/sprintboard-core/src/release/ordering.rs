//! Total order over release tags and products.
//!
//! [`compare`] ranks tags by version ascending, then by state priority
//! (`committed` before `targeted` before `proposed`). Product is not part of
//! the key; when an item carries tags for several products, [`ProductOrder`]
//! decides which one is dominant before any comparison happens.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::ReleaseTag;

/// Compare two tags: version first, then state priority.
///
/// Tags that differ only by product compare `Equal`.
#[must_use]
pub fn compare(a: &ReleaseTag, b: &ReleaseTag) -> Ordering {
    a.version
        .cmp(&b.version)
        .then_with(|| a.state.priority().cmp(&b.state.priority()))
}

/// Configured total order over product names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductOrder {
    products: Vec<String>,
}

impl ProductOrder {
    pub fn new<I, S>(products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            products: products.into_iter().map(Into::into).collect(),
        }
    }

    /// Position of `product` in the configured order, `None` when unlisted.
    #[must_use]
    pub fn rank(&self, product: &str) -> Option<usize> {
        self.products.iter().position(|p| p == product)
    }

    /// Rank key where unlisted products sort after every listed one.
    fn sort_key(&self, product: &str) -> usize {
        self.rank(product).unwrap_or(self.products.len())
    }

    /// Compare two products; unlisted products tie-break by name.
    #[must_use]
    pub fn compare_products(&self, a: &str, b: &str) -> Ordering {
        self.sort_key(a)
            .cmp(&self.sort_key(b))
            .then_with(|| a.cmp(b))
    }

    /// Pick the tag that governs an item's position.
    ///
    /// The best-ranked product wins; within one product the smallest tag
    /// under [`compare`] wins.
    pub fn dominant<'a, I>(&self, tags: I) -> Option<&'a ReleaseTag>
    where
        I: IntoIterator<Item = &'a ReleaseTag>,
    {
        tags.into_iter().min_by(|a, b| {
            self.compare_products(&a.product, &b.product)
                .then_with(|| compare(a, b))
        })
    }

    #[must_use]
    pub fn products(&self) -> &[String] {
        &self.products
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
