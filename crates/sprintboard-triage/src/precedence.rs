//! Reducing duplicate release labels to one authoritative label per product.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use sprintboard_core::release::ReleaseTag;
use sprintboard_core::{LabelCodec, ProductOrder, compare};

/// The release label that survives for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeptLabel {
    pub label: String,
    pub tag: ReleaseTag,
}

/// Outcome of precedence resolution over one item's labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelResolution {
    /// Product → surviving label.
    pub kept: BTreeMap<String, KeptLabel>,
    /// Release labels to strip, in the order they were encountered.
    pub remove: Vec<String>,
}

impl LabelResolution {
    /// The tag that governs the item's column position.
    #[must_use]
    pub fn dominant(&self, order: &ProductOrder) -> Option<&ReleaseTag> {
        order.dominant(self.kept.values().map(|k| &k.tag))
    }

    #[must_use]
    pub fn needs_cleanup(&self) -> bool {
        !self.remove.is_empty()
    }
}

/// Keep the smallest release label per product and flag the rest.
///
/// "Smallest" is under [`compare`]: the lowest version wins, then the
/// strongest state. A later label that compares equal to the kept one is a
/// duplicate and is flagged too. Ordinary labels are ignored.
pub fn resolve_labels<S: AsRef<str>>(labels: &[S], codec: &LabelCodec) -> LabelResolution {
    let mut resolution = LabelResolution::default();

    for label in labels {
        let label = label.as_ref();
        let Some(tag) = codec.decode(label) else {
            continue;
        };

        match resolution.kept.get_mut(&tag.product) {
            None => {
                resolution.kept.insert(
                    tag.product.clone(),
                    KeptLabel {
                        label: label.to_string(),
                        tag,
                    },
                );
            }
            Some(current) if compare(&tag, &current.tag) == Ordering::Less => {
                let displaced = std::mem::replace(
                    current,
                    KeptLabel {
                        label: label.to_string(),
                        tag,
                    },
                );
                resolution.remove.push(displaced.label);
            }
            Some(_) => resolution.remove.push(label.to_string()),
        }
    }

    resolution
}
