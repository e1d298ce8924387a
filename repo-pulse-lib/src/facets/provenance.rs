use serde::{Deserialize, Serialize};
use strum::Display;

/// Where a facet's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Provenance {
    /// Fetched from the hosting API.
    Live,

    /// Placeholder substituted after the fetch failed.
    Synthetic,

    /// Taken from the embedded sample dataset.
    Sample,
}

/// A facet value tagged with its [`Provenance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Facet<T> {
    #[must_use]
    pub const fn live(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Live,
        }
    }

    #[must_use]
    pub const fn synthetic(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Synthetic,
        }
    }

    #[must_use]
    pub const fn sample(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Sample,
        }
    }

    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.provenance == Provenance::Synthetic
    }
}
