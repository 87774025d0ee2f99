use serde::{Deserialize, Serialize};

/// Purchase-availability state of a single product page.
///
/// Exactly one value is produced per classification; there are no combined
/// or partial states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityState {
    Available,
    OutOfStock,
    Preorder,
    Discontinued,
    /// The page is an anti-bot interstitial rather than the product.
    Blocked,
    Unknown,
}

impl AvailabilityState {
    /// Wire name, identical to the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AvailabilityState::Available => "available",
            AvailabilityState::OutOfStock => "out_of_stock",
            AvailabilityState::Preorder => "preorder",
            AvailabilityState::Discontinued => "discontinued",
            AvailabilityState::Blocked => "blocked",
            AvailabilityState::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for AvailabilityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
