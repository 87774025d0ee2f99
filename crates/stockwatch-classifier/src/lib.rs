//! Availability and price classification for rendered product pages.
//!
//! Everything in this crate is synchronous and free of I/O: callers hand in
//! already-rendered HTML plus the page URL and get back an
//! [`AvailabilityState`] and an optional price.

pub mod buttons;
pub mod classifier;
pub mod jsonld;
pub mod keywords;
pub mod offers;
pub mod price;
pub mod structured;
pub mod text;

pub use classifier::{classify_availability, extract_price, Classification, Classifier, Tier};
pub use jsonld::{JsonLdDocuments, ObjectNodes};
pub use stockwatch_core::{AvailabilityState, DomainRuleSet, DomainRuleTable};
