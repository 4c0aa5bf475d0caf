//! Open Food Facts product lookup and normalization.
//!
//! [`OpenFoodFactsClient`] fetches a raw product record by barcode and
//! classifies transport failures into [`FetchError`]; [`format_product`]
//! turns the raw record into a display-ready [`nutriscan_core::FormattedProduct`].

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::OpenFoodFactsClient;
pub use error::FetchError;
pub use normalize::format_product;
pub use types::{AllergenField, RawProduct};
