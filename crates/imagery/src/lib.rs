//! Satellite mosaic provider interface.
//!
//! The dashboard never inspects pixels: it describes the mosaic it wants
//! with a [`MosaicRequest`], asks an [`ImageryProvider`] for it, and hands the
//! returned [`MosaicHandle`] to whatever renders the map.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod http;
pub mod provider;
pub mod request;

pub use cache::{MosaicCache, MosaicPair, PairKey};
pub use error::{ImageryError, Result};
pub use http::HttpMosaicProvider;
pub use provider::{ImageryProvider, PlaceholderProvider};
pub use request::{MosaicHandle, MosaicRequest, Reducer};
