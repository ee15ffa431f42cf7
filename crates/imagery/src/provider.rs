//! Imagery provider trait and the offline provider.

use async_trait::async_trait;
use tracing::debug;

use crate::{MosaicHandle, MosaicRequest, Result};

/// Source of composited mosaics.
///
/// Implementations should be pure for a given request within a session;
/// callers may cache handles on that assumption.
#[async_trait]
pub trait ImageryProvider: Send + Sync {
    /// Provider name for logs and display.
    fn name(&self) -> &str;

    /// Composite the mosaic described by `request`.
    async fn get_mosaic(&self, request: &MosaicRequest) -> Result<MosaicHandle>;
}

/// Provider that serves no tiles.
///
/// Returns a deterministic handle derived from the request, so everything
/// except the map layers works without network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderProvider;

#[async_trait]
impl ImageryProvider for PlaceholderProvider {
    fn name(&self) -> &str {
        "placeholder"
    }

    async fn get_mosaic(&self, request: &MosaicRequest) -> Result<MosaicHandle> {
        debug!(
            "Placeholder mosaic for {} ({}..{})",
            request.label, request.date_from, request.date_to
        );

        Ok(MosaicHandle {
            id: format!(
                "{}/{}_{}",
                request.collection, request.date_from, request.date_to
            ),
            label: request.label.clone(),
            date: request.date,
            url_format: None,
            vis: request.vis,
        })
    }
}
