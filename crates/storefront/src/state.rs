//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use vira_core::{Catalog, CatalogError, FilterState, Product, ProductId};

use crate::config::StorefrontConfig;
use crate::services::{DisabledSuggester, GeminiSuggester, OutfitSuggester, SuggestionError};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read catalog {path}: {source}")]
    CatalogRead {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("suggestion client: {0}")]
    Suggester(#[from] SuggestionError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Everything in it is read-only
/// except the filter memo, which is internally synchronized.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    suggester: Arc<dyn OutfitSuggester>,
    filter_memo: Cache<FilterState, Arc<[ProductId]>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Catalog,
        suggester: Arc<dyn OutfitSuggester>,
    ) -> Self {
        let filter_memo = Cache::builder()
            .max_capacity(1000)
            .time_to_idle(Duration::from_secs(600))
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                suggester,
                filter_memo,
            }),
        }
    }

    /// Build the state from configuration: load the catalog from disk and
    /// pick the suggestion client.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or is invalid, or the
    /// suggestion client cannot be built.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let json = std::fs::read_to_string(&config.catalog_path).map_err(|source| {
            StateError::CatalogRead {
                path: config.catalog_path.display().to_string(),
                source,
            }
        })?;
        let catalog = Catalog::from_json(&json)?;
        tracing::info!(products = catalog.len(), "Catalog loaded");

        let suggester: Arc<dyn OutfitSuggester> = match &config.gemini {
            Some(gemini) => Arc::new(GeminiSuggester::new(gemini)?),
            None => {
                tracing::warn!("GEMINI_API_KEY not set, outfit suggestions disabled");
                Arc::new(DisabledSuggester)
            }
        };

        Ok(Self::new(config, catalog, suggester))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the outfit suggestion client.
    #[must_use]
    pub fn suggester(&self) -> &dyn OutfitSuggester {
        self.inner.suggester.as_ref()
    }

    /// Products matching `filter`, in catalog order.
    ///
    /// The matching ids are memoized per distinct filter state.
    pub async fn filtered_products(&self, filter: &FilterState) -> Vec<&Product> {
        let catalog = self.catalog();
        let ids = self
            .inner
            .filter_memo
            .get_with_by_ref(filter, async {
                filter
                    .apply(catalog)
                    .into_iter()
                    .map(|p| p.id.clone())
                    .collect::<Arc<[ProductId]>>()
            })
            .await;

        ids.iter().filter_map(|id| catalog.get(id)).collect()
    }
}
