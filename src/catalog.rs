//! Model catalog
//!
//! Loads the backend's model list and applies the sentinel rule: when the
//! first entry carries the reserved error id, the catalog is unusable and no
//! model may be selected.

use std::sync::Arc;

use audigest_protocol::ModelInfo;

use crate::client::{endpoints, ApiClient};
use crate::error::Result;

/// A loaded catalog, after the sentinel check
#[derive(Debug, Clone)]
pub enum Catalog {
    /// Usable models; `default_selection` is the id of the first entry
    Available {
        models: Vec<ModelInfo>,
        default_selection: String,
    },
    /// The backend returned the reserved error entry; its display text
    /// explains why (bad key or network failure server-side)
    Unavailable { placeholder: ModelInfo },
    Empty,
}

impl Catalog {
    pub fn from_models(models: Vec<ModelInfo>) -> Self {
        match models.first() {
            None => Catalog::Empty,
            Some(first) if first.is_sentinel() => Catalog::Unavailable {
                placeholder: first.clone(),
            },
            Some(first) => {
                let default_selection = first.id.clone();
                Catalog::Available {
                    models,
                    default_selection,
                }
            }
        }
    }

    /// True when analysis submission must stay disabled
    pub fn analysis_blocked(&self) -> bool {
        !matches!(self, Catalog::Available { .. })
    }

    pub fn models(&self) -> &[ModelInfo] {
        match self {
            Catalog::Available { models, .. } => models,
            _ => &[],
        }
    }

    pub fn find(&self, model_id: &str) -> Option<&ModelInfo> {
        self.models().iter().find(|m| m.id == model_id)
    }

    /// Resolve a user-entered model reference: exact id, id without the
    /// catalog prefix, or the display label
    pub fn resolve(&self, reference: &str) -> Option<&ModelInfo> {
        self.models().iter().find(|m| {
            m.id == reference
                || m.id.strip_prefix(audigest_protocol::MODEL_ID_PREFIX) == Some(reference)
                || m.label() == reference
        })
    }
}

pub struct CatalogService<C> {
    client: Arc<C>,
}

impl<C: ApiClient> CatalogService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn load(&self) -> Result<Catalog> {
        let models: Vec<ModelInfo> = self.client.get_json(endpoints::GET_MODELS).await?;
        tracing::debug!(count = models.len(), "model catalog loaded");
        Ok(Catalog::from_models(models))
    }
}
