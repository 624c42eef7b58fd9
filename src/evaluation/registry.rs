//! Model version registry
//!
//! Versions are immutable entries keyed by (model_type, version string)
//! with a three-state lifecycle: created -> active -> deactivated.
//! Deactivated is terminal; redeploying an old model means a fresh version
//! string referencing the old one via `previous_version`.
//!
//! The single-active-per-type invariant is not an in-memory flag: it is
//! enforced by the store's atomic activate operation, so concurrent
//! activations cannot leave zero or two active versions.

use crate::error::{Result, TrustError};
use crate::store::EvidenceStore;
use crate::types::{ModelVersion, VersionStatus};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Registry facade over the evidence store's version collection
pub struct VersionRegistry {
    store: Arc<dyn EvidenceStore>,
}

impl VersionRegistry {
    pub fn new(store: Arc<dyn EvidenceStore>) -> Self {
        Self { store }
    }

    /// Register a new version in the Created state
    pub async fn create(
        &self,
        model_type: &str,
        version: &str,
        previous_version: Option<&str>,
    ) -> Result<ModelVersion> {
        if version.trim().is_empty() {
            return Err(TrustError::Validation(
                "version string must not be empty".to_string(),
            ));
        }
        if model_type.trim().is_empty() {
            return Err(TrustError::Validation(
                "model type must not be empty".to_string(),
            ));
        }

        let entry = ModelVersion {
            version: version.to_string(),
            model_type: model_type.to_string(),
            metrics: None,
            status: VersionStatus::Created,
            deployed_at: None,
            deactivated_at: None,
            previous_version: previous_version.map(str::to_string),
            improvement_over_previous_pct: None,
            created_at: Utc::now(),
        };
        self.store.insert_model_version(&entry).await?;
        info!("Registered model version {}/{}", model_type, version);
        Ok(entry)
    }

    /// Activate a version, atomically deactivating all siblings
    ///
    /// Legal only from the Created state. Reactivating a Deactivated
    /// version fails closed; redeploys require a fresh version string.
    pub async fn activate(&self, model_type: &str, version: &str) -> Result<()> {
        let target = self
            .store
            .find_model_version(model_type, version)
            .await?
            .ok_or_else(|| TrustError::VersionNotFound {
                model_type: model_type.to_string(),
                version: version.to_string(),
            })?;

        match target.status {
            VersionStatus::Created => {}
            VersionStatus::Active => {
                // Already active: idempotent no-op.
                return Ok(());
            }
            VersionStatus::Deactivated => {
                return Err(TrustError::InvariantViolation(format!(
                    "version {}/{} is deactivated and cannot be reactivated; \
                     create a fresh version referencing it instead",
                    model_type, version
                )));
            }
        }

        self.store.activate_model_version(model_type, version).await?;
        info!("Activated model version {}/{}", model_type, version);
        Ok(())
    }

    /// The single active version of a model type, if any
    pub async fn current(&self, model_type: &str) -> Result<Option<ModelVersion>> {
        self.store.current_model_version(model_type).await
    }

    /// Look up a specific version
    pub async fn get(&self, model_type: &str, version: &str) -> Result<Option<ModelVersion>> {
        self.store.find_model_version(model_type, version).await
    }
}
