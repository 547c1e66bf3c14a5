//! Catalogue resource trait and wire types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Verification state sent as query parameters on verify propagation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyState {
    /// Whether the resource is active on the remote mirror.
    pub active: bool,
    /// Remote status label, e.g. `"approved provider"`.
    pub status: String,
}

impl VerifyState {
    /// Creates a new verification state.
    pub fn new(active: bool, status: impl Into<String>) -> Self {
        Self {
            active,
            status: status.into(),
        }
    }
}

/// A catalogue resource that can be mirrored to a remote catalogue.
///
/// Every mirrored type carries a stable string id and knows the
/// verification endpoint segment the remote mirror exposes for it.
pub trait CatalogueResource:
    Serialize + Clone + fmt::Debug + Send + Sync + 'static
{
    /// Returns the resource id.
    fn id(&self) -> &str;

    /// Human-readable resource kind, used in logs.
    fn kind() -> &'static str;

    /// Path segment of the remote verification endpoint.
    fn verify_segment() -> &'static str {
        "verifyResource"
    }

    /// The active/status values a verify propagation announces.
    fn verify_state(&self) -> VerifyState;
}

/// A catalogue provider (an organisation offering resources).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// Provider id.
    pub id: String,
    /// Short name.
    pub abbreviation: String,
    /// Full name.
    pub name: String,
    /// Id of the catalogue the provider belongs to.
    #[serde(default)]
    pub catalogue_id: Option<String>,
    /// Whether the provider is active.
    #[serde(default)]
    pub active: bool,
    /// Onboarding status.
    #[serde(default)]
    pub status: Option<String>,
}

impl CatalogueResource for Provider {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind() -> &'static str {
        "Provider"
    }

    fn verify_segment() -> &'static str {
        "verifyProvider"
    }

    fn verify_state(&self) -> VerifyState {
        VerifyState::new(
            self.active,
            self.status.clone().unwrap_or_else(|| "approved provider".into()),
        )
    }
}

/// A catalogue service offered by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Service id.
    pub id: String,
    /// Service name.
    pub name: String,
    /// Id of the owning provider.
    pub resource_organisation: String,
    /// Id of the catalogue the service belongs to.
    #[serde(default)]
    pub catalogue_id: Option<String>,
    /// Whether the service is active.
    #[serde(default)]
    pub active: bool,
    /// Onboarding status.
    #[serde(default)]
    pub status: Option<String>,
}

impl CatalogueResource for Service {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind() -> &'static str {
        "Service"
    }

    fn verify_state(&self) -> VerifyState {
        VerifyState::new(
            self.active,
            self.status.clone().unwrap_or_else(|| "approved resource".into()),
        )
    }
}

/// A datasource attached to a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datasource {
    /// Datasource id.
    pub id: String,
    /// Id of the service it belongs to.
    pub service_id: String,
    /// Id of the catalogue the datasource belongs to.
    #[serde(default)]
    pub catalogue_id: Option<String>,
    /// Jurisdiction classification.
    #[serde(default)]
    pub jurisdiction: Option<String>,
    /// Whether the datasource is active.
    #[serde(default)]
    pub active: bool,
    /// Onboarding status.
    #[serde(default)]
    pub status: Option<String>,
}

impl CatalogueResource for Datasource {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind() -> &'static str {
        "Datasource"
    }

    fn verify_segment() -> &'static str {
        "verifyDatasource"
    }

    fn verify_state(&self) -> VerifyState {
        VerifyState::new(
            self.active,
            self.status.clone().unwrap_or_else(|| "approved resource".into()),
        )
    }
}

/// A training resource offered by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingResource {
    /// Training resource id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Id of the owning provider.
    pub resource_organisation: String,
    /// Id of the catalogue the training resource belongs to.
    #[serde(default)]
    pub catalogue_id: Option<String>,
    /// Whether the training resource is active.
    #[serde(default)]
    pub active: bool,
    /// Onboarding status.
    #[serde(default)]
    pub status: Option<String>,
}

impl CatalogueResource for TrainingResource {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind() -> &'static str {
        "TrainingResource"
    }

    fn verify_segment() -> &'static str {
        "verifyTrainingResource"
    }

    fn verify_state(&self) -> VerifyState {
        VerifyState::new(
            self.active,
            self.status.clone().unwrap_or_else(|| "approved resource".into()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> Provider {
        Provider {
            id: "openaire".into(),
            abbreviation: "OA".into(),
            name: "OpenAIRE".into(),
            catalogue_id: Some("eosc".into()),
            active: true,
            status: None,
        }
    }

    #[test]
    fn provider_identity_and_kind() {
        let p = provider();
        assert_eq!(p.id(), "openaire");
        assert_eq!(Provider::kind(), "Provider");
        assert_eq!(Provider::verify_segment(), "verifyProvider");
    }

    #[test]
    fn service_uses_default_verify_segment() {
        assert_eq!(Service::verify_segment(), "verifyResource");
        assert_eq!(TrainingResource::verify_segment(), "verifyTrainingResource");
        assert_eq!(Datasource::verify_segment(), "verifyDatasource");
    }

    #[test]
    fn verify_state_defaults() {
        let p = provider();
        let state = p.verify_state();
        assert!(state.active);
        assert_eq!(state.status, "approved provider");

        let s = Service {
            id: "svc".into(),
            name: "Svc".into(),
            resource_organisation: "openaire".into(),
            catalogue_id: None,
            active: false,
            status: Some("pending resource".into()),
        };
        let state = s.verify_state();
        assert!(!state.active);
        assert_eq!(state.status, "pending resource");
    }

    #[test]
    fn provider_serializes_camel_case() {
        let json = serde_json::to_value(provider()).unwrap();
        assert_eq!(json["catalogueId"], "eosc");
        assert_eq!(json["abbreviation"], "OA");
    }
}
