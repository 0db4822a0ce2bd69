//! In-memory scheme catalog

use async_trait::async_trait;
use pawnshop_core::{SchemeError, SchemeInfo, SchemeSource};
use std::collections::HashMap;

use crate::wire::SchemeResponse;

/// Scheme source serving a fixed set of schemes
///
/// Used by the CLI when no endpoint is reachable and by tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemeSource {
    schemes: HashMap<String, SchemeInfo>,
}

impl StaticSchemeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheme(mut self, scheme: SchemeInfo) -> Self {
        self.insert(scheme);
        self
    }

    pub fn insert(&mut self, scheme: SchemeInfo) {
        self.schemes.insert(scheme.id.clone(), scheme);
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Load a JSON array of scheme bodies in the endpoint's wire format
    ///
    /// Every entry must carry an `id`.
    pub fn from_json(json: &str) -> Result<Self, SchemeError> {
        let responses: Vec<SchemeResponse> =
            serde_json::from_str(json).map_err(|e| SchemeError::InvalidPayload(e.to_string()))?;

        let mut source = Self::new();
        for response in responses {
            let id = response.id().ok_or_else(|| {
                SchemeError::InvalidPayload(format!("scheme {:?} has no id", response.name))
            })?;
            source.insert(response.into_scheme_info(&id)?);
        }
        Ok(source)
    }
}

#[async_trait]
impl SchemeSource for StaticSchemeSource {
    async fn fetch_scheme(&self, scheme_id: &str) -> Result<SchemeInfo, SchemeError> {
        self.schemes
            .get(scheme_id)
            .cloned()
            .ok_or_else(|| SchemeError::NotFound(scheme_id.to_string()))
    }
}
