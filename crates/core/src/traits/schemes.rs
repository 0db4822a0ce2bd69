//! Scheme lookup

use async_trait::async_trait;

use crate::error::SchemeError;
use crate::scheme::SchemeInfo;

/// Source of scheme snapshots
///
/// One call per scheme selection. Implementations must not retry; the
/// calculator treats any error as final for that selection.
#[async_trait]
pub trait SchemeSource: Send + Sync {
    async fn fetch_scheme(&self, scheme_id: &str) -> Result<SchemeInfo, SchemeError>;
}

#[async_trait]
impl<T: SchemeSource + ?Sized> SchemeSource for std::sync::Arc<T> {
    async fn fetch_scheme(&self, scheme_id: &str) -> Result<SchemeInfo, SchemeError> {
        (**self).fetch_scheme(scheme_id).await
    }
}
