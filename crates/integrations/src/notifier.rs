//! Log-backed notification hook

use pawnshop_core::{Notifier, Severity};

/// Notifier that writes every notification to the log
///
/// Stands in for the host page's toast/alert hook when the widgets run
/// headless.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => tracing::error!(%severity, "{}", message),
            Severity::Warning => tracing::warn!(%severity, "{}", message),
            Severity::Info | Severity::Success => tracing::info!(%severity, "{}", message),
        }
    }
}
