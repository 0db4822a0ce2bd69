//! External collaborators of the loan widgets
//!
//! - [`HttpSchemeClient`]: `SchemeSource` backed by the web application's
//!   scheme JSON endpoint
//! - [`StaticSchemeSource`]: in-memory scheme catalog for offline use and tests
//! - [`TracingNotifier`]: `Notifier` that writes notifications to the log

pub mod http_schemes;
pub mod notifier;
pub mod static_schemes;
pub mod wire;

pub use http_schemes::HttpSchemeClient;
pub use notifier::TracingNotifier;
pub use static_schemes::StaticSchemeSource;
pub use wire::{AdditionalConditions, SchemeResponse};
