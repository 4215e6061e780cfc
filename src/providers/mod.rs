pub mod auth;
pub mod diagnostics;
pub mod http;
pub mod menu;
pub mod orders;

pub use auth::AuthClient;
pub use diagnostics::{DiagnosticsClient, ErrorReport};
pub use http::ApiClient;
pub use menu::MenuClient;
pub use orders::OrdersClient;
