//! Internationalization module
//!
//! Mock user lookup plus per-request locale and timezone negotiation:
//! - `users`: the fixed user table and `login_as` resolution
//! - `locale` / `accept_language`: locale priority chain and header best match
//! - `timezone`: timezone priority chain over the IANA database
//! - `catalog`: compiled-in translations
//! - `context`: runs the chain once per request

pub mod accept_language;
pub mod catalog;
pub mod context;
pub mod locale;
pub mod timezone;
pub mod users;

pub use catalog::Catalog;
pub use context::{NegotiationParams, RequestContext};
pub use users::UserTable;
