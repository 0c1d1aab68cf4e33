//! HTTP surface of the blackjack table: routes, per-session tables, configuration and logging
//! setup.

pub mod config;
pub mod cors;
pub mod error;
pub mod routes;
pub mod session;
pub mod telemetry;

pub mod prelude {
    pub use super::config::{DealerRuleArg, ServerConfig};
    pub use super::cors::cors_middleware;
    pub use super::error::UserError;
    pub use super::routes::{configure, START_MESSAGE};
    pub use super::session::{
        SessionId, SessionStore, DEFAULT_MAX_SESSIONS, DEFAULT_SESSION, SESSION_HEADER,
    };
    pub use super::telemetry::init_tracing;
}
