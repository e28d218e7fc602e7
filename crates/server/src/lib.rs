pub mod errors;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod startup;
pub mod state;

pub use routes::{build_router, build_router_without_auth};
pub use startup::run;
pub use state::{ServerAuthConfig, ServerState};
