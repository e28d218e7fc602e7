use std::sync::Arc;

use common::{EventLog, TracingEventLog};
use service::{SystemRoleRepository, SystemRoleService};

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ServerState {
    pub roles: SystemRoleService<dyn SystemRoleRepository>,
    pub log: Arc<dyn EventLog>,
    pub auth: ServerAuthConfig,
}

impl ServerState {
    pub fn new(repo: Arc<dyn SystemRoleRepository>, log: Arc<dyn EventLog>, auth: ServerAuthConfig) -> Self {
        Self { roles: SystemRoleService::new(repo), log, auth }
    }

    /// State logging through `tracing`.
    pub fn with_tracing_log(repo: Arc<dyn SystemRoleRepository>, auth: ServerAuthConfig) -> Self {
        Self::new(repo, Arc::new(TracingEventLog), auth)
    }
}
