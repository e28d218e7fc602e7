//! Service layer exposing the system role persistence contract.
//! - Every operation returns an [`Outcome`] instead of a `Result`.
//! - Storage is reached through [`SystemRoleRepository`]; SeaORM and in-memory backends are provided.
//! - Field exclusion on returned records is described by [`Projection`].

pub mod errors;
pub mod outcome;
pub mod projection;
pub mod system_role;
#[cfg(test)]
pub mod test_support;

pub use outcome::{ErrorDetail, Outcome, Status};
pub use projection::{Projected, Projection};
pub use system_role::{
    repo::{memory::InMemorySystemRoleRepository, seaorm::SeaOrmSystemRoleRepository},
    repository::SystemRoleRepository,
    service::SystemRoleService,
};
