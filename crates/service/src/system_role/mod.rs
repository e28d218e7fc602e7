//! System role module: repository abstraction, storage backends and the
//! service that folds every storage outcome into an [`crate::Outcome`].

pub mod repository;
pub mod repo;
pub mod service;

pub use service::SystemRoleService;
