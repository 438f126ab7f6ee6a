//! Service layer orchestrating user lifecycle operations.
//!
//! # Responsibility
//! - Provide the single entry point for user CRUD callers.
//! - Decide create-vs-update branching and existence preconditions.
//!
//! # Invariants
//! - Service APIs never bypass store validation/persistence contracts.
//! - Service layer remains storage-agnostic and stateless.

pub mod user_service;
