//! Domain model for user accounts.
//!
//! # Responsibility
//! - Define the canonical user record shared by store and service layers.
//! - Enforce field-level validity before records reach persistence.
//!
//! # Invariants
//! - `id` is store-assigned; callers never invent identifiers.
//! - Deletion is a hard removal; the model has no tombstone state.

pub mod user;
