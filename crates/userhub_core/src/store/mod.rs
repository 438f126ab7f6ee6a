//! Store layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the durable keyed-storage contract for user records.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Store writes must enforce `User::validate()` before persistence.
//! - Store APIs return semantic errors (`NotFound`, `Duplication`) in
//!   addition to DB transport errors.

pub mod user_store;
