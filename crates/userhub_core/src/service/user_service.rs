//! User lifecycle service.
//!
//! # Responsibility
//! - Decide whether an incoming record is a create or an update.
//! - Pre-validate existence before updates; delegate everything durable to
//!   the store.
//! - Propagate store failures unchanged, adding only logging.
//!
//! # Invariants
//! - No retry, recovery, caching, or in-process mutable state.
//! - Uniqueness and timestamp stamping stay with the store.
//! - Logs carry identifiers only, never full record contents.

use crate::model::user::{User, UserId};
use crate::store::user_store::{StoreError, StoreResult, UserStore};
use log::{debug, error, info, warn};

/// Stateless orchestration layer over an injected [`UserStore`].
pub struct UserService<S: UserStore> {
    store: S,
}

impl<S: UserStore> UserService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Removes all user data unconditionally.
    ///
    /// Destructive; intended for administrative and test use only.
    pub fn clear(&self) -> StoreResult<()> {
        warn!("event=users_clear module=service status=start");
        self.store.clear()
    }

    /// Returns every stored user; empty when none exist, never absent.
    pub fn get_all(&self) -> StoreResult<Vec<User>> {
        debug!("event=users_get_all module=service status=start");
        self.store.get_all()
    }

    /// Returns the user with the given identifier.
    ///
    /// # Errors
    /// - `NotFound` when no record has that identifier.
    pub fn get_by_id(&self, id: UserId) -> StoreResult<User> {
        debug!("event=user_get module=service status=start id={id}");
        self.store.get_by_id(id)
    }

    /// Returns the user with the given login name.
    ///
    /// # Errors
    /// - `NotFound` when no record has that login name.
    pub fn get_by_login_name(&self, login_name: &str) -> StoreResult<User> {
        debug!("event=user_get module=service status=start login_name={login_name}");
        self.store.get_by_login_name(login_name)
    }

    /// Creates (id absent) or updates (id present) a user record.
    ///
    /// # Contract
    /// - Update branch probes existence first; `NotFound` aborts the upsert
    ///   with no write attempted.
    /// - The store is the authority for uniqueness and timestamps; a
    ///   `Duplication` failure leaves no partial write behind.
    ///
    /// # Errors
    /// - `NotFound` when updating an id that does not exist.
    /// - `Duplication` when `login_name` or `email_address` collides.
    /// - `MissingField` when a required field is absent or invalid.
    pub fn upsert(&self, user: &User) -> StoreResult<User> {
        match user.id {
            None => {
                info!(
                    "event=user_upsert module=service status=start mode=create login_name={}",
                    user.login_name
                );
            }
            Some(id) => {
                info!("event=user_upsert module=service status=start mode=update id={id}");
                // The record must exist before an update is accepted.
                self.store.get_by_id(id)?;
            }
        }

        match self.store.upsert(user) {
            Ok(persisted) => {
                info!(
                    "event=user_upsert module=service status=ok id={}",
                    persisted.id.unwrap_or_default()
                );
                Ok(persisted)
            }
            Err(err) => {
                error!(
                    "event=user_upsert module=service status=error login_name={} error={err}",
                    user.login_name
                );
                Err(err)
            }
        }
    }

    /// Imports a user from an external identity provider.
    ///
    /// Declared by the contract but deliberately not supported by this core;
    /// callers always receive [`StoreError::ImportUnsupported`].
    pub fn import_from_external_provider(
        &self,
        provider: &str,
        external_id: &str,
    ) -> StoreResult<User> {
        warn!(
            "event=user_import module=service status=unsupported provider={provider} \
             external_id={external_id}"
        );
        Err(StoreError::ImportUnsupported {
            provider: provider.to_string(),
        })
    }

    /// Permanently removes the user with the given identifier.
    ///
    /// Not idempotent: deleting the same id twice fails with `NotFound`.
    pub fn delete(&self, id: UserId) -> StoreResult<()> {
        info!("event=user_delete module=service status=start id={id}");
        self.store.delete(id)?;
        info!("event=user_delete module=service status=ok id={id}");
        Ok(())
    }
}
