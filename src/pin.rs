// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Parental PIN lock. Only an Argon2id hash of the PIN is stored.

use crate::db::{DurableStore, keys, read_doc, write_doc};
use crate::error::PinError;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Salted Argon2id PHC string for a secret.
pub(crate) fn hash_secret(secret: &str) -> Result<String, PinError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PinError::Hash(e.to_string()))
}

/// An unparseable stored hash never matches.
pub(crate) fn verify_secret(secret: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "stored hash is not a valid PHC string");
            false
        }
    }
}

fn is_well_formed(pin: &str) -> bool {
    pin.len() == 4 && pin.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinCheck {
    /// The lock is off; nothing to check.
    NotRequired,
    Granted,
    Denied,
}

impl PinCheck {
    pub fn allows(self) -> bool {
        !matches!(self, PinCheck::Denied)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PinRecord {
    enabled: bool,
    #[serde(default)]
    hash: Option<String>,
}

pub struct PinGate {
    record: PinRecord,
    store: Arc<dyn DurableStore>,
}

impl PinGate {
    pub fn load(store: Arc<dyn DurableStore>) -> Self {
        let mut record: PinRecord = read_doc(store.as_ref(), keys::PIN).unwrap_or_default();
        if record.enabled && record.hash.is_none() {
            warn!("PIN lock enabled without a stored hash, disabling");
            record.enabled = false;
        }
        Self { record, store }
    }

    pub fn is_enabled(&self) -> bool {
        self.record.enabled
    }

    pub fn verify(&self, pin: Option<&str>) -> PinCheck {
        if !self.record.enabled {
            return PinCheck::NotRequired;
        }
        match (pin, self.record.hash.as_deref()) {
            (Some(pin), Some(hash)) if verify_secret(pin.trim(), hash) => PinCheck::Granted,
            _ => PinCheck::Denied,
        }
    }

    /// Turns the lock on (or changes the PIN). Both entries must agree
    /// and be exactly four digits.
    pub fn enable(&mut self, pin: &str, confirm: &str) -> Result<(), PinError> {
        let (pin, confirm) = (pin.trim(), confirm.trim());
        if !is_well_formed(pin) {
            return Err(PinError::Malformed);
        }
        if pin != confirm {
            return Err(PinError::Mismatch);
        }
        self.record = PinRecord {
            enabled: true,
            hash: Some(hash_secret(pin)?),
        };
        self.persist();
        info!("PIN lock enabled");
        Ok(())
    }

    /// Turns the lock off. Needs the current PIN while it is on.
    pub fn disable(&mut self, pin: Option<&str>) -> Result<(), PinError> {
        if self.verify(pin) == PinCheck::Denied {
            return Err(PinError::Denied);
        }
        self.record = PinRecord::default();
        self.persist();
        info!("PIN lock disabled");
        Ok(())
    }

    fn persist(&self) {
        if let Err(err) = write_doc(self.store.as_ref(), keys::PIN, &self.record) {
            error!(error = %err, "failed to persist PIN lock");
        }
    }
}
