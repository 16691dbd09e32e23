// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The local account and the signed-in session record.
//!
//! The session caches balance, points and streak for display. The cache
//! is refreshed by [`Profile::sync_cache`] and is not kept in lockstep
//! with the ledger.

use crate::db::{DurableStore, keys, read_doc, write_doc};
use crate::engine::AppState;
use crate::models::{Ledger, new_id};
use crate::pin::{hash_secret, verify_secret};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Kid,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub uid: String,
    pub username: String,
    pub child_name: String,
    pub child_age: Option<u8>,
    pub email: Option<String>,
    password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub uid: String,
    pub username: String,
    pub child_name: String,
    pub child_age: Option<u8>,
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub balance: Decimal,
    pub points: u64,
    pub streak: u32,
}

impl SessionRecord {
    fn open(account: &Account) -> Self {
        Self {
            uid: account.uid.clone(),
            username: account.username.clone(),
            child_name: account.child_name.clone(),
            child_age: account.child_age,
            email: account.email.clone(),
            role: Role::Kid,
            balance: Decimal::ZERO,
            points: 0,
            streak: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Signup {
    pub username: String,
    pub child_name: String,
    pub child_age: Option<u8>,
    pub email: Option<String>,
    pub password: String,
}

pub struct Profile {
    store: Arc<dyn DurableStore>,
}

impl Profile {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self { store }
    }

    pub fn account(&self) -> Option<Account> {
        read_doc(self.store.as_ref(), keys::ACCOUNT)
    }

    pub fn session(&self) -> Option<SessionRecord> {
        read_doc(self.store.as_ref(), keys::SESSION)
    }

    /// Creates the device's account and signs it in with empty cached
    /// figures. One account per data directory.
    pub fn signup(&self, form: Signup) -> Result<SessionRecord> {
        let username = form.username.trim();
        if username.is_empty() {
            bail!("Username is required");
        }
        if form.password.is_empty() {
            bail!("Password is required");
        }
        if let Some(existing) = self.account() {
            bail!(
                "An account for '{}' already exists on this device; log in instead",
                existing.username
            );
        }
        let child_name = match form.child_name.trim() {
            "" => username.to_string(),
            name => name.to_string(),
        };
        let account = Account {
            uid: new_id(),
            username: username.to_string(),
            child_name,
            child_age: form.child_age,
            email: form
                .email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            password_hash: hash_secret(&form.password).context("Hash password")?,
            created_at: Utc::now(),
        };
        write_doc(self.store.as_ref(), keys::ACCOUNT, &account)?;
        let session = SessionRecord::open(&account);
        write_doc(self.store.as_ref(), keys::SESSION, &session)?;
        info!(username = %account.username, "account created");
        Ok(session)
    }

    /// Signs in when the credentials match the stored account. Returns
    /// `Ok(None)` on a mismatch.
    pub fn login(
        &self,
        username: &str,
        password: &str,
        state: &mut AppState,
    ) -> Result<Option<SessionRecord>> {
        let username = username.trim();

        #[cfg(feature = "dev-bypass")]
        {
            if username == dev::USERNAME && password == dev::PASSWORD {
                return dev::login(self, state).map(Some);
            }
        }

        let Some(account) = self.account() else {
            warn!("login attempted with no account on this device");
            return Ok(None);
        };
        if account.username != username || !verify_secret(password, &account.password_hash) {
            warn!("login refused");
            return Ok(None);
        }
        let mut session = SessionRecord::open(&account);
        refresh(&mut session, state.ledger());
        write_doc(self.store.as_ref(), keys::SESSION, &session)?;
        info!(username = %session.username, "signed in");
        Ok(Some(session))
    }

    /// Ends the session. The account and the ledger stay.
    pub fn logout(&self) -> Result<bool> {
        let had_session = self.session().is_some();
        self.store.remove(keys::SESSION)?;
        if had_session {
            info!("signed out");
        }
        Ok(had_session)
    }

    /// Copies the ledger's headline figures into the session cache.
    pub fn sync_cache(&self, ledger: &Ledger) {
        let Some(mut session) = self.session() else {
            return;
        };
        if !refresh(&mut session, ledger) {
            return;
        }
        if let Err(err) = write_doc(self.store.as_ref(), keys::SESSION, &session) {
            error!(error = %err, "failed to refresh session cache");
        }
    }
}

fn refresh(session: &mut SessionRecord, ledger: &Ledger) -> bool {
    let changed = session.balance != ledger.balance
        || session.points != ledger.points
        || session.streak != ledger.streak;
    session.balance = ledger.balance;
    session.points = ledger.points;
    session.streak = ledger.streak;
    changed
}

#[cfg(feature = "dev-bypass")]
mod dev {
    use super::*;

    pub(super) const USERNAME: &str = "admin";
    pub(super) const PASSWORD: &str = "password";

    pub(super) fn login(profile: &Profile, state: &mut AppState) -> Result<SessionRecord> {
        warn!("development bypass login");
        state.apply_dev_override();
        let mut session = SessionRecord {
            uid: "admin-001".to_string(),
            username: USERNAME.to_string(),
            child_name: "Admin User".to_string(),
            child_age: Some(10),
            email: None,
            role: Role::Admin,
            balance: Decimal::ZERO,
            points: 0,
            streak: 0,
        };
        refresh(&mut session, state.ledger());
        write_doc(profile.store.as_ref(), keys::SESSION, &session)?;
        Ok(session)
    }
}
