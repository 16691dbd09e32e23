// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod achievements;
pub mod account;
pub mod chat;
pub mod chores;
pub mod doctor;
pub mod exporter;
pub mod goals;
pub mod learn;
pub mod pin;
pub mod points;
pub mod reports;
pub mod reset;
pub mod rewards;
pub mod status;
pub mod transactions;

use crate::config::Config;
use crate::db::DurableStore;
use crate::engine::AppState;
use crate::pin::PinGate;
use crate::profile::Profile;
use anyhow::{Result, bail};
use std::sync::Arc;

/// Everything a command handler may touch, opened once per run.
pub struct Context {
    pub store: Arc<dyn DurableStore>,
    pub config: Config,
    pub state: AppState,
    pub pin: PinGate,
}

impl Context {
    pub fn open(store: Arc<dyn DurableStore>, config: Config) -> Self {
        let state = AppState::load(
            store.clone(),
            config.ledger.seed,
            config.ledger.goal_funding,
        );
        let pin = PinGate::load(store.clone());
        Self {
            store,
            config,
            state,
            pin,
        }
    }

    pub fn profile(&self) -> Profile {
        Profile::new(self.store.clone())
    }

    /// Refuses the command when the parental lock is on and `--pin` is
    /// missing or wrong.
    pub fn require_pin(&self, m: &clap::ArgMatches) -> Result<()> {
        let given = m
            .try_get_one::<String>("pin")
            .ok()
            .flatten()
            .map(String::as_str);
        if self.pin.verify(given).allows() {
            return Ok(());
        }
        match given {
            None => bail!(
                "Parent PIN required: pass --pin <PIN> (or turn the lock off with `pin disable`)"
            ),
            Some(_) => bail!("Incorrect parent PIN"),
        }
    }

    /// Writes the ledger and refreshes the signed-in session's cached
    /// figures.
    pub fn finish(&self) -> Result<()> {
        self.profile().sync_cache(self.state.ledger());
        self.state.flush()
    }
}

pub(crate) fn arg<'a>(m: &'a clap::ArgMatches, id: &str) -> Result<&'a String> {
    match m.get_one::<String>(id) {
        Some(v) => Ok(v),
        None => bail!("Missing required argument '{}'", id),
    }
}
