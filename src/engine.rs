// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The reward-economy ledger. Business-rule refusals come back as
//! `false`; malformed input is reported as [`LedgerError`].

use crate::db::{DurableStore, keys, read_doc, write_doc};
use crate::error::LedgerError;
use crate::models::{
    Chore, Goal, Ledger, NewTransaction, Transaction, TxKind, achievement_ids, new_id,
    xp_threshold, SUPER_SAVER_TOTAL,
};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// How saving toward a goal moves money out of the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalFunding {
    /// Every contribution is deducted, and completing a goal deducts its
    /// full target once more.
    #[default]
    Legacy,
    /// Only contributions are deducted; completing a goal just marks it
    /// and pays out the reward.
    Contribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedMode {
    #[default]
    Sample,
    Empty,
}

#[derive(Debug, Clone, Default)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub target_amount: Option<Decimal>,
    pub points_reward: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct ChorePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub points_reward: Option<u64>,
}

pub struct AppState {
    ledger: Ledger,
    store: Arc<dyn DurableStore>,
    funding: GoalFunding,
}

impl AppState {
    pub fn load(store: Arc<dyn DurableStore>, seed: SeedMode, funding: GoalFunding) -> Self {
        let ledger = match read_doc::<Ledger>(store.as_ref(), keys::LEDGER) {
            Some(ledger) => ledger,
            None => {
                info!(?seed, "no stored ledger, seeding");
                match seed {
                    SeedMode::Sample => Ledger::sample(),
                    SeedMode::Empty => Ledger::zeroed(),
                }
            }
        };
        Self {
            ledger,
            store,
            funding,
        }
    }

    pub fn with_ledger(store: Arc<dyn DurableStore>, ledger: Ledger, funding: GoalFunding) -> Self {
        Self {
            ledger,
            store,
            funding,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn funding(&self) -> GoalFunding {
        self.funding
    }

    pub fn flush(&self) -> Result<()> {
        write_doc(self.store.as_ref(), keys::LEDGER, &self.ledger)
    }

    fn commit(&mut self, next: Ledger) {
        self.ledger = next;
        // The in-memory ledger stays authoritative; the next successful
        // write catches the store up.
        if let Err(err) = self.flush() {
            error!(error = %err, "failed to persist ledger");
        }
    }

    pub fn record_transaction(&mut self, tx: NewTransaction) -> Result<Transaction, LedgerError> {
        if tx.amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(tx.amount));
        }
        let title = tx.title.trim();
        if title.is_empty() {
            return Err(LedgerError::EmptyTitle);
        }

        let mut next = self.ledger.clone();
        let first_deposit = tx.kind == TxKind::In && !next.has_deposit();
        let lifetime_in = match tx.kind {
            TxKind::In => next.lifetime_deposits().saturating_add(tx.amount),
            TxKind::Out => next.lifetime_deposits(),
        };

        let record = Transaction {
            id: new_id(),
            title: title.to_string(),
            category: tx.category.trim().to_string(),
            date: tx.date,
            amount: tx.amount,
            kind: tx.kind,
        };
        next.balance = next
            .balance
            .checked_add(record.signed_amount())
            .ok_or(LedgerError::Overflow)?;
        next.transactions.insert(0, record.clone());

        let mut earned = 0;
        if first_deposit {
            earned = unlock_in(&mut next, achievement_ids::FIRST_DEPOSIT);
        }
        if lifetime_in >= SUPER_SAVER_TOTAL {
            earned = earned.saturating_add(unlock_in(&mut next, achievement_ids::SUPER_SAVER));
        }
        next.points = next.points.saturating_add(earned);

        debug!(
            id = %record.id,
            kind = record.kind.as_str(),
            amount = %record.amount,
            earned,
            "transaction recorded"
        );
        self.commit(next);
        Ok(record)
    }

    pub fn complete_goal(&mut self, goal_id: &str) -> bool {
        let Some(goal) = self.ledger.goal(goal_id) else {
            return false;
        };
        if goal.is_completed() || !goal.is_fully_funded() {
            return false;
        }
        let (reward, target) = (goal.points_reward, goal.target_amount);

        let mut next = self.ledger.clone();
        let first_completion = !next.goals.iter().any(|g| g.is_completed());
        if let Some(g) = next.goals.iter_mut().find(|g| g.id == goal_id) {
            g.mark_completed();
        }
        let mut earned = reward;
        if first_completion {
            earned = earned.saturating_add(unlock_in(&mut next, achievement_ids::GOAL_GETTER));
        }
        next.points = next.points.saturating_add(earned);
        if self.funding == GoalFunding::Legacy {
            let Some(balance) = next.balance.checked_sub(target) else {
                warn!(goal_id, "goal completion would overflow the balance");
                return false;
            };
            next.balance = balance;
        }

        debug!(goal_id, earned, funding = ?self.funding, "goal completed");
        self.commit(next);
        true
    }

    pub fn add_goal(
        &mut self,
        title: &str,
        subtitle: &str,
        target_amount: Decimal,
        points_reward: u64,
    ) -> Result<String, LedgerError> {
        if target_amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidTarget(target_amount));
        }
        let title = title.trim();
        if title.is_empty() {
            return Err(LedgerError::EmptyTitle);
        }
        let goal = Goal::new(
            new_id(),
            title.to_string(),
            subtitle.trim().to_string(),
            target_amount,
            points_reward,
        );
        let id = goal.id.clone();
        let mut next = self.ledger.clone();
        next.goals.push(goal);
        debug!(goal_id = %id, %target_amount, "goal added");
        self.commit(next);
        Ok(id)
    }

    /// Returns `Ok(false)` when the goal is unknown, or when the patch
    /// would retarget a goal that is already completed.
    pub fn update_goal(&mut self, goal_id: &str, patch: GoalPatch) -> Result<bool, LedgerError> {
        if let Some(target) = patch.target_amount {
            if target <= Decimal::ZERO {
                return Err(LedgerError::InvalidTarget(target));
            }
        }
        if matches!(patch.title.as_deref(), Some(t) if t.trim().is_empty()) {
            return Err(LedgerError::EmptyTitle);
        }
        let Some(goal) = self.ledger.goal(goal_id) else {
            return Ok(false);
        };
        if goal.is_completed() && patch.target_amount.is_some() {
            return Ok(false);
        }

        let mut next = self.ledger.clone();
        if let Some(g) = next.goals.iter_mut().find(|g| g.id == goal_id) {
            if let Some(title) = patch.title {
                g.title = title.trim().to_string();
            }
            if let Some(subtitle) = patch.subtitle {
                g.subtitle = subtitle.trim().to_string();
            }
            if let Some(target) = patch.target_amount {
                g.retarget(target);
            }
            if let Some(points) = patch.points_reward {
                g.points_reward = points;
            }
        }
        debug!(goal_id, "goal updated");
        self.commit(next);
        Ok(true)
    }

    pub fn delete_goal(&mut self, goal_id: &str) -> bool {
        if self.ledger.goal(goal_id).is_none() {
            return false;
        }
        let mut next = self.ledger.clone();
        next.goals.retain(|g| g.id != goal_id);
        debug!(goal_id, "goal deleted");
        self.commit(next);
        true
    }

    /// Moves `amount` from the balance toward a goal. The running total is
    /// capped at the target, but the whole `amount` leaves the balance.
    /// Returns the goal's completion flag after the contribution.
    pub fn add_to_goal(&mut self, goal_id: &str, amount: Decimal) -> Result<bool, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }
        match self.ledger.goal(goal_id) {
            Some(g) if !g.is_completed() => {}
            _ => return Ok(false),
        }

        let mut next = self.ledger.clone();
        let mut completed = false;
        let mut earned = 0;
        if let Some(g) = next.goals.iter_mut().find(|g| g.id == goal_id) {
            if g.fund(amount) {
                earned = g.points_reward;
            }
            completed = g.is_completed();
        }
        next.points = next.points.saturating_add(earned);
        next.balance = next
            .balance
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow)?;

        debug!(goal_id, %amount, completed, "goal funded");
        self.commit(next);
        Ok(completed)
    }

    pub fn add_chore(
        &mut self,
        title: &str,
        description: &str,
        points_reward: u64,
    ) -> Result<String, LedgerError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LedgerError::EmptyTitle);
        }
        let chore = Chore::new(
            new_id(),
            title.to_string(),
            description.trim().to_string(),
            points_reward,
        );
        let id = chore.id.clone();
        let mut next = self.ledger.clone();
        next.chores.push(chore);
        debug!(chore_id = %id, points_reward, "chore added");
        self.commit(next);
        Ok(id)
    }

    pub fn update_chore(&mut self, chore_id: &str, patch: ChorePatch) -> Result<bool, LedgerError> {
        if matches!(patch.title.as_deref(), Some(t) if t.trim().is_empty()) {
            return Err(LedgerError::EmptyTitle);
        }
        if self.ledger.chore(chore_id).is_none() {
            return Ok(false);
        }
        let mut next = self.ledger.clone();
        if let Some(c) = next.chores.iter_mut().find(|c| c.id == chore_id) {
            if let Some(title) = patch.title {
                c.title = title.trim().to_string();
            }
            if let Some(description) = patch.description {
                c.description = description.trim().to_string();
            }
            if let Some(points) = patch.points_reward {
                c.points_reward = points;
            }
        }
        debug!(chore_id, "chore updated");
        self.commit(next);
        Ok(true)
    }

    pub fn delete_chore(&mut self, chore_id: &str) -> bool {
        if self.ledger.chore(chore_id).is_none() {
            return false;
        }
        let mut next = self.ledger.clone();
        next.chores.retain(|c| c.id != chore_id);
        debug!(chore_id, "chore deleted");
        self.commit(next);
        true
    }

    pub fn complete_chore(&mut self, chore_id: &str, completed_by: Option<String>) -> bool {
        let reward = match self.ledger.chore(chore_id) {
            Some(c) if !c.is_completed() => c.points_reward,
            _ => return false,
        };
        let mut next = self.ledger.clone();
        if let Some(c) = next.chores.iter_mut().find(|c| c.id == chore_id) {
            c.mark_completed(completed_by);
        }
        next.points = next.points.saturating_add(reward);
        debug!(chore_id, reward, "chore completed");
        self.commit(next);
        true
    }

    pub fn redeem_reward(&mut self, reward_id: &str) -> bool {
        let cost = match self.ledger.reward(reward_id) {
            Some(r) if !r.is_unlocked() => r.cost,
            _ => return false,
        };
        if self.ledger.points < cost {
            return false;
        }
        let mut next = self.ledger.clone();
        if let Some(r) = next.rewards.iter_mut().find(|r| r.id == reward_id) {
            r.unlock();
        }
        next.points -= cost;
        debug!(reward_id, cost, "reward redeemed");
        self.commit(next);
        true
    }

    pub fn add_points(&mut self, amount: u64) {
        let mut next = self.ledger.clone();
        next.points = next.points.saturating_add(amount);
        debug!(amount, "points added");
        self.commit(next);
    }

    pub fn deduct_points(&mut self, amount: u64) -> bool {
        if self.ledger.points < amount {
            return false;
        }
        let mut next = self.ledger.clone();
        next.points -= amount;
        debug!(amount, "points deducted");
        self.commit(next);
        true
    }

    /// Adds experience, carrying across as many levels as it covers.
    /// Returns the number of levels gained.
    pub fn add_xp(&mut self, amount: u64) -> u32 {
        let mut next = self.ledger.clone();
        if next.xp_to_next_level == 0 {
            next.xp_to_next_level = xp_threshold(next.level.max(1));
        }
        next.xp = next.xp.saturating_add(amount);
        let start = next.level;
        while next.xp >= next.xp_to_next_level {
            next.xp -= next.xp_to_next_level;
            next.level += 1;
            next.xp_to_next_level = xp_threshold(next.level);
        }
        let gained = next.level - start;
        debug!(amount, level = next.level, xp = next.xp, gained, "xp added");
        self.commit(next);
        gained
    }

    /// Idempotent: points are awarded only on the first unlock.
    pub fn unlock_achievement(&mut self, achievement_id: &str) -> bool {
        match self.ledger.achievement(achievement_id) {
            Some(a) if !a.is_unlocked() => {}
            _ => return false,
        }
        let mut next = self.ledger.clone();
        let earned = unlock_in(&mut next, achievement_id);
        next.points = next.points.saturating_add(earned);
        debug!(achievement_id, earned, "achievement unlocked");
        self.commit(next);
        true
    }

    pub fn reset_all_data(&mut self) {
        info!("resetting ledger");
        self.commit(Ledger::zeroed());
    }

    /// Pins the headline numbers to the development values used by the
    /// bypass login.
    #[cfg(feature = "dev-bypass")]
    pub fn apply_dev_override(&mut self) {
        let mut next = self.ledger.clone();
        next.balance = Decimal::from(99_999);
        next.points = 99_999;
        next.streak = 99_999;
        next.level = 999;
        next.xp_to_next_level = xp_threshold(next.level);
        next.xp = 99_999 % next.xp_to_next_level;
        self.commit(next);
    }
}

/// Unlocks an achievement inside a snapshot being built and returns the
/// points it is worth, or 0 when it is unknown or already unlocked.
fn unlock_in(ledger: &mut Ledger, achievement_id: &str) -> u64 {
    match ledger
        .achievements
        .iter_mut()
        .find(|a| a.id == achievement_id)
    {
        Some(a) if !a.is_unlocked() => {
            a.unlock();
            a.points
        }
        _ => 0,
    }
}
