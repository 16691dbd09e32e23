// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use chrono::NaiveDate;
use copperone::db::{DurableStore, MemoryStore, keys};
use copperone::engine::{AppState, ChorePatch, GoalFunding, GoalPatch, SeedMode};
use copperone::error::LedgerError;
use copperone::models::{Ledger, NewTransaction, TxKind, achievement_ids};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn state_with(ledger: Ledger, funding: GoalFunding) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::with_ledger(store.clone(), ledger, funding);
    (state, store)
}

fn deposit(amount: &str) -> NewTransaction {
    NewTransaction {
        title: "Allowance".into(),
        category: "Allowance".into(),
        date: NaiveDate::from_ymd_opt(2025, 11, 10).unwrap(),
        amount: dec(amount),
        kind: TxKind::In,
    }
}

fn spend(amount: &str) -> NewTransaction {
    NewTransaction {
        title: "Snack".into(),
        category: "Food".into(),
        kind: TxKind::Out,
        ..deposit(amount)
    }
}

#[test]
fn first_deposit_updates_balance_and_unlocks_achievement() {
    let mut ledger = Ledger::zeroed();
    ledger.balance = dec("127.50");
    let (mut state, _) = state_with(ledger, GoalFunding::Legacy);

    let tx = state.record_transaction(deposit("25.00")).unwrap();

    let l = state.ledger();
    assert_eq!(l.balance, dec("152.50"));
    assert_eq!(l.points, 50);
    assert!(l.achievement(achievement_ids::FIRST_DEPOSIT).unwrap().is_unlocked());
    assert_eq!(l.transactions[0].id, tx.id);
}

#[test]
fn second_deposit_does_not_pay_first_deposit_again() {
    let (mut state, _) = state_with(Ledger::zeroed(), GoalFunding::Legacy);
    state.record_transaction(deposit("5")).unwrap();
    state.record_transaction(deposit("5")).unwrap();
    assert_eq!(state.ledger().points, 50);
    assert_eq!(state.ledger().transactions.len(), 2);
}

#[test]
fn spending_lowers_balance_and_can_go_negative() {
    let (mut state, _) = state_with(Ledger::zeroed(), GoalFunding::Legacy);
    state.record_transaction(spend("3.25")).unwrap();
    assert_eq!(state.ledger().balance, dec("-3.25"));
    assert_eq!(state.ledger().points, 0);
}

#[test]
fn newest_transaction_is_first() {
    let (mut state, _) = state_with(Ledger::zeroed(), GoalFunding::Legacy);
    state.record_transaction(deposit("1")).unwrap();
    let newest = state.record_transaction(spend("2")).unwrap();
    assert_eq!(state.ledger().transactions[0].id, newest.id);
}

#[test]
fn super_saver_fires_once_lifetime_deposits_reach_500() {
    let (mut state, _) = state_with(Ledger::zeroed(), GoalFunding::Legacy);
    state.record_transaction(deposit("499.99")).unwrap();
    assert!(
        !state
            .ledger()
            .achievement(achievement_ids::SUPER_SAVER)
            .unwrap()
            .is_unlocked()
    );
    state.record_transaction(deposit("0.01")).unwrap();
    assert!(
        state
            .ledger()
            .achievement(achievement_ids::SUPER_SAVER)
            .unwrap()
            .is_unlocked()
    );
    // 50 first deposit + 250 super saver
    assert_eq!(state.ledger().points, 300);
    state.record_transaction(deposit("100")).unwrap();
    assert_eq!(state.ledger().points, 300);
}

#[test]
fn non_positive_amounts_and_blank_titles_are_rejected() {
    let (mut state, _) = state_with(Ledger::zeroed(), GoalFunding::Legacy);
    assert_eq!(
        state.record_transaction(deposit("0")).unwrap_err(),
        LedgerError::InvalidAmount(Decimal::ZERO)
    );
    assert!(matches!(
        state.record_transaction(deposit("-4")),
        Err(LedgerError::InvalidAmount(_))
    ));
    let blank = NewTransaction {
        title: "   ".into(),
        ..deposit("4")
    };
    assert_eq!(
        state.record_transaction(blank).unwrap_err(),
        LedgerError::EmptyTitle
    );
    assert!(state.ledger().transactions.is_empty());
}

#[test]
fn xp_carries_across_several_levels() {
    let mut ledger = Ledger::zeroed();
    ledger.xp_to_next_level = 600;
    let (mut state, _) = state_with(ledger, GoalFunding::Legacy);

    let gained = state.add_xp(1300);

    let l = state.ledger();
    assert_eq!(gained, 2);
    assert_eq!(l.level, 3);
    assert_eq!(l.xp_to_next_level, 800);
    assert_eq!(l.xp, 0);
}

#[test]
fn xp_below_threshold_does_not_level() {
    let (mut state, _) = state_with(Ledger::zeroed(), GoalFunding::Legacy);
    assert_eq!(state.add_xp(499), 0);
    assert_eq!(state.ledger().level, 1);
    assert_eq!(state.ledger().xp, 499);
}

#[test]
fn redeem_needs_enough_points_and_is_one_way() {
    let mut ledger = Ledger::zeroed();
    ledger.points = 100;
    let (mut state, _) = state_with(ledger, GoalFunding::Legacy);

    assert!(!state.redeem_reward("3"));
    assert_eq!(state.ledger().points, 100);

    state.add_points(150);
    assert!(state.redeem_reward("3"));
    assert_eq!(state.ledger().points, 50);
    assert!(state.ledger().reward("3").unwrap().is_unlocked());

    state.add_points(500);
    assert!(!state.redeem_reward("3"));
    assert_eq!(state.ledger().points, 550);
}

#[test]
fn free_rewards_start_unlocked_and_cannot_be_redeemed() {
    let (mut state, _) = state_with(Ledger::zeroed(), GoalFunding::Legacy);
    assert!(state.ledger().reward("1").unwrap().is_unlocked());
    assert!(state.ledger().reward("2").unwrap().is_unlocked());
    assert!(!state.redeem_reward("1"));
    assert!(!state.redeem_reward("nope"));
}

#[test]
fn deduct_points_refuses_to_go_below_zero() {
    let mut ledger = Ledger::zeroed();
    ledger.points = 10;
    let (mut state, _) = state_with(ledger, GoalFunding::Legacy);
    assert!(!state.deduct_points(11));
    assert_eq!(state.ledger().points, 10);
    assert!(state.deduct_points(10));
    assert_eq!(state.ledger().points, 0);
}

#[test]
fn unlock_achievement_pays_only_once() {
    let (mut state, _) = state_with(Ledger::zeroed(), GoalFunding::Legacy);
    assert!(state.unlock_achievement(achievement_ids::QUIZ_MASTER));
    assert_eq!(state.ledger().points, 200);
    assert!(!state.unlock_achievement(achievement_ids::QUIZ_MASTER));
    assert_eq!(state.ledger().points, 200);
    assert!(!state.unlock_achievement("99"));
}

#[test]
fn funding_caps_progress_but_charges_full_amount() {
    let mut ledger = Ledger::zeroed();
    ledger.balance = dec("100");
    let (mut state, _) = state_with(ledger, GoalFunding::Legacy);
    let id = state.add_goal("Kite", "", dec("50"), 20).unwrap();

    assert!(!state.add_to_goal(&id, dec("30")).unwrap());
    assert_eq!(state.ledger().balance, dec("70"));
    assert!(!state.complete_goal(&id));

    assert!(state.add_to_goal(&id, dec("40")).unwrap());
    let goal = state.ledger().goal(&id).unwrap();
    assert_eq!(goal.current_amount(), dec("50"));
    assert!(goal.is_completed());
    assert_eq!(state.ledger().balance, dec("30"));
    assert_eq!(state.ledger().points, 20);

    // Completed goals take no more money.
    assert!(!state.add_to_goal(&id, dec("5")).unwrap());
    assert_eq!(state.ledger().balance, dec("30"));
    assert!(!state.complete_goal(&id));
}

#[test]
fn add_to_goal_validates_amount_and_id() {
    let (mut state, _) = state_with(Ledger::zeroed(), GoalFunding::Legacy);
    let id = state.add_goal("Kite", "", dec("50"), 0).unwrap();
    assert!(matches!(
        state.add_to_goal(&id, Decimal::ZERO),
        Err(LedgerError::InvalidAmount(_))
    ));
    assert!(!state.add_to_goal("missing", dec("1")).unwrap());
    assert_eq!(state.ledger().balance, Decimal::ZERO);
}

/// A goal made whole by lowering its target stays open until completed.
fn fully_funded_open_goal(state: &mut AppState) -> String {
    let id = state.add_goal("Skates", "", dec("100"), 40).unwrap();
    state.add_to_goal(&id, dec("60")).unwrap();
    let patch = GoalPatch {
        target_amount: Some(dec("60")),
        ..GoalPatch::default()
    };
    assert!(state.update_goal(&id, patch).unwrap());
    let goal = state.ledger().goal(&id).unwrap();
    assert!(goal.is_fully_funded());
    assert!(!goal.is_completed());
    id
}

#[test]
fn legacy_completion_charges_the_target_again() {
    let mut ledger = Ledger::zeroed();
    ledger.balance = dec("200");
    let (mut state, _) = state_with(ledger, GoalFunding::Legacy);
    let id = fully_funded_open_goal(&mut state);
    assert_eq!(state.ledger().balance, dec("140"));

    assert!(state.complete_goal(&id));

    let l = state.ledger();
    assert_eq!(l.balance, dec("80"));
    // reward plus Goal Getter
    assert_eq!(l.points, 40 + 150);
    assert!(l.achievement(achievement_ids::GOAL_GETTER).unwrap().is_unlocked());
    assert!(!state.complete_goal(&id));
}

#[test]
fn contribution_completion_only_marks_and_rewards() {
    let mut ledger = Ledger::zeroed();
    ledger.balance = dec("200");
    let (mut state, _) = state_with(ledger, GoalFunding::Contribution);
    let id = fully_funded_open_goal(&mut state);

    assert!(state.complete_goal(&id));

    assert_eq!(state.ledger().balance, dec("140"));
    assert_eq!(state.ledger().points, 190);
    assert!(state.ledger().goal(&id).unwrap().is_completed());
}

#[test]
fn completed_goals_cannot_be_retargeted() {
    let (mut state, _) = state_with(Ledger::zeroed(), GoalFunding::Legacy);
    let id = state.add_goal("Ball", "", dec("10"), 0).unwrap();
    state.add_to_goal(&id, dec("10")).unwrap();
    let retarget = GoalPatch {
        target_amount: Some(dec("20")),
        ..GoalPatch::default()
    };
    assert!(!state.update_goal(&id, retarget).unwrap());
    let rename = GoalPatch {
        title: Some("Soccer ball".into()),
        ..GoalPatch::default()
    };
    assert!(state.update_goal(&id, rename).unwrap());
    let goal = state.ledger().goal(&id).unwrap();
    assert_eq!(goal.title, "Soccer ball");
    assert!(goal.is_completed());
}

#[test]
fn goal_validation_and_delete() {
    let (mut state, _) = state_with(Ledger::zeroed(), GoalFunding::Legacy);
    assert!(matches!(
        state.add_goal("Bike", "", Decimal::ZERO, 0),
        Err(LedgerError::InvalidTarget(_))
    ));
    assert_eq!(
        state.add_goal(" ", "", dec("1"), 0).unwrap_err(),
        LedgerError::EmptyTitle
    );
    let id = state.add_goal("Bike", "", dec("1"), 0).unwrap();
    assert!(state.delete_goal(&id));
    assert!(!state.delete_goal(&id));
}

#[test]
fn chores_pay_once_and_record_who_did_them() {
    let (mut state, _) = state_with(Ledger::zeroed(), GoalFunding::Legacy);
    let id = state.add_chore("Feed the cat", "Twice a day", 15).unwrap();

    assert!(state.complete_chore(&id, Some("Sam".into())));
    assert_eq!(state.ledger().points, 15);
    let chore = state.ledger().chore(&id).unwrap();
    assert!(chore.is_completed());
    assert_eq!(chore.completed_by(), Some("Sam"));
    assert!(chore.completed_at().is_some());

    assert!(!state.complete_chore(&id, None));
    assert_eq!(state.ledger().points, 15);
    assert!(!state.complete_chore("missing", None));
}

#[test]
fn chore_edit_keeps_completion() {
    let (mut state, _) = state_with(Ledger::zeroed(), GoalFunding::Legacy);
    let id = state.add_chore("Dishes", "", 5).unwrap();
    state.complete_chore(&id, None);
    let patch = ChorePatch {
        points_reward: Some(50),
        ..ChorePatch::default()
    };
    assert!(state.update_chore(&id, patch).unwrap());
    let chore = state.ledger().chore(&id).unwrap();
    assert_eq!(chore.points_reward, 50);
    assert!(chore.is_completed());
    assert!(!state.update_chore("missing", ChorePatch::default()).unwrap());
    assert!(state.delete_chore(&id));
}

#[test]
fn reset_restores_the_zeroed_ledger() {
    let (mut state, _) = state_with(Ledger::sample(), GoalFunding::Legacy);
    state.reset_all_data();
    let l = state.ledger();
    assert_eq!(l, &Ledger::zeroed());
    assert_eq!(l.level, 1);
    assert_eq!(l.xp_to_next_level, 500);
    assert!(l.goals.is_empty());
    assert!(l.achievements.iter().all(|a| !a.is_unlocked()));
    assert_eq!(l.rewards.iter().filter(|r| r.is_unlocked()).count(), 2);
}

#[test]
fn sample_seed_matches_demo_numbers() {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::load(store, SeedMode::Sample, GoalFunding::Legacy);
    let l = state.ledger();
    assert_eq!(l.balance, dec("127.50"));
    assert_eq!(l.points, 850);
    assert_eq!(l.level, 8);
    assert_eq!(l.goals.len(), 3);
    assert_eq!(l.transactions.len(), 2);
    assert!(l.invariant_violations().is_empty());
}

#[test]
fn every_mutation_is_persisted() {
    let store = Arc::new(MemoryStore::new());
    let mut state = AppState::load(store.clone(), SeedMode::Empty, GoalFunding::Legacy);
    state.record_transaction(deposit("12")).unwrap();
    state.add_chore("Rake leaves", "", 10).unwrap();

    let reloaded = AppState::load(store, SeedMode::Sample, GoalFunding::Legacy);
    assert_eq!(reloaded.ledger(), state.ledger());
}

struct ReadOnlyStore;

impl DurableStore for ReadOnlyStore {
    fn read_raw(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn write_raw(&self, key: &str, _value: &str) -> Result<()> {
        bail!("disk full writing {}", key)
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

#[test]
fn write_failures_keep_the_in_memory_ledger() {
    let mut state = AppState::load(Arc::new(ReadOnlyStore), SeedMode::Empty, GoalFunding::Legacy);
    state.record_transaction(deposit("8")).unwrap();
    assert_eq!(state.ledger().balance, dec("8"));
    let err = state.flush().unwrap_err();
    assert!(err.to_string().contains(keys::LEDGER));
}

#[test]
fn point_awards_saturate_instead_of_wrapping() {
    let mut ledger = Ledger::zeroed();
    ledger.points = u64::MAX - 10;
    let (mut state, _) = state_with(ledger, GoalFunding::Legacy);

    let chore = state.add_chore("Dishes", "", 100).unwrap();
    assert!(state.complete_chore(&chore, None));
    assert_eq!(state.ledger().points, u64::MAX);

    state.record_transaction(deposit("5.00")).unwrap();
    assert!(state.ledger().achievement(achievement_ids::FIRST_DEPOSIT).unwrap().is_unlocked());
    assert_eq!(state.ledger().points, u64::MAX);

    assert!(state.unlock_achievement(achievement_ids::QUIZ_MASTER));
    assert_eq!(state.ledger().points, u64::MAX);
}

#[test]
fn deposit_past_the_decimal_range_is_rejected() {
    let mut ledger = Ledger::zeroed();
    ledger.balance = Decimal::MAX;
    let (mut state, store) = state_with(ledger, GoalFunding::Legacy);

    assert_eq!(state.record_transaction(deposit("1")), Err(LedgerError::Overflow));
    let l = state.ledger();
    assert_eq!(l.balance, Decimal::MAX);
    assert!(l.transactions.is_empty());
    assert_eq!(l.points, 0);
    assert!(store.read_raw(keys::LEDGER).unwrap().is_none());
}

#[test]
fn spending_past_the_decimal_range_is_rejected() {
    let mut ledger = Ledger::zeroed();
    ledger.balance = Decimal::MIN;
    let (mut state, _) = state_with(ledger, GoalFunding::Legacy);

    assert_eq!(state.record_transaction(spend("1")), Err(LedgerError::Overflow));
    assert_eq!(state.ledger().balance, Decimal::MIN);
    assert!(state.ledger().transactions.is_empty());
}

#[test]
fn goal_contribution_past_the_decimal_range_leaves_the_goal_alone() {
    let (mut state, _) = state_with(Ledger::sample(), GoalFunding::Legacy);

    assert_eq!(state.add_to_goal("3", Decimal::MAX), Err(LedgerError::Overflow));
    let l = state.ledger();
    assert_eq!(l.balance, dec("127.50"));
    assert_eq!(l.goal("3").unwrap().current_amount(), dec("100"));
    assert!(!l.goal("3").unwrap().is_completed());
    assert_eq!(l.points, 850);
}
