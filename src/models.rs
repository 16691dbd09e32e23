// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const SUPER_SAVER_TOTAL: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

pub mod achievement_ids {
    pub const FIRST_DEPOSIT: &str = "1";
    pub const SAVING_STREAK: &str = "2";
    pub const GOAL_GETTER: &str = "3";
    pub const QUIZ_MASTER: &str = "4";
    pub const SUPER_SAVER: &str = "5";
}

/// XP needed to leave `level`.
pub fn xp_threshold(level: u32) -> u64 {
    u64::from(level) * 100 + 500
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    In,
    Out,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::In => "in",
            TxKind::Out => "out",
        }
    }
}

impl std::str::FromStr for TxKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" => Ok(TxKind::In),
            "out" => Ok(TxKind::Out),
            other => Err(format!("Unknown transaction type '{}', expected in|out", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub title: String,
    pub category: String,
    pub date: NaiveDate,
    /// Positive magnitude; direction is carried by `kind`.
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TxKind,
}

impl Transaction {
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TxKind::In => self.amount,
            TxKind::Out => -self.amount,
        }
    }

    pub fn display_date(&self) -> String {
        format!(
            "{}/{}/{}",
            self.date.month(),
            self.date.day(),
            self.date.year()
        )
    }
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub title: String,
    pub category: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub kind: TxKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GoalStatus {
    Open,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub target_amount: Decimal,
    current_amount: Decimal,
    status: GoalStatus,
    pub points_reward: u64,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub(crate) fn new(
        id: String,
        title: String,
        subtitle: String,
        target_amount: Decimal,
        points_reward: u64,
    ) -> Self {
        Self {
            id,
            title,
            subtitle,
            target_amount,
            current_amount: Decimal::ZERO,
            status: GoalStatus::Open,
            points_reward,
            created_at: Utc::now(),
        }
    }

    pub fn current_amount(&self) -> Decimal {
        self.current_amount
    }

    pub fn status(&self) -> GoalStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == GoalStatus::Completed
    }

    pub fn is_fully_funded(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    pub fn remaining(&self) -> Decimal {
        self.target_amount
            .saturating_sub(self.current_amount)
            .max(Decimal::ZERO)
    }

    pub fn progress_percent(&self) -> Decimal {
        if self.target_amount.is_zero() {
            return Decimal::ZERO;
        }
        self.current_amount
            .checked_div(self.target_amount)
            .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(Decimal::ONE_HUNDRED, |pct| pct.round_dp(0).min(Decimal::ONE_HUNDRED))
    }

    /// Caps the running total at the target. Returns true when the goal
    /// becomes completed by this contribution.
    pub(crate) fn fund(&mut self, amount: Decimal) -> bool {
        self.current_amount = self
            .current_amount
            .saturating_add(amount)
            .min(self.target_amount);
        if self.status == GoalStatus::Open && self.current_amount >= self.target_amount {
            self.status = GoalStatus::Completed;
            return true;
        }
        false
    }

    pub(crate) fn mark_completed(&mut self) {
        self.status = GoalStatus::Completed;
    }

    pub(crate) fn retarget(&mut self, target: Decimal) {
        self.target_amount = target;
        self.current_amount = self.current_amount.min(target);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChoreStatus {
    Open,
    Completed {
        completed_by: Option<String>,
        completed_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points_reward: u64,
    status: ChoreStatus,
    pub created_at: DateTime<Utc>,
}

impl Chore {
    pub(crate) fn new(id: String, title: String, description: String, points_reward: u64) -> Self {
        Self {
            id,
            title,
            description,
            points_reward,
            status: ChoreStatus::Open,
            created_at: Utc::now(),
        }
    }

    pub fn status(&self) -> &ChoreStatus {
        &self.status
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, ChoreStatus::Completed { .. })
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match &self.status {
            ChoreStatus::Completed { completed_at, .. } => Some(*completed_at),
            ChoreStatus::Open => None,
        }
    }

    pub fn completed_by(&self) -> Option<&str> {
        match &self.status {
            ChoreStatus::Completed { completed_by, .. } => completed_by.as_deref(),
            ChoreStatus::Open => None,
        }
    }

    pub(crate) fn mark_completed(&mut self, completed_by: Option<String>) {
        self.status = ChoreStatus::Completed {
            completed_by,
            completed_at: Utc::now(),
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unlock {
    Locked,
    Unlocked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cost: u64,
    state: Unlock,
    pub icon: Option<String>,
}

impl Reward {
    fn catalog_entry(id: &str, title: &str, description: &str, cost: u64, icon: &str) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            cost,
            state: Unlock::Locked,
            icon: Some(icon.into()),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == Unlock::Unlocked
    }

    pub(crate) fn unlock(&mut self) {
        self.state = Unlock::Unlocked;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points: u64,
    state: Unlock,
    pub icon: Option<String>,
}

impl Achievement {
    fn catalog_entry(id: &str, title: &str, description: &str, points: u64, icon: &str) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            points,
            state: Unlock::Locked,
            icon: Some(icon.into()),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == Unlock::Unlocked
    }

    pub(crate) fn unlock(&mut self) {
        self.state = Unlock::Unlocked;
    }
}

/// Reward shop catalog. The first two entries are free and always unlocked.
pub fn reward_catalog() -> Vec<Reward> {
    let mut rewards = vec![
        Reward::catalog_entry("1", "Custom Avatar", "Unlocked!", 0, "star"),
        Reward::catalog_entry("2", "Special Badge", "Unlocked!", 0, "badge"),
        Reward::catalog_entry("3", "Premium Theme", "Change your app theme", 200, "lightning"),
        Reward::catalog_entry("4", "Power Boost", "Double your earnings", 250, "heart"),
        Reward::catalog_entry("5", "Mystery Gift", "Surprise reward!", 300, "gift"),
        Reward::catalog_entry("6", "VIP Crown", "Exclusive VIP status", 500, "crown"),
    ];
    for r in rewards.iter_mut().take(2) {
        r.unlock();
    }
    rewards
}

pub fn achievement_catalog() -> Vec<Achievement> {
    use achievement_ids::*;
    vec![
        Achievement::catalog_entry(FIRST_DEPOSIT, "First Deposit", "Made your first deposit", 50, "badge"),
        Achievement::catalog_entry(SAVING_STREAK, "Saving Streak", "7 days of consistent saving", 100, "lightning"),
        Achievement::catalog_entry(GOAL_GETTER, "Goal Getter", "Completed your first savings goal", 150, "person"),
        Achievement::catalog_entry(QUIZ_MASTER, "Quiz Master", "Scored 100% on 5 quizzes", 200, "star"),
        Achievement::catalog_entry(SUPER_SAVER, "Super Saver", "Saved $500 total", 250, "piggy"),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    /// May go negative; deductions are not floored.
    pub balance: Decimal,
    pub points: u64,
    pub streak: u32,
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub chores: Vec<Chore>,
    /// Most recent first.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default = "reward_catalog")]
    pub rewards: Vec<Reward>,
    #[serde(default = "achievement_catalog")]
    pub achievements: Vec<Achievement>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl Ledger {
    pub fn zeroed() -> Self {
        Self {
            balance: Decimal::ZERO,
            points: 0,
            streak: 0,
            level: 1,
            xp: 0,
            xp_to_next_level: 500,
            goals: Vec::new(),
            chores: Vec::new(),
            transactions: Vec::new(),
            rewards: reward_catalog(),
            achievements: achievement_catalog(),
        }
    }

    pub fn sample() -> Self {
        let goal = |id: &str, title: &str, subtitle: &str, target: i64, current: i64, pts| {
            let mut g = Goal::new(id.into(), title.into(), subtitle.into(), Decimal::from(target), pts);
            g.fund(Decimal::from(current));
            g
        };
        let goals = vec![
            goal("1", "New Bike", "A cool new bike to ride around.", 1000, 250, 100),
            goal("2", "Video Game", "The latest adventure game.", 400, 150, 50),
            goal("3", "New Sneakers", "Comfy and stylish shoes.", 250, 100, 30),
        ];
        let day = NaiveDate::from_ymd_opt(2025, 11, 9).unwrap_or_default();
        let transactions = vec![
            Transaction {
                id: "1".into(),
                title: "Allowance".into(),
                category: "Allowance".into(),
                date: day,
                amount: Decimal::new(2500, 2),
                kind: TxKind::In,
            },
            Transaction {
                id: "2".into(),
                title: "Lunch".into(),
                category: "Food".into(),
                date: day,
                amount: Decimal::new(550, 2),
                kind: TxKind::Out,
            },
        ];
        let mut achievements = achievement_catalog();
        for a in achievements.iter_mut().take(3) {
            a.unlock();
        }
        Self {
            balance: Decimal::new(12750, 2),
            points: 850,
            streak: 13,
            level: 8,
            xp: 850,
            xp_to_next_level: 1000,
            goals,
            chores: Vec::new(),
            transactions,
            rewards: reward_catalog(),
            achievements,
        }
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn chore(&self, id: &str) -> Option<&Chore> {
        self.chores.iter().find(|c| c.id == id)
    }

    pub fn reward(&self, id: &str) -> Option<&Reward> {
        self.rewards.iter().find(|r| r.id == id)
    }

    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn lifetime_deposits(&self) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| t.kind == TxKind::In)
            .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount))
    }

    pub fn has_deposit(&self) -> bool {
        self.transactions.iter().any(|t| t.kind == TxKind::In)
    }

    /// Human-readable descriptions of every broken invariant.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.level < 1 {
            out.push(format!("level {} is below 1", self.level));
        }
        if self.xp >= self.xp_to_next_level {
            out.push(format!(
                "xp {} is not below threshold {}",
                self.xp, self.xp_to_next_level
            ));
        }
        for g in &self.goals {
            if g.current_amount < Decimal::ZERO || g.current_amount > g.target_amount {
                out.push(format!(
                    "goal '{}' funded {} outside 0..={}",
                    g.title, g.current_amount, g.target_amount
                ));
            }
            if g.is_completed() && !g.is_fully_funded() {
                out.push(format!("goal '{}' completed but not fully funded", g.title));
            }
        }
        out
    }
}
