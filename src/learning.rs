// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::{DurableStore, keys, read_doc, write_doc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LearningModule {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub topics: &'static [&'static str],
}

pub static MODULES: [LearningModule; 6] = [
    LearningModule {
        id: "1",
        title: "Saving and Budgeting",
        description: "Learn how to save money and create budgets to reach your financial goals.",
        url: "https://www.khanacademy.org/college-careers-more/financial-literacy/xa6995ea67a8e9fdd:saving-and-budgeting",
        topics: &["Saving", "Budgeting", "Emergency Funds", "Financial Goals"],
    },
    LearningModule {
        id: "2",
        title: "Interest and Debt",
        description: "Understand how interest works and how to manage debt responsibly.",
        url: "https://www.khanacademy.org/college-careers-more/financial-literacy/xa6995ea67a8e9fdd:interest-and-debt",
        topics: &["Interest Rates", "Credit Cards", "Loans", "Debt Management"],
    },
    LearningModule {
        id: "3",
        title: "Investments and Retirement",
        description: "Explore how to invest money and plan for your financial future.",
        url: "https://www.khanacademy.org/college-careers-more/financial-literacy/xa6995ea67a8e9fdd:investments-and-retirement",
        topics: &["Stocks", "Bonds", "Retirement Planning", "401(k)"],
    },
    LearningModule {
        id: "4",
        title: "Income and Benefits",
        description: "Learn about different types of income and employee benefits.",
        url: "https://www.khanacademy.org/college-careers-more/financial-literacy/xa6995ea67a8e9fdd:income-and-benefits",
        topics: &["Salary", "Benefits", "Taxes", "Paychecks"],
    },
    LearningModule {
        id: "5",
        title: "Housing",
        description: "Understand the costs and responsibilities of renting and owning a home.",
        url: "https://www.khanacademy.org/college-careers-more/financial-literacy/xa6995ea67a8e9fdd:housing",
        topics: &["Renting", "Buying a Home", "Mortgages", "Home Expenses"],
    },
    LearningModule {
        id: "6",
        title: "Car Expenses",
        description: "Learn about the true cost of owning and maintaining a car.",
        url: "https://www.khanacademy.org/college-careers-more/financial-literacy/xa6995ea67a8e9fdd:car-expenses",
        topics: &["Car Payments", "Insurance", "Maintenance", "Gas"],
    },
];

pub fn module(id: &str) -> Option<&'static LearningModule> {
    MODULES.iter().find(|m| m.id == id)
}

/// Which catalog modules the child has marked as done.
pub struct LearningProgress {
    completed: BTreeSet<String>,
    store: Arc<dyn DurableStore>,
}

impl LearningProgress {
    pub fn load(store: Arc<dyn DurableStore>) -> Self {
        let completed: BTreeSet<String> = read_doc(store.as_ref(), keys::LEARNING_COMPLETED)
            .unwrap_or_default();
        // Ids that left the catalog are dropped on load.
        let completed = completed
            .into_iter()
            .filter(|id| module(id).is_some())
            .collect();
        Self { completed, store }
    }

    /// Flips a module between done and not done. Returns the new state,
    /// or `None` for an id outside the catalog.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let id = id.trim();
        module(id)?;
        let now_done = if self.completed.remove(id) {
            false
        } else {
            self.completed.insert(id.to_string());
            true
        };
        debug!(module_id = id, now_done, "learning module toggled");
        self.persist();
        Some(now_done)
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Whole-number percentage of the catalog completed.
    pub fn percent_complete(&self) -> Decimal {
        (Decimal::from(self.completed.len() * 100) / Decimal::from(MODULES.len())).round()
    }

    pub fn clear(&mut self) {
        self.completed.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = write_doc(self.store.as_ref(), keys::LEARNING_COMPLETED, &self.completed) {
            error!(error = %err, "failed to persist learning progress");
        }
    }
}
