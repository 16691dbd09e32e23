// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only summaries over the ledger's transactions.

use crate::models::{Transaction, TxKind};
use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_TOP_CATEGORIES: usize = 5;
pub const DEFAULT_TREND_DAYS: u32 = 7;
pub const MAX_TREND_DAYS: u32 = 366;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub this_month: MonthTotals,
    pub last_month: MonthTotals,
    /// Percent change against last month; 0 when last month had none.
    pub income_change: Decimal,
    pub expense_change: Decimal,
    pub total_transactions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySpend {
    pub date: NaiveDate,
    pub total: Decimal,
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn totals_for(transactions: &[Transaction], year: i32, month: u32) -> MonthTotals {
    let mut totals = MonthTotals::default();
    for tx in transactions
        .iter()
        .filter(|t| t.date.year() == year && t.date.month() == month)
    {
        match tx.kind {
            TxKind::In => totals.income = totals.income.saturating_add(tx.amount),
            TxKind::Out => totals.expenses = totals.expenses.saturating_add(tx.amount),
        }
    }
    totals.net = totals.income.saturating_sub(totals.expenses);
    totals
}

fn percent_change(now: Decimal, before: Decimal) -> Decimal {
    if before > Decimal::ZERO {
        now.saturating_sub(before)
            .checked_div(before)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(Decimal::MAX, |pct| pct.round_dp(1))
    } else {
        Decimal::ZERO
    }
}

pub fn monthly_summary(transactions: &[Transaction], today: NaiveDate) -> MonthlySummary {
    let (year, month) = (today.year(), today.month());
    let (last_year, last_month) = previous_month(year, month);
    let this_month = totals_for(transactions, year, month);
    let last = totals_for(transactions, last_year, last_month);
    MonthlySummary {
        year,
        month,
        income_change: percent_change(this_month.income, last.income),
        expense_change: percent_change(this_month.expenses, last.expenses),
        this_month,
        last_month: last,
        total_transactions: transactions.len(),
    }
}

/// Spending per category, largest first. Ties are ordered by name.
pub fn top_categories(transactions: &[Transaction], limit: usize) -> Vec<CategoryTotal> {
    let mut by_category: HashMap<&str, Decimal> = HashMap::new();
    for tx in transactions.iter().filter(|t| t.kind == TxKind::Out) {
        let total = by_category.entry(tx.category.as_str()).or_default();
        *total = total.saturating_add(tx.amount);
    }
    let mut out: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    out.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    out.truncate(limit);
    out
}

/// Spending per day for the `days` days ending on `today`, oldest first.
/// Days without spending are reported as zero. The window is capped at
/// [`MAX_TREND_DAYS`] and stops at the earliest representable date.
pub fn daily_spending(transactions: &[Transaction], today: NaiveDate, days: u32) -> Vec<DailySpend> {
    (0..u64::from(days.min(MAX_TREND_DAYS)))
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| {
            let total = transactions
                .iter()
                .filter(|t| t.kind == TxKind::Out && t.date == date)
                .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t.amount));
            DailySpend { date, total }
        })
        .collect()
}
