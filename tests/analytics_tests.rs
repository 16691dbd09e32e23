// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use copperone::analytics::{MAX_TREND_DAYS, daily_spending, monthly_summary, top_categories};
use copperone::models::{Transaction, TxKind};
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn tx(date: NaiveDate, category: &str, amount: &str, kind: TxKind) -> Transaction {
    Transaction {
        id: format!("{}-{}-{}", date, category, amount),
        title: category.to_string(),
        category: category.to_string(),
        date,
        amount: Decimal::from_str(amount).unwrap(),
        kind,
    }
}

#[test]
fn january_compares_against_december() {
    let txs = vec![
        tx(d(2026, 1, 3), "Allowance", "30", TxKind::In),
        tx(d(2026, 1, 4), "Food", "6", TxKind::Out),
        tx(d(2025, 12, 20), "Allowance", "20", TxKind::In),
        tx(d(2025, 12, 21), "Food", "8", TxKind::Out),
        tx(d(2025, 1, 5), "Allowance", "999", TxKind::In),
    ];
    let s = monthly_summary(&txs, d(2026, 1, 15));

    assert_eq!((s.year, s.month), (2026, 1));
    assert_eq!(s.this_month.income, Decimal::from(30));
    assert_eq!(s.this_month.expenses, Decimal::from(6));
    assert_eq!(s.this_month.net, Decimal::from(24));
    assert_eq!(s.last_month.income, Decimal::from(20));
    assert_eq!(s.income_change, Decimal::from(50));
    assert_eq!(s.expense_change, Decimal::from(-25));
    assert_eq!(s.total_transactions, 5);
}

#[test]
fn change_is_zero_without_a_previous_month() {
    let txs = vec![tx(d(2026, 3, 2), "Allowance", "10", TxKind::In)];
    let s = monthly_summary(&txs, d(2026, 3, 9));
    assert_eq!(s.income_change, Decimal::ZERO);
    assert_eq!(s.expense_change, Decimal::ZERO);
}

#[test]
fn change_keeps_one_decimal() {
    let txs = vec![
        tx(d(2026, 5, 1), "Allowance", "10", TxKind::In),
        tx(d(2026, 4, 1), "Allowance", "3", TxKind::In),
    ];
    let s = monthly_summary(&txs, d(2026, 5, 20));
    assert_eq!(s.income_change, Decimal::from_str("233.3").unwrap());
}

#[test]
fn top_categories_ranks_spending_only() {
    let day = d(2026, 2, 1);
    let txs = vec![
        tx(day, "Food", "4", TxKind::Out),
        tx(day, "Toys", "12", TxKind::Out),
        tx(day, "Food", "9", TxKind::Out),
        tx(day, "Books", "12", TxKind::Out),
        tx(day, "Allowance", "100", TxKind::In),
        tx(day, "Candy", "1", TxKind::Out),
    ];
    let top = top_categories(&txs, 3);
    let names: Vec<&str> = top.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(names, vec!["Food", "Books", "Toys"]);
    assert_eq!(top[0].total, Decimal::from(13));
    assert!(top_categories(&[], 5).is_empty());
}

#[test]
fn daily_spending_fills_gaps_oldest_first() {
    let today = d(2026, 3, 2);
    let txs = vec![
        tx(d(2026, 2, 28), "Food", "2.50", TxKind::Out),
        tx(today, "Food", "1", TxKind::Out),
        tx(today, "Snacks", "2", TxKind::Out),
        tx(today, "Allowance", "20", TxKind::In),
        tx(d(2026, 2, 20), "Food", "50", TxKind::Out),
    ];
    let days = daily_spending(&txs, today, 4);
    let dates: Vec<NaiveDate> = days.iter().map(|x| x.date).collect();
    assert_eq!(
        dates,
        vec![d(2026, 2, 27), d(2026, 2, 28), d(2026, 3, 1), today]
    );
    let totals: Vec<Decimal> = days.iter().map(|x| x.total).collect();
    assert_eq!(
        totals,
        vec![
            Decimal::ZERO,
            Decimal::from_str("2.50").unwrap(),
            Decimal::ZERO,
            Decimal::from(3)
        ]
    );
    assert!(daily_spending(&txs, today, 0).is_empty());
}

#[test]
fn trend_window_is_capped() {
    let out = daily_spending(&[], d(2026, 1, 1), u32::MAX);
    assert_eq!(out.len(), MAX_TREND_DAYS as usize);
    assert_eq!(out.last().unwrap().date, d(2026, 1, 1));
    assert_eq!(out[0].date, d(2025, 1, 1));
}

#[test]
fn trend_stops_at_the_earliest_date() {
    let out = daily_spending(&[], NaiveDate::MIN, 30);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].date, NaiveDate::MIN);
}

#[test]
fn huge_amounts_saturate_in_summaries() {
    let max = Decimal::MAX.to_string();
    let txs = vec![
        tx(d(2026, 1, 3), "Allowance", &max, TxKind::In),
        tx(d(2026, 1, 4), "Allowance", &max, TxKind::In),
        tx(d(2026, 1, 5), "Toys", &max, TxKind::Out),
        tx(d(2026, 1, 5), "Toys", &max, TxKind::Out),
        tx(d(2025, 12, 5), "Allowance", "0.01", TxKind::In),
    ];
    let s = monthly_summary(&txs, d(2026, 1, 15));
    assert_eq!(s.this_month.income, Decimal::MAX);
    assert_eq!(s.this_month.expenses, Decimal::MAX);
    assert_eq!(s.this_month.net, Decimal::ZERO);
    assert_eq!(s.income_change, Decimal::MAX);

    assert_eq!(top_categories(&txs, 5)[0].total, Decimal::MAX);
    let daily = daily_spending(&txs, d(2026, 1, 5), 1);
    assert_eq!(daily[0].total, Decimal::MAX);
}
