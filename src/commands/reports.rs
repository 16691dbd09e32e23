// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Context;
use crate::analytics::{
    DEFAULT_TOP_CATEGORIES, DEFAULT_TREND_DAYS, daily_spending, monthly_summary, top_categories,
};
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(ctx, sub)?,
        Some(("categories", sub)) => categories(ctx, sub)?,
        Some(("daily", sub)) => daily(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn today(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("today") {
        Some(d) => parse_date(d),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn change(pct: Decimal) -> String {
    if pct.is_sign_negative() {
        format!("{}%", pct)
    } else {
        format!("+{}%", pct)
    }
}

fn summary(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let s = monthly_summary(&ctx.state.ledger().transactions, today(sub)?);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        let rows = vec![
            vec![
                "Income".into(),
                fmt_money(&s.this_month.income),
                fmt_money(&s.last_month.income),
                change(s.income_change),
            ],
            vec![
                "Expenses".into(),
                fmt_money(&s.this_month.expenses),
                fmt_money(&s.last_month.expenses),
                change(s.expense_change),
            ],
            vec![
                "Net".into(),
                fmt_money(&s.this_month.net),
                fmt_money(&s.last_month.net),
                String::new(),
            ],
        ];
        let heading = format!("{}-{:02}", s.year, s.month);
        println!(
            "{}",
            pretty_table(&[heading.as_str(), "This month", "Last month", "Change"], rows)
        );
        println!("{} transactions in total", s.total_transactions);
    }
    Ok(())
}

fn categories(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let limit = sub
        .get_one::<usize>("limit")
        .copied()
        .unwrap_or(DEFAULT_TOP_CATEGORIES);
    let data = top_categories(&ctx.state.ledger().transactions, limit);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|c| vec![c.category.clone(), fmt_money(&c.total)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    Ok(())
}

fn daily(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let days = sub
        .get_one::<u32>("days")
        .copied()
        .unwrap_or(DEFAULT_TREND_DAYS);
    let data = daily_spending(&ctx.state.ledger().transactions, today(sub)?, days);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|d| vec![d.date.format("%a %-m/%-d").to_string(), fmt_money(&d.total)])
            .collect();
        println!("{}", pretty_table(&["Day", "Spent"], rows));
    }
    Ok(())
}
