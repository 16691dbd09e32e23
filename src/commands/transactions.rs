// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Context, arg};
use crate::models::{NewTransaction, Transaction, TxKind};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, anyhow};
use serde::Serialize;

pub fn handle(ctx: &mut Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    ctx.require_pin(sub)?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };
    let kind: TxKind = arg(sub, "type")?.parse().map_err(|e: String| anyhow!(e))?;
    let tx = ctx.state.record_transaction(NewTransaction {
        title: arg(sub, "title")?.trim().to_string(),
        category: arg(sub, "category")?.trim().to_string(),
        date,
        amount: parse_decimal(arg(sub, "amount")?)?,
        kind,
    })?;
    println!(
        "Recorded {} {} on {} for '{}' (balance now {})",
        tx.kind.as_str(),
        fmt_money(&tx.amount),
        tx.display_date(),
        tx.title,
        fmt_money(&ctx.state.ledger().balance)
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub title: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        Self {
            id: t.id.clone(),
            date: t.display_date(),
            title: t.title.clone(),
            category: t.category.clone(),
            kind: t.kind.as_str().to_string(),
            amount: format!("{:.2}", t.amount),
        }
    }
}

pub fn query_rows(ctx: &Context, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let kind = match sub.get_one::<String>("type") {
        Some(k) => Some(k.parse::<TxKind>().map_err(|e| anyhow!(e))?),
        None => None,
    };
    let category = sub.get_one::<String>("category").map(|c| c.to_lowercase());
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);
    Ok(ctx
        .state
        .ledger()
        .transactions
        .iter()
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .filter(|t| {
            category
                .as_deref()
                .is_none_or(|c| t.category.to_lowercase() == c)
        })
        .take(limit)
        .map(TransactionRow::from)
        .collect())
}

fn list(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(ctx, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                let sign = if r.kind == "out" { "-" } else { "+" };
                vec![
                    r.date.clone(),
                    r.title.clone(),
                    r.category.clone(),
                    format!("{}${}", sign, r.amount),
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Title", "Category", "Amount", "Id"], rows)
        );
    }
    Ok(())
}
