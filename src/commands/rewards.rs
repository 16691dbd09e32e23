// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Context, arg};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, bail};
use serde::Serialize;

pub fn handle(ctx: &mut Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("redeem", sub)) => redeem(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct RewardRow<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
    cost: u64,
    unlocked: bool,
    affordable: bool,
}

fn list(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ctx.state.ledger();
    let data: Vec<RewardRow> = ledger
        .rewards
        .iter()
        .map(|r| RewardRow {
            id: &r.id,
            title: &r.title,
            description: &r.description,
            cost: r.cost,
            unlocked: r.is_unlocked(),
            affordable: !r.is_unlocked() && ledger.points >= r.cost,
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                let state = if r.unlocked {
                    "unlocked"
                } else if r.affordable {
                    "can redeem"
                } else {
                    "locked"
                };
                vec![
                    r.id.to_string(),
                    r.title.to_string(),
                    r.description.to_string(),
                    r.cost.to_string(),
                    state.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Reward", "Description", "Cost", "State"], rows)
        );
        println!("You have {} points", ledger.points);
    }
    Ok(())
}

fn redeem(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id")?;
    let Some(reward) = ctx.state.ledger().reward(id).cloned() else {
        bail!("No reward with id '{}'", id);
    };
    if reward.is_unlocked() {
        bail!("'{}' is already unlocked", reward.title);
    }
    if !ctx.state.redeem_reward(id) {
        bail!(
            "'{}' costs {} points, you have {}",
            reward.title,
            reward.cost,
            ctx.state.ledger().points
        );
    }
    println!(
        "Unlocked '{}' for {} points ({} left)",
        reward.title,
        reward.cost,
        ctx.state.ledger().points
    );
    Ok(())
}
