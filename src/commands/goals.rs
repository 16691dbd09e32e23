// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Context, arg};
use crate::engine::{GoalFunding, GoalPatch};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, parse_positive_decimal, pretty_table};
use anyhow::{Result, bail};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(ctx: &mut Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("fund", sub)) => fund(ctx, sub)?,
        Some(("complete", sub)) => complete(ctx, sub)?,
        Some(("edit", sub)) => edit(ctx, sub)?,
        Some(("rm", sub)) => remove(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    let title = arg(sub, "title")?;
    let target = parse_decimal(arg(sub, "target")?)?;
    let points = sub.get_one::<u64>("points").copied().unwrap_or(0);
    let id = ctx
        .state
        .add_goal(title, arg(sub, "subtitle")?, target, points)?;
    println!("Added goal '{}' ({}) id={}", title.trim(), fmt_money(&target), id);
    Ok(())
}

#[derive(Serialize)]
pub struct GoalRow {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub current_amount: Decimal,
    pub target_amount: Decimal,
    pub progress_percent: Decimal,
    pub points_reward: u64,
    pub completed: bool,
}

pub fn rows(ctx: &Context) -> Vec<GoalRow> {
    ctx.state
        .ledger()
        .goals
        .iter()
        .map(|g| GoalRow {
            id: g.id.clone(),
            title: g.title.clone(),
            subtitle: g.subtitle.clone(),
            current_amount: g.current_amount(),
            target_amount: g.target_amount,
            progress_percent: g.progress_percent(),
            points_reward: g.points_reward,
            completed: g.is_completed(),
        })
        .collect()
}

fn list(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let data = rows(ctx);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let table: Vec<Vec<String>> = data
            .iter()
            .map(|g| {
                vec![
                    g.id.clone(),
                    g.title.clone(),
                    format!(
                        "{} / {}",
                        fmt_money(&g.current_amount),
                        fmt_money(&g.target_amount)
                    ),
                    format!("{}%", g.progress_percent),
                    g.points_reward.to_string(),
                    if g.completed { "done" } else { "open" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Goal", "Saved", "Progress", "Points", "Status"], table)
        );
    }
    Ok(())
}

fn fund(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    ctx.require_pin(sub)?;
    let id = arg(sub, "id")?;
    let amount = parse_positive_decimal(arg(sub, "amount")?)?;
    let was_completed = ctx.state.ledger().goal(id).map(|g| g.is_completed());
    match was_completed {
        None => bail!("No goal with id '{}'", id),
        Some(true) => bail!("Goal '{}' is already completed", id),
        Some(false) => {}
    }
    ctx.state.add_to_goal(id, amount)?;
    if let Some(goal) = ctx.state.ledger().goal(id) {
        println!(
            "Saved {} toward '{}' ({} / {})",
            fmt_money(&amount),
            goal.title,
            fmt_money(&goal.current_amount()),
            fmt_money(&goal.target_amount)
        );
        if goal.is_completed() {
            println!("Goal reached! +{} points", goal.points_reward);
        }
    }
    Ok(())
}

fn complete(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    ctx.require_pin(sub)?;
    let id = arg(sub, "id")?;
    let Some(goal) = ctx.state.ledger().goal(id).cloned() else {
        bail!("No goal with id '{}'", id);
    };
    if !ctx.state.complete_goal(id) {
        if goal.is_completed() {
            bail!("Goal '{}' is already completed", goal.title);
        }
        bail!(
            "Goal '{}' still needs {} before it can be completed",
            goal.title,
            fmt_money(&goal.remaining())
        );
    }
    println!("Completed '{}' (+{} points)", goal.title, goal.points_reward);
    if ctx.state.funding() == GoalFunding::Legacy {
        println!(
            "{} taken from the balance (balance now {})",
            fmt_money(&goal.target_amount),
            fmt_money(&ctx.state.ledger().balance)
        );
    }
    Ok(())
}

fn edit(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id")?;
    let patch = GoalPatch {
        title: sub.get_one::<String>("title").cloned(),
        subtitle: sub.get_one::<String>("subtitle").cloned(),
        target_amount: match sub.get_one::<String>("target") {
            Some(t) => Some(parse_decimal(t)?),
            None => None,
        },
        points_reward: sub.get_one::<u64>("points").copied(),
    };
    if !ctx.state.update_goal(id, patch)? {
        bail!("Goal '{}' not found or already completed", id);
    }
    println!("Updated goal {}", id);
    Ok(())
}

fn remove(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id")?;
    if !ctx.state.delete_goal(id) {
        bail!("No goal with id '{}'", id);
    }
    println!("Removed goal {}", id);
    Ok(())
}
