// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Context, arg};
use crate::engine::ChorePatch;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub fn handle(ctx: &mut Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ctx, sub)?,
        Some(("list", sub)) => list(ctx, sub)?,
        Some(("complete", sub)) => complete(ctx, sub)?,
        Some(("edit", sub)) => edit(ctx, sub)?,
        Some(("rm", sub)) => remove(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    let title = arg(sub, "title")?;
    let points = sub.get_one::<u64>("points").copied().unwrap_or(0);
    let id = ctx
        .state
        .add_chore(title, arg(sub, "description")?, points)?;
    println!("Added chore '{}' worth {} points id={}", title.trim(), points, id);
    Ok(())
}

#[derive(Serialize)]
pub struct ChoreRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points_reward: u64,
    pub completed: bool,
    pub completed_by: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

fn list(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let data: Vec<ChoreRow> = ctx
        .state
        .ledger()
        .chores
        .iter()
        .map(|c| ChoreRow {
            id: c.id.clone(),
            title: c.title.clone(),
            description: c.description.clone(),
            points_reward: c.points_reward,
            completed: c.is_completed(),
            completed_by: c.completed_by().map(str::to_string),
            completed_at: c.completed_at(),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|c| {
                let status = match (&c.completed_by, c.completed) {
                    (Some(by), true) => format!("done by {}", by),
                    (None, true) => "done".to_string(),
                    _ => "open".to_string(),
                };
                vec![
                    c.id.clone(),
                    c.title.clone(),
                    c.description.clone(),
                    c.points_reward.to_string(),
                    status,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Chore", "Description", "Points", "Status"], rows)
        );
    }
    Ok(())
}

fn complete(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    ctx.require_pin(sub)?;
    let id = arg(sub, "id")?;
    let Some(chore) = ctx.state.ledger().chore(id).cloned() else {
        bail!("No chore with id '{}'", id);
    };
    let by = sub
        .get_one::<String>("by")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if !ctx.state.complete_chore(id, by) {
        bail!("Chore '{}' is already completed", chore.title);
    }
    println!(
        "Completed '{}' (+{} points, {} total)",
        chore.title,
        chore.points_reward,
        ctx.state.ledger().points
    );
    Ok(())
}

fn edit(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id")?;
    let patch = ChorePatch {
        title: sub.get_one::<String>("title").cloned(),
        description: sub.get_one::<String>("description").cloned(),
        points_reward: sub.get_one::<u64>("points").copied(),
    };
    if !ctx.state.update_chore(id, patch)? {
        bail!("No chore with id '{}'", id);
    }
    println!("Updated chore {}", id);
    Ok(())
}

fn remove(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id")?;
    if !ctx.state.delete_chore(id) {
        bail!("No chore with id '{}'", id);
    }
    println!("Removed chore {}", id);
    Ok(())
}
