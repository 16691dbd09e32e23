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
        Some(("unlock", sub)) => unlock(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct AchievementRow<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
    points: u64,
    unlocked: bool,
}

fn list(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let data: Vec<AchievementRow> = ctx
        .state
        .ledger()
        .achievements
        .iter()
        .map(|a| AchievementRow {
            id: &a.id,
            title: &a.title,
            description: &a.description,
            points: a.points,
            unlocked: a.is_unlocked(),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|a| {
                vec![
                    a.id.to_string(),
                    a.title.to_string(),
                    a.description.to_string(),
                    a.points.to_string(),
                    if a.unlocked { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Achievement", "How", "Points", "Unlocked"], rows)
        );
    }
    Ok(())
}

fn unlock(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    let id = arg(sub, "id")?;
    let Some(a) = ctx.state.ledger().achievement(id).cloned() else {
        bail!("No achievement with id '{}'", id);
    };
    if ctx.state.unlock_achievement(id) {
        println!("Unlocked '{}' (+{} points)", a.title, a.points);
    } else {
        println!("'{}' was already unlocked", a.title);
    }
    Ok(())
}
