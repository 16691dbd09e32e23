// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Context, arg};
use crate::learning::{LearningProgress, MODULES, module};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, bail};
use serde::Serialize;

pub fn handle(ctx: &mut Context, m: &clap::ArgMatches) -> Result<()> {
    let mut progress = LearningProgress::load(ctx.store.clone());
    match m.subcommand() {
        Some(("list", sub)) => list(&progress, sub)?,
        Some(("toggle", sub)) => {
            let id = arg(sub, "id")?;
            let Some(done) = progress.toggle(id) else {
                bail!("No learning module with id '{}'", id);
            };
            let title = module(id.trim()).map(|m| m.title).unwrap_or_default();
            println!(
                "'{}' marked {} ({}% complete)",
                title,
                if done { "done" } else { "not done" },
                progress.percent_complete()
            );
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
struct ModuleRow {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    url: &'static str,
    topics: &'static [&'static str],
    completed: bool,
}

fn list(progress: &LearningProgress, sub: &clap::ArgMatches) -> Result<()> {
    let data: Vec<ModuleRow> = MODULES
        .iter()
        .map(|m| ModuleRow {
            id: m.id,
            title: m.title,
            description: m.description,
            url: m.url,
            topics: m.topics,
            completed: progress.is_completed(m.id),
        })
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|m| {
                vec![
                    m.id.to_string(),
                    m.title.to_string(),
                    m.topics.join(", "),
                    if m.completed { "done" } else { "" }.to_string(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Id", "Module", "Topics", ""], rows));
        println!(
            "{} of {} modules complete ({}%)",
            progress.completed_count(),
            MODULES.len(),
            progress.percent_complete()
        );
    }
    Ok(())
}
