// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Context;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Serialize)]
pub struct StatusRow {
    pub balance: Decimal,
    pub points: u64,
    pub streak: u32,
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
    pub open_goals: usize,
    pub open_chores: usize,
}

pub fn snapshot(ctx: &Context) -> StatusRow {
    let l = ctx.state.ledger();
    StatusRow {
        balance: l.balance,
        points: l.points,
        streak: l.streak,
        level: l.level,
        xp: l.xp,
        xp_to_next_level: l.xp_to_next_level,
        open_goals: l.goals.iter().filter(|g| !g.is_completed()).count(),
        open_chores: l.chores.iter().filter(|c| !c.is_completed()).count(),
    }
}

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    let s = snapshot(ctx);
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Balance".into(), fmt_money(&s.balance)],
        vec!["Points".into(), s.points.to_string()],
        vec!["Streak".into(), format!("{} days", s.streak)],
        vec!["Level".into(), s.level.to_string()],
        vec!["XP".into(), format!("{} / {}", s.xp, s.xp_to_next_level)],
        vec!["Open goals".into(), s.open_goals.to_string()],
        vec!["Open chores".into(), s.open_chores.to_string()],
    ];
    println!("{}", pretty_table(&["", ""], rows));
    Ok(())
}
