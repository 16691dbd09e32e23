// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Context, arg};
use crate::utils::maybe_print_json;
use anyhow::Result;
use serde_json::json;

pub fn handle(ctx: &mut Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("enable", sub)) => {
            // Changing an existing PIN needs the current one.
            ctx.require_pin(sub)?;
            ctx.pin.enable(arg(sub, "new")?, arg(sub, "confirm")?)?;
            println!("Parent PIN lock is on");
        }
        Some(("disable", sub)) => {
            let current = sub.get_one::<String>("pin").map(String::as_str);
            ctx.pin.disable(current)?;
            println!("Parent PIN lock is off");
        }
        Some(("status", sub)) => {
            let enabled = ctx.pin.is_enabled();
            if !maybe_print_json(
                sub.get_flag("json"),
                sub.get_flag("jsonl"),
                &json!({ "enabled": enabled }),
            )? {
                println!(
                    "Parent PIN lock is {}",
                    if enabled { "on" } else { "off" }
                );
            }
        }
        _ => {}
    }
    Ok(())
}
