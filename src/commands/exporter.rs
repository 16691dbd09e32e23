// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Context, arg};
use anyhow::{Context as _, Result, bail};
use serde_json::json;

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(ctx, sub),
        _ => Ok(()),
    }
}

fn export_transactions(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = arg(sub, "format")?.to_lowercase();
    let out = arg(sub, "out")?;

    // Oldest first; the ledger keeps them newest first.
    let mut txs: Vec<_> = ctx.state.ledger().transactions.iter().collect();
    txs.reverse();
    txs.sort_by_key(|t| t.date);

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out))?;
            wtr.write_record(["date", "title", "category", "type", "amount"])?;
            for t in &txs {
                wtr.write_record([
                    t.date.to_string(),
                    t.title.clone(),
                    t.category.clone(),
                    t.kind.as_str().to_string(),
                    format!("{:.2}", t.amount),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = txs
                .iter()
                .map(|t| {
                    json!({
                        "date": t.date, "title": t.title, "category": t.category,
                        "type": t.kind.as_str(), "amount": format!("{:.2}", t.amount)
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Write {}", out))?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
