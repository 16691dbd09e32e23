// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::sync::Arc;

use copperone::config::Config;
use copperone::db::{self, DurableStore, MemoryStore};
use copperone::{cli, commands, logging};

fn main() -> Result<()> {
    logging::init();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::load()?;
    let store: Arc<dyn DurableStore> = if matches.get_flag("ephemeral") {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(db::open_or_init(&config.data_dir()?)?)
    };
    let mut ctx = commands::Context::open(store, config);

    let result = match matches.subcommand() {
        Some(("status", sub)) => commands::status::handle(&ctx, sub),
        Some(("tx", sub)) => commands::transactions::handle(&mut ctx, sub),
        Some(("goal", sub)) => commands::goals::handle(&mut ctx, sub),
        Some(("chore", sub)) => commands::chores::handle(&mut ctx, sub),
        Some(("reward", sub)) => commands::rewards::handle(&mut ctx, sub),
        Some(("achievement", sub)) => commands::achievements::handle(&mut ctx, sub),
        Some(("points", sub)) => commands::points::handle(&mut ctx, sub),
        Some(("xp", sub)) => commands::points::handle_xp(&mut ctx, sub),
        Some(("pin", sub)) => commands::pin::handle(&mut ctx, sub),
        Some(("account", sub)) => commands::account::handle(&mut ctx, sub),
        Some(("learn", sub)) => commands::learn::handle(&mut ctx, sub),
        Some(("report", sub)) => commands::reports::handle(&ctx, sub),
        Some(("export", sub)) => commands::exporter::handle(&ctx, sub),
        Some(("chat", sub)) => commands::chat::handle(&ctx, sub),
        Some(("reset", sub)) => commands::reset::handle(&mut ctx, sub),
        Some(("doctor", _)) => commands::doctor::handle(&ctx),
        _ => {
            cli::build_cli().print_help()?;
            println!();
            Ok(())
        }
    };
    // Persist whatever happened before a command failed.
    ctx.finish()?;
    result
}
