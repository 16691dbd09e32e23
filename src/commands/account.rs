// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Context, arg};
use crate::profile::Signup;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::{Result, bail};

pub fn handle(ctx: &mut Context, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("signup", sub)) => signup(ctx, sub)?,
        Some(("login", sub)) => login(ctx, sub)?,
        Some(("logout", _)) => {
            if ctx.profile().logout()? {
                println!("Signed out");
            } else {
                println!("Nobody was signed in");
            }
        }
        Some(("whoami", sub)) => whoami(ctx, sub)?,
        _ => {}
    }
    Ok(())
}

fn signup(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    let session = ctx.profile().signup(Signup {
        username: arg(sub, "username")?.clone(),
        child_name: arg(sub, "child-name")?.clone(),
        child_age: sub.get_one::<u8>("child-age").copied(),
        email: sub.get_one::<String>("email").cloned(),
        password: arg(sub, "password")?.clone(),
    })?;
    println!(
        "Welcome, {}! Signed in as {}",
        session.child_name, session.username
    );
    Ok(())
}

fn login(ctx: &mut Context, sub: &clap::ArgMatches) -> Result<()> {
    let profile = ctx.profile();
    match profile.login(arg(sub, "username")?, arg(sub, "password")?, &mut ctx.state)? {
        Some(session) => println!("Signed in as {}", session.username),
        None => bail!("Wrong username or password"),
    }
    Ok(())
}

fn whoami(ctx: &Context, sub: &clap::ArgMatches) -> Result<()> {
    let Some(session) = ctx.profile().session() else {
        println!("Not signed in");
        return Ok(());
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &session)? {
        let rows = vec![
            vec!["Username".into(), session.username.clone()],
            vec!["Child".into(), session.child_name.clone()],
            vec![
                "Age".into(),
                session
                    .child_age
                    .map(|a| a.to_string())
                    .unwrap_or_default(),
            ],
            vec!["Role".into(), format!("{:?}", session.role).to_lowercase()],
            vec!["Balance".into(), fmt_money(&session.balance)],
            vec!["Points".into(), session.points.to_string()],
            vec!["Streak".into(), session.streak.to_string()],
        ];
        println!("{}", pretty_table(&["", ""], rows));
    }
    Ok(())
}
