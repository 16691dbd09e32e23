// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Context, arg};
use crate::assistant::prompt::{MODEL_CATALOG, backend_model};
use crate::assistant::{
    CancelToken, ChatBackend, IgnoreReason, OllamaBackend, SendOutcome, TutorReply, TutorSession,
};
use crate::sanitizer::{sanitize_input, was_redacted};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, bail};
use serde::Serialize;
use std::io::{BufRead, Write};

pub fn handle(ctx: &Context, m: &clap::ArgMatches) -> Result<()> {
    let backend = OllamaBackend::new(&ctx.config.assistant.base_url)?;
    let session = TutorSession::new(backend, ctx.store.clone(), ctx.config.assistant.clone());
    let result = run(&session, m);
    session.dispose();
    result
}

/// Dispatches `chat` subcommands against any backend.
pub fn run<B: ChatBackend>(session: &TutorSession<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("ask", sub)) => ask(session, sub)?,
        Some(("models", sub)) => models(session, sub)?,
        Some(("use", sub)) => {
            let id = arg(sub, "id")?;
            if !session.set_model(id)? {
                bail!("The tutor is busy, try again in a moment");
            }
            println!("Penny now uses {} ({})", id, backend_model(id));
        }
        Some(("scrub", sub)) => {
            let text = sub
                .get_many::<String>("text")
                .map(|v| v.cloned().collect::<Vec<_>>().join(" "))
                .unwrap_or_default();
            println!("{}", sanitize_input(&text));
            if was_redacted(&text) {
                eprintln!("Sensitive numbers were hidden before sending");
            }
        }
        _ => {}
    }
    Ok(())
}

fn ask<B: ChatBackend>(session: &TutorSession<B>, sub: &clap::ArgMatches) -> Result<()> {
    let as_json = sub.get_flag("json");
    if let Err(err) = session.initialize() {
        eprintln!("{}", err);
    }
    if let Some(words) = sub.get_many::<String>("text") {
        let text = words.cloned().collect::<Vec<_>>().join(" ");
        return send(session, &text, as_json);
    }

    println!("{}", reply_text(&session.messages()));
    println!("(type 'exit' to stop, '/clear' to start over)");
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        match line.trim() {
            "exit" | "quit" => break,
            "/clear" => {
                session.clear_messages();
                println!("{}", reply_text(&session.messages()));
            }
            text => {
                if let Err(err) = send(session, text, as_json) {
                    eprintln!("{}", err);
                }
            }
        }
    }
    Ok(())
}

fn reply_text(messages: &[crate::assistant::ChatMessage]) -> String {
    messages
        .last()
        .and_then(|m| m.reply())
        .map(|r| r.reply)
        .unwrap_or_default()
}

fn send<B: ChatBackend>(session: &TutorSession<B>, text: &str, as_json: bool) -> Result<()> {
    match session.send_message(text, &CancelToken::new()) {
        Ok(SendOutcome::Replied(reply)) | Ok(SendOutcome::Fallback(reply)) => {
            if !maybe_print_json(as_json, false, &reply)? {
                print_reply(&reply);
            }
        }
        Ok(SendOutcome::Cancelled) => println!("(cancelled)"),
        Ok(SendOutcome::Ignored(IgnoreReason::Empty)) => {}
        Ok(SendOutcome::Ignored(reason)) => {
            eprintln!("Message not sent: {:?}", reason);
        }
        Err(err) => {
            // The offline notice is already in the transcript.
            println!("{}", reply_text(&session.messages()));
            return Err(err.into());
        }
    }
    Ok(())
}

fn print_reply(reply: &TutorReply) {
    println!("Penny: {}", reply.reply);
    let sections = [
        ("Key points", &reply.key_points),
        ("Examples", &reply.examples),
        ("Try this", &reply.action_suggestions),
        ("Learn more about", &reply.related_topics),
    ];
    for (label, items) in sections {
        if items.is_empty() {
            continue;
        }
        println!("{}:", label);
        for item in items.iter() {
            println!("  - {}", item);
        }
    }
}

#[derive(Serialize)]
struct ModelRow {
    id: String,
    backend_name: String,
    installed: bool,
    active: bool,
}

fn models<B: ChatBackend>(session: &TutorSession<B>, sub: &clap::ArgMatches) -> Result<()> {
    let installed = session.available_models();
    let active = session.model_id();
    let is_installed = |name: &str| {
        installed
            .iter()
            .any(|m| m == name || m.split(':').next() == Some(name))
    };
    let mut data: Vec<ModelRow> = MODEL_CATALOG
        .iter()
        .map(|(id, name)| ModelRow {
            id: id.to_string(),
            backend_name: name.to_string(),
            installed: is_installed(name),
            active: *id == active || *name == active,
        })
        .collect();
    for name in &installed {
        if data.iter().all(|r| r.backend_name != *name) {
            data.push(ModelRow {
                id: name.clone(),
                backend_name: name.clone(),
                installed: true,
                active: *name == active,
            });
        }
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    if r.active { "*" } else { "" }.to_string(),
                    r.id.clone(),
                    r.backend_name.clone(),
                    if r.installed { "yes" } else { "no" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["", "Model", "Backend name", "Installed"], rows)
        );
        if installed.is_empty() {
            eprintln!("Could not reach the local model service; installed models unknown");
        }
    }
    Ok(())
}
