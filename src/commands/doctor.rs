// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::Context;
use crate::assistant::prompt::backend_model;
use crate::assistant::{ChatBackend, OllamaBackend};
use crate::db::{keys, read_doc};
use crate::profile::Role;
use crate::utils::pretty_table;
use anyhow::Result;

/// Problems found in the stored data, as (issue, detail) rows.
pub fn ledger_issues(ctx: &Context) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = ctx
        .state
        .ledger()
        .invariant_violations()
        .into_iter()
        .map(|detail| vec!["ledger_invariant".into(), detail])
        .collect();

    if let Some(session) = ctx.profile().session() {
        if ctx.profile().account().is_none() && session.role == Role::Kid {
            rows.push(vec![
                "session_without_account".into(),
                session.username.clone(),
            ]);
        }
    }
    rows
}

/// Reachability of the local model service and the selected model.
pub fn backend_issues<B: ChatBackend>(backend: &B, ctx: &Context) -> Vec<Vec<String>> {
    let cfg = &ctx.config.assistant;
    let model_id = read_doc::<String>(ctx.store.as_ref(), keys::ASSISTANT_MODEL)
        .unwrap_or_else(|| cfg.default_model.clone());
    match backend.list_models(cfg.probe_timeout()) {
        Err(err) => vec![vec!["assistant_unreachable".into(), err.to_string()]],
        Ok(models) => {
            let wanted = backend_model(&model_id);
            if models.iter().any(|m| m == wanted) {
                Vec::new()
            } else {
                vec![vec![
                    "model_not_installed".into(),
                    format!("{} (run `ollama pull {}`)", wanted, wanted),
                ]]
            }
        }
    }
}

pub fn handle(ctx: &Context) -> Result<()> {
    let mut rows = ledger_issues(ctx);
    let backend = OllamaBackend::new(&ctx.config.assistant.base_url)?;
    rows.extend(backend_issues(&backend, ctx));

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
