// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use copperone::db::{DurableStore, MemoryStore, keys};
use copperone::learning::{LearningProgress, MODULES, module};
use rust_decimal::Decimal;
use std::sync::Arc;

#[test]
fn catalog_has_six_linked_modules() {
    assert_eq!(MODULES.len(), 6);
    for m in MODULES.iter() {
        assert!(m.url.starts_with("https://www.khanacademy.org/"));
        assert_eq!(m.topics.len(), 4);
    }
    assert_eq!(module("5").map(|m| m.title), Some("Housing"));
    assert!(module("7").is_none());
}

#[test]
fn toggle_flips_and_persists() {
    let store = Arc::new(MemoryStore::new());
    let mut progress = LearningProgress::load(store.clone());

    assert_eq!(progress.toggle("1"), Some(true));
    assert_eq!(progress.toggle(" 3 "), Some(true));
    assert_eq!(progress.toggle("1"), Some(false));
    assert_eq!(progress.toggle("42"), None);

    let reloaded = LearningProgress::load(store);
    assert!(reloaded.is_completed("3"));
    assert!(!reloaded.is_completed("1"));
    assert_eq!(reloaded.completed_count(), 1);
}

#[test]
fn percent_is_rounded_to_whole_numbers() {
    let store = Arc::new(MemoryStore::new());
    let mut progress = LearningProgress::load(store);
    assert_eq!(progress.percent_complete(), Decimal::ZERO);
    progress.toggle("1");
    assert_eq!(progress.percent_complete(), Decimal::from(17));
    progress.toggle("2");
    assert_eq!(progress.percent_complete(), Decimal::from(33));
    for m in MODULES.iter() {
        if !progress.is_completed(m.id) {
            progress.toggle(m.id);
        }
    }
    assert_eq!(progress.percent_complete(), Decimal::from(100));
}

#[test]
fn unknown_stored_ids_are_dropped() {
    let store = Arc::new(MemoryStore::new());
    store
        .write_raw(keys::LEARNING_COMPLETED, r#"["2","99"]"#)
        .unwrap();
    let progress = LearningProgress::load(store);
    assert_eq!(progress.completed_count(), 1);
    assert!(progress.is_completed("2"));
}

#[test]
fn clear_forgets_everything() {
    let store = Arc::new(MemoryStore::new());
    let mut progress = LearningProgress::load(store.clone());
    progress.toggle("4");
    progress.toggle("6");
    progress.clear();
    assert_eq!(progress.completed_count(), 0);
    assert_eq!(LearningProgress::load(store).completed_count(), 0);
}
