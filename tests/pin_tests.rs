// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use copperone::db::{DurableStore, MemoryStore, keys};
use copperone::error::PinError;
use copperone::pin::{PinCheck, PinGate};
use std::sync::Arc;

fn gate() -> (PinGate, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (PinGate::load(store.clone()), store)
}

#[test]
fn disabled_gate_does_not_require_a_pin() {
    let (gate, _) = gate();
    assert!(!gate.is_enabled());
    assert_eq!(gate.verify(None), PinCheck::NotRequired);
    assert_eq!(gate.verify(Some("0000")), PinCheck::NotRequired);
}

#[test]
fn enabled_gate_checks_the_pin() {
    let (mut gate, _) = gate();
    gate.enable("2468", "2468").unwrap();
    assert_eq!(gate.verify(Some("2468")), PinCheck::Granted);
    assert_eq!(gate.verify(Some("2469")), PinCheck::Denied);
    assert_eq!(gate.verify(None), PinCheck::Denied);
    assert!(PinCheck::Granted.allows());
    assert!(PinCheck::NotRequired.allows());
    assert!(!PinCheck::Denied.allows());
}

#[test]
fn enable_validates_input() {
    let (mut gate, _) = gate();
    assert_eq!(gate.enable("123", "123"), Err(PinError::Malformed));
    assert_eq!(gate.enable("12345", "12345"), Err(PinError::Malformed));
    assert_eq!(gate.enable("12a4", "12a4"), Err(PinError::Malformed));
    assert_eq!(gate.enable("١٢٣٤", "١٢٣٤"), Err(PinError::Malformed));
    assert_eq!(gate.enable("1234", "4321"), Err(PinError::Mismatch));
    assert!(!gate.is_enabled());
}

#[test]
fn only_a_hash_is_stored() {
    let (mut gate, store) = gate();
    gate.enable("8642", "8642").unwrap();
    let raw = store.read_raw(keys::PIN).unwrap().unwrap();
    assert!(!raw.contains("8642"));
    assert!(raw.contains("$argon2"));

    let reloaded = PinGate::load(store);
    assert!(reloaded.is_enabled());
    assert_eq!(reloaded.verify(Some("8642")), PinCheck::Granted);
}

#[test]
fn disable_needs_the_current_pin() {
    let (mut gate, store) = gate();
    gate.enable("1357", "1357").unwrap();
    assert_eq!(gate.disable(Some("0000")), Err(PinError::Denied));
    assert_eq!(gate.disable(None), Err(PinError::Denied));
    assert!(gate.is_enabled());

    gate.disable(Some("1357")).unwrap();
    assert!(!gate.is_enabled());
    assert!(!PinGate::load(store).is_enabled());
}

#[test]
fn enabled_record_without_hash_loads_as_disabled() {
    let store = Arc::new(MemoryStore::new());
    store.write_raw(keys::PIN, r#"{"enabled":true}"#).unwrap();
    let gate = PinGate::load(store);
    assert!(!gate.is_enabled());
}
