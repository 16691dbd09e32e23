// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Input validation failures raised by ledger operations.
///
/// Business-rule refusals (unknown id, not enough points, already
/// completed) are not errors; those operations return `false`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("amount must be greater than zero (got {0})")]
    InvalidAmount(Decimal),
    #[error("goal target must be greater than zero (got {0})")]
    InvalidTarget(Decimal),
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("balance would overflow")]
    Overflow,
}

#[derive(Debug, Error)]
pub enum AssistantError {
    /// The local assistant service could not be reached.
    #[error("Cannot connect to {backend}: {reason}. Make sure {backend} is running on your computer.")]
    Connectivity { backend: String, reason: String },
    #[error("{backend} returned HTTP {status}: {body}")]
    Backend {
        backend: String,
        status: u16,
        body: String,
    },
    #[error("could not decode reply from {backend}: {reason}")]
    Decode { backend: String, reason: String },
}

impl AssistantError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, AssistantError::Connectivity { .. })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PinError {
    #[error("PIN must be exactly 4 digits")]
    Malformed,
    #[error("PINs do not match")]
    Mismatch,
    #[error("incorrect PIN")]
    Denied,
    #[error("could not hash PIN: {0}")]
    Hash(String),
}
