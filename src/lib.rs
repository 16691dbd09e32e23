// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod analytics;
pub mod assistant;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod learning;
pub mod logging;
pub mod models;
pub mod pin;
pub mod profile;
pub mod sanitizer;
pub mod utils;
