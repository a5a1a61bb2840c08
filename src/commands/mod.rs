// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod exporter;
pub mod importer;
pub mod owners;
pub mod plans;
pub mod reports;
pub mod tasks;
pub mod transactions;
pub mod wallets;

use anyhow::{Result, anyhow};

/// Trimmed value of a string argument that clap already enforces.
pub(crate) fn required<'a>(m: &'a clap::ArgMatches, id: &str) -> Result<&'a str> {
    m.get_one::<String>(id)
        .map(|s| s.trim())
        .ok_or_else(|| anyhow!("missing --{}", id))
}

pub(crate) fn optional<'a>(m: &'a clap::ArgMatches, id: &str) -> Option<&'a str> {
    m.get_one::<String>(id)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}
