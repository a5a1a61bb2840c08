// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};

use crate::book::{Book, CategoryKind};
use crate::models::Month;
use crate::money::Money;
use crate::tree::{Entity, NodeId, Tree};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<Month> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(Month::of(d))
}

pub fn parse_money(s: &str) -> Result<Money> {
    Money::parse(s).with_context(|| format!("Invalid amount '{}'", s))
}

/// The injected "today": an explicit flag wins over the local clock.
pub fn today(flag: Option<&str>) -> Result<NaiveDate> {
    match flag {
        Some(s) => parse_date(s),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}

pub fn node_at_path<T: Entity>(tree: &Tree<T>, path: &str, what: &str) -> Result<NodeId> {
    tree.require_path(path)
        .with_context(|| format!("{} lookup failed", what))
}

pub fn wallet_id(book: &Book, path: &str) -> Result<uuid::Uuid> {
    let node = node_at_path(&book.wallets, path, "Wallet")?;
    book.wallets
        .get(node)
        .map(|w| w.id)
        .ok_or_else(|| anyhow!("Wallet '{}' not found", path))
}

pub fn category_id(book: &Book, kind: CategoryKind, path: &str) -> Result<uuid::Uuid> {
    let tree = book.categories(kind);
    let node = node_at_path(tree, path, "Category")?;
    tree.get(node)
        .map(|c| c.id)
        .ok_or_else(|| anyhow!("Category '{}' not found", path))
}

pub fn owner_id(book: &Book, name: &str) -> Result<uuid::Uuid> {
    book.owners
        .iter()
        .find(|o| o.name == name.trim())
        .map(|o| o.id)
        .ok_or_else(|| anyhow!("Owner '{}' not found", name.trim()))
}

pub fn bank_id(book: &Book, name: &str) -> Result<uuid::Uuid> {
    book.banks
        .iter()
        .find(|b| b.name == name.trim())
        .map(|b| b.id)
        .ok_or_else(|| anyhow!("Bank '{}' not found", name.trim()))
}

pub fn parse_category_kind(s: &str) -> Result<CategoryKind> {
    match s.trim().to_lowercase().as_str() {
        "in" | "income" => Ok(CategoryKind::Income),
        "out" | "expense" => Ok(CategoryKind::Expense),
        other => Err(anyhow!("Unknown category tree '{}', use income|expense", other)),
    }
}
