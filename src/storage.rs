// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::book::Book;
use crate::ledger::Log;
use crate::models::{Bank, Category, Month, Owner, Plans, Task, Transaction, Wallet};
use crate::tree::{FlatNode, Tree};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Walletbook", "walletbook"));

static SHARD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})\.(\d{2})\.json$").expect("shard file pattern is valid")
});

pub const DATA_DIR_ENV: &str = "WALLETBOOK_DATA_DIR";
pub const HEAD_FILE: &str = "head.json";
pub const LOG_DIR: &str = "log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// How many rotated copies to keep next to each file.
    pub backups: usize,
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            backups: 3,
        }
    }

    /// Flag first, then the environment, then the platform data directory.
    pub fn resolve(flag: Option<&str>) -> Result<Self> {
        if let Some(dir) = flag.map(str::trim).filter(|s| !s.is_empty()) {
            return Ok(Self::new(dir));
        }
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(Self::new(dir.trim()));
            }
        }
        let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
            .context("Could not determine platform-specific data dir")?;
        Ok(Self::new(proj.data_dir()))
    }

    pub fn head_path(&self) -> PathBuf {
        self.data_dir.join(HEAD_FILE)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR)
    }

    pub fn shard_path(&self, month: Month) -> PathBuf {
        self.log_dir().join(format!("{}.json", month.shard_name()))
    }
}

/// Everything except the anchored history. Pending entries travel here in
/// log order since they may be back-dated past anchored months.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HeadRecord {
    #[serde(default)]
    pub owners: Vec<Owner>,
    #[serde(default)]
    pub banks: Vec<Bank>,
    #[serde(default)]
    pub wallets: Vec<FlatNode<Wallet>>,
    #[serde(default)]
    pub income: Vec<FlatNode<Category>>,
    #[serde(default)]
    pub expense: Vec<FlatNode<Category>>,
    #[serde(default)]
    pub plans: Plans,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub pending: Vec<Transaction>,
}

impl HeadRecord {
    pub fn of(book: &Book) -> Self {
        Self {
            owners: book.owners.clone(),
            banks: book.banks.clone(),
            wallets: book.wallets.flatten(),
            income: book.income.flatten(),
            expense: book.expense.flatten(),
            plans: book.plans.clone(),
            tasks: book.tasks.clone(),
            pending: book.log.pending().cloned().collect(),
        }
    }
}

/// Shifts `path` into its numbered backups: the oldest is discarded,
/// `.2 -> .3`, `.1 -> .2`, current -> `.1`.
pub fn rotate_backups(path: &Path, keep: usize) -> Result<()> {
    if keep == 0 || !path.exists() {
        return Ok(());
    }
    let numbered = |n: usize| -> PathBuf {
        let mut s = path.as_os_str().to_os_string();
        s.push(format!(".{}", n));
        PathBuf::from(s)
    };
    let oldest = numbered(keep);
    if oldest.exists() {
        fs::remove_file(&oldest).with_context(|| format!("Remove {}", oldest.display()))?;
    }
    for n in (1..keep).rev() {
        let src = numbered(n);
        if src.exists() {
            let dst = numbered(n + 1);
            fs::rename(&src, &dst)
                .with_context(|| format!("Rotate {} -> {}", src.display(), dst.display()))?;
        }
    }
    let first = numbered(1);
    fs::rename(path, &first)
        .with_context(|| format!("Rotate {} -> {}", path.display(), first.display()))?;
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T, backups: usize) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("Create {}", dir.display()))?;
    }
    rotate_backups(path, backups)?;
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).with_context(|| format!("Write {}", path.display()))?;
    Ok(())
}

/// Writes the head record and every month touched since the last save.
/// Month shards hold anchored entries only.
pub fn save(cfg: &Config, book: &mut Book) -> Result<()> {
    if !book.is_dirty() {
        log::debug!("nothing to save");
        return Ok(());
    }
    write_json(&cfg.head_path(), &HeadRecord::of(book), cfg.backups)?;

    let months = book.dirty_months().clone();
    for month in &months {
        let entries: Vec<&Transaction> = book
            .log
            .anchored()
            .filter(|t| t.month() == *month)
            .collect();
        let path = cfg.shard_path(*month);
        if entries.is_empty() {
            if path.exists() {
                rotate_backups(&path, cfg.backups)?;
            }
            continue;
        }
        write_json(&path, &entries, cfg.backups)?;
    }
    log::info!(
        "saved {} ({} month shards)",
        cfg.data_dir.display(),
        months.len()
    );
    book.mark_clean();
    Ok(())
}

fn read_shards(cfg: &Config) -> Result<BTreeMap<Month, Vec<Transaction>>> {
    let mut shards = BTreeMap::new();
    let dir = cfg.log_dir();
    if !dir.exists() {
        return Ok(shards);
    }
    for entry in fs::read_dir(&dir).with_context(|| format!("Read {}", dir.display()))? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        let Some(caps) = SHARD_RE.captures(&name) else {
            continue;
        };
        let year: i32 = caps[1].parse()?;
        let month: u32 = caps[2].parse()?;
        let path = entry.path();
        let body = fs::read_to_string(&path).with_context(|| format!("Read {}", path.display()))?;
        let txs: Vec<Transaction> = serde_json::from_str(&body)
            .with_context(|| format!("Invalid log shard {}", path.display()))?;
        shards.insert(Month::new(year, month), txs);
    }
    Ok(shards)
}

/// Loads a book; a missing head yields an empty one.
pub fn load(cfg: &Config) -> Result<Book> {
    let head_path = cfg.head_path();
    let head: HeadRecord = if head_path.exists() {
        let body = fs::read_to_string(&head_path)
            .with_context(|| format!("Read {}", head_path.display()))?;
        serde_json::from_str(&body).with_context(|| format!("Invalid {}", head_path.display()))?
    } else {
        log::info!("no ledger at {}, starting empty", cfg.data_dir.display());
        HeadRecord::default()
    };

    let mut book = Book::new();
    book.owners = head.owners;
    book.banks = head.banks;
    book.wallets = Tree::from_flat(head.wallets)?;
    book.income = Tree::from_flat(head.income)?;
    book.expense = Tree::from_flat(head.expense)?;
    book.plans = head.plans;
    book.tasks = head.tasks;

    let shards = read_shards(cfg)?;
    let pending = head.pending.len();
    let entries = head
        .pending
        .into_iter()
        .chain(shards.into_values().rev().flatten());
    book.log = Log::from_entries(entries, pending);

    let fixed = book.sanitize_references();
    if fixed > 0 {
        log::warn!("{} references pointed at unknown ids and were cleared", fixed);
    }
    book.replay_statistics();
    book.refresh_tasks();
    book.mark_clean();
    log::debug!(
        "loaded {} wallets, {} transactions ({} pending)",
        book.wallets.len(),
        book.log.len(),
        book.log.unanchored()
    );
    Ok(book)
}
