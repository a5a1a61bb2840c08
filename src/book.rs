// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The whole in-memory state of one ledger and the operations that must
//! keep its parts consistent: anchoring, removal fan-out, imports.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use regex::Regex;
use uuid::Uuid;

use crate::archive::ArchivalRef;
use crate::error::{AnchorBlock, LedgerError, LedgerResult};
use crate::ledger::{Log, ReferenceHolder, TransactionEdit, TreeScope};
use crate::models::{
    Bank, Category, Month, Owner, Plans, Task, Transaction, TransactionType, Wallet,
    TRANSIENT_NOTE_MARKER,
};
use crate::money::Money;
use crate::normalize::{self, NormalizeReport};
use crate::stats::{DateWindow, Statistics};
use crate::tasks;
use crate::tree::{NodeId, Removal, Tree};

/// Raw line handed over by a receipt importer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub date: NaiveDate,
    pub label: String,
    pub amount: Money,
}

/// Assigns an expense category to imported records whose label matches.
#[derive(Debug, Clone)]
pub struct ImportRule {
    pub pattern: Regex,
    pub category: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn scope(self) -> TreeScope {
        match self {
            CategoryKind::Income => TreeScope::IncomeCategories,
            CategoryKind::Expense => TreeScope::ExpenseCategories,
        }
    }

    pub fn of(kind: TransactionType) -> Option<CategoryKind> {
        match kind {
            TransactionType::In => Some(CategoryKind::Income),
            TransactionType::Out => Some(CategoryKind::Expense),
            TransactionType::Transfer => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Book {
    pub owners: Vec<Owner>,
    pub banks: Vec<Bank>,
    pub wallets: Tree<Wallet>,
    pub income: Tree<Category>,
    pub expense: Tree<Category>,
    pub log: Log,
    pub stats: Statistics,
    pub tasks: Vec<Task>,
    pub plans: Plans,
    dirty_months: BTreeSet<Month>,
    dirty: bool,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self, kind: CategoryKind) -> &Tree<Category> {
        match kind {
            CategoryKind::Income => &self.income,
            CategoryKind::Expense => &self.expense,
        }
    }

    pub fn categories_mut(&mut self, kind: CategoryKind) -> &mut Tree<Category> {
        self.dirty = true;
        match kind {
            CategoryKind::Income => &mut self.income,
            CategoryKind::Expense => &mut self.expense,
        }
    }

    pub fn wallets_mut(&mut self) -> &mut Tree<Wallet> {
        self.dirty = true;
        &mut self.wallets
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty || !self.dirty_months.is_empty()
    }

    pub fn dirty_months(&self) -> &BTreeSet<Month> {
        &self.dirty_months
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
        self.dirty_months.clear();
    }

    pub fn touch(&mut self) {
        self.dirty = true;
    }

    fn touch_month(&mut self, month: Month) {
        self.dirty = true;
        self.dirty_months.insert(month);
    }

    fn touch_all_months(&mut self) {
        let months: Vec<Month> = self.log.iter().map(Transaction::month).collect();
        self.dirty = true;
        self.dirty_months.extend(months);
    }

    // ---- anchoring -------------------------------------------------------

    /// Every reason the pending prefix cannot be anchored, by log index.
    pub fn anchor_blockers(&self) -> Vec<(usize, AnchorBlock)> {
        let mut out = Vec::new();
        for (index, tx) in self.log.pending().enumerate() {
            if let Some(kind) = CategoryKind::of(tx.kind) {
                if tx.category.get(self.categories(kind)).is_none() {
                    out.push((index, AnchorBlock::MissingCategory));
                }
            }
            if tx.kind != TransactionType::In && tx.from.get(&self.wallets).is_none() {
                out.push((index, AnchorBlock::MissingSource));
            }
            if tx.kind != TransactionType::Out && tx.to.get(&self.wallets).is_none() {
                out.push((index, AnchorBlock::MissingTarget));
            }
        }
        out
    }

    pub fn can_anchore(&self) -> bool {
        self.anchor_blockers().is_empty()
    }

    /// Wallet balances after applying the pending entries oldest first.
    /// Fails without side effects when a balance would overflow.
    fn projected_balances(&self) -> LedgerResult<HashMap<Uuid, Money>> {
        let mut out: HashMap<Uuid, Money> = HashMap::new();
        for tx in self.log.pending().rev() {
            if tx.kind.debits() {
                if let Some(w) = tx.from.get(&self.wallets) {
                    let current = out.get(&w.id).copied().unwrap_or(w.balance);
                    out.insert(w.id, current.checked_sub(tx.amount)?);
                }
            }
            if tx.kind.credits() {
                if let Some(w) = tx.to.get(&self.wallets) {
                    let current = out.get(&w.id).copied().unwrap_or(w.balance);
                    out.insert(w.id, current.checked_add(tx.amount)?);
                }
            }
        }
        Ok(out)
    }

    /// Applies every pending entry to balances and statistics, oldest first,
    /// and marks the whole log anchored. Returns the number of entries
    /// applied; zero means there was nothing to do.
    pub fn anchore(&mut self) -> LedgerResult<usize> {
        let pending = self.log.unanchored();
        if pending == 0 {
            return Ok(0);
        }
        if let Some((index, reason)) = self.anchor_blockers().into_iter().next() {
            return Err(LedgerError::NotAnchorable { index, reason });
        }
        let balances = self.projected_balances()?;

        for index in (0..pending).rev() {
            let Some(tx) = self.log.get_mut(index) else {
                continue;
            };
            if tx.is_transient() {
                tx.note.clear();
            }
            let tx = tx.clone();
            self.stats.record(&tx, &self.income, &self.expense);
            self.touch_month(tx.month());
        }
        for (id, balance) in balances {
            if let Some(w) = self.wallets.find_mut(id) {
                w.balance = balance;
            }
        }
        self.log.mark_all_anchored();
        log::info!("anchored {} transactions", pending);

        self.refresh_tasks();
        Ok(pending)
    }

    // ---- log mutations ---------------------------------------------------

    pub fn add_transaction(&mut self, tx: Transaction) {
        let month = tx.month();
        self.log.push_pending(tx);
        self.touch_month(month);
        self.refresh_tasks();
    }

    pub fn insert_transaction(&mut self, index: usize, tx: Transaction) -> LedgerResult<()> {
        let month = tx.month();
        self.log.insert(index, tx)?;
        self.touch_month(month);
        self.refresh_tasks();
        Ok(())
    }

    pub fn remove_transaction(&mut self, index: usize) -> LedgerResult<Transaction> {
        let tx = self.log.remove(index)?;
        self.touch_month(tx.month());
        self.refresh_tasks();
        Ok(tx)
    }

    pub fn update_transaction(&mut self, index: usize, edit: TransactionEdit) -> LedgerResult<()> {
        let before = self
            .log
            .get(index)
            .map(Transaction::month)
            .ok_or(LedgerError::IndexOutOfRange {
                index,
                len: self.log.len(),
            })?;
        self.log.update(index, edit)?;
        self.touch_month(before);
        if let Some(after) = self.log.get(index).map(Transaction::month) {
            self.touch_month(after);
        }
        self.refresh_tasks();
        Ok(())
    }

    pub fn update_note(&mut self, index: usize, note: impl Into<String>) -> LedgerResult<()> {
        self.log.update_note(index, note)?;
        if let Some(month) = self.log.get(index).map(Transaction::month) {
            self.touch_month(month);
        }
        Ok(())
    }

    pub fn drop_history_before(&mut self, cutoff: NaiveDate) -> usize {
        let dropped = self.log.drop_history_before(cutoff);
        for tx in &dropped {
            self.touch_month(tx.month());
        }
        dropped.len()
    }

    pub fn normalize_data(&mut self) -> NormalizeReport {
        let report = normalize::normalize(&mut self.log);
        if report.changed() {
            self.touch_all_months();
            self.refresh_tasks();
        }
        report
    }

    /// Turns receipt lines into pending expenses paid from `wallet`.
    pub fn import_records(
        &mut self,
        wallet: Uuid,
        records: Vec<ImportRecord>,
        rules: &[ImportRule],
    ) -> LedgerResult<usize> {
        if !self.wallets.contains(wallet) {
            return Err(LedgerError::NodeNotFound(wallet));
        }
        let count = records.len();
        for rec in records {
            let category = rules
                .iter()
                .find(|r| r.pattern.is_match(&rec.label))
                .map(|r| ArchivalRef::live(r.category))
                .unwrap_or_default();
            let mut tx = Transaction::new(rec.date, TransactionType::Out, rec.amount.abs());
            tx.from = ArchivalRef::live(wallet);
            tx.category = category;
            tx.note = format!("{}{}", TRANSIENT_NOTE_MARKER, rec.label);
            let month = tx.month();
            self.log.push_pending(tx);
            self.touch_month(month);
        }
        log::info!("imported {} receipt records", count);
        self.refresh_tasks();
        Ok(count)
    }

    // ---- tree removal fan-out --------------------------------------------

    fn broadcast(&mut self, scope: TreeScope, removal: &Removal) -> usize {
        let holders: [&mut dyn ReferenceHolder; 3] =
            [&mut self.log, &mut self.tasks, &mut self.plans];
        holders
            .into_iter()
            .map(|h| h.invalidate_refs(scope, removal))
            .sum()
    }

    /// Removes a wallet subtree and archives every link into it.
    pub fn remove_wallet(&mut self, node: NodeId) -> LedgerResult<Removal> {
        let removal = self.wallets.remove(node)?;
        let archived = self.broadcast(TreeScope::Wallets, &removal);
        log::info!(
            "removed {} wallets, archived {} references",
            removal.len(),
            archived
        );
        if archived > 0 {
            self.touch_all_months();
        }
        self.dirty = true;
        Ok(removal)
    }

    /// Removes a category subtree, archives every link into it and rebuilds
    /// the category statistics and tasks that depended on it.
    pub fn remove_category(&mut self, kind: CategoryKind, node: NodeId) -> LedgerResult<Removal> {
        let removal = self.categories_mut(kind).remove(node)?;
        let archived = self.broadcast(kind.scope(), &removal);
        log::info!(
            "removed {} categories, archived {} references",
            removal.len(),
            archived
        );
        if archived > 0 {
            self.touch_all_months();
        }
        self.stats
            .reload_category_totals(&self.log, &self.income, &self.expense);
        self.refresh_tasks();
        Ok(removal)
    }

    /// Re-parents a category; subtree totals and tasks follow the new shape.
    pub fn move_category(
        &mut self,
        kind: CategoryKind,
        node: NodeId,
        parent: Option<NodeId>,
        position: Option<usize>,
    ) -> LedgerResult<()> {
        self.categories_mut(kind).move_node(node, parent, position)?;
        self.stats
            .reload_category_totals(&self.log, &self.income, &self.expense);
        self.refresh_tasks();
        Ok(())
    }

    /// Drops references to ids that are not in any tree; used after loading.
    pub fn sanitize_references(&mut self) -> usize {
        let mut fixed = 0;
        for index in 0..self.log.len() {
            let Some(tx) = self.log.get_mut(index) else {
                continue;
            };
            fixed += usize::from(tx.from.sanitize(&self.wallets));
            fixed += usize::from(tx.to.sanitize(&self.wallets));
            fixed += match CategoryKind::of(tx.kind) {
                Some(CategoryKind::Income) => usize::from(tx.category.sanitize(&self.income)),
                Some(CategoryKind::Expense) => usize::from(tx.category.sanitize(&self.expense)),
                None => 0,
            };
        }
        for task in self.tasks.iter_mut() {
            fixed += match CategoryKind::of(task.kind) {
                Some(CategoryKind::Income) => usize::from(task.category.sanitize(&self.income)),
                Some(CategoryKind::Expense) => usize::from(task.category.sanitize(&self.expense)),
                None => 0,
            };
        }
        for plan in self.plans.iter_mut() {
            fixed += match CategoryKind::of(plan.kind) {
                Some(CategoryKind::Income) => usize::from(plan.category.sanitize(&self.income)),
                Some(CategoryKind::Expense) => usize::from(plan.category.sanitize(&self.expense)),
                None => 0,
            };
        }
        fixed
    }

    // ---- derived state ---------------------------------------------------

    pub fn load_categories_statistics(&mut self, from: NaiveDate, to: NaiveDate) {
        self.stats.load_categories_statistics(
            DateWindow::new(from, to),
            &self.log,
            &self.income,
            &self.expense,
        );
    }

    pub fn replay_statistics(&mut self) {
        self.stats.replay(&self.log, &self.income, &self.expense);
    }

    pub fn update_task(&mut self, index: usize) -> LedgerResult<&Task> {
        let len = self.tasks.len();
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;
        tasks::update_task(task, &self.log, &self.income, &self.expense);
        Ok(task)
    }

    pub fn refresh_tasks(&mut self) {
        tasks::update_tasks(&mut self.tasks, &self.log, &self.income, &self.expense);
    }

    pub fn add_task(&mut self, task: Task) -> usize {
        self.tasks.push(task);
        self.dirty = true;
        let index = self.tasks.len() - 1;
        if let Some(t) = self.tasks.get_mut(index) {
            tasks::update_task(t, &self.log, &self.income, &self.expense);
        }
        index
    }

    pub fn remove_task(&mut self, index: usize) -> LedgerResult<Task> {
        if index >= self.tasks.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.tasks.len(),
            });
        }
        self.dirty = true;
        Ok(self.tasks.remove(index))
    }

    pub fn add_owner(&mut self, name: &str) -> LedgerResult<Uuid> {
        let name = name.trim();
        if self.owners.iter().any(|o| o.name == name) {
            return Err(LedgerError::DuplicateName(name.to_string()));
        }
        let owner = Owner::new(name);
        let id = owner.id;
        self.owners.push(owner);
        self.dirty = true;
        Ok(id)
    }

    pub fn add_bank(&mut self, name: &str) -> LedgerResult<Uuid> {
        let name = name.trim();
        if self.banks.iter().any(|b| b.name == name) {
            return Err(LedgerError::DuplicateName(name.to_string()));
        }
        let bank = Bank::new(name);
        let id = bank.id;
        self.banks.push(bank);
        self.dirty = true;
        Ok(id)
    }

    pub fn wallet_total(&self) -> Money {
        self.wallets.iter().map(|(_, w)| w.balance).sum()
    }
}
