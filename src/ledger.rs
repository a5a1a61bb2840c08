// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The transaction log.
//!
//! Entries are kept newest-first. The first `unanchored` entries are pending:
//! they can be edited or removed and do not count toward balances or
//! statistics. Everything after them is anchored history.

use std::collections::VecDeque;

use chrono::NaiveDate;

use crate::archive::ArchivalRef;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Transaction, TransactionType};
use crate::money::Money;
use crate::tree::Removal;

/// Which tree a removal came from; decides which reference slots it can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeScope {
    Wallets,
    IncomeCategories,
    ExpenseCategories,
}

impl TreeScope {
    pub fn for_category_of(kind: TransactionType) -> Option<TreeScope> {
        match kind {
            TransactionType::In => Some(TreeScope::IncomeCategories),
            TransactionType::Out => Some(TreeScope::ExpenseCategories),
            TransactionType::Transfer => None,
        }
    }
}

/// Holds references into wallet or category trees and must archive them
/// when their targets are removed.
pub trait ReferenceHolder {
    /// Returns how many references were archived.
    fn invalidate_refs(&mut self, scope: TreeScope, removal: &Removal) -> usize;
}

/// A single-field edit of a pending transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionEdit {
    Date(NaiveDate),
    Note(String),
    Kind(TransactionType),
    Amount(Money),
    Category(ArchivalRef),
    From(ArchivalRef),
    To(ArchivalRef),
}

#[derive(Debug, Clone, Default)]
pub struct Log {
    entries: VecDeque<Transaction>,
    unanchored: usize,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a log from newest-first entries, the first `unanchored` of
    /// which are pending. The count is clamped to the entry count.
    pub fn from_entries(entries: impl IntoIterator<Item = Transaction>, unanchored: usize) -> Self {
        let entries: VecDeque<Transaction> = entries.into_iter().collect();
        let unanchored = unanchored.min(entries.len());
        Self {
            entries,
            unanchored,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unanchored(&self) -> usize {
        self.unanchored
    }

    pub fn get(&self, index: usize) -> Option<&Transaction> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Transaction> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn pending(&self) -> impl DoubleEndedIterator<Item = &Transaction> {
        self.entries.range(..self.unanchored)
    }

    pub fn anchored(&self) -> impl DoubleEndedIterator<Item = &Transaction> {
        self.entries.range(self.unanchored..)
    }

    pub fn is_anchored(&self, index: usize) -> bool {
        index >= self.unanchored && index < self.entries.len()
    }

    /// Newest and oldest dates present in the log.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let newest = self.entries.iter().map(|t| t.date).max()?;
        let oldest = self.entries.iter().map(|t| t.date).min()?;
        Some((newest, oldest))
    }

    fn check_pending(&self, index: usize) -> LedgerResult<()> {
        if index >= self.entries.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        if index >= self.unanchored {
            return Err(LedgerError::AnchoredEntry(index));
        }
        Ok(())
    }

    /// Adds a pending entry at the front of the log.
    pub fn push_pending(&mut self, mut tx: Transaction) {
        tx.clear_unused_slots();
        self.entries.push_front(tx);
        self.unanchored += 1;
    }

    /// Adds a pending entry at `index`, which must lie within the pending
    /// prefix (or right after it).
    pub fn insert(&mut self, index: usize, mut tx: Transaction) -> LedgerResult<()> {
        if index > self.unanchored {
            return Err(LedgerError::AnchoredEntry(index));
        }
        tx.clear_unused_slots();
        self.entries.insert(index, tx);
        self.unanchored += 1;
        Ok(())
    }

    /// Removes a pending entry.
    pub fn remove(&mut self, index: usize) -> LedgerResult<Transaction> {
        self.check_pending(index)?;
        let tx = self
            .entries
            .remove(index)
            .ok_or(LedgerError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })?;
        self.unanchored -= 1;
        Ok(tx)
    }

    /// Applies one field edit to a pending entry. Each edit touches exactly
    /// its own field, except a type change which also clears the slots the
    /// new type does not use.
    pub fn update(&mut self, index: usize, edit: TransactionEdit) -> LedgerResult<()> {
        self.check_pending(index)?;
        let len = self.entries.len();
        let tx = self
            .entries
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;
        match edit {
            TransactionEdit::Date(d) => tx.date = d,
            TransactionEdit::Note(n) => tx.note = n,
            TransactionEdit::Kind(k) => {
                tx.kind = k;
                tx.clear_unused_slots();
            }
            TransactionEdit::Amount(a) => tx.amount = a.abs(),
            TransactionEdit::Category(r) => {
                if tx.kind.has_category() {
                    tx.category = r;
                }
            }
            TransactionEdit::From(r) => {
                if tx.kind.debits() {
                    tx.from = r;
                }
            }
            TransactionEdit::To(r) => {
                if tx.kind.credits() {
                    tx.to = r;
                }
            }
        }
        Ok(())
    }

    /// Notes stay editable on anchored entries too.
    pub fn update_note(&mut self, index: usize, note: impl Into<String>) -> LedgerResult<()> {
        let len = self.entries.len();
        let tx = self
            .entries
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;
        tx.note = note.into();
        Ok(())
    }

    /// Drops anchored entries dated before `cutoff`. Balances are left as
    /// they are since those entries were already applied.
    pub fn drop_history_before(&mut self, cutoff: NaiveDate) -> Vec<Transaction> {
        let mut dropped = Vec::new();
        let mut i = self.unanchored;
        while i < self.entries.len() {
            if self.entries[i].date < cutoff {
                if let Some(tx) = self.entries.remove(i) {
                    dropped.push(tx);
                }
            } else {
                i += 1;
            }
        }
        dropped
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Transaction> {
        self.entries.get_mut(index)
    }

    pub(crate) fn mark_all_anchored(&mut self) {
        self.unanchored = 0;
    }

    /// Swaps in a rewritten log; used by the normalizer.
    pub(crate) fn replace(&mut self, entries: VecDeque<Transaction>, unanchored: usize) {
        self.unanchored = unanchored.min(entries.len());
        self.entries = entries;
    }
}

impl ReferenceHolder for Log {
    fn invalidate_refs(&mut self, scope: TreeScope, removal: &Removal) -> usize {
        let mut hit = 0;
        for tx in self.entries.iter_mut() {
            match scope {
                TreeScope::Wallets => {
                    hit += usize::from(tx.from.invalidate(removal));
                    hit += usize::from(tx.to.invalidate(removal));
                }
                _ => {
                    if TreeScope::for_category_of(tx.kind) == Some(scope) {
                        hit += usize::from(tx.category.invalidate(removal));
                    }
                }
            }
        }
        hit
    }
}
