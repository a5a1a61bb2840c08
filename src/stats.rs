// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::ledger::Log;
use crate::models::{Category, Month, Transaction, TransactionType};
use crate::money::Money;
use crate::tree::{Entity, NodeId, Tree};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Flow {
    pub received: Money,
    pub spent: Money,
}

/// Received/spent totals of one month. `regular` only counts categories
/// flagged as regular; `common` counts everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BriefStatisticsRecord {
    pub common: Flow,
    pub regular: Flow,
}

impl BriefStatisticsRecord {
    /// Spending outside regular categories.
    pub fn other_spent(&self) -> Money {
        self.common.spent - self.regular.spent
    }

    pub fn other_received(&self) -> Money {
        self.common.received - self.regular.received
    }
}

/// Turnover per category node, where every ancestor accumulates its whole
/// subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMoneyMap {
    totals: HashMap<Uuid, Money>,
}

impl CategoryMoneyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Money {
        self.totals.get(&id).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn clear(&mut self) {
        self.totals.clear();
    }

    /// Adds `amount` to `node` and to every ancestor up to the top level.
    pub fn propagate<T: Entity>(&mut self, tree: &Tree<T>, node: NodeId, amount: Money) {
        for n in tree.ancestors(node) {
            if let Some(v) = tree.get(n) {
                *self.totals.entry(v.id()).or_default() += amount;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Uuid, &Money)> {
        self.totals.iter()
    }
}

/// Inclusive reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}

#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub brief: BTreeMap<Month, BriefStatisticsRecord>,
    pub income_total: CategoryMoneyMap,
    pub expense_total: CategoryMoneyMap,
    pub income_window: CategoryMoneyMap,
    pub expense_window: CategoryMoneyMap,
    pub window: Option<DateWindow>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brief_for(&self, month: Month) -> BriefStatisticsRecord {
        self.brief.get(&month).copied().unwrap_or_default()
    }

    /// Books one anchored transaction into the brief and category maps.
    ///
    /// Entries whose category is empty or archived still count toward the
    /// `common` totals but are skipped for the regular split and for
    /// propagation.
    pub fn record(
        &mut self,
        tx: &Transaction,
        income: &Tree<Category>,
        expense: &Tree<Category>,
    ) {
        let (tree, total, window) = match tx.kind {
            TransactionType::In => (income, &mut self.income_total, &mut self.income_window),
            TransactionType::Out => (expense, &mut self.expense_total, &mut self.expense_window),
            TransactionType::Transfer => return,
        };
        let node = tx.category.resolve(tree);
        let regular = node.and_then(|n| tree.get(n)).is_some_and(|c| c.regular);
        if let Some(n) = node {
            total.propagate(tree, n, tx.amount);
            if self.window.is_some_and(|w| w.contains(tx.date)) {
                window.propagate(tree, n, tx.amount);
            }
        }

        let rec = self.brief.entry(tx.month()).or_default();
        if tx.kind == TransactionType::Out {
            rec.common.spent += tx.amount;
            if regular {
                rec.regular.spent += tx.amount;
            }
        } else {
            rec.common.received += tx.amount;
            if regular {
                rec.regular.received += tx.amount;
            }
        }
    }

    /// Rebuilds every statistic from the anchored part of `log`.
    pub fn replay(&mut self, log: &Log, income: &Tree<Category>, expense: &Tree<Category>) {
        self.brief.clear();
        self.income_total.clear();
        self.expense_total.clear();
        self.income_window.clear();
        self.expense_window.clear();
        for tx in log.anchored().rev() {
            self.record(tx, income, expense);
        }
        log::debug!("statistics replayed over {} months", self.brief.len());
    }

    /// Recomputes the window-scoped category maps for `[from, to]`.
    pub fn load_categories_statistics(
        &mut self,
        window: DateWindow,
        log: &Log,
        income: &Tree<Category>,
        expense: &Tree<Category>,
    ) {
        self.window = Some(window);
        self.income_window = category_statistics(log, income, TransactionType::In, Some(window));
        self.expense_window =
            category_statistics(log, expense, TransactionType::Out, Some(window));
    }

    /// Rebuilds the all-time category maps, keeping brief totals untouched.
    pub fn reload_category_totals(
        &mut self,
        log: &Log,
        income: &Tree<Category>,
        expense: &Tree<Category>,
    ) {
        self.income_total = category_statistics(log, income, TransactionType::In, None);
        self.expense_total = category_statistics(log, expense, TransactionType::Out, None);
        if let Some(w) = self.window {
            self.load_categories_statistics(w, log, income, expense);
        }
    }
}

/// Pure scan of the anchored log for one transaction type, optionally
/// limited to a window.
pub fn category_statistics(
    log: &Log,
    tree: &Tree<Category>,
    kind: TransactionType,
    window: Option<DateWindow>,
) -> CategoryMoneyMap {
    let mut map = CategoryMoneyMap::new();
    for tx in log.anchored() {
        if tx.kind != kind || window.is_some_and(|w| !w.contains(tx.date)) {
            continue;
        }
        if let Some(node) = tx.category.resolve(tree) {
            map.propagate(tree, node, tx.amount);
        }
    }
    map
}
