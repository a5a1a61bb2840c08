// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{Log, ReferenceHolder, TreeScope};
use crate::models::{Category, Plans, Task, TransactionType};
use crate::money::Money;
use crate::tree::{Removal, Tree};

/// Recomputes `spent` and `rest` of `task` from the log.
///
/// Matches entries of the task's type whose category is the task category
/// or lies below it, dated inside `[from, to]`. Anchored history is
/// newest-first, so the scan stops at its first entry older than `from`;
/// the pending prefix is always read in full.
pub fn update_task(task: &mut Task, log: &Log, income: &Tree<Category>, expense: &Tree<Category>) {
    task.spent = Money::ZERO;
    task.rest = task.amount;

    let Some((newest, oldest)) = log.date_range() else {
        return;
    };
    if task.from > newest || task.to < oldest {
        return;
    }
    let tree = match task.kind {
        TransactionType::In => income,
        TransactionType::Out => expense,
        TransactionType::Transfer => return,
    };
    let Some(target) = task.category.resolve(tree) else {
        return;
    };

    let mut spent = Money::ZERO;
    for (index, tx) in log.iter().enumerate() {
        if tx.date < task.from {
            // Pending entries are in insertion order and may be back-dated.
            if log.is_anchored(index) {
                break;
            }
            continue;
        }
        if tx.date > task.to || tx.kind != task.kind {
            continue;
        }
        if let Some(node) = tx.category.resolve(tree) {
            if tree.is_in_subtree(node, target) {
                spent += tx.amount;
            }
        }
    }
    task.spent = spent;
    task.rest = task.amount - spent;
}

pub fn update_tasks(
    tasks: &mut [Task],
    log: &Log,
    income: &Tree<Category>,
    expense: &Tree<Category>,
) {
    for task in tasks.iter_mut() {
        update_task(task, log, income, expense);
    }
    log::debug!("recomputed {} tasks", tasks.len());
}

fn category_scope(kind: TransactionType) -> Option<TreeScope> {
    TreeScope::for_category_of(kind)
}

impl ReferenceHolder for Vec<Task> {
    fn invalidate_refs(&mut self, scope: TreeScope, removal: &Removal) -> usize {
        self.iter_mut()
            .filter(|t| category_scope(t.kind) == Some(scope))
            .map(|t| usize::from(t.category.invalidate(removal)))
            .sum()
    }
}

impl ReferenceHolder for Plans {
    fn invalidate_refs(&mut self, scope: TreeScope, removal: &Removal) -> usize {
        self.iter_mut()
            .filter(|p| category_scope(p.kind) == Some(scope))
            .map(|p| usize::from(p.category.invalidate(removal)))
            .sum()
    }
}
