// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Day-level cleanup of the log.
//!
//! Each run of same-date entries first has identical entries merged, then
//! its wallet-to-wallet transfers collapsed: chains such as cash -> card ->
//! savings become the smallest set of direct transfers that moves the same
//! net amount in and out of every wallet. The pending prefix and the
//! anchored history are normalized separately so no entry crosses the
//! anchoring boundary.

use std::collections::{HashMap, HashSet, VecDeque};

use uuid::Uuid;

use crate::ledger::Log;
use crate::models::{Transaction, TransactionType};
use crate::money::Money;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Entries folded into an identical entry of the same day.
    pub merged: usize,
    /// Days whose transfers were rewritten.
    pub collapsed_days: usize,
    pub transfers_removed: usize,
    pub transfers_added: usize,
}

impl NormalizeReport {
    pub fn changed(&self) -> bool {
        self.merged > 0 || self.collapsed_days > 0
    }
}

/// Normalizes the whole log in place.
pub fn normalize(log: &mut Log) -> NormalizeReport {
    let mut report = NormalizeReport::default();
    let pending: Vec<Transaction> = log.pending().cloned().collect();
    let history: Vec<Transaction> = log.anchored().cloned().collect();

    let pending = normalize_region(pending, &mut report);
    let history = normalize_region(history, &mut report);

    if report.changed() {
        let unanchored = pending.len();
        let entries: VecDeque<Transaction> = pending.into_iter().chain(history).collect();
        log.replace(entries, unanchored);
        log::info!(
            "normalized log: {} merged, {} days collapsed ({} transfers -> {})",
            report.merged,
            report.collapsed_days,
            report.transfers_removed,
            report.transfers_added
        );
    } else {
        log::debug!("normalization found nothing to change");
    }
    report
}

fn normalize_region(entries: Vec<Transaction>, report: &mut NormalizeReport) -> Vec<Transaction> {
    let mut out = Vec::with_capacity(entries.len());
    let mut start = 0;
    while start < entries.len() {
        let date = entries[start].date;
        let end = entries[start..]
            .iter()
            .position(|t| t.date != date)
            .map_or(entries.len(), |p| start + p);
        out.extend(normalize_day(&entries[start..end], report));
        start = end;
    }
    out
}

/// Normalizes one run of same-date entries. The result equals the input
/// when nothing could be merged or collapsed.
pub fn normalize_day(day: &[Transaction], report: &mut NormalizeReport) -> Vec<Transaction> {
    let mut entries = day.to_vec();
    report.merged += merge_duplicates(&mut entries);

    match collapse_transfers(&entries) {
        Some(collapse) => {
            report.collapsed_days += 1;
            report.transfers_removed += collapse.replaced.len();
            report.transfers_added += collapse.emitted.len();
            let replaced: HashSet<usize> = collapse.replaced.into_iter().collect();
            entries
                .into_iter()
                .enumerate()
                .filter(|(i, _)| !replaced.contains(i))
                .map(|(_, t)| t)
                .chain(collapse.emitted)
                .collect()
        }
        None => entries,
    }
}

fn same_entry(a: &Transaction, b: &Transaction) -> bool {
    a.kind == b.kind && a.category == b.category && a.from == b.from && a.to == b.to && a.note == b.note
}

/// Folds entries with identical type, category, wallets and note into the
/// first of them by summing amounts. Pairs whose sum would overflow stay
/// apart. Returns how many entries were folded.
pub fn merge_duplicates(entries: &mut Vec<Transaction>) -> usize {
    let mut merged = 0;
    let mut i = 0;
    while i < entries.len() {
        let mut j = i + 1;
        while j < entries.len() {
            let sum = same_entry(&entries[i], &entries[j])
                .then(|| entries[i].amount.checked_add(entries[j].amount).ok())
                .flatten();
            if let Some(sum) = sum {
                entries.remove(j);
                entries[i].amount = sum;
                merged += 1;
            } else {
                j += 1;
            }
        }
        i += 1;
    }
    merged
}

/// Net flow per wallet in order of first appearance.
#[derive(Debug, Default)]
struct WalletFlows {
    order: Vec<Uuid>,
    balance: HashMap<Uuid, Money>,
}

impl WalletFlows {
    fn add(&mut self, wallet: Uuid, amount: Money) {
        if !self.balance.contains_key(&wallet) {
            self.order.push(wallet);
        }
        *self.balance.entry(wallet).or_default() += amount;
    }

    fn of(&self, wallet: Uuid) -> Money {
        self.balance.get(&wallet).copied().unwrap_or_default()
    }

    fn iter(&self) -> impl Iterator<Item = (Uuid, Money)> + '_ {
        self.order.iter().map(|w| (*w, self.of(*w)))
    }
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    index: usize,
    from: Uuid,
    to: Uuid,
    amount: Money,
}

impl Edge {
    fn joins(&self, a: Uuid, b: Uuid) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}

#[derive(Debug)]
struct Collapse {
    /// Day indices of the transfers being replaced.
    replaced: Vec<usize>,
    emitted: Vec<Transaction>,
}

fn collapse_transfers(entries: &[Transaction]) -> Option<Collapse> {
    let edges: Vec<Edge> = entries
        .iter()
        .enumerate()
        .filter(|(_, t)| t.kind == TransactionType::Transfer)
        .filter_map(|(index, t)| {
            let from = t.from.id()?;
            let to = t.to.id()?;
            (from != to).then_some(Edge {
                index,
                from,
                to,
                amount: t.amount,
            })
        })
        .collect();
    if edges.len() < 2 {
        return None;
    }
    let date = entries[edges[0].index].date;

    let mut flows = WalletFlows::default();
    for e in &edges {
        flows.add(e.from, -e.amount);
        flows.add(e.to, e.amount);
    }

    // A lone transfer that fully settles both of its wallets stays as is.
    let mut settled: HashSet<Uuid> = HashSet::new();
    let mut kept: HashSet<usize> = HashSet::new();
    for e in &edges {
        if settled.contains(&e.from) || settled.contains(&e.to) {
            continue;
        }
        let between = edges.iter().filter(|o| o.joins(e.from, e.to)).count();
        if between == 1 && flows.of(e.from) == -e.amount && flows.of(e.to) == e.amount {
            kept.insert(e.index);
            settled.insert(e.from);
            settled.insert(e.to);
        }
    }
    let rest: Vec<&Edge> = edges.iter().filter(|e| !kept.contains(&e.index)).collect();

    let mut outs: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
    for e in &rest {
        outs.entry(e.from).or_default().insert(e.to);
    }
    let chained = outs
        .values()
        .any(|targets| targets.iter().any(|t| outs.contains_key(t)));
    if !chained {
        return None;
    }

    let mut surplus: Vec<(Uuid, Money)> = Vec::new();
    let mut deficit: Vec<(Uuid, Money)> = Vec::new();
    for (wallet, balance) in flows.iter() {
        if settled.contains(&wallet) || balance.is_zero() {
            continue;
        }
        if balance.is_negative() {
            deficit.push((wallet, balance.abs()));
        } else {
            surplus.push((wallet, balance));
        }
    }
    surplus.sort_by_key(|(_, m)| *m);
    deficit.sort_by_key(|(_, m)| *m);

    let supply: Vec<Money> = deficit.iter().map(|(_, m)| *m).collect();
    let demand: Vec<Money> = surplus.iter().map(|(_, m)| *m).collect();
    let emitted: Vec<Transaction> = solve_transportation(&supply, &demand)
        .into_iter()
        .map(|a| Transaction::transfer(date, a.amount, deficit[a.supplier].0, surplus[a.consumer].0))
        .collect();

    if same_transfers(entries, &rest, &emitted) {
        return None;
    }
    log::debug!(
        "{}: {} chained transfers collapse into {}",
        date,
        rest.len(),
        emitted.len()
    );
    Some(Collapse {
        replaced: rest.iter().map(|e| e.index).collect(),
        emitted,
    })
}

/// True when `emitted` would reproduce the replaced transfers exactly.
fn same_transfers(entries: &[Transaction], rest: &[&Edge], emitted: &[Transaction]) -> bool {
    if rest.len() != emitted.len() {
        return false;
    }
    let mut left: Vec<&Transaction> = rest.iter().map(|e| &entries[e.index]).collect();
    for t in emitted {
        match left.iter().position(|o| *o == t) {
            Some(p) => {
                left.swap_remove(p);
            }
            None => return false,
        }
    }
    left.is_empty()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub supplier: usize,
    pub consumer: usize,
    pub amount: Money,
}

/// Greedy allocation over the supply x demand matrix.
///
/// Rows and columns are visited in the order given. Every uncovered cell
/// receives the smaller of the remaining supply and demand; once a side is
/// exhausted its remaining cells are covered with zero. Totals of `supply`
/// and `demand` are expected to match.
pub fn solve_transportation(supply: &[Money], demand: &[Money]) -> Vec<Allocation> {
    let mut supply = supply.to_vec();
    let mut demand = demand.to_vec();
    let mut covered = vec![vec![false; demand.len()]; supply.len()];
    let mut out = Vec::new();

    for r in 0..supply.len() {
        for c in 0..demand.len() {
            if covered[r][c] {
                continue;
            }
            covered[r][c] = true;
            let amount = supply[r].min(demand[c]);
            if amount.is_zero() || amount.is_negative() {
                continue;
            }
            supply[r] -= amount;
            demand[c] -= amount;
            out.push(Allocation {
                supplier: r,
                consumer: c,
                amount,
            });
            if supply[r].is_zero() {
                covered[r].iter_mut().skip(c + 1).for_each(|cell| *cell = true);
            }
            if demand[c].is_zero() {
                covered.iter_mut().skip(r + 1).for_each(|row| row[c] = true);
            }
        }
    }
    out
}
