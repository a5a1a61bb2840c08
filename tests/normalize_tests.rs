// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;
use walletbook::models::{Transaction, TransactionType};
use walletbook::normalize::{normalize, solve_transportation};
use walletbook::{Log, Money};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

fn units(n: i64) -> Money {
    Money::from_units(n)
}

/// Net flow per wallet over all transfers of the log.
fn net_flows(log: &Log) -> HashMap<Uuid, Money> {
    let mut out: HashMap<Uuid, Money> = HashMap::new();
    for t in log.iter().filter(|t| t.kind == TransactionType::Transfer) {
        *out.entry(t.from.id().unwrap()).or_default() -= t.amount;
        *out.entry(t.to.id().unwrap()).or_default() += t.amount;
    }
    out.retain(|_, v| !v.is_zero());
    out
}

fn transfers(log: &Log) -> Vec<(Uuid, Uuid, Money)> {
    log.iter()
        .filter(|t| t.kind == TransactionType::Transfer)
        .map(|t| (t.from.id().unwrap(), t.to.id().unwrap(), t.amount))
        .collect()
}

#[test]
fn same_day_duplicates_are_merged() {
    let wallet = Uuid::new_v4();
    let category = Uuid::new_v4();
    let log_entries = vec![
        Transaction::expense(d(2), units(200), wallet, category).with_note("market"),
        Transaction::expense(d(2), units(300), wallet, category).with_note("market"),
    ];
    let mut log = Log::from_entries(log_entries, 0);

    let report = normalize(&mut log);

    assert_eq!(report.merged, 1);
    assert_eq!(log.len(), 1);
    assert_eq!(log.get(0).unwrap().amount, units(500));
}

#[test]
fn different_notes_or_days_are_not_merged() {
    let wallet = Uuid::new_v4();
    let category = Uuid::new_v4();
    let log_entries = vec![
        Transaction::expense(d(3), units(1), wallet, category).with_note("a"),
        Transaction::expense(d(3), units(1), wallet, category).with_note("b"),
        Transaction::expense(d(2), units(1), wallet, category).with_note("a"),
    ];
    let mut log = Log::from_entries(log_entries, 0);

    let report = normalize(&mut log);

    assert!(!report.changed());
    assert_eq!(log.len(), 3);
}

#[test]
fn chain_through_intermediate_wallet_collapses() {
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let log_entries = vec![
        Transaction::transfer(d(5), units(100), b, c),
        Transaction::transfer(d(5), units(100), a, b),
    ];
    let mut log = Log::from_entries(log_entries, 0);
    let before = net_flows(&log);

    let report = normalize(&mut log);

    assert_eq!(report.collapsed_days, 1);
    assert_eq!(transfers(&log), vec![(a, c, units(100))]);
    assert_eq!(net_flows(&log), before);
    assert!(!net_flows(&log).contains_key(&b));
}

#[test]
fn running_twice_changes_nothing_more() {
    let (a, b, c, e) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let cat = Uuid::new_v4();
    let log_entries = vec![
        Transaction::transfer(d(9), units(70), b, c),
        Transaction::transfer(d(9), units(40), b, e),
        Transaction::transfer(d(9), units(100), a, b),
        Transaction::expense(d(9), units(5), a, cat),
        Transaction::expense(d(9), units(6), a, cat),
        Transaction::transfer(d(8), units(10), c, a),
    ];
    let mut log = Log::from_entries(log_entries, 0);

    assert!(normalize(&mut log).changed());
    let once: Vec<Transaction> = log.iter().cloned().collect();

    let second = normalize(&mut log);
    assert!(!second.changed());
    let twice: Vec<Transaction> = log.iter().cloned().collect();
    assert_eq!(once, twice);
}

#[test]
fn collapse_keeps_every_wallet_net_flow() {
    let w: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
    let log_entries = vec![
        Transaction::transfer(d(12), units(30), w[1], w[2]),
        Transaction::transfer(d(12), units(50), w[0], w[1]),
        Transaction::transfer(d(12), units(45), w[2], w[3]),
        Transaction::transfer(d(12), units(25), w[4], w[2]),
        Transaction::transfer(d(12), units(5), w[3], w[0]),
    ];
    let mut log = Log::from_entries(log_entries, 0);
    let before = net_flows(&log);

    let report = normalize(&mut log);

    assert!(report.changed());
    assert_eq!(net_flows(&log), before);
    assert!(transfers(&log).len() < 5);
}

#[test]
fn lone_direct_transfer_is_left_alone() {
    let (a, b, c, e, x, y) = (
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
    );
    let log_entries = vec![
        Transaction::transfer(d(14), units(15), x, y).with_note("rent share"),
        Transaction::transfer(d(14), units(20), b, c),
        Transaction::transfer(d(14), units(20), a, b),
        Transaction::transfer(d(14), units(20), c, e),
    ];
    let mut log = Log::from_entries(log_entries, 0);

    normalize(&mut log);

    let kept = log.iter().find(|t| t.note == "rent share").unwrap();
    assert_eq!(kept.from.id(), Some(x));
    assert_eq!(kept.amount, units(15));
    let mut rest = transfers(&log);
    rest.retain(|(f, _, _)| *f != x);
    assert_eq!(rest, vec![(a, e, units(20))]);
}

#[test]
fn shallow_transfers_are_already_minimal() {
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let log_entries = vec![
        Transaction::transfer(d(20), units(10), a, b),
        Transaction::transfer(d(20), units(10), a, c),
        Transaction::transfer(d(20), units(5), c, c),
    ];
    let mut log = Log::from_entries(log_entries.clone(), 0);

    let report = normalize(&mut log);

    assert!(!report.changed());
    let after: Vec<Transaction> = log.iter().cloned().collect();
    assert_eq!(after, log_entries);
}

#[test]
fn pending_and_anchored_regions_are_kept_apart() {
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let cat = Uuid::new_v4();
    let log_entries = vec![
        Transaction::expense(d(1), units(2), a, cat),
        Transaction::transfer(d(1), units(7), b, c),
        Transaction::expense(d(1), units(3), a, cat),
        Transaction::transfer(d(1), units(7), a, b),
    ];
    let mut log = Log::from_entries(log_entries, 2);

    let report = normalize(&mut log);

    assert_eq!(report.merged, 0);
    assert_eq!(report.collapsed_days, 0);
    assert_eq!(log.len(), 4);
    assert_eq!(log.unanchored(), 2);
}

#[test]
fn pending_duplicates_shrink_pending_count() {
    let (a, cat) = (Uuid::new_v4(), Uuid::new_v4());
    let log_entries = vec![
        Transaction::expense(d(1), units(2), a, cat),
        Transaction::expense(d(1), units(3), a, cat),
        Transaction::expense(d(1), units(4), a, cat),
    ];
    let mut log = Log::from_entries(log_entries, 2);

    normalize(&mut log);

    assert_eq!(log.len(), 2);
    assert_eq!(log.unanchored(), 1);
    assert_eq!(log.get(0).unwrap().amount, units(5));
    assert_eq!(log.get(1).unwrap().amount, units(4));
}

#[test]
fn greedy_allocation_fills_in_sorted_order() {
    let supply = [units(10), units(30)];
    let demand = [units(15), units(25)];

    let plan = solve_transportation(&supply, &demand);

    let cells: Vec<(usize, usize, Money)> = plan
        .iter()
        .map(|a| (a.supplier, a.consumer, a.amount))
        .collect();
    assert_eq!(
        cells,
        vec![
            (0, 0, units(10)),
            (1, 0, units(5)),
            (1, 1, units(25)),
        ]
    );
}

#[test]
fn duplicates_whose_sum_overflows_stay_apart() {
    let wallet = Uuid::new_v4();
    let category = Uuid::new_v4();
    let huge = Money::from_cents(i64::MAX);
    let log_entries = vec![
        Transaction::expense(d(4), huge, wallet, category),
        Transaction::expense(d(4), huge, wallet, category),
    ];
    let mut log = Log::from_entries(log_entries, 0);

    let report = normalize(&mut log);

    assert_eq!(report.merged, 0);
    assert_eq!(log.len(), 2);
    assert!(log.iter().all(|t| t.amount == huge));
}
