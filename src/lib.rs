// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod archive;
pub mod book;
pub mod cli;
pub mod commands;
pub mod error;
pub mod ledger;
pub mod models;
pub mod money;
pub mod normalize;
pub mod stats;
pub mod storage;
pub mod tasks;
pub mod tree;
pub mod utils;

pub use archive::ArchivalRef;
pub use book::{Book, CategoryKind, ImportRecord, ImportRule};
pub use error::{AnchorBlock, LedgerError, LedgerResult};
pub use ledger::{Log, ReferenceHolder, TransactionEdit, TreeScope};
pub use money::Money;
