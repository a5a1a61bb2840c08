// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Why a pending transaction cannot be anchored yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorBlock {
    MissingCategory,
    MissingSource,
    MissingTarget,
}

impl fmt::Display for AnchorBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorBlock::MissingCategory => f.write_str("category is missing or archived"),
            AnchorBlock::MissingSource => f.write_str("source wallet is missing or archived"),
            AnchorBlock::MissingTarget => f.write_str("target wallet is missing or archived"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("transaction #{index} cannot be anchored: {reason}")]
    NotAnchorable { index: usize, reason: AnchorBlock },

    #[error("index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("transaction #{0} is anchored and can no longer be changed")]
    AnchoredEntry(usize),

    #[error("node {0} not found")]
    NodeNotFound(Uuid),

    #[error("id {0} is already present in the tree")]
    DuplicateId(Uuid),

    #[error("'{0}' already exists at this level")]
    DuplicateName(String),

    #[error("invalid name '{0}'")]
    InvalidName(String),

    #[error("a node cannot be moved into its own subtree")]
    CyclicMove,

    #[error("no node at path '{0}'")]
    UnknownPath(String),

    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
