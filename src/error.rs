// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("no exchange rate for currency '{0}'")]
    MissingRate(String),

    #[error("invalid date range: {0}")]
    InvalidRange(String),

    #[error("rate feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("failed to store rate for {currency}: {reason}")]
    PartialUpsertFailure { currency: String, reason: String },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
}

impl LedgerError {
    pub fn not_found(kind: &'static str, id: i64) -> Self {
        Self::NotFound { kind, id }
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
