// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error type for the library's I/O seams (REST backend, ledger database, payloads).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Malformed payload from {0}: expected a list or a page with 'results'")]
    Payload(String),

    #[error("Invalid month '{0}', expected YYYY-MM or YYYY-MM-01")]
    Month(String),

    #[error("Not configured: {0}")]
    Config(&'static str),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
