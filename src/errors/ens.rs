// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for ENS name resolution.

use super::MulticallError;

/// Errors that can occur while resolving ENS names.
///
/// A name that simply has no record is not an error: the resolver methods
/// return `Ok(None)` in that case.
#[derive(Debug, thiserror::Error)]
pub enum EnsError {
    /// The name is empty or contains an empty label (e.g. `"foo..eth"`).
    #[error("Invalid ENS name: {name:?}")]
    InvalidName {
        /// The rejected name
        name: String,
    },

    /// No registry is configured for the provider's chain.
    #[error("No ENS registry configured")]
    NoRegistry,

    /// A registry or resolver call failed.
    #[error("ENS contract call failed: {0}")]
    Call(#[from] MulticallError),
}

impl EnsError {
    /// Create an `InvalidName` error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        EnsError::InvalidName { name: name.into() }
    }
}
