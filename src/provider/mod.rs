// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Provider construction
//!
//! - [`create_http_provider`] builds a bare alloy HTTP provider, optionally
//!   with the RPC [`LoggingLayer`](crate::transport::LoggingLayer)
//! - [`create_multicall_provider`] additionally attaches a multicall queue
//!
//! Everything else in the crate is generic over `P: Provider`, so providers
//! built elsewhere work just as well.

mod config;
mod factory;

pub use config::ProviderConfig;
pub use factory::{create_http_provider, create_multicall_provider};

/// HTTP provider on the Ethereum network type
pub type HttpProvider = alloy_provider::RootProvider<alloy_network::Ethereum>;
