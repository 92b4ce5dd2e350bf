// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower middleware for the RPC client.
//!
//! ```rust,ignore
//! use ethopt::transport::LoggingLayer;
//! use alloy_rpc_client::ClientBuilder;
//! use std::time::Duration;
//!
//! let client = ClientBuilder::default()
//!     .layer(LoggingLayer::new().with_slow_threshold(Duration::from_secs(2)))
//!     .http(rpc_url);
//! ```
//!
//! Pacing is not done here: the batch scheduler spaces requests itself, and
//! the multicall queue cuts their number.

mod logging;

pub use logging::{LoggingLayer, LoggingService};
