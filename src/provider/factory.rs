// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Provider factory functions

use alloy_network::Ethereum;
use alloy_provider::ProviderBuilder;
use alloy_rpc_client::{ClientBuilder, RpcClient};
use alloy_transport_http::Http;

use crate::errors::RpcError;
use crate::multicall::MulticallProvider;
use crate::transport::LoggingLayer;

use super::config::ProviderConfig;
use super::HttpProvider;

/// Create an HTTP provider with the given configuration
///
/// Recommended fillers are disabled so the result is a bare `RootProvider`;
/// fee fields are filled by [`FeeEstimator`](crate::FeeEstimator) instead.
///
/// # Errors
///
/// [`RpcError::ProviderUrlInvalid`] if the URL cannot be parsed.
pub fn create_http_provider(config: &ProviderConfig) -> Result<HttpProvider, RpcError> {
    let url: url::Url = config
        .url
        .parse()
        .map_err(|e| RpcError::ProviderUrlInvalid(format!("{e}")))?;

    let builder = ProviderBuilder::new()
        .disable_recommended_fillers()
        .network::<Ethereum>();

    let http = Http::new(url);
    let client = if config.logging_enabled {
        ClientBuilder::default()
            .layer(LoggingLayer::new())
            .transport(http, false)
    } else {
        RpcClient::new(http, false)
    };
    Ok(builder.connect_client(client))
}

/// Create an HTTP provider wrapped with its multicall queue
///
/// # Errors
///
/// [`RpcError::ProviderUrlInvalid`] if the URL cannot be parsed.
///
/// # Examples
///
/// ```rust,ignore
/// use ethopt::provider::{create_multicall_provider, ProviderConfig};
/// use ethopt::contracts::IERC20;
///
/// let provider = create_multicall_provider(&ProviderConfig::new(rpc_url))?;
/// let supply = provider.call_sol(token, &IERC20::totalSupplyCall {}).await?;
/// ```
pub fn create_multicall_provider(
    config: &ProviderConfig,
) -> Result<MulticallProvider<HttpProvider>, RpcError> {
    let provider = create_http_provider(config)?;
    Ok(MulticallProvider::with_config(
        provider,
        config.multicall.clone(),
    ))
}
