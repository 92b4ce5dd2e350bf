//! The aggregate-call round trip

use alloy_network::TransactionBuilder;
use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use alloy_transport::{TransportError, TransportErrorKind};
use async_trait::async_trait;
use tracing::trace;

use crate::contracts::Multicall3;

/// Executes a list of `aggregate3` legs in one round trip
///
/// The result list is expected to be parallel to `calls`. The queue checks
/// this and fails the drain when it is not.
#[async_trait]
pub trait AggregateTransport: Send + Sync + 'static {
    /// Invoke the aggregator with `calls`.
    async fn aggregate(
        &self,
        calls: Vec<Multicall3::Call3>,
    ) -> Result<Vec<Multicall3::Result>, TransportError>;
}

/// [`AggregateTransport`] that sends `aggregate3` as a plain `eth_call`
#[derive(Debug, Clone)]
pub struct ProviderAggregator<P> {
    provider: P,
    aggregator: Address,
}

impl<P> ProviderAggregator<P> {
    /// Use the Multicall3 deployment at `aggregator`
    pub fn new(provider: P, aggregator: Address) -> Self {
        Self {
            provider,
            aggregator,
        }
    }
}

#[async_trait]
impl<P> AggregateTransport for ProviderAggregator<P>
where
    P: Provider + Clone + 'static,
{
    async fn aggregate(
        &self,
        calls: Vec<Multicall3::Call3>,
    ) -> Result<Vec<Multicall3::Result>, TransportError> {
        let legs = calls.len();
        let input = Multicall3::aggregate3Call { calls }.abi_encode();
        let tx = TransactionRequest::default()
            .with_to(self.aggregator)
            .with_input(input);

        let raw = self.provider.call(tx).await?;
        trace!(legs, bytes = raw.len(), "aggregate3 returned");

        Multicall3::aggregate3Call::abi_decode_returns(&raw).map_err(|e| {
            TransportErrorKind::custom_str(&format!("failed to decode aggregate3 result: {e}"))
        })
    }
}
