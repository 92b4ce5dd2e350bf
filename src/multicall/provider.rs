//! Provider wrapper that batches eligible reads

use alloy_eips::BlockId;
use alloy_primitives::{Address, Bytes};
use alloy_provider::Provider;
use alloy_sol_types::SolCall;
use alloy_transport::TransportError;
use tracing::trace;

use super::eligibility::{is_multicall_eligible, CallDescriptor};
use super::queue::MulticallQueue;
use super::transport::ProviderAggregator;
use crate::config::MulticallConfig;
use crate::errors::MulticallError;

/// Provider paired with its own multicall queue
///
/// Eligible reads are coalesced through the queue; everything else goes
/// straight to `eth_call`. Reverts look the same on both paths.
///
/// Cloning shares both the provider and the queue.
#[derive(Clone)]
pub struct MulticallProvider<P> {
    provider: P,
    queue: MulticallQueue<ProviderAggregator<P>>,
}

impl<P> MulticallProvider<P>
where
    P: Provider + Clone + 'static,
{
    /// Wrap `provider` with a default queue
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, MulticallConfig::default())
    }

    /// Wrap `provider` with custom queue settings
    pub fn with_config(provider: P, config: MulticallConfig) -> Self {
        let transport = ProviderAggregator::new(provider.clone(), config.aggregator);
        Self {
            provider,
            queue: MulticallQueue::new(transport, config),
        }
    }

    /// The wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The queue reads are batched through
    pub fn queue(&self) -> &MulticallQueue<ProviderAggregator<P>> {
        &self.queue
    }

    /// Execute a read, batching it when eligible
    pub async fn call(&self, call: CallDescriptor) -> Result<Bytes, MulticallError> {
        let target = call.to.unwrap_or(Address::ZERO);

        if is_multicall_eligible(&call, self.queue.config().aggregator) {
            let result = self.queue.enqueue_call(target, call.data).await?;
            return if result.success {
                Ok(result.data)
            } else {
                Err(MulticallError::reverted(target, result.data))
            };
        }

        trace!(%target, block = ?call.block, "Sending unbatched eth_call");
        let mut request = self.provider.call(call.to_request());
        if let Some(block) = call.block {
            request = request.block(block);
        }
        request
            .await
            .map_err(|error| direct_call_error(target, error))
    }

    /// Encode `call`, execute it against `target` and decode the return value
    pub async fn call_sol<C: SolCall>(
        &self,
        target: Address,
        call: &C,
    ) -> Result<C::Return, MulticallError> {
        let data = self.call(CallDescriptor::new(target, call.abi_encode())).await?;
        Ok(C::abi_decode_returns(&data)?)
    }

    /// Like [`MulticallProvider::call_sol`], at a specific block
    ///
    /// Historical reads are never batched.
    pub async fn call_sol_at<C: SolCall>(
        &self,
        target: Address,
        call: &C,
        block: BlockId,
    ) -> Result<C::Return, MulticallError> {
        let descriptor = CallDescriptor::new(target, call.abi_encode()).at_block(block);
        let data = self.call(descriptor).await?;
        Ok(C::abi_decode_returns(&data)?)
    }
}

/// Node-reported reverts become [`MulticallError::Reverted`], like batched legs.
fn direct_call_error(target: Address, error: TransportError) -> MulticallError {
    match error
        .as_error_resp()
        .and_then(|payload| payload.as_revert_data())
    {
        Some(data) => MulticallError::reverted(target, data),
        None => MulticallError::Rpc(error),
    }
}
