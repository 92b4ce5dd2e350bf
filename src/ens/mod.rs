// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! ENS name resolution
//!
//! Lookups try each configured registry in order and use the first one that
//! knows a resolver for the name. All registry and resolver reads go
//! through the multicall queue.

use alloy_primitives::{hex, keccak256, Address, B256};
use alloy_provider::Provider;
use tracing::{debug, Instrument};

use crate::config::constants::ENS_REGISTRY;
use crate::contracts::ens::{IEnsRegistry, IEnsResolver};
use crate::errors::EnsError;
use crate::multicall::MulticallProvider;
use crate::tracing::spans;

/// EIP-137 namehash of `name`
///
/// Labels are lowercased (ASCII only) before hashing. The empty name is the
/// root node.
///
/// # Errors
///
/// [`EnsError::InvalidName`] if any label is empty.
///
/// # Examples
///
/// ```rust
/// use ethopt::namehash;
/// use alloy_primitives::b256;
///
/// assert_eq!(
///     namehash("eth").unwrap(),
///     b256!("93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae")
/// );
/// ```
pub fn namehash(name: &str) -> Result<B256, EnsError> {
    if name.is_empty() {
        return Ok(B256::ZERO);
    }

    let mut node = B256::ZERO;
    for label in name.rsplit('.') {
        if label.is_empty() {
            return Err(EnsError::invalid_name(name));
        }
        let label_hash = keccak256(label.to_ascii_lowercase().as_bytes());
        let mut preimage = [0u8; 64];
        preimage[..32].copy_from_slice(node.as_slice());
        preimage[32..].copy_from_slice(label_hash.as_slice());
        node = keccak256(preimage);
    }
    Ok(node)
}

/// Reverse-record name of `address` (`<hex>.addr.reverse`)
pub fn reverse_name(address: Address) -> String {
    format!("{}.addr.reverse", hex::encode(address.as_slice()))
}

/// ENS resolver over one or more registries
#[derive(Clone)]
pub struct EnsResolver<P> {
    provider: MulticallProvider<P>,
    registries: Vec<Address>,
}

impl<P> EnsResolver<P>
where
    P: Provider + Clone + 'static,
{
    /// Resolve against the mainnet ENS registry
    pub fn new(provider: MulticallProvider<P>) -> Self {
        Self::with_registries(provider, vec![ENS_REGISTRY])
    }

    /// Resolve against `registries`, tried in order
    pub fn with_registries(provider: MulticallProvider<P>, registries: Vec<Address>) -> Self {
        Self {
            provider,
            registries,
        }
    }

    /// Registries in lookup order
    pub fn registries(&self) -> &[Address] {
        &self.registries
    }

    /// Resolver contract of `node`, from the first registry that has one
    pub async fn resolver(&self, node: B256) -> Result<Option<Address>, EnsError> {
        if self.registries.is_empty() {
            return Err(EnsError::NoRegistry);
        }

        for &registry in &self.registries {
            let resolver = self
                .provider
                .call_sol(registry, &IEnsRegistry::resolverCall { node })
                .await?;
            if !resolver.is_zero() {
                debug!(%registry, %resolver, "Found ENS resolver");
                return Ok(Some(resolver));
            }
        }
        Ok(None)
    }

    /// Address `name` resolves to
    pub async fn resolve_name(&self, name: &str) -> Result<Option<Address>, EnsError> {
        let node = namehash(name)?;
        async move {
            let Some(resolver) = self.resolver(node).await? else {
                return Ok(None);
            };
            let address = self
                .provider
                .call_sol(resolver, &IEnsResolver::addrCall { node })
                .await?;
            Ok::<_, EnsError>((!address.is_zero()).then_some(address))
        }
        .instrument(spans::resolve_name(name))
        .await
    }

    /// Primary name of `address`
    ///
    /// The reverse record is only trusted if the name resolves back to
    /// `address`.
    pub async fn lookup_address(&self, address: Address) -> Result<Option<String>, EnsError> {
        let node = namehash(&reverse_name(address))?;
        let Some(resolver) = self.resolver(node).await? else {
            return Ok(None);
        };

        let name = self
            .provider
            .call_sol(resolver, &IEnsResolver::nameCall { node })
            .await?;
        if name.is_empty() {
            return Ok(None);
        }

        match self.resolve_name(&name).await? {
            Some(forward) if forward == address => Ok(Some(name)),
            _ => {
                debug!(%address, name = %name, "Reverse record does not resolve back");
                Ok(None)
            }
        }
    }

    /// Text record `key` of `name`
    pub async fn text(&self, name: &str, key: &str) -> Result<Option<String>, EnsError> {
        let node = namehash(name)?;
        let Some(resolver) = self.resolver(node).await? else {
            return Ok(None);
        };
        let value = self
            .provider
            .call_sol(
                resolver,
                &IEnsResolver::textCall {
                    node,
                    key: key.to_string(),
                },
            )
            .await?;
        Ok((!value.is_empty()).then_some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};

    #[test]
    fn test_namehash_vectors() {
        assert_eq!(namehash("").unwrap(), B256::ZERO);
        assert_eq!(
            namehash("eth").unwrap(),
            b256!("93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae")
        );
        assert_eq!(
            namehash("foo.eth").unwrap(),
            b256!("de9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f")
        );
    }

    #[test]
    fn test_namehash_lowercases() {
        assert_eq!(namehash("FOO.eth").unwrap(), namehash("foo.eth").unwrap());
    }

    #[test]
    fn test_namehash_rejects_empty_label() {
        assert!(matches!(
            namehash("foo..eth"),
            Err(EnsError::InvalidName { .. })
        ));
        assert!(namehash(".eth").is_err());
    }

    #[test]
    fn test_reverse_name() {
        let addr = address!("d8da6bf26964af9d7eed9e03e53415d37aa96045");
        assert_eq!(
            reverse_name(addr),
            "d8da6bf26964af9d7eed9e03e53415d37aa96045.addr.reverse"
        );
    }
}
