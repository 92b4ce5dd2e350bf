use alloy_chains::NamedChain;

/// Chains that post transaction data to L1
pub trait L2 {
    /// OP-stack chains such as Base and Optimism charge an L1 data fee on top
    /// of execution gas. Chains such as Arbitrum and Polygon do not expose
    /// it through the `GasPriceOracle` predeploy.
    fn has_l1_fees(&self) -> bool;
}

impl L2 for NamedChain {
    /// Not exhaustive; unknown chains report `false`.
    fn has_l1_fees(&self) -> bool {
        use NamedChain::*;
        matches!(
            self,
            Base | BaseSepolia | Optimism | OptimismSepolia | Fraxtal | Mode | Mantle
        )
    }
}
