//! OP-stack `GasPriceOracle` predeploy bindings

use alloy_sol_types::sol;

sol! {
    /// L1 data fee oracle on OP-stack chains.
    interface GasPriceOracle {
        function l1BaseFee() external view returns (uint256);
        function gasPrice() external view returns (uint256);
        function baseFee() external view returns (uint256);
        function decimals() external view returns (uint256);
        function getL1Fee(bytes memory data) external view returns (uint256);
        function getL1GasUsed(bytes memory data) external view returns (uint256);
    }
}
