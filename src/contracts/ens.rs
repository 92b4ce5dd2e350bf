//! ENS registry and resolver bindings

use alloy_sol_types::sol;

sol! {
    /// ENS registry.
    interface IEnsRegistry {
        function resolver(bytes32 node) external view returns (address);
        function owner(bytes32 node) external view returns (address);
    }

    /// Public resolver profiles used for forward, reverse and text lookups.
    interface IEnsResolver {
        function addr(bytes32 node) external view returns (address);
        function name(bytes32 node) external view returns (string);
        function text(bytes32 node, string key) external view returns (string);
    }
}
