//! Bindings for the contracts the scripts deploy and call

use alloy::{network::Ethereum, providers::DynProvider, sol};

/// The provider type contract instances are bound to
pub type Wallet = DynProvider<Ethereum>;

sol! {
    #[sol(rpc)]
    interface VoteMelos {
        function initialize(address token) external;
        function token() external view returns (address);
        function depositFor(address account, uint256 amount) external returns (bool);
        function withdrawTo(address account, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
    }

    #[sol(rpc)]
    interface MelosGovernorV1 {
        function initialize(address token) external;
        function token() external view returns (address);
        function name() external view returns (string memory);
    }

    #[sol(rpc)]
    interface MelosToken {
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function decimals() external view returns (uint8);
        function mint(address to, uint256 amount) external;
    }

    #[sol(rpc)]
    interface UpgradeableBeacon {
        function implementation() external view returns (address);
        function upgradeTo(address newImplementation) external;
        function owner() external view returns (address);
    }
}

/// A `VoteMelos` instance with default generics
pub type VoteMelosContract = VoteMelos::VoteMelosInstance<Wallet, Ethereum>;
/// A `MelosGovernorV1` instance with default generics
pub type MelosGovernorContract = MelosGovernorV1::MelosGovernorV1Instance<Wallet, Ethereum>;
/// A Melos token instance with default generics
pub type MelosTokenContract = MelosToken::MelosTokenInstance<Wallet, Ethereum>;
/// An `UpgradeableBeacon` instance with default generics
pub type UpgradeableBeaconContract = UpgradeableBeacon::UpgradeableBeaconInstance<Wallet, Ethereum>;
