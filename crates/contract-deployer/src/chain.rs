use std::fmt;

use thiserror::Error;

/// Networks the World ID router is deployed to.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Chain {
    EthereumMainnet,
    PolygonMainnet,
    OptimismMainnet,
    Goerli,
    Mumbai,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Error)]
#[error("Unknown chain {0}")]
pub struct UnknownChain(pub u64);

impl Chain {
    /// All supported chains, in the order they are offered for selection.
    pub const ALL: [Chain; 5] = [
        Chain::EthereumMainnet,
        Chain::PolygonMainnet,
        Chain::OptimismMainnet,
        Chain::Goerli,
        Chain::Mumbai,
    ];

    pub const fn id(self) -> u64 {
        match self {
            Chain::EthereumMainnet => 1,
            Chain::PolygonMainnet => 137,
            Chain::OptimismMainnet => 10,
            Chain::Goerli => 5,
            Chain::Mumbai => 80001,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Chain::EthereumMainnet => "Ethereum Mainnet",
            Chain::PolygonMainnet => "Polygon Mainnet",
            Chain::OptimismMainnet => "Optimism Mainnet",
            Chain::Goerli => "Ethereum Testnet (goerli)",
            Chain::Mumbai => "Polygon Testnet (mumbai)",
        }
    }

    /// Name under which the World ID router of this chain is published in the registry.
    pub const fn registry_key(self) -> &'static str {
        match self {
            Chain::EthereumMainnet => "id.worldcoin.eth",
            Chain::PolygonMainnet => "polygon.id.worldcoin.eth",
            Chain::OptimismMainnet => "optimism.id.worldcoin.eth",
            Chain::Goerli => "goerli.id.worldcoin.eth",
            Chain::Mumbai => "mumbai.id.worldcoin.eth",
        }
    }
}

impl TryFrom<u64> for Chain {
    type Error = UnknownChain;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        Chain::ALL
            .into_iter()
            .find(|chain| chain.id() == id)
            .ok_or(UnknownChain(id))
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1, "id.worldcoin.eth")]
    #[case(137, "polygon.id.worldcoin.eth")]
    #[case(10, "optimism.id.worldcoin.eth")]
    #[case(5, "goerli.id.worldcoin.eth")]
    #[case(80001, "mumbai.id.worldcoin.eth")]
    fn chain_id_selects_registry_key(#[case] id: u64, #[case] key: &str) {
        let chain = Chain::try_from(id).unwrap();
        assert_eq!(chain.id(), id);
        assert_eq!(chain.registry_key(), key);
    }

    #[test]
    fn unknown_chain_is_rejected() {
        assert_eq!(Chain::try_from(42), Err(UnknownChain(42)));
    }

    #[test]
    fn chains_are_displayed_with_their_labels() {
        assert_eq!(Chain::Mumbai.to_string(), "Polygon Testnet (mumbai)");
    }
}
