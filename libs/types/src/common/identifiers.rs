//! # Ledger Identifiers
//!
//! Composite identifiers for every record the DEX touches. Identity follows
//! containment: a token pair is named by its DEX, a liquidity source by its
//! token pair, so every key carries the full path to its owner.
//!
//! ## Textual forms
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | [`AccountId`] | `name@domain` | `alice@wonderland` |
//! | [`AssetDefinitionId`] | `name#domain` | `XOR#wonderland` |
//! | [`DexId`] | `domain` | `wonderland` |
//!
//! Parsing splits on the *last* separator, so names produced by the DEX itself
//! (pool tokens embed the pair symbol) round-trip through `Display`/`FromStr`.

use crate::common::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Plain name of a domain, account or asset definition
pub type Name = String;

/// Account identifier, unique within the ledger
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId {
    pub name: Name,
    pub domain_name: Name,
}

impl AccountId {
    pub fn new(name: &str, domain_name: &str) -> Self {
        Self {
            name: name.to_owned(),
            domain_name: domain_name.to_owned(),
        }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.domain_name)
    }
}

impl FromStr for AccountId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once('@') {
            Some((name, domain)) if !name.is_empty() && !domain.is_empty() => {
                Ok(Self::new(name, domain))
            }
            _ => Err(ValidationError::InvalidIdentifier {
                input: s.to_owned(),
                expected: "name@domain",
            }),
        }
    }
}

/// Asset definition identifier (the "kind" of a token, not a holding)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetDefinitionId {
    pub name: Name,
    pub domain_name: Name,
}

impl AssetDefinitionId {
    pub fn new(name: &str, domain_name: &str) -> Self {
        Self {
            name: name.to_owned(),
            domain_name: domain_name.to_owned(),
        }
    }
}

impl fmt::Display for AssetDefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.domain_name)
    }
}

impl FromStr for AssetDefinitionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once('#') {
            Some((name, domain)) if !name.is_empty() && !domain.is_empty() => {
                Ok(Self::new(name, domain))
            }
            _ => Err(ValidationError::InvalidIdentifier {
                input: s.to_owned(),
                expected: "name#domain",
            }),
        }
    }
}

/// Balance key: a holding of one asset definition by one account
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId {
    pub definition_id: AssetDefinitionId,
    pub account_id: AccountId,
}

impl AssetId {
    pub fn new(definition_id: AssetDefinitionId, account_id: AccountId) -> Self {
        Self {
            definition_id,
            account_id,
        }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.definition_id, self.account_id)
    }
}

/// DEX identifier: at most one DEX exists per domain
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DexId {
    pub domain_name: Name,
}

impl DexId {
    pub fn new(domain_name: &str) -> Self {
        Self {
            domain_name: domain_name.to_owned(),
        }
    }
}

impl fmt::Display for DexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.domain_name)
    }
}

/// Token pair identifier
///
/// A pair is unordered from the user's point of view; it is stored with the
/// DEX base asset first so that `(XOR, DOT)` and `(DOT, XOR)` name the same
/// record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenPairId {
    pub dex_id: DexId,
    pub base_asset: AssetDefinitionId,
    pub target_asset: AssetDefinitionId,
}

impl TokenPairId {
    pub fn new(dex_id: DexId, base_asset: AssetDefinitionId, target_asset: AssetDefinitionId) -> Self {
        Self {
            dex_id,
            base_asset,
            target_asset,
        }
    }

    /// Symbol of the pair, used to derive pool token and custody account names
    pub fn symbol(&self) -> String {
        format!("{}-{}", self.base_asset, self.target_asset)
    }
}

impl fmt::Display for TokenPairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.dex_id, self.symbol())
    }
}

/// Kinds of liquidity source a token pair can host
///
/// Adding a kind here forces every `match` on [`crate::LiquiditySourceData`]
/// to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LiquiditySourceType {
    /// X*Y=K constant product pool
    XykPool,
}

impl fmt::Display for LiquiditySourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiquiditySourceType::XykPool => f.write_str("XYK"),
        }
    }
}

/// Liquidity source identifier: at most one source of each type per pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LiquiditySourceId {
    pub token_pair_id: TokenPairId,
    pub source_type: LiquiditySourceType,
}

impl LiquiditySourceId {
    pub fn new(token_pair_id: TokenPairId, source_type: LiquiditySourceType) -> Self {
        Self {
            token_pair_id,
            source_type,
        }
    }

    /// Shorthand for the XYK pool of a token pair
    pub fn xyk_pool(token_pair_id: TokenPairId) -> Self {
        Self::new(token_pair_id, LiquiditySourceType::XykPool)
    }
}

impl fmt::Display for LiquiditySourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.token_pair_id, self.source_type)
    }
}
