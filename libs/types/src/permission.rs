//! Permission tokens consulted by the DEX executor
//!
//! The permission engine itself is external; the executor only asks whether
//! an account holds a given token. [`Permission::Anything`] is the root token
//! and implies every other one.

use crate::common::{AssetDefinitionId, DexId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Root permission
    Anything,
    /// May create a DEX in any domain
    InitializeDex,
    /// May manage token pairs, liquidity sources and fees of one DEX
    ManageDex(DexId),
    /// May move balances of one asset definition
    TransferAsset(AssetDefinitionId),
}

impl Permission {
    /// Whether holding `self` satisfies a check for `required`
    pub fn implies(&self, required: &Permission) -> bool {
        matches!(self, Permission::Anything) || self == required
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::Anything => f.write_str("CanAnything"),
            Permission::InitializeDex => f.write_str("CanInitializeDex"),
            Permission::ManageDex(dex_id) => write!(f, "CanManageDex({dex_id})"),
            Permission::TransferAsset(asset) => write!(f, "CanTransfer({asset})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anything_implies_all() {
        let manage = Permission::ManageDex(DexId::new("wonderland"));
        assert!(Permission::Anything.implies(&manage));
        assert!(Permission::Anything.implies(&Permission::InitializeDex));
        assert!(manage.implies(&manage));
        assert!(!manage.implies(&Permission::ManageDex(DexId::new("looking_glass"))));
        assert!(!Permission::InitializeDex.implies(&Permission::Anything));
    }

    #[test]
    fn test_display() {
        let transfer = Permission::TransferAsset(AssetDefinitionId::new("XOR", "wonderland"));
        assert_eq!(transfer.to_string(), "CanTransfer(XOR#wonderland)");
    }
}
