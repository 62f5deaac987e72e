//! # DEX Instructions
//!
//! Each instruction is a plain struct implementing [`Execute`]. Execution
//! checks permissions first, then validates against the staged state, then
//! stages its mutations in the [`WorldTransaction`]. Any error leaves the
//! transaction to be dropped by the caller, so instructions never need to
//! undo partial work.
//!
//! [`DexInstruction`] is the serializable envelope the executor accepts.

pub mod management;
pub mod xyk_pool;

#[cfg(feature = "debug-instructions")]
pub mod debug;

pub use management::{
    CreateLiquiditySource, CreateTokenPair, InitializeDex, RemoveLiquiditySource,
    RemoveTokenPair, SetFeeOnXykPool, SetProtocolFeePartOnXykPool,
};
pub use xyk_pool::{
    AddLiquidityToXykPool, RemoveLiquidityFromXykPool, SwapExactTokensForTokensOnXykPool,
    SwapTokensForExactTokensOnXykPool,
};

#[cfg(feature = "debug-instructions")]
pub use debug::AddTransferPermissionForAccount;

use crate::error::{DexError, Entity};
use crate::world::{WorldStateView, WorldTransaction};
use dex_config::DexConfig;
use dex_types::{
    AccountId, Dex, DexId, LiquiditySource, LiquiditySourceData, LiquiditySourceId, Permission,
    TokenPair, TokenPairId, XykPoolData,
};
use serde::{Deserialize, Serialize};

/// State transition executed on behalf of an authority account
pub trait Execute {
    fn execute<V: WorldStateView + ?Sized>(
        &self,
        authority: &AccountId,
        tx: &mut WorldTransaction<'_, V>,
        config: &DexConfig,
    ) -> Result<(), DexError>;
}

/// Every instruction the DEX understands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DexInstruction {
    InitializeDex(InitializeDex),
    CreateTokenPair(CreateTokenPair),
    RemoveTokenPair(RemoveTokenPair),
    CreateLiquiditySource(CreateLiquiditySource),
    RemoveLiquiditySource(RemoveLiquiditySource),
    SetFeeOnXykPool(SetFeeOnXykPool),
    SetProtocolFeePartOnXykPool(SetProtocolFeePartOnXykPool),
    AddLiquidityToXykPool(AddLiquidityToXykPool),
    RemoveLiquidityFromXykPool(RemoveLiquidityFromXykPool),
    SwapExactTokensForTokensOnXykPool(SwapExactTokensForTokensOnXykPool),
    SwapTokensForExactTokensOnXykPool(SwapTokensForExactTokensOnXykPool),
    #[cfg(feature = "debug-instructions")]
    AddTransferPermissionForAccount(AddTransferPermissionForAccount),
}

impl DexInstruction {
    /// Short name used in log spans
    pub fn name(&self) -> &'static str {
        match self {
            DexInstruction::InitializeDex(_) => "InitializeDex",
            DexInstruction::CreateTokenPair(_) => "CreateTokenPair",
            DexInstruction::RemoveTokenPair(_) => "RemoveTokenPair",
            DexInstruction::CreateLiquiditySource(_) => "CreateLiquiditySource",
            DexInstruction::RemoveLiquiditySource(_) => "RemoveLiquiditySource",
            DexInstruction::SetFeeOnXykPool(_) => "SetFeeOnXykPool",
            DexInstruction::SetProtocolFeePartOnXykPool(_) => "SetProtocolFeePartOnXykPool",
            DexInstruction::AddLiquidityToXykPool(_) => "AddLiquidityToXykPool",
            DexInstruction::RemoveLiquidityFromXykPool(_) => "RemoveLiquidityFromXykPool",
            DexInstruction::SwapExactTokensForTokensOnXykPool(_) => {
                "SwapExactTokensForTokensOnXykPool"
            }
            DexInstruction::SwapTokensForExactTokensOnXykPool(_) => {
                "SwapTokensForExactTokensOnXykPool"
            }
            #[cfg(feature = "debug-instructions")]
            DexInstruction::AddTransferPermissionForAccount(_) => "AddTransferPermissionForAccount",
        }
    }
}

impl Execute for DexInstruction {
    fn execute<V: WorldStateView + ?Sized>(
        &self,
        authority: &AccountId,
        tx: &mut WorldTransaction<'_, V>,
        config: &DexConfig,
    ) -> Result<(), DexError> {
        match self {
            DexInstruction::InitializeDex(isi) => isi.execute(authority, tx, config),
            DexInstruction::CreateTokenPair(isi) => isi.execute(authority, tx, config),
            DexInstruction::RemoveTokenPair(isi) => isi.execute(authority, tx, config),
            DexInstruction::CreateLiquiditySource(isi) => isi.execute(authority, tx, config),
            DexInstruction::RemoveLiquiditySource(isi) => isi.execute(authority, tx, config),
            DexInstruction::SetFeeOnXykPool(isi) => isi.execute(authority, tx, config),
            DexInstruction::SetProtocolFeePartOnXykPool(isi) => isi.execute(authority, tx, config),
            DexInstruction::AddLiquidityToXykPool(isi) => isi.execute(authority, tx, config),
            DexInstruction::RemoveLiquidityFromXykPool(isi) => isi.execute(authority, tx, config),
            DexInstruction::SwapExactTokensForTokensOnXykPool(isi) => {
                isi.execute(authority, tx, config)
            }
            DexInstruction::SwapTokensForExactTokensOnXykPool(isi) => {
                isi.execute(authority, tx, config)
            }
            #[cfg(feature = "debug-instructions")]
            DexInstruction::AddTransferPermissionForAccount(isi) => {
                isi.execute(authority, tx, config)
            }
        }
    }
}

macro_rules! impl_from_instruction {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for DexInstruction {
                fn from(isi: $variant) -> Self {
                    DexInstruction::$variant(isi)
                }
            }
        )*
    };
}

impl_from_instruction!(
    InitializeDex,
    CreateTokenPair,
    RemoveTokenPair,
    CreateLiquiditySource,
    RemoveLiquiditySource,
    SetFeeOnXykPool,
    SetProtocolFeePartOnXykPool,
    AddLiquidityToXykPool,
    RemoveLiquidityFromXykPool,
    SwapExactTokensForTokensOnXykPool,
    SwapTokensForExactTokensOnXykPool,
);

#[cfg(feature = "debug-instructions")]
impl_from_instruction!(AddTransferPermissionForAccount);

// =========================================================================
// Shared lookups
// =========================================================================

pub(crate) fn require_permission<V: WorldStateView + ?Sized>(
    view: &V,
    account: &AccountId,
    permission: Permission,
) -> Result<(), DexError> {
    if view.has_permission(account, &permission) {
        Ok(())
    } else {
        Err(DexError::PermissionDenied {
            account: account.clone(),
            permission,
        })
    }
}

pub(crate) fn load_dex<V: WorldStateView + ?Sized>(view: &V, dex_id: &DexId) -> Result<Dex, DexError> {
    view.dex(dex_id)
        .ok_or_else(|| DexError::NotFound(Entity::Dex(dex_id.clone())))
}

pub(crate) fn load_token_pair<V: WorldStateView + ?Sized>(
    view: &V,
    token_pair_id: &TokenPairId,
) -> Result<TokenPair, DexError> {
    view.token_pair(token_pair_id)
        .ok_or_else(|| DexError::NotFound(Entity::TokenPair(token_pair_id.clone())))
}

pub(crate) fn load_liquidity_source<V: WorldStateView + ?Sized>(
    view: &V,
    liquidity_source_id: &LiquiditySourceId,
) -> Result<LiquiditySource, DexError> {
    view.liquidity_source(liquidity_source_id)
        .ok_or_else(|| DexError::NotFound(Entity::LiquiditySource(liquidity_source_id.clone())))
}

/// Load the XYK pool of a token pair
pub(crate) fn load_xyk_pool<V: WorldStateView + ?Sized>(
    view: &V,
    token_pair_id: &TokenPairId,
) -> Result<(LiquiditySourceId, XykPoolData), DexError> {
    let source_id = LiquiditySourceId::xyk_pool(token_pair_id.clone());
    let source = load_liquidity_source(view, &source_id)?;
    let pool = match source.data {
        LiquiditySourceData::XykPool(pool) => pool,
    };
    Ok((source_id, pool))
}

pub(crate) fn store_xyk_pool<V: WorldStateView + ?Sized>(
    tx: &mut WorldTransaction<'_, V>,
    source_id: LiquiditySourceId,
    pool: XykPoolData,
) {
    tx.put_liquidity_source(LiquiditySource::new(
        source_id,
        LiquiditySourceData::XykPool(pool),
    ));
}

/// Permission to manage the DEX a token pair belongs to
pub(crate) fn manage_dex(token_pair_id: &TokenPairId) -> Permission {
    Permission::ManageDex(token_pair_id.dex_id.clone())
}
