//! Shared genesis fixture for DEX integration tests

#![allow(dead_code)]

use dex_config::DexConfig;
use dex_core::isi::management::pool_token_asset_id;
use dex_core::isi::{
    AddLiquidityToXykPool, CreateLiquiditySource, CreateTokenPair, DexInstruction, InitializeDex,
};
use dex_core::{DexError, DexExecutor, MemoryWorld, WorldStateView};
use dex_types::{
    AccountId, AssetDefinitionId, AssetId, DexId, LiquiditySourceType, Permission, Quantity,
    TokenPairId,
};

pub const DOMAIN: &str = "wonderland";
pub const INITIAL_BALANCE: Quantity = 1_000_000;

pub struct Fixture {
    pub world: MemoryWorld,
    pub executor: DexExecutor,
    pub root: AccountId,
    pub owner: AccountId,
    pub alice: AccountId,
    pub bob: AccountId,
    pub xor: AssetDefinitionId,
    pub dot: AssetDefinitionId,
    pub ksm: AssetDefinitionId,
    pub dex_id: DexId,
}

impl Fixture {
    /// Ledger with accounts and assets but no DEX
    pub fn genesis() -> Self {
        let mut world = MemoryWorld::new();
        let root = AccountId::new("root", DOMAIN);
        let owner = AccountId::new("dex_owner", DOMAIN);
        let alice = AccountId::new("alice", DOMAIN);
        let bob = AccountId::new("bob", DOMAIN);
        let xor = AssetDefinitionId::new("XOR", DOMAIN);
        let dot = AssetDefinitionId::new("DOT", DOMAIN);
        let ksm = AssetDefinitionId::new("KSM", DOMAIN);

        world.add_domain(DOMAIN).unwrap();
        for account in [&root, &owner, &alice, &bob] {
            world.add_account(account.clone()).unwrap();
        }
        for asset in [&xor, &dot, &ksm] {
            world.add_asset_definition(asset.clone()).unwrap();
            world.mint(asset, &alice, INITIAL_BALANCE).unwrap();
            world.grant(&alice, Permission::TransferAsset(asset.clone())).unwrap();
        }
        world.grant(&root, Permission::Anything).unwrap();

        Self {
            world,
            executor: DexExecutor::new(DexConfig::default()),
            root,
            owner,
            alice,
            bob,
            xor,
            dot,
            ksm,
            dex_id: DexId::new(DOMAIN),
        }
    }

    /// DEX with base XOR and the XOR-DOT and XOR-KSM pairs, without liquidity sources
    pub fn with_pairs() -> Self {
        let mut fx = Self::genesis();
        let root = fx.root.clone();
        let owner = fx.owner.clone();

        fx.submit(
            &root,
            InitializeDex {
                dex_id: fx.dex_id.clone(),
                owner_account_id: owner.clone(),
                base_asset_id: fx.xor.clone(),
            },
        )
        .unwrap();

        for target in [fx.dot.clone(), fx.ksm.clone()] {
            fx.submit(
                &owner,
                CreateTokenPair {
                    dex_id: fx.dex_id.clone(),
                    asset_a: fx.xor.clone(),
                    asset_b: target,
                },
            )
            .unwrap();
        }
        fx
    }

    /// DEX with base XOR and empty XYK pools for XOR-DOT and XOR-KSM
    pub fn with_pools() -> Self {
        let mut fx = Self::with_pairs();
        let owner = fx.owner.clone();

        for target in [fx.dot.clone(), fx.ksm.clone()] {
            let pair = fx.pair(&target);
            fx.submit(
                &owner,
                CreateLiquiditySource {
                    token_pair_id: pair.clone(),
                    source_type: LiquiditySourceType::XykPool,
                },
            )
            .unwrap();
            let pool_token = pool_token_asset_id(&pair, fx.executor.config());
            fx.world
                .grant(&fx.alice, Permission::TransferAsset(pool_token))
                .unwrap();
        }
        fx
    }

    pub fn pair(&self, target: &AssetDefinitionId) -> TokenPairId {
        TokenPairId::new(self.dex_id.clone(), self.xor.clone(), target.clone())
    }

    pub fn submit(
        &mut self,
        authority: &AccountId,
        instruction: impl Into<DexInstruction>,
    ) -> Result<(), DexError> {
        self.executor.submit(&mut self.world, authority, instruction)
    }

    pub fn balance(&self, asset: &AssetDefinitionId, account: &AccountId) -> Quantity {
        self.world
            .balance(&AssetId::new(asset.clone(), account.clone()))
    }

    /// Alice deposits exactly `base` XOR and `target` of the pair's target asset
    pub fn add_liquidity(&mut self, target: &AssetDefinitionId, base: Quantity, target_amount: Quantity) {
        let alice = self.alice.clone();
        let pair = self.pair(target);
        self.submit(
            &alice,
            AddLiquidityToXykPool {
                token_pair_id: pair,
                base_amount_desired: base,
                target_amount_desired: target_amount,
                base_amount_min: 0,
                target_amount_min: 0,
            },
        )
        .unwrap();
    }
}
