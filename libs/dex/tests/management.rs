//! DEX, token pair and liquidity source management

mod common;

use common::{Fixture, DOMAIN};
use dex_core::isi::management::{custody_account_id, pool_token_asset_id};
use dex_core::isi::{
    CreateLiquiditySource, CreateTokenPair, InitializeDex, RemoveLiquiditySource,
    RemoveTokenPair, SetFeeOnXykPool, SetProtocolFeePartOnXykPool,
};
use dex_core::query::{self, DexQuery, QueryOutput};
use dex_core::{DexError, Entity, LedgerError, WorldStateView};
use dex_types::{
    AssetDefinitionId, BasisPoints, DexId, LiquiditySourceId, LiquiditySourceType, Permission,
};

#[test]
fn initialize_dex_requires_permission() {
    let mut fx = Fixture::genesis();
    let alice = fx.alice.clone();

    let result = fx.submit(
        &alice,
        InitializeDex {
            dex_id: fx.dex_id.clone(),
            owner_account_id: alice.clone(),
            base_asset_id: fx.xor.clone(),
        },
    );

    assert_eq!(
        result,
        Err(DexError::PermissionDenied {
            account: alice,
            permission: Permission::InitializeDex,
        })
    );
    assert!(query::get_dex_list(&fx.world).is_empty());
    assert_eq!(
        fx.executor.query(&fx.world, &DexQuery::GetDexList),
        Ok(QueryOutput::DexList(Vec::new()))
    );
}

#[test]
fn initialize_dex_grants_management_to_owner() {
    let mut fx = Fixture::genesis();
    let root = fx.root.clone();
    fx.submit(
        &root,
        InitializeDex {
            dex_id: fx.dex_id.clone(),
            owner_account_id: fx.owner.clone(),
            base_asset_id: fx.xor.clone(),
        },
    )
    .unwrap();

    let dex = query::get_dex(&fx.world, &fx.dex_id).unwrap();
    assert_eq!(dex.owner_account_id, fx.owner);
    assert_eq!(dex.base_asset_id, fx.xor);
    assert!(dex.token_pairs.is_empty());
    assert!(fx
        .world
        .has_permission(&fx.owner, &Permission::ManageDex(fx.dex_id.clone())));
    assert_eq!(query::get_dex_list(&fx.world), vec![dex]);
}

#[test]
fn initialize_dex_validates_references() {
    let mut fx = Fixture::genesis();
    let root = fx.root.clone();

    let missing_domain = fx.submit(
        &root,
        InitializeDex {
            dex_id: DexId::new("looking_glass"),
            owner_account_id: fx.owner.clone(),
            base_asset_id: fx.xor.clone(),
        },
    );
    assert_eq!(
        missing_domain,
        Err(DexError::NotFound(Entity::Domain("looking_glass".to_string())))
    );

    let missing_asset = AssetDefinitionId::new("VAL", DOMAIN);
    let result = fx.submit(
        &root,
        InitializeDex {
            dex_id: fx.dex_id.clone(),
            owner_account_id: fx.owner.clone(),
            base_asset_id: missing_asset.clone(),
        },
    );
    assert_eq!(
        result,
        Err(DexError::NotFound(Entity::AssetDefinition(missing_asset)))
    );

    let initialize = InitializeDex {
        dex_id: fx.dex_id.clone(),
        owner_account_id: fx.owner.clone(),
        base_asset_id: fx.xor.clone(),
    };
    fx.submit(&root, initialize.clone()).unwrap();
    assert_eq!(
        fx.submit(&root, initialize),
        Err(DexError::DexAlreadyExists(fx.dex_id.clone()))
    );
}

#[test]
fn create_token_pair_normalises_and_validates() {
    let mut fx = Fixture::with_pools();
    let owner = fx.owner.clone();

    // Reversed order names the existing XOR-DOT pair
    let duplicate = fx.submit(
        &owner,
        CreateTokenPair {
            dex_id: fx.dex_id.clone(),
            asset_a: fx.dot.clone(),
            asset_b: fx.xor.clone(),
        },
    );
    assert_eq!(
        duplicate,
        Err(DexError::TokenPairAlreadyExists(fx.pair(&fx.dot)))
    );

    let no_base = fx.submit(
        &owner,
        CreateTokenPair {
            dex_id: fx.dex_id.clone(),
            asset_a: fx.dot.clone(),
            asset_b: fx.ksm.clone(),
        },
    );
    assert_eq!(no_base, Err(DexError::BaseAssetRequired(fx.xor.clone())));

    let identical = fx.submit(
        &owner,
        CreateTokenPair {
            dex_id: fx.dex_id.clone(),
            asset_a: fx.xor.clone(),
            asset_b: fx.xor.clone(),
        },
    );
    assert_eq!(identical, Err(DexError::IdenticalAssets(fx.xor.clone())));

    let unknown = AssetDefinitionId::new("VAL", DOMAIN);
    let missing = fx.submit(
        &owner,
        CreateTokenPair {
            dex_id: fx.dex_id.clone(),
            asset_a: unknown.clone(),
            asset_b: fx.xor.clone(),
        },
    );
    assert_eq!(
        missing,
        Err(DexError::NotFound(Entity::AssetDefinition(unknown)))
    );
}

#[test]
fn create_token_pair_requires_manage_permission() {
    let mut fx = Fixture::with_pools();
    let alice = fx.alice.clone();
    let result = fx.submit(
        &alice,
        CreateTokenPair {
            dex_id: fx.dex_id.clone(),
            asset_a: fx.xor.clone(),
            asset_b: fx.ksm.clone(),
        },
    );
    assert!(matches!(result, Err(DexError::PermissionDenied { .. })));
}

#[test]
fn liquidity_source_registers_pool_accounts() {
    let fx = Fixture::with_pools();
    let pair = fx.pair(&fx.dot);
    let config = fx.executor.config();

    let pool = query::get_xyk_pool_info(&fx.world, &pair).unwrap();
    assert_eq!(pool.fee, BasisPoints::DEFAULT_XYK_FEE);
    assert_eq!(pool.protocol_fee_part, BasisPoints::ZERO);
    assert_eq!((pool.base_reserve, pool.target_reserve), (0, 0));
    assert_eq!(pool.pool_token_total_supply, 0);
    assert_eq!(
        pool.pool_token_asset_id,
        AssetDefinitionId::new("PSWAP XYK XOR#wonderland-DOT#wonderland", DOMAIN)
    );
    assert_eq!(pool.pool_token_asset_id, pool_token_asset_id(&pair, config));
    assert_eq!(pool.custody_account_id, custody_account_id(&pair, config));
    assert!(fx.world.asset_definition_exists(&pool.pool_token_asset_id));
    assert!(fx.world.account_exists(&pool.custody_account_id));

    let token_pair = query::get_token_pair(&fx.world, &pair).unwrap();
    assert!(token_pair
        .liquidity_sources
        .contains(&LiquiditySourceId::xyk_pool(pair.clone())));
}

#[test]
fn duplicate_liquidity_source_is_rejected() {
    let mut fx = Fixture::with_pools();
    let owner = fx.owner.clone();
    let pair = fx.pair(&fx.dot);
    let result = fx.submit(
        &owner,
        CreateLiquiditySource {
            token_pair_id: pair.clone(),
            source_type: LiquiditySourceType::XykPool,
        },
    );
    assert_eq!(
        result,
        Err(DexError::LiquiditySourceAlreadyExists(
            LiquiditySourceId::xyk_pool(pair)
        ))
    );
}

#[test]
fn fee_setters_validate_range() {
    let mut fx = Fixture::with_pools();
    let owner = fx.owner.clone();
    let pair = fx.pair(&fx.dot);

    assert_eq!(
        fx.submit(
            &owner,
            SetFeeOnXykPool {
                token_pair_id: pair.clone(),
                fee_bps: 10_000,
            }
        ),
        Err(DexError::InvalidFeeValue(10_000))
    );
    assert_eq!(
        fx.submit(
            &owner,
            SetProtocolFeePartOnXykPool {
                token_pair_id: pair.clone(),
                protocol_fee_part_bps: 12_345,
            }
        ),
        Err(DexError::InvalidFeeValue(12_345))
    );

    fx.submit(
        &owner,
        SetFeeOnXykPool {
            token_pair_id: pair.clone(),
            fee_bps: 100,
        },
    )
    .unwrap();
    fx.submit(
        &owner,
        SetProtocolFeePartOnXykPool {
            token_pair_id: pair.clone(),
            protocol_fee_part_bps: 2_500,
        },
    )
    .unwrap();

    assert_eq!(
        query::get_fee_on_xyk_pool(&fx.world, &pair),
        Ok(BasisPoints::try_new(100).unwrap())
    );
    assert_eq!(
        query::get_protocol_fee_part_on_xyk_pool(&fx.world, &pair),
        Ok(BasisPoints::try_new(2_500).unwrap())
    );
}

#[test]
fn removal_requires_empty_pool() {
    let mut fx = Fixture::with_pools();
    let owner = fx.owner.clone();
    let funded = fx.pair(&fx.dot);
    let empty = fx.pair(&fx.ksm);
    fx.add_liquidity(&fx.dot.clone(), 5_000, 7_000);

    let funded_source = LiquiditySourceId::xyk_pool(funded.clone());
    assert_eq!(
        fx.submit(
            &owner,
            RemoveLiquiditySource {
                liquidity_source_id: funded_source.clone(),
            }
        ),
        Err(DexError::PoolNotEmpty(funded_source.clone()))
    );
    assert_eq!(
        fx.submit(
            &owner,
            RemoveTokenPair {
                token_pair_id: funded.clone(),
            }
        ),
        Err(DexError::PoolNotEmpty(funded_source))
    );

    fx.submit(
        &owner,
        RemoveTokenPair {
            token_pair_id: empty.clone(),
        },
    )
    .unwrap();
    assert_eq!(
        query::get_token_pair(&fx.world, &empty),
        Err(DexError::NotFound(Entity::TokenPair(empty.clone())))
    );
    assert!(fx
        .world
        .liquidity_source(&LiquiditySourceId::xyk_pool(empty.clone()))
        .is_none());
    assert_eq!(query::get_token_pair_count(&fx.world, &fx.dex_id), Ok(1));
}

#[test]
fn recreated_pool_reuses_token_and_custody_account() {
    let mut fx = Fixture::with_pools();
    let owner = fx.owner.clone();
    let pair = fx.pair(&fx.ksm);
    let source_id = LiquiditySourceId::xyk_pool(pair.clone());
    let before = query::get_xyk_pool_info(&fx.world, &pair).unwrap();

    fx.submit(
        &owner,
        RemoveLiquiditySource {
            liquidity_source_id: source_id.clone(),
        },
    )
    .unwrap();
    assert!(query::get_xyk_pool_info(&fx.world, &pair).is_err());

    fx.submit(
        &owner,
        CreateLiquiditySource {
            token_pair_id: pair.clone(),
            source_type: LiquiditySourceType::XykPool,
        },
    )
    .unwrap();
    assert_eq!(query::get_xyk_pool_info(&fx.world, &pair), Ok(before));
    assert!(fx.world.dex(&fx.dex_id).unwrap().retired_xyk_pools.is_empty());
}

#[test]
fn liquidity_source_rejects_squatted_pool_token() {
    let mut fx = Fixture::with_pairs();
    let owner = fx.owner.clone();
    let bob = fx.bob.clone();
    let pair = fx.pair(&fx.dot);
    let pool_token = pool_token_asset_id(&pair, fx.executor.config());

    // Bob registers the pool token first and mints himself a stash
    fx.world.add_asset_definition(pool_token.clone()).unwrap();
    fx.world.mint(&pool_token, &bob, 1_000_000).unwrap();
    let before = fx.world.snapshot().unwrap();

    assert_eq!(
        fx.submit(
            &owner,
            CreateLiquiditySource {
                token_pair_id: pair.clone(),
                source_type: LiquiditySourceType::XykPool,
            }
        ),
        Err(DexError::Ledger(LedgerError::AssetDefinitionAlreadyExists(
            pool_token
        )))
    );
    assert_eq!(fx.world.snapshot().unwrap(), before);
    assert!(fx
        .world
        .liquidity_source(&LiquiditySourceId::xyk_pool(pair.clone()))
        .is_none());
    assert!(query::get_token_pair(&fx.world, &pair)
        .unwrap()
        .liquidity_sources
        .is_empty());
}

#[test]
fn liquidity_source_rejects_squatted_custody_account() {
    let mut fx = Fixture::with_pairs();
    let owner = fx.owner.clone();
    let pair = fx.pair(&fx.ksm);
    let custody = custody_account_id(&pair, fx.executor.config());
    fx.world.add_account(custody.clone()).unwrap();

    assert_eq!(
        fx.submit(
            &owner,
            CreateLiquiditySource {
                token_pair_id: pair.clone(),
                source_type: LiquiditySourceType::XykPool,
            }
        ),
        Err(DexError::Ledger(LedgerError::AccountAlreadyExists(custody)))
    );
    assert!(query::get_xyk_pool_info(&fx.world, &pair).is_err());
}

#[test]
fn retired_pool_is_not_adopted_while_custody_holds_funds() {
    let mut fx = Fixture::with_pools();
    let owner = fx.owner.clone();
    let ksm = fx.ksm.clone();
    let pair = fx.pair(&ksm);
    let source_id = LiquiditySourceId::xyk_pool(pair.clone());
    let custody = custody_account_id(&pair, fx.executor.config());

    fx.submit(
        &owner,
        RemoveLiquiditySource {
            liquidity_source_id: source_id.clone(),
        },
    )
    .unwrap();
    // A stray deposit into the abandoned custody account
    fx.world.mint(&ksm, &custody, 10).unwrap();

    assert_eq!(
        fx.submit(
            &owner,
            CreateLiquiditySource {
                token_pair_id: pair.clone(),
                source_type: LiquiditySourceType::XykPool,
            }
        ),
        Err(DexError::PoolNotEmpty(source_id))
    );
    assert!(fx
        .world
        .dex(&fx.dex_id)
        .unwrap()
        .retired_xyk_pools
        .contains_key(&pair));
}

#[test]
fn token_pair_list_includes_indirect_pairs() {
    let fx = Fixture::with_pools();

    let pairs = query::get_token_pair_list(&fx.world, &fx.dex_id).unwrap();
    let ids: Vec<_> = pairs.iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.contains(&fx.pair(&fx.dot)));
    assert!(ids.contains(&fx.pair(&fx.ksm)));

    let indirect = &pairs[2];
    let mut ends = [&indirect.id.base_asset, &indirect.id.target_asset];
    ends.sort();
    assert_eq!(ends, [&fx.dot, &fx.ksm]);
    assert!(indirect.liquidity_sources.is_empty());

    assert_eq!(query::get_token_pair_count(&fx.world, &fx.dex_id), Ok(2));
    assert_eq!(
        query::get_token_pair_count(&fx.world, &DexId::new("looking_glass")),
        Err(DexError::NotFound(Entity::Dex(DexId::new("looking_glass"))))
    );
}
