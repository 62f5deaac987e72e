//! # DEX Core - Ledger Execution Module
//!
//! Deterministic state transitions for a permissioned ledger DEX built on
//! constant product (XYK) pools.
//!
//! ## Components
//!
//! - **World state** ([`world`]): read view, staged transaction overlay,
//!   commit interface and an in-memory reference ledger
//! - **Instructions** ([`isi`]): permission-gated DEX management, liquidity
//!   and swap transitions
//! - **Router** ([`router`]): multi-hop path resolution and composition
//! - **Queries** ([`query`]): side-effect free projections and price quotes
//! - **Executor** ([`executor`]): atomic application with structured logging
//!
//! ## Flow
//!
//! ```text
//! instruction -> permission check -> validation -> staged mutations -> commit
//!                                         |
//!                         AMM math (dex-amm) / router
//! ```

pub mod error;
pub mod executor;
pub mod isi;
pub mod query;
pub mod router;
pub mod world;

pub use error::{DexError, Entity, LedgerError};
pub use executor::{DexExecutor, SubmittedInstruction};
pub use isi::{DexInstruction, Execute};
pub use query::{DexQuery, QueryOutput};
pub use router::{PoolHop, SwapRoute};
pub use world::{MemoryWorld, StateChanges, WorldStateStore, WorldStateView, WorldTransaction};
