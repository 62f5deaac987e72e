//! Instruction application against a ledger store

use crate::error::DexError;
use crate::isi::{DexInstruction, Execute};
use crate::query::{DexQuery, QueryOutput};
use crate::world::{WorldStateStore, WorldStateView, WorldTransaction};
use dex_config::DexConfig;
use dex_types::AccountId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

/// Instruction submitted by an authority account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedInstruction {
    pub authority: AccountId,
    pub instruction: DexInstruction,
}

impl SubmittedInstruction {
    pub fn new(authority: AccountId, instruction: impl Into<DexInstruction>) -> Self {
        Self {
            authority,
            instruction: instruction.into(),
        }
    }
}

/// Applies DEX instructions one at a time, each atomically
///
/// The executor holds no ledger state of its own. A caller applying
/// instructions to a store must be its only writer.
#[derive(Debug, Clone, Default)]
pub struct DexExecutor {
    config: DexConfig,
}

impl DexExecutor {
    pub fn new(config: DexConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DexConfig {
        &self.config
    }

    /// Apply one instruction
    ///
    /// On success the staged changes are committed to `store`; on failure
    /// nothing is committed and the store is left exactly as it was.
    pub fn submit<S: WorldStateStore + ?Sized>(
        &self,
        store: &mut S,
        authority: &AccountId,
        instruction: impl Into<DexInstruction>,
    ) -> Result<(), DexError> {
        let instruction = instruction.into();
        let span = info_span!("dex_instruction", name = instruction.name(), %authority);
        let _enter = span.enter();

        let changes = {
            let mut tx = WorldTransaction::new(&*store);
            if let Err(err) = instruction.execute(authority, &mut tx, &self.config) {
                warn!(error = %err, "Instruction rejected");
                return Err(err);
            }
            tx.into_changes()
        };

        debug!(?changes, "Instruction staged");
        store.commit(changes);
        info!("Instruction applied");
        Ok(())
    }

    /// Apply a block of instructions in order
    ///
    /// A rejected instruction does not stop the block; its result is
    /// reported at the same index.
    pub fn execute_block<S: WorldStateStore + ?Sized>(
        &self,
        store: &mut S,
        block: &[SubmittedInstruction],
    ) -> Vec<Result<(), DexError>> {
        let results: Vec<_> = block
            .iter()
            .map(|entry| self.submit(store, &entry.authority, entry.instruction.clone()))
            .collect();
        let applied = results.iter().filter(|r| r.is_ok()).count();
        info!(applied, rejected = results.len() - applied, "Block executed");
        results
    }

    /// Answer a query against committed state
    pub fn query<V: WorldStateView + ?Sized>(&self, view: &V, query: &DexQuery) -> Result<QueryOutput, DexError> {
        query.execute(view)
    }
}
