//! # Message Server
//!
//! Entry point the host runtime calls once per message. Each message runs
//! against its own [`CacheStore`] write-set: on success the write-set
//! (record, indexes, counters, and fee debit) is committed to the host
//! store in one step; on any error it is dropped and the host store is
//! exactly as it was.

use serde::Serialize;

use vcreg_core::{CredentialId, PresentationId};
use vcreg_store::{CacheStore, KvStore};

use crate::context::{BlockInfo, Context};
use crate::error::RegistryError;
use crate::events::Event;
use crate::fee::BankKeeper;
use crate::keeper::Keeper;
use crate::msgs::Msg;
use crate::resolver::IdentifierResolver;

/// Per-message result payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MsgResponse {
    /// Id of the new credential.
    CreateCredential {
        /// Credential id.
        id: CredentialId,
    },
    /// Revocation succeeded.
    RevokeCredential,
    /// Id of the new presentation.
    CreatePresentation {
        /// Presentation id.
        id: PresentationId,
    },
}

/// Outcome of a committed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxResponse {
    /// Handler result.
    pub response: MsgResponse,
    /// Events emitted by the message.
    pub events: Vec<Event>,
}

/// Dispatches messages to the keeper under a per-message write-set.
#[derive(Debug, Clone)]
pub struct MsgServer<B, R> {
    keeper: Keeper<B, R>,
}

impl<B: BankKeeper, R: IdentifierResolver> MsgServer<B, R> {
    /// Server over `keeper`.
    pub fn new(keeper: Keeper<B, R>) -> Self {
        Self { keeper }
    }

    /// The keeper.
    pub fn keeper(&self) -> &Keeper<B, R> {
        &self.keeper
    }

    /// Apply one message atomically.
    pub fn deliver<S: KvStore + ?Sized>(
        &self,
        store: &mut S,
        block: &BlockInfo,
        msg: Msg,
    ) -> Result<TxResponse, RegistryError> {
        let span = tracing::info_span!(
            "deliver",
            height = block.height,
            tx = %block.tx_hash,
            msg = msg.name()
        );
        let _enter = span.enter();

        let mut cache = CacheStore::new(store);
        let outcome = {
            let mut ctx = Context::new(&mut cache, block.clone());
            self.dispatch(&mut ctx, msg)
                .map(|response| (response, ctx.into_events()))
        };
        match outcome {
            Ok((response, events)) => {
                let writes = cache.pending();
                cache.commit()?;
                tracing::debug!(writes, events = events.len(), "message committed");
                Ok(TxResponse { response, events })
            }
            Err(err) => {
                tracing::warn!(kind = %err.kind(), error = %err, "message rejected, write-set discarded");
                cache.discard();
                Err(err)
            }
        }
    }

    fn dispatch(&self, ctx: &mut Context<'_>, msg: Msg) -> Result<MsgResponse, RegistryError> {
        match msg {
            Msg::CreateCredential(m) => self
                .keeper
                .create_credential(ctx, m)
                .map(|id| MsgResponse::CreateCredential { id }),
            Msg::RevokeCredential(m) => self
                .keeper
                .revoke_credential(ctx, m)
                .map(|()| MsgResponse::RevokeCredential),
            Msg::CreatePresentation(m) => self
                .keeper
                .create_presentation(ctx, m)
                .map(|id| MsgResponse::CreatePresentation { id }),
        }
    }
}
