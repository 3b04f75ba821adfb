//! Unified error type surfaced by the runtime API.
//!
//! Wraps session failures and worker coordination failures so clients can
//! bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use arena_core::{ArenaError, BattleId, ErrorSeverity, SessionError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no battle with id {0}")]
    BattleNotFound(BattleId),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl ArenaError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::BattleNotFound(_) => ErrorSeverity::Validation,
            Self::Session(inner) => inner.severity(),
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) => {
                ErrorSeverity::Recoverable
            }
            Self::WorkerJoin(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BattleNotFound(_) => "RUNTIME_BATTLE_NOT_FOUND",
            Self::Session(inner) => inner.error_code(),
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
        }
    }
}
