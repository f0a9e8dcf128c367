use std::sync::Arc;

use tokio::spawn;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

use crate::actors::{AccountSession, AccountSummary};
use crate::bank::Bank;
use crate::engine::Command;

/// Applies the rows of one script alias in arrival order on its own task.
pub struct AccountActor {
    sender: mpsc::UnboundedSender<Command>,
    handle: JoinHandle<Option<AccountSummary>>
}

impl AccountActor {
    /// Spawns a new actor bound to `alias`.
    pub fn new(alias: String, bank: Arc<Bank>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Command>();

        let handle = spawn(async move {
            let mut session = AccountSession::new(alias);

            while let Some(command) = receiver.recv().await {
                match session.apply(&bank, &command) {
                    Ok(()) => {
                        debug!("[{:?}] on account [{}] applied", command.operation, command.account);
                    },
                    Err(error) => {
                        //NOTE: A rejected row never stops the script, the account keeps its last good state
                        warn!(code = error.code(), "{error}");
                    }
                }
            }

            session.summary(&bank)
        });

        Self { sender, handle }
    }

    /// Queues a row; `false` once the actor is gone.
    pub fn accept(&self, command: Command) -> bool {
        self.sender.send(command).is_ok()
    }

    /// Closes the queue, waits for the remaining rows and returns the final state.
    pub async fn despawn(self) -> Result<Option<AccountSummary>, JoinError> {
        drop(self.sender);
        self.handle.await
    }
}
