use crate::actors::{AccountActor, AccountSummary};
use crate::bank::Bank;
use crate::engine::Command;
use anyhow::Context;
use csv::{ReaderBuilder, Trim};
use futures::future::join_all;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::error;

const DEFAULT_BACKPRESSURE: usize = 256;

/// Replays a bank script, one actor per account alias.
pub struct AsyncEngine {
    bank: Arc<Bank>,
    backpressure: usize
}

impl AsyncEngine {
    /// Creates a new engine driving the provided bank.
    pub fn new(bank: Arc<Bank>) -> Self {
        Self {
            bank,
            backpressure: DEFAULT_BACKPRESSURE
        }
    }

    /// Capacity of the channel between the script reader and the dispatcher.
    pub fn with_backpressure(mut self, backpressure: usize) -> Self {
        self.backpressure = backpressure.max(1);
        self
    }

    /// Runs the script at `path` and returns the final state of every opened
    /// alias, sorted by alias.
    pub async fn run(&self, path: &str) -> anyhow::Result<Vec<AccountSummary>> {
        let file = File::open(path).with_context(|| format!("Error opening script at path: {path}"))?;

        self.run_reader(BufReader::new(file)).await
    }

    pub async fn run_reader<R: Read + Send + 'static>(&self, reader: R) -> anyhow::Result<Vec<AccountSummary>> {
        let (sender, receiver) = mpsc::channel::<Command>(self.backpressure);
        let csv_handle = self.spawn_csv_reader(reader, sender);
        let summaries = self.process_commands(receiver).await;

        if let Err(error) = csv_handle.await {
            error!("Script ingestion failed: {error}");
        }

        Ok(summaries)
    }

    fn spawn_csv_reader<R: Read + Send + 'static>(&self, reader: R, sender: mpsc::Sender<Command>) -> JoinHandle<()> {
        spawn_blocking(move || {
            let mut reader = ReaderBuilder::new()
                .trim(Trim::All)
                .flexible(true)
                .from_reader(reader);

            for result in reader.deserialize::<Command>() {
                match result {
                    Ok(command) => {
                        if sender.blocking_send(command).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        error!("Script deserialization error: {error}");
                    }
                }
            }
        })
    }

    async fn process_commands(&self, mut receiver: mpsc::Receiver<Command>) -> Vec<AccountSummary> {
        let mut actors = HashMap::<String, AccountActor>::new();

        // Routing by alias keeps each account's rows in file order.
        while let Some(command) = receiver.recv().await {
            let actor = actors.entry(command.account.clone()).or_insert_with(|| {
                AccountActor::new(command.account.clone(), self.bank.clone())
            });

            let account = command.account.clone();

            if !actor.accept(command) {
                error!("Account actor for [{account}] could not accept a command");
            }
        }

        let despawns = actors.into_values().map(|actor| actor.despawn());
        let mut summaries = Vec::new();

        for result in join_all(despawns).await {
            match result {
                Ok(Some(summary)) => summaries.push(summary),
                Ok(None) => {}
                Err(error) => {
                    error!("An account actor did not despawn gracefully: {error:?}");
                }
            }
        }

        summaries.sort_by(|left, right| left.alias.cmp(&right.alias));
        summaries
    }
}
