use crate::adapter::SpeechSessionAdapter;
use tokio::sync::{mpsc, watch};
use voxlog_core::{SessionState, UiCommand};

/// Runs a [`SpeechSessionAdapter`] on a single task.
///
/// UI commands and engine callbacks are interleaved by one `select!` loop,
/// so the adapter only ever sees one of them at a time. After every step
/// the fresh [`SessionState`] is published on the watch channel.
pub struct SessionHost {
    adapter: Option<SpeechSessionAdapter>,
    cmd_rx: Option<mpsc::UnboundedReceiver<UiCommand>>,
    state_tx: watch::Sender<SessionState>,
    task_handle: Option<tokio::task::JoinHandle<SpeechSessionAdapter>>,
}

impl SessionHost {
    pub fn new(
        adapter: SpeechSessionAdapter,
        cmd_rx: mpsc::UnboundedReceiver<UiCommand>,
        state_tx: watch::Sender<SessionState>,
    ) -> Self {
        Self {
            adapter: Some(adapter),
            cmd_rx: Some(cmd_rx),
            state_tx,
            task_handle: None,
        }
    }

    pub fn start(&mut self) {
        let (Some(mut adapter), Some(mut cmd_rx)) = (self.adapter.take(), self.cmd_rx.take())
        else {
            tracing::warn!("session host already started");
            return;
        };
        let state_tx = self.state_tx.clone();

        let handle = tokio::spawn(async move {
            let mut recognition_rx = adapter.take_recognition_receiver();
            let mut synthesis_rx = adapter.take_synthesis_receiver();
            state_tx.send_replace(adapter.snapshot());

            loop {
                tokio::select! {
                    cmd = cmd_rx.recv() => {
                        match cmd {
                            Some(UiCommand::Quit) | None => break,
                            Some(cmd) => adapter.handle_command(cmd),
                        }
                    }
                    event = recv_or_pending(&mut recognition_rx) => {
                        match event {
                            Some(message) => adapter.handle_recognition_message(message),
                            None => recognition_rx = None,
                        }
                    }
                    event = recv_or_pending(&mut synthesis_rx) => {
                        match event {
                            Some(event) => adapter.handle_synthesis_event(event),
                            None => synthesis_rx = None,
                        }
                    }
                }

                if state_tx.send(adapter.snapshot()).is_err() {
                    tracing::debug!("no state subscribers left, stopping session");
                    break;
                }
            }

            adapter.stop_listening();
            tracing::debug!("session loop finished");
            adapter
        });

        self.task_handle = Some(handle);
    }

    /// Wait for the loop to finish (after `Quit` or once the command sender
    /// is dropped) and hand the adapter back.
    pub async fn shutdown(&mut self) -> Option<SpeechSessionAdapter> {
        let handle = self.task_handle.take()?;
        match handle.await {
            Ok(adapter) => Some(adapter),
            Err(e) => {
                tracing::error!("session task failed: {e}");
                None
            }
        }
    }
}

/// Receive from an optional channel; a missing or closed channel never resolves.
async fn recv_or_pending<T>(rx: &mut Option<mpsc::UnboundedReceiver<T>>) -> Option<T> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
