//! Sink that streams every call to the test.

use std::time::Duration;

use slirc_chat::router::{MessageStyle, Pane, RenderCommand};
use slirc_chat::sink::PresentationSink;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc;
use tokio::time::timeout;

pub struct ChannelSink {
    tx: mpsc::UnboundedSender<RenderCommand>,
}

impl ChannelSink {
    pub fn new() -> (Self, SinkWatcher) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, SinkWatcher { rx })
    }

    fn push(&mut self, command: RenderCommand) {
        let _ = self.tx.send(command);
    }
}

impl PresentationSink for ChannelSink {
    fn append_info(&mut self, pane: &Pane, text: &str) {
        self.push(RenderCommand::AppendInfo {
            pane: pane.clone(),
            text: text.to_string(),
        });
    }

    fn append_message(&mut self, pane: &Pane, from: &str, text: &str, style: MessageStyle) {
        self.push(RenderCommand::AppendMessage {
            pane: pane.clone(),
            from: from.to_string(),
            text: text.to_string(),
            style,
        });
    }

    fn add_user(&mut self, target: &str, nick: &str) {
        self.push(RenderCommand::AddUser {
            target: target.to_string(),
            nick: nick.to_string(),
        });
    }

    fn remove_user(&mut self, target: &str, nick: &str) {
        self.push(RenderCommand::RemoveUser {
            target: target.to_string(),
            nick: nick.to_string(),
        });
    }

    fn clear_roster(&mut self, target: &str) {
        self.push(RenderCommand::ClearRoster {
            target: target.to_string(),
        });
    }

    fn open_target(&mut self, target: &str, label: &str, is_channel: bool) {
        self.push(RenderCommand::OpenTarget {
            target: target.to_string(),
            label: label.to_string(),
            is_channel,
        });
    }

    fn close_target(&mut self, target: &str) {
        self.push(RenderCommand::CloseTarget {
            target: target.to_string(),
        });
    }

    fn rename_target(&mut self, from: &str, to: &str, label: &str) {
        self.push(RenderCommand::RenameTarget {
            from: from.to_string(),
            to: to.to_string(),
            label: label.to_string(),
        });
    }
}

/// Receiving end of a [`ChannelSink`].
pub struct SinkWatcher {
    rx: mpsc::UnboundedReceiver<RenderCommand>,
}

#[allow(dead_code)]
impl SinkWatcher {
    /// Wait for an info line in `pane` that starts with `prefix`.
    pub async fn info_starting_with(&mut self, pane: &Pane, prefix: &str) -> anyhow::Result<String> {
        loop {
            let command = timeout(Duration::from_secs(5), self.rx.recv())
                .await?
                .ok_or_else(|| anyhow::anyhow!("sink dropped"))?;
            if let RenderCommand::AppendInfo { pane: p, text } = command
                && p == *pane
                && text.starts_with(prefix)
            {
                return Ok(text);
            }
        }
    }

    /// Replay every call received so far into `sink`.
    ///
    /// Returns `false` once the driver has dropped its sink.
    pub fn drain_into<S: PresentationSink>(&mut self, sink: &mut S) -> bool {
        loop {
            match self.rx.try_recv() {
                Ok(command) => sink.apply(&command),
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }
}
