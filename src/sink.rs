//! Presentation sinks.
//!
//! The chat core never renders anything itself. Everything user-visible goes
//! through a [`PresentationSink`], one call per [`RenderCommand`].

use std::collections::HashMap;
use std::io::{self, Write};

use tracing::{debug, warn};

use crate::router::{MessageStyle, Pane, RenderCommand};

/// Receiver of structured presentation calls.
pub trait PresentationSink {
    fn append_info(&mut self, pane: &Pane, text: &str);

    fn append_message(&mut self, pane: &Pane, from: &str, text: &str, style: MessageStyle);

    fn add_user(&mut self, target: &str, nick: &str);

    fn remove_user(&mut self, target: &str, nick: &str);

    fn clear_roster(&mut self, target: &str);

    /// Make a pane for `target`. Opening an open target does nothing.
    fn open_target(&mut self, target: &str, label: &str, is_channel: bool);

    fn close_target(&mut self, target: &str);

    fn rename_target(&mut self, from: &str, to: &str, label: &str);

    /// Carry out one render command.
    fn apply(&mut self, command: &RenderCommand) {
        match command {
            RenderCommand::AppendInfo { pane, text } => self.append_info(pane, text),
            RenderCommand::AppendMessage {
                pane,
                from,
                text,
                style,
            } => self.append_message(pane, from, text, *style),
            RenderCommand::AddUser { target, nick } => self.add_user(target, nick),
            RenderCommand::RemoveUser { target, nick } => self.remove_user(target, nick),
            RenderCommand::ClearRoster { target } => self.clear_roster(target),
            RenderCommand::OpenTarget {
                target,
                label,
                is_channel,
            } => self.open_target(target, label, *is_channel),
            RenderCommand::CloseTarget { target } => self.close_target(target),
            RenderCommand::RenameTarget { from, to, label } => self.rename_target(from, to, label),
        }
    }
}

/// Prints one line per call, prefixed with the pane label.
#[derive(Debug)]
pub struct PrintSink<W: Write> {
    out: W,
    labels: HashMap<String, String>,
}

impl<W: Write> PrintSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            labels: HashMap::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn label<'a>(&'a self, pane: &'a Pane) -> &'a str {
        match pane {
            Pane::Server => "*",
            Pane::Target(key) => self.labels.get(key).map_or(key.as_str(), String::as_str),
        }
    }

    fn print(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(e) = self.write_line(line) {
            warn!(error = %e, "failed to write output");
        }
    }

    fn write_line(&mut self, line: std::fmt::Arguments<'_>) -> io::Result<()> {
        self.out.write_fmt(line)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> PresentationSink for PrintSink<W> {
    fn append_info(&mut self, pane: &Pane, text: &str) {
        let label = self.label(pane).to_string();
        self.print(format_args!("[{label}] {text}"));
    }

    fn append_message(&mut self, pane: &Pane, from: &str, text: &str, style: MessageStyle) {
        let label = self.label(pane).to_string();
        match style {
            MessageStyle::Normal | MessageStyle::Me => self.print(format_args!("[{label}] <{from}> {text}")),
            MessageStyle::Notice => self.print(format_args!("[{label}] -{from}- {text}")),
        }
    }

    fn add_user(&mut self, target: &str, nick: &str) {
        debug!(%target, %nick, "roster add");
    }

    fn remove_user(&mut self, target: &str, nick: &str) {
        debug!(%target, %nick, "roster remove");
    }

    fn clear_roster(&mut self, target: &str) {
        debug!(%target, "roster cleared");
    }

    fn open_target(&mut self, target: &str, label: &str, _is_channel: bool) {
        self.labels
            .entry(target.to_string())
            .or_insert_with(|| label.to_string());
    }

    fn close_target(&mut self, target: &str) {
        self.labels.remove(target);
    }

    fn rename_target(&mut self, from: &str, to: &str, label: &str) {
        self.labels.remove(from);
        self.labels.insert(to.to_string(), label.to_string());
    }
}

/// Records every call, for tests and embedding.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<RenderCommand>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Info lines shown in `pane`, in order.
    pub fn infos(&self, pane: &Pane) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCommand::AppendInfo { pane: p, text } if p == pane => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Messages shown in `pane` as `(from, text)`.
    pub fn messages(&self, pane: &Pane) -> Vec<(&str, &str)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCommand::AppendMessage {
                    pane: p, from, text, ..
                } if p == pane => Some((from.as_str(), text.as_str())),
                _ => None,
            })
            .collect()
    }

    /// The roster of `target` as the sink would show it, replaying every
    /// roster call in order. Sorted for comparison.
    pub fn roster(&self, target: &str) -> Vec<String> {
        let mut nicks: Vec<String> = Vec::new();
        for call in &self.calls {
            match call {
                RenderCommand::AddUser { target: t, nick } if t == target => {
                    if !nicks.contains(nick) {
                        nicks.push(nick.clone());
                    }
                }
                RenderCommand::RemoveUser { target: t, nick } if t == target => {
                    nicks.retain(|n| n != nick);
                }
                RenderCommand::ClearRoster { target: t } if t == target => nicks.clear(),
                _ => {}
            }
        }
        nicks.sort();
        nicks
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl PresentationSink for RecordingSink {
    fn append_info(&mut self, pane: &Pane, text: &str) {
        self.calls.push(RenderCommand::AppendInfo {
            pane: pane.clone(),
            text: text.to_string(),
        });
    }

    fn append_message(&mut self, pane: &Pane, from: &str, text: &str, style: MessageStyle) {
        self.calls.push(RenderCommand::AppendMessage {
            pane: pane.clone(),
            from: from.to_string(),
            text: text.to_string(),
            style,
        });
    }

    fn add_user(&mut self, target: &str, nick: &str) {
        self.calls.push(RenderCommand::AddUser {
            target: target.to_string(),
            nick: nick.to_string(),
        });
    }

    fn remove_user(&mut self, target: &str, nick: &str) {
        self.calls.push(RenderCommand::RemoveUser {
            target: target.to_string(),
            nick: nick.to_string(),
        });
    }

    fn clear_roster(&mut self, target: &str) {
        self.calls.push(RenderCommand::ClearRoster {
            target: target.to_string(),
        });
    }

    fn open_target(&mut self, target: &str, label: &str, is_channel: bool) {
        self.calls.push(RenderCommand::OpenTarget {
            target: target.to_string(),
            label: label.to_string(),
            is_channel,
        });
    }

    fn close_target(&mut self, target: &str) {
        self.calls.push(RenderCommand::CloseTarget {
            target: target.to_string(),
        });
    }

    fn rename_target(&mut self, from: &str, to: &str, label: &str) {
        self.calls.push(RenderCommand::RenameTarget {
            from: from.to_string(),
            to: to.to_string(),
            label: label.to_string(),
        });
    }
}
