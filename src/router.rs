//! Event routing: session events to presentation calls.
//!
//! The router decides which pane an event belongs to, keeps per-target
//! history markers current, and tracks which target has focus. It produces
//! [`RenderCommand`]s; a [`crate::sink::PresentationSink`] carries them out.

use slirc_proto::ChannelExt;
use tracing::debug;

use crate::session::{Connection, Event};

/// Where a line is shown.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pane {
    /// Connection-level information.
    Server,
    /// A channel or private conversation, by target key.
    Target(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageStyle {
    Normal,
    /// Our own text.
    Me,
    Notice,
}

/// One call on the presentation sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderCommand {
    AppendInfo {
        pane: Pane,
        text: String,
    },
    AppendMessage {
        pane: Pane,
        from: String,
        text: String,
        style: MessageStyle,
    },
    AddUser {
        target: String,
        nick: String,
    },
    RemoveUser {
        target: String,
        nick: String,
    },
    ClearRoster {
        target: String,
    },
    OpenTarget {
        target: String,
        label: String,
        is_channel: bool,
    },
    CloseTarget {
        target: String,
    },
    RenameTarget {
        from: String,
        to: String,
        label: String,
    },
}

fn info(pane: Pane, text: impl Into<String>) -> RenderCommand {
    RenderCommand::AppendInfo {
        pane,
        text: text.into(),
    }
}

/// Routes events and owns the focus.
#[derive(Debug, Default)]
pub struct Router {
    active: Option<String>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Key of the focused target, if any.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Focus the target named `name`. Returns `false` if there is none.
    pub fn focus(&mut self, conn: &mut Connection, name: &str) -> bool {
        let key = conn.key(name);
        match conn.target_by_key_mut(&key) {
            Some(target) => {
                target.history.mark_seen();
                self.active = Some(key);
                true
            }
            None => false,
        }
    }

    /// Echo our own chat text into the focused target.
    ///
    /// Returns `None` when nothing has focus.
    pub fn echo_own(&mut self, conn: &mut Connection, text: &str) -> Option<Vec<RenderCommand>> {
        let key = self.active.clone()?;
        let nickname = conn.nickname().to_string();
        let target = conn.target_by_key_mut(&key)?;
        target.history.record();
        target.history.mark_seen();
        Some(vec![RenderCommand::AppendMessage {
            pane: Pane::Target(key),
            from: nickname,
            text: text.to_string(),
            style: MessageStyle::Me,
        }])
    }

    /// Echo a `/msg` into the server pane. Focus is left alone.
    pub fn echo_direct(&self, conn: &Connection, recipient: &str, text: &str) -> RenderCommand {
        RenderCommand::AppendMessage {
            pane: Pane::Server,
            from: format!("{} -> {}", conn.nickname(), recipient),
            text: text.to_string(),
            style: MessageStyle::Me,
        }
    }

    /// Map one event to presentation calls.
    ///
    /// `conn` is the live connection, or `None` once it is gone.
    pub fn dispatch(&mut self, event: &Event, conn: Option<&mut Connection>) -> Vec<RenderCommand> {
        debug!(kind = event.kind(), "routing event");
        match (event, conn) {
            (Event::Connecting { host, port }, _) => {
                vec![info(Pane::Server, format!("Connecting to {host}:{port}..."))]
            }
            (Event::Welcome { nickname }, _) => {
                vec![info(Pane::Server, format!("Connected as {nickname}."))]
            }
            (Event::Joining { channel }, _) => {
                vec![info(Pane::Server, format!("Joining {channel}..."))]
            }
            (
                Event::Joined {
                    target,
                    channel,
                    nickname,
                    is_self,
                },
                _,
            ) => {
                let mut out = Vec::with_capacity(2);
                if *is_self {
                    out.push(RenderCommand::OpenTarget {
                        target: target.clone(),
                        label: channel.clone(),
                        is_channel: true,
                    });
                    self.active = Some(target.clone());
                } else {
                    out.push(RenderCommand::AddUser {
                        target: target.clone(),
                        nick: nickname.clone(),
                    });
                }
                out.push(info(
                    Pane::Target(target.clone()),
                    format!("{nickname} has joined {channel}."),
                ));
                out
            }
            (
                Event::Parted {
                    target,
                    channel,
                    nickname,
                    is_self,
                    ..
                },
                conn,
            ) => {
                let text = format!("{nickname} has parted {channel}.");
                if *is_self {
                    self.leave_target(target, text, conn)
                } else {
                    vec![
                        RenderCommand::RemoveUser {
                            target: target.clone(),
                            nick: nickname.clone(),
                        },
                        info(Pane::Target(target.clone()), text),
                    ]
                }
            }
            (
                Event::Kicked {
                    target,
                    channel,
                    nickname,
                    by,
                    reason,
                    is_self,
                },
                conn,
            ) => {
                let text = match reason {
                    Some(reason) => format!("{nickname} was kicked from {channel} by {by} ({reason})."),
                    None => format!("{nickname} was kicked from {channel} by {by}."),
                };
                if *is_self {
                    self.leave_target(target, text, conn)
                } else {
                    vec![
                        RenderCommand::RemoveUser {
                            target: target.clone(),
                            nick: nickname.clone(),
                        },
                        info(Pane::Target(target.clone()), text),
                    ]
                }
            }
            (
                Event::NickChanged {
                    old,
                    new,
                    is_self,
                    targets,
                    merged,
                },
                Some(conn),
            ) => self.nick_changed(conn, old, new, *is_self, targets, *merged),
            (
                Event::Quit {
                    nickname,
                    reason,
                    targets,
                },
                conn,
            ) => {
                let text = match reason {
                    Some(reason) if !reason.is_empty() => format!("{nickname} has quit ({reason})."),
                    _ => format!("{nickname} has quit."),
                };
                let mut out = Vec::new();
                for key in targets {
                    let is_channel = conn
                        .as_deref()
                        .and_then(|c| c.target_by_key(key))
                        .is_some_and(|t| t.is_channel());
                    if is_channel {
                        out.push(RenderCommand::RemoveUser {
                            target: key.clone(),
                            nick: nickname.clone(),
                        });
                    }
                    out.push(info(Pane::Target(key.clone()), text.clone()));
                }
                out
            }
            (
                Event::Message {
                    from,
                    recipient,
                    text,
                },
                Some(conn),
            ) => self.message(conn, from, recipient, text),
            (
                Event::Notice {
                    from,
                    recipient,
                    text,
                },
                conn,
            ) => {
                let pane = conn
                    .as_deref()
                    .and_then(|c| {
                        let name = if c.is_me(recipient) {
                            from.as_deref()?
                        } else {
                            recipient.as_str()
                        };
                        let key = c.key(name);
                        c.target_by_key(&key).map(|_| Pane::Target(key))
                    })
                    .unwrap_or(Pane::Server);
                let from = from
                    .clone()
                    .or_else(|| conn.as_deref().map(|c| c.host().to_string()))
                    .unwrap_or_default();
                vec![RenderCommand::AppendMessage {
                    pane,
                    from,
                    text: text.clone(),
                    style: MessageStyle::Notice,
                }]
            }
            (Event::NamesList { target, entries, .. }, _) => {
                std::iter::once(RenderCommand::ClearRoster {
                    target: target.clone(),
                })
                .chain(entries.iter().map(|entry| RenderCommand::AddUser {
                    target: target.clone(),
                    nick: entry.nickname.clone(),
                }))
                .collect()
            }
            (Event::RegistrationFailed(err), _) => {
                let mut text = err.text.clone();
                if matches!(err.code, 431..=437) {
                    text.push_str(" Use /nick <name> to pick another.");
                }
                vec![info(Pane::Server, text)]
            }
            (
                Event::ServerError {
                    subject, text, ..
                },
                conn,
            ) => {
                let pane = subject
                    .as_deref()
                    .zip(conn.as_deref())
                    .and_then(|(subject, c)| {
                        let key = c.key(subject);
                        c.target_by_key(&key).map(|_| Pane::Target(key))
                    })
                    .unwrap_or(Pane::Server);
                let text = match subject {
                    Some(subject) => format!("{subject}: {text}"),
                    None => text.clone(),
                };
                vec![info(pane, text)]
            }
            (Event::Disconnected { reason, targets }, _) => {
                let text = match reason {
                    Some(reason) => format!("Disconnected: {reason}."),
                    None => "Disconnected.".to_string(),
                };
                self.active = None;
                let mut out = Vec::with_capacity(targets.len() * 2 + 1);
                for key in targets {
                    out.push(RenderCommand::ClearRoster {
                        target: key.clone(),
                    });
                    out.push(info(Pane::Target(key.clone()), text.clone()));
                }
                out.push(info(Pane::Server, text));
                out
            }
            (event, None) => {
                debug!(kind = event.kind(), "event without a connection dropped");
                vec![]
            }
        }
    }

    fn message(&mut self, conn: &mut Connection, from: &str, recipient: &str, text: &str) -> Vec<RenderCommand> {
        let mut out = Vec::with_capacity(2);
        let key = if conn.is_me(recipient) {
            let (key, created) = conn.open_private(from);
            if created {
                out.push(RenderCommand::OpenTarget {
                    target: key.clone(),
                    label: from.to_string(),
                    is_channel: false,
                });
            }
            key
        } else {
            conn.key(recipient)
        };

        let Some(target) = conn.target_by_key_mut(&key) else {
            debug!(%recipient, %from, "message for a target we are not in dropped");
            return vec![];
        };
        target.history.record();
        if self.active.as_deref() == Some(key.as_str()) {
            target.history.mark_seen();
        }

        out.push(RenderCommand::AppendMessage {
            pane: Pane::Target(key),
            from: from.to_string(),
            text: text.to_string(),
            style: MessageStyle::Normal,
        });
        out
    }

    fn nick_changed(
        &mut self,
        conn: &Connection,
        old: &str,
        new: &str,
        is_self: bool,
        targets: &[String],
        merged: bool,
    ) -> Vec<RenderCommand> {
        let text = format!("{old} has changed nick to {new}.");
        let old_key = conn.key(old);
        let mut out = Vec::new();

        for key in targets {
            match conn.target_by_key(key) {
                Some(target) if target.is_channel() => {
                    out.push(RenderCommand::RemoveUser {
                        target: key.clone(),
                        nick: old.to_string(),
                    });
                    out.push(RenderCommand::AddUser {
                        target: key.clone(),
                        nick: new.to_string(),
                    });
                }
                Some(_) => {
                    if merged {
                        out.push(RenderCommand::CloseTarget {
                            target: old_key.clone(),
                        });
                    } else {
                        out.push(RenderCommand::RenameTarget {
                            from: old_key.clone(),
                            to: key.clone(),
                            label: new.to_string(),
                        });
                    }
                    if self.active.as_deref() == Some(old_key.as_str()) {
                        self.active = Some(key.clone());
                    }
                }
                None => continue,
            }
            out.push(info(Pane::Target(key.clone()), text.clone()));
        }
        if is_self {
            out.push(info(Pane::Server, text));
        }
        out
    }

    /// We left `target`: close it and move focus if it had it.
    fn leave_target(&mut self, target: &str, text: String, conn: Option<&mut Connection>) -> Vec<RenderCommand> {
        let out = vec![
            RenderCommand::CloseTarget {
                target: target.to_string(),
            },
            info(Pane::Server, text),
        ];
        if self.active.as_deref() == Some(target) {
            self.active = None;
            if let Some(conn) = conn {
                let next = conn
                    .targets()
                    .find(|(_, t)| t.name().is_channel_name())
                    .or_else(|| conn.targets().next())
                    .map(|(key, _)| key.to_string());
                if let Some(next) = next {
                    debug!(from = %target, to = %next, "focus moved");
                    if let Some(t) = conn.target_by_key_mut(&next) {
                        t.history.mark_seen();
                    }
                    self.active = Some(next);
                }
            }
        }
        out
    }
}
