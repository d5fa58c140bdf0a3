//! Inbound message handling for [`Session`].
//!
//! One method per command, each returning the actions it produced.

use slirc_proto::{Command, Isupport, Message, Response};
use tracing::{debug, info, warn};

use crate::error::RegistrationError;

use super::target::{RosterEntry, Target};
use super::{Connection, Event, Session, SessionAction, SessionState};

impl Session {
    /// Apply one server message from the connection of `epoch`.
    #[must_use]
    pub fn handle_message(&mut self, epoch: u64, msg: &Message) -> Vec<SessionAction> {
        if self.epoch() != Some(epoch) {
            debug!(epoch, command = %msg.command.name(), "dropping message from stale connection");
            return vec![];
        }

        let source = msg.source_nickname();
        match msg.command {
            Command::PING(ref token, _) => vec![SessionAction::Send(Message::pong(token.as_str()))],
            Command::ERROR(ref text) => {
                warn!(epoch, %text, "server closed the link");
                self.teardown(Some(text.clone()))
            }
            Command::Numeric(code, ref args) => self.handle_numeric(code, args),
            Command::JOIN(ref channel, _) => match source {
                Some(nick) => self.handle_join(nick, channel),
                None => vec![],
            },
            Command::PART(ref channel, ref reason) => match source {
                Some(nick) => self.handle_part(nick, channel, reason.clone()),
                None => vec![],
            },
            Command::KICK(ref channel, ref victim, ref reason) => {
                let by = source
                    .or_else(|| msg.prefix.as_ref().and_then(|p| p.host()))
                    .unwrap_or_default();
                self.handle_kick(by, channel, victim, reason.clone())
            }
            Command::QUIT(ref reason) => match source {
                Some(nick) => self.handle_quit(nick, reason.clone()),
                None => vec![],
            },
            Command::NICK(ref new) => match source {
                Some(old) => self.handle_nick(old, new),
                None => vec![],
            },
            Command::PRIVMSG(ref recipient, ref text) => match source {
                Some(from) => vec![SessionAction::Emit(Event::Message {
                    from: from.to_string(),
                    recipient: recipient.clone(),
                    text: text.clone(),
                })],
                None => {
                    debug!(%recipient, "PRIVMSG without a user source ignored");
                    vec![]
                }
            },
            Command::NOTICE(ref recipient, ref text) => vec![SessionAction::Emit(Event::Notice {
                from: source.map(str::to_string),
                recipient: recipient.clone(),
                text: text.clone(),
            })],
            _ => {
                debug!(command = %msg.command.name(), "unhandled command");
                vec![]
            }
        }
    }

    fn handle_numeric(&mut self, code: u16, args: &[String]) -> Vec<SessionAction> {
        let Some(conn) = self.connection.as_mut() else {
            return vec![];
        };
        let text = args.last().cloned().unwrap_or_default();

        match Response::from_code(code) {
            Some(Response::RPL_WELCOME) => {
                if !matches!(conn.state, SessionState::Connecting | SessionState::Registering) {
                    debug!("duplicate welcome ignored");
                    return vec![];
                }
                conn.state = SessionState::Ready;
                if let Some(nick) = args.first() {
                    conn.nickname = nick.clone();
                }
                info!(nickname = %conn.nickname, "Registered");

                let mut actions = vec![SessionAction::Emit(Event::Welcome {
                    nickname: conn.nickname.clone(),
                })];
                for channel in &self.config.chat.channels {
                    actions.push(SessionAction::Emit(Event::Joining {
                        channel: channel.clone(),
                    }));
                    actions.push(SessionAction::Send(Message::join(channel.as_str())));
                }
                actions
            }
            Some(Response::RPL_ISUPPORT) => {
                let borrowed: Vec<&str> = args.iter().map(String::as_str).collect();
                if let Some(isupport) = Isupport::from_response_args(&borrowed) {
                    if let Some(casemapping) = isupport.casemapping() {
                        debug!(casemapping = casemapping.as_str(), "server casemapping");
                        conn.set_casemapping(casemapping);
                    }
                    if let Some(symbols) = isupport.prefix_symbols() {
                        conn.prefixes = symbols.to_string();
                    }
                }
                vec![]
            }
            Some(Response::RPL_NAMREPLY) => {
                // <me> [<symbol>] <channel> :<names>
                if args.len() < 3 {
                    return vec![];
                }
                let key = conn.key(&args[args.len() - 2]);
                if !conn.targets.contains_key(&key) {
                    debug!(%key, "NAMES for unknown target dropped");
                    return vec![];
                }
                let prefixes = conn.prefixes.clone();
                conn.pending_names.entry(key).or_default().extend(
                    text.split(' ')
                        .filter_map(|entry| RosterEntry::from_names_entry(entry, &prefixes)),
                );
                vec![]
            }
            Some(Response::RPL_ENDOFNAMES) => {
                let Some(channel) = args.get(1) else {
                    return vec![];
                };
                let key = conn.key(channel);
                let entries = conn.pending_names.remove(&key).unwrap_or_default();
                let casemapping = conn.casemapping;
                let Some(target) = conn.targets.get_mut(&key) else {
                    debug!(%key, "end of NAMES for unknown target dropped");
                    return vec![];
                };
                target.roster.replace(casemapping, entries);
                vec![SessionAction::Emit(Event::NamesList {
                    target: key,
                    channel: channel.clone(),
                    entries: target.roster.iter().cloned().collect(),
                })]
            }
            Some(resp) if resp.is_registration_error() => {
                warn!(code, %text, "registration rejected");
                vec![SessionAction::Emit(Event::RegistrationFailed(RegistrationError {
                    code,
                    text,
                }))]
            }
            _ if Response::is_error_code(code) => {
                let subject = (args.len() > 2).then(|| args[1].clone());
                debug!(code, ?subject, %text, "server error reply");
                vec![SessionAction::Emit(Event::ServerError {
                    code,
                    subject,
                    text,
                })]
            }
            _ => vec![],
        }
    }

    fn handle_join(&mut self, nick: &str, channel: &str) -> Vec<SessionAction> {
        let Some(conn) = self.connection.as_mut() else {
            return vec![];
        };
        let key = conn.key(channel);

        if conn.is_me(nick) {
            conn.targets
                .entry(key.clone())
                .or_insert_with(|| Target::channel(channel));
            conn.pending_names.remove(&key);
            info!(%channel, "Joined");
            return vec![
                SessionAction::Emit(Event::Joined {
                    target: key,
                    channel: channel.to_string(),
                    nickname: nick.to_string(),
                    is_self: true,
                }),
                SessionAction::Send(Message::names(channel)),
            ];
        }

        let casemapping = conn.casemapping;
        let Some(target) = conn.targets.get_mut(&key) else {
            debug!(%channel, %nick, "JOIN for unknown target dropped");
            return vec![];
        };
        target.roster.insert(casemapping, RosterEntry::new(nick));
        vec![SessionAction::Emit(Event::Joined {
            target: key,
            channel: channel.to_string(),
            nickname: nick.to_string(),
            is_self: false,
        })]
    }

    fn handle_part(&mut self, nick: &str, channel: &str, reason: Option<String>) -> Vec<SessionAction> {
        let Some(conn) = self.connection.as_mut() else {
            return vec![];
        };
        let key = conn.key(channel);
        let is_self = conn.is_me(nick);

        if !leave(conn, &key, nick, is_self) {
            debug!(%channel, %nick, "PART for unknown target dropped");
            return vec![];
        }
        vec![SessionAction::Emit(Event::Parted {
            target: key,
            channel: channel.to_string(),
            nickname: nick.to_string(),
            reason,
            is_self,
        })]
    }

    fn handle_kick(
        &mut self,
        by: &str,
        channel: &str,
        victim: &str,
        reason: Option<String>,
    ) -> Vec<SessionAction> {
        let Some(conn) = self.connection.as_mut() else {
            return vec![];
        };
        let key = conn.key(channel);
        let is_self = conn.is_me(victim);

        if !leave(conn, &key, victim, is_self) {
            debug!(%channel, %victim, "KICK for unknown target dropped");
            return vec![];
        }
        if is_self {
            info!(%channel, %by, "Kicked");
        }
        vec![SessionAction::Emit(Event::Kicked {
            target: key,
            channel: channel.to_string(),
            nickname: victim.to_string(),
            by: by.to_string(),
            reason,
            is_self,
        })]
    }

    fn handle_quit(&mut self, nick: &str, reason: Option<String>) -> Vec<SessionAction> {
        let Some(conn) = self.connection.as_mut() else {
            return vec![];
        };
        if conn.is_me(nick) {
            // Our own QUIT echo; teardown follows from ERROR or EOF.
            return vec![];
        }

        let casemapping = conn.casemapping;
        let private_key = conn.key(nick);
        let targets: Vec<String> = conn
            .targets
            .iter_mut()
            .filter_map(|(key, target)| {
                let was_member = target.roster.remove(casemapping, nick).is_some();
                (was_member || *key == private_key).then(|| key.clone())
            })
            .collect();

        vec![SessionAction::Emit(Event::Quit {
            nickname: nick.to_string(),
            reason,
            targets,
        })]
    }

    fn handle_nick(&mut self, old: &str, new: &str) -> Vec<SessionAction> {
        let Some(conn) = self.connection.as_mut() else {
            return vec![];
        };
        let is_self = conn.is_me(old);
        if is_self {
            info!(%old, %new, "Nickname changed");
            conn.nickname = new.to_string();
        }

        let casemapping = conn.casemapping;
        let mut targets = Vec::new();
        for (key, target) in conn.targets.iter_mut() {
            if let Some(entry) = target.roster.remove(casemapping, old) {
                target.roster.insert(
                    casemapping,
                    RosterEntry {
                        nickname: new.to_string(),
                        mode: entry.mode,
                    },
                );
                targets.push(key.clone());
            }
        }

        let old_key = conn.key(old);
        let new_key = conn.key(new);
        let mut merged = false;
        if let Some(mut private) = conn.targets.remove(&old_key) {
            if private.is_channel() {
                conn.targets.insert(old_key, private);
            } else {
                targets.retain(|key| *key != old_key);
                targets.push(new_key.clone());
                match conn.targets.get_mut(&new_key) {
                    Some(existing) => {
                        debug!(%old, %new, "private target merged into existing one");
                        existing.rename(new);
                        existing.history.absorb(private.history);
                        merged = true;
                    }
                    None => {
                        private.rename(new);
                        conn.targets.insert(new_key, private);
                    }
                }
            }
        }

        vec![SessionAction::Emit(Event::NickChanged {
            old: old.to_string(),
            new: new.to_string(),
            is_self,
            targets,
            merged,
        })]
    }
}

/// Remove `nick` from the target under `key`, or the whole target when it is
/// us leaving. Returns `false` if there is no such target.
fn leave(conn: &mut Connection, key: &str, nick: &str, is_self: bool) -> bool {
    if is_self {
        conn.pending_names.remove(key);
        return conn.targets.remove(key).is_some();
    }
    let casemapping = conn.casemapping;
    match conn.targets.get_mut(key) {
        Some(target) => {
            target.roster.remove(casemapping, nick);
            true
        }
        None => false,
    }
}
