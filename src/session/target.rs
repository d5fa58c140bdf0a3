//! Targets: the channels and private peers a connection talks to.

use std::collections::BTreeMap;

use slirc_proto::{split_membership_prefix_with, CaseMapping};

/// Whether a target is a channel or a private peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    Channel,
    Private,
}

/// One member of a channel roster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterEntry {
    /// Nickname as the server last spelled it.
    pub nickname: String,
    /// Highest membership prefix (`@`, `+`, ...), if any.
    pub mode: Option<char>,
}

impl RosterEntry {
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            mode: None,
        }
    }

    /// Parse a `RPL_NAMREPLY` entry such as `@alice` using the server's
    /// prefix symbols.
    pub fn from_names_entry(entry: &str, prefixes: &str) -> Option<Self> {
        let (mode, nickname) = split_membership_prefix_with(entry, prefixes);
        (!nickname.is_empty()).then(|| Self {
            nickname: nickname.to_owned(),
            mode,
        })
    }
}

/// Members of a target, unique and ordered by case-folded nickname.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    entries: BTreeMap<String, RosterEntry>,
}

impl Roster {
    /// Add or update a member. Returns `true` if the nickname was new.
    pub fn insert(&mut self, casemapping: CaseMapping, entry: RosterEntry) -> bool {
        let key = casemapping.to_lower(&entry.nickname);
        self.entries.insert(key, entry).is_none()
    }

    pub fn remove(&mut self, casemapping: CaseMapping, nickname: &str) -> Option<RosterEntry> {
        self.entries.remove(&casemapping.to_lower(nickname))
    }

    pub fn contains(&self, casemapping: CaseMapping, nickname: &str) -> bool {
        self.entries.contains_key(&casemapping.to_lower(nickname))
    }

    pub fn get(&self, casemapping: CaseMapping, nickname: &str) -> Option<&RosterEntry> {
        self.entries.get(&casemapping.to_lower(nickname))
    }

    /// Swap every member for `entries`, later duplicates winning.
    pub fn replace(&mut self, casemapping: CaseMapping, entries: impl IntoIterator<Item = RosterEntry>) {
        self.entries.clear();
        for entry in entries {
            self.insert(casemapping, entry);
        }
    }

    /// Re-fold every key, e.g. after the server announced its casemapping.
    pub(crate) fn refold(&mut self, casemapping: CaseMapping) {
        let entries = std::mem::take(&mut self.entries);
        self.replace(casemapping, entries.into_values());
    }

    pub fn iter(&self) -> impl Iterator<Item = &RosterEntry> {
        self.entries.values()
    }

    /// Nicknames in roster order.
    pub fn nicknames(&self) -> Vec<&str> {
        self.entries.values().map(|e| e.nickname.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How far a target's message log has been appended to and read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HistoryMarker {
    appended: u64,
    seen: u64,
}

impl HistoryMarker {
    /// Count one more line in the log.
    pub fn record(&mut self) {
        self.appended += 1;
    }

    /// Everything appended so far has been shown.
    pub fn mark_seen(&mut self) {
        self.seen = self.appended;
    }

    pub fn appended(&self) -> u64 {
        self.appended
    }

    pub fn unread(&self) -> u64 {
        self.appended - self.seen
    }

    /// Take over another log's counts, e.g. when two private targets merge.
    pub(crate) fn absorb(&mut self, other: HistoryMarker) {
        self.appended += other.appended;
        self.seen += other.seen;
    }
}

/// A channel or private peer with its roster and history marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    name: String,
    kind: TargetKind,
    pub(crate) roster: Roster,
    pub(crate) history: HistoryMarker,
}

impl Target {
    pub fn channel(name: impl Into<String>) -> Self {
        Self::new(name.into(), TargetKind::Channel)
    }

    pub fn private(nickname: impl Into<String>) -> Self {
        Self::new(nickname.into(), TargetKind::Private)
    }

    fn new(name: String, kind: TargetKind) -> Self {
        Self {
            name,
            kind,
            roster: Roster::default(),
            history: HistoryMarker::default(),
        }
    }

    /// Display name, as first seen.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn is_channel(&self) -> bool {
        self.kind == TargetKind::Channel
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn history(&self) -> &HistoryMarker {
        &self.history
    }
}
