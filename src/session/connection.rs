//! The live connection: registration state, nickname and targets.

use std::collections::{BTreeMap, HashMap};

use slirc_proto::{CaseMapping, MEMBERSHIP_PREFIXES};
use tracing::debug;

use super::target::{RosterEntry, Target};
use super::SessionState;

/// Everything known about the one live server connection.
///
/// Dropped as a whole on teardown, which is what clears every target.
#[derive(Clone, Debug)]
pub struct Connection {
    pub(super) epoch: u64,
    pub(super) state: SessionState,
    pub(super) nickname: String,
    pub(super) host: String,
    pub(super) port: u16,
    pub(super) casemapping: CaseMapping,
    pub(super) prefixes: String,
    pub(super) targets: BTreeMap<String, Target>,
    /// NAMES replies collected until their 366 arrives.
    pub(super) pending_names: HashMap<String, Vec<RosterEntry>>,
}

impl Connection {
    pub(super) fn new(epoch: u64, host: String, port: u16, nickname: String) -> Self {
        Self {
            epoch,
            state: SessionState::Connecting,
            nickname,
            host,
            port,
            casemapping: CaseMapping::default(),
            prefixes: MEMBERSHIP_PREFIXES.to_string(),
            targets: BTreeMap::new(),
            pending_names: HashMap::new(),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Our nickname: the requested one until 001 confirms it.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn casemapping(&self) -> CaseMapping {
        self.casemapping
    }

    /// Case-folded key for a channel or nickname.
    pub fn key(&self, name: &str) -> String {
        self.casemapping.to_lower(name)
    }

    pub fn is_me(&self, nickname: &str) -> bool {
        self.casemapping.eq(nickname, &self.nickname)
    }

    /// Look a target up by display name in any case.
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.get(&self.key(name))
    }

    pub fn target_by_key(&self, key: &str) -> Option<&Target> {
        self.targets.get(key)
    }

    pub fn target_by_key_mut(&mut self, key: &str) -> Option<&mut Target> {
        self.targets.get_mut(key)
    }

    /// All targets, ordered by key.
    pub fn targets(&self) -> impl Iterator<Item = (&str, &Target)> {
        self.targets.iter().map(|(k, t)| (k.as_str(), t))
    }

    /// The private target for `nickname`, created if missing.
    ///
    /// Returns its key and whether it was just created.
    pub fn open_private(&mut self, nickname: &str) -> (String, bool) {
        let key = self.key(nickname);
        let created = !self.targets.contains_key(&key);
        if created {
            self.targets.insert(key.clone(), Target::private(nickname));
        }
        (key, created)
    }

    pub(super) fn set_casemapping(&mut self, casemapping: CaseMapping) {
        if casemapping == self.casemapping {
            return;
        }
        self.casemapping = casemapping;

        let targets = std::mem::take(&mut self.targets);
        let mut rekeyed = HashMap::with_capacity(targets.len());
        for (old_key, mut target) in targets {
            target.roster.refold(casemapping);
            let key = casemapping.to_lower(target.name());
            rekeyed.insert(old_key, key.clone());
            self.targets.insert(key, target);
        }

        // Old keys can't be refolded directly; follow each one to its target.
        let pending = std::mem::take(&mut self.pending_names);
        for (old_key, entries) in pending {
            match rekeyed.get(&old_key) {
                Some(key) => self.pending_names.entry(key.clone()).or_default().extend(entries),
                None => debug!(key = %old_key, "pending NAMES without a target dropped"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> Connection {
        Connection::new(1, "irc.test".into(), 6667, "Me[1]".into())
    }

    #[test]
    fn is_me_uses_casemapping() {
        let mut c = conn();
        assert!(c.is_me("me{1}"));
        c.set_casemapping(CaseMapping::Ascii);
        assert!(!c.is_me("me{1}"));
        assert!(c.is_me("ME[1]"));
    }

    #[test]
    fn open_private_is_idempotent() {
        let mut c = conn();
        let (key, created) = c.open_private("Bob");
        assert_eq!(key, "bob");
        assert!(created);
        let (_, created) = c.open_private("BOB");
        assert!(!created);
        assert_eq!(c.target("bob").unwrap().name(), "Bob");
    }

    #[test]
    fn casemapping_change_rekeys_targets() {
        let mut c = conn();
        c.targets.insert(c.key("#A[1]"), Target::channel("#A[1]"));
        assert!(c.target_by_key("#a{1}").is_some());
        c.set_casemapping(CaseMapping::Ascii);
        assert!(c.target_by_key("#a[1]").is_some());
        assert!(c.target_by_key("#a{1}").is_none());
    }
}
