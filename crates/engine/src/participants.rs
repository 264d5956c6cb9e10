//! Team leaders and advisors.
//!
//! Participants are always referenced by their roster id. Display names are
//! for rendering and search only and never used as a join key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Canonical roster id of a participant.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    TeamLeaderBroker,
    Advisor,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub role: Role,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Default franchise/parent-broker cut for operations that do not carry
    /// their own.
    #[serde(default)]
    pub franchise_percent: Option<f64>,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            first_name: String::new(),
            last_name: String::new(),
            franchise_percent: None,
        }
    }

    #[must_use]
    pub fn named(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    #[must_use]
    pub fn franchise_percent(mut self, percent: f64) -> Self {
        self.franchise_percent = Some(percent);
        self
    }

    pub fn is_team_leader(&self) -> bool {
        self.role == Role::TeamLeaderBroker
    }

    /// "First Last", trimmed. Falls back to the id when both are empty.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.id.to_string()
        } else {
            name.to_string()
        }
    }
}

/// The participants visible to a report, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    members: BTreeMap<ParticipantId, Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a participant.
    pub fn insert(&mut self, participant: Participant) {
        self.members.insert(participant.id.clone(), participant);
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.members.get(id)
    }

    pub fn require(&self, id: &ParticipantId) -> ResultEngine<&Participant> {
        self.get(id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.members.values()
    }

    pub fn team_leaders(&self) -> impl Iterator<Item = &Participant> {
        self.iter().filter(|p| p.is_team_leader())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Display name for an id, if the participant is on the roster.
    pub fn display_name(&self, id: &ParticipantId) -> Option<String> {
        self.get(id).map(Participant::display_name)
    }
}

impl FromIterator<Participant> for Roster {
    fn from_iter<T: IntoIterator<Item = Participant>>(iter: T) -> Self {
        let mut roster = Roster::new();
        for participant in iter {
            roster.insert(participant);
        }
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_id() {
        let bare = Participant::new("adv-1", Role::Advisor);
        assert_eq!(bare.display_name(), "adv-1");
        let named = bare.named(" Ana ", "Peña");
        assert_eq!(named.display_name(), "Ana Peña");
    }

    #[test]
    fn roster_splits_roles() {
        let roster: Roster = [
            Participant::new("leader", Role::TeamLeaderBroker),
            Participant::new("a", Role::Advisor),
            Participant::new("b", Role::Advisor),
        ]
        .into_iter()
        .collect();
        assert_eq!(roster.team_leaders().count(), 1);
        assert_eq!(roster.len(), 3);
        assert!(roster.require(&"missing".into()).is_err());
    }
}
