//! File-backed collaborators for the engine.

use std::{fs::File, io::BufReader, path::Path};

use engine::{
    EngineError, Operation, OperationSource, Participant, ParticipantId, ParticipantSource, Roster,
};

use crate::error::{AppError, Result};

/// Operations and participants read once from disk.
#[derive(Debug, Default)]
pub struct FileStore {
    operations: Vec<Operation>,
    roster: Roster,
}

impl FileStore {
    pub fn open(operations: impl AsRef<Path>, roster: impl AsRef<Path>) -> Result<Self> {
        let operations = read_operations(operations.as_ref())?;
        let roster = read_roster(roster.as_ref())?;
        tracing::debug!(
            operations = operations.len(),
            participants = roster.len(),
            "store loaded"
        );
        Ok(Self { operations, roster })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Resolve the configured team leader, or the only one on the roster
    /// when `team` is empty.
    pub fn team_leader(&self, team: &str) -> Result<ParticipantId> {
        if !team.is_empty() {
            let id = ParticipantId::from(team);
            self.roster.require(&id)?;
            return Ok(id);
        }
        let mut leaders = self.roster.team_leaders();
        match (leaders.next(), leaders.next()) {
            (Some(leader), None) => Ok(leader.id.clone()),
            (None, _) => Err(AppError::Usage("roster has no team leader".to_string())),
            (Some(_), Some(_)) => Err(AppError::Usage(
                "roster has several team leaders, pick one with --team".to_string(),
            )),
        }
    }
}

impl OperationSource for FileStore {
    fn fetch_operations(
        &self,
        owner: &ParticipantId,
    ) -> std::result::Result<Vec<Operation>, EngineError> {
        Ok(self
            .operations
            .iter()
            .filter(|op| &op.team_id == owner)
            .cloned()
            .collect())
    }
}

impl ParticipantSource for FileStore {
    fn fetch_participant(
        &self,
        id: &ParticipantId,
    ) -> std::result::Result<Participant, EngineError> {
        self.roster.fetch_participant(id)
    }
}

fn read_operations(path: &Path) -> Result<Vec<Operation>> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        let mut reader = csv::Reader::from_path(path)?;
        let operations = reader
            .deserialize::<Operation>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        return Ok(operations);
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn read_roster(path: &Path) -> Result<Roster> {
    let reader = BufReader::new(File::open(path)?);
    let participants: Vec<Participant> = serde_json::from_reader(reader)?;
    Ok(participants.into_iter().collect())
}
