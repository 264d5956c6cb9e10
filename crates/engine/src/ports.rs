//! Collaborator interfaces.
//!
//! Persistence lives outside the engine. These traits describe what the
//! reporting layer needs from it: a materialized list of a team's operations
//! and participant metadata by id.

use crate::{Operation, Participant, ParticipantId, ResultEngine, Roster};

pub trait OperationSource {
    /// Every operation owned by `owner` (a team leader id).
    fn fetch_operations(&self, owner: &ParticipantId) -> ResultEngine<Vec<Operation>>;
}

pub trait ParticipantSource {
    fn fetch_participant(&self, id: &ParticipantId) -> ResultEngine<Participant>;
}

impl ParticipantSource for Roster {
    fn fetch_participant(&self, id: &ParticipantId) -> ResultEngine<Participant> {
        self.require(id).cloned()
    }
}
