//! Premium gating of file locations.

use entity::note;

use crate::modules::accounts::Actor;

/// Returned in place of `file_url` when the requester may not see it.
pub const LOCKED_FILE_URL: &str = "LOCKED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    Anonymous,
    Member { is_premium: bool },
}

impl Requester {
    pub fn from_actor(actor: Option<&Actor>) -> Self {
        match actor {
            Some(actor) => Requester::Member {
                is_premium: actor.is_premium,
            },
            None => Requester::Anonymous,
        }
    }

    fn is_premium(&self) -> bool {
        matches!(self, Requester::Member { is_premium: true })
    }
}

/// File location the requester is allowed to see. Never touches stored data.
pub fn visible_file_url<'a>(note: &'a note::Model, requester: Requester) -> &'a str {
    if note.is_premium && !requester.is_premium() {
        LOCKED_FILE_URL
    } else {
        &note.file_url
    }
}

/// Replaces the note's file location with what the requester may see.
pub fn gate_file_url(mut note: note::Model, requester: Requester) -> note::Model {
    let url = visible_file_url(&note, requester).to_string();
    note.file_url = url;
    note
}
