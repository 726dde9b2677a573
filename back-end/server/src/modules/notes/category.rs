use std::str::FromStr;

use crate::modules::error::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteCategory {
    #[default]
    Note,
    SessionalPaper,
    UniversityPaper,
}

impl NoteCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteCategory::Note => "NOTE",
            NoteCategory::SessionalPaper => "SESSIONAL_PAPER",
            NoteCategory::UniversityPaper => "UNIVERSITY_PAPER",
        }
    }
}

impl FromStr for NoteCategory {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NOTE" => Ok(NoteCategory::Note),
            "SESSIONAL_PAPER" => Ok(NoteCategory::SessionalPaper),
            "UNIVERSITY_PAPER" => Ok(NoteCategory::UniversityPaper),
            other => Err(ServiceError::unprocessable(format!("Unknown category '{other}'"))),
        }
    }
}
