pub mod access;
pub mod category;
pub mod leaderboard;
pub mod moderation;
pub mod query;
pub mod service;

pub use access::{gate_file_url, visible_file_url, Requester, LOCKED_FILE_URL};
pub use category::NoteCategory;
pub use leaderboard::{leaderboard, LeaderboardEntry};
pub use moderation::{ModerationAction, NoteStatus};
pub use query::{ListQuery, NoteFilter, SortOrder};
pub use service::{NewNote, NoteService, NoteUpdate, UploadedFile};
