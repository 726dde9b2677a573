//! Public listing filters and ordering.

use entity::note;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, QueryFilter, QueryOrder, QuerySelect, Select};

use super::category::NoteCategory;
use super::moderation::NoteStatus;

pub const DEFAULT_LIST_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// `created_at` descending
    #[default]
    Newest,
    /// `rating` descending, then `vote_count` descending
    Rating,
}

impl SortOrder {
    /// Unknown values fall back to [`SortOrder::Newest`].
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("rating") => SortOrder::Rating,
            _ => SortOrder::Newest,
        }
    }
}

/// Conjunctive filters over approved notes.
#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    pub branch: Option<String>,
    pub semester: Option<i32>,
    /// Case-insensitive substring
    pub subject: Option<String>,
    pub category: Option<NoteCategory>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filter: NoteFilter,
    pub sort: SortOrder,
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn effective_limit(&self) -> u64 {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIST_LIMIT)
    }

    pub fn apply(&self, select: Select<note::Entity>) -> Select<note::Entity> {
        let filter = &self.filter;
        let mut select = select.filter(note::Column::Status.eq(NoteStatus::Approved.as_str()));

        if let Some(branch) = &filter.branch {
            select = select.filter(note::Column::Branch.eq(branch.as_str()));
        }
        if let Some(semester) = filter.semester {
            select = select.filter(note::Column::Semester.eq(semester));
        }
        if let Some(subject) = filter.subject.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", subject.to_lowercase());
            select = select.filter(
                Expr::expr(Func::lower(Expr::col((note::Entity, note::Column::Subject))))
                    .like(pattern),
            );
        }
        if let Some(category) = filter.category {
            select = select.filter(note::Column::Category.eq(category.as_str()));
        }
        if let Some(year) = filter.year {
            select = select.filter(note::Column::Year.eq(year));
        }

        let select = match self.sort {
            SortOrder::Newest => select.order_by_desc(note::Column::CreatedAt),
            SortOrder::Rating => select
                .order_by_desc(note::Column::Rating)
                .order_by_desc(note::Column::VoteCount),
        };

        select.limit(self.effective_limit())
    }
}
