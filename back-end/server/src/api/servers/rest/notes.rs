//! Note catalogue handlers: listing, upload, moderation and admin edits.
//!
//! Handlers stay thin: extract, parse into domain types, delegate to
//! `NoteService`, convert to a response.

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::dto::{
    notes_response, ApiError, LimitParams, ListNotesParams, NoteResponse, NoteUpdateRequest,
    VerifyParams,
};
use crate::api::servers::app_state::AppState;
use crate::api::servers::auth_extractor::{CurrentUser, MaybeUser};
use crate::api::servers::extract::{ApiJson, ApiPath, ApiQuery};
use crate::modules::notes::{
    leaderboard as rank_uploaders, LeaderboardEntry, ListQuery, ModerationAction, NewNote,
    NoteCategory, NoteFilter, NoteService, NoteStatus, NoteUpdate, Requester, SortOrder,
    UploadedFile,
};

// ============================================================================
// Public
// ============================================================================

/// GET /api/v1/notes
pub async fn list(
    State(app_state): State<AppState>,
    MaybeUser(actor): MaybeUser,
    ApiQuery(params): ApiQuery<ListNotesParams>,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let category = params
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(str::parse::<NoteCategory>)
        .transpose()?;

    let query = ListQuery {
        filter: NoteFilter {
            branch: params.branch,
            semester: params.semester,
            subject: params.subject,
            category,
            year: params.year,
        },
        sort: SortOrder::parse(params.sort_by.as_deref()),
        limit: params.limit,
    };

    let requester = Requester::from_actor(actor.as_ref());
    let notes = NoteService::new(&app_state.platform.db)
        .list_public(&query, requester)
        .await?;

    debug!("Listed {} notes", notes.len());
    Ok(Json(notes_response(notes)))
}

/// GET /api/v1/notes/leaderboard
pub async fn leaderboard(
    State(app_state): State<AppState>,
    ApiQuery(params): ApiQuery<LimitParams>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let entries = rank_uploaders(&app_state.platform.db, params.limit).await?;
    Ok(Json(entries))
}

// ============================================================================
// Upload
// ============================================================================

/// POST /api/v1/notes/upload
///
/// Multipart form: `title`, `branch`, `semester`, `subject`, `file`, and
/// optionally `category`, `year`, `university`, `is_premium`.
pub async fn upload(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<NoteResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let form = UploadForm::read(&mut multipart).await?;
    let (meta, file) = form.into_parts()?;

    let platform = &app_state.platform;
    let note = NoteService::new(&platform.db)
        .upload(&actor, platform.storage.as_ref(), meta, file)
        .await?;

    Ok(Json(note.into()))
}

#[derive(Default)]
struct UploadForm {
    title: Option<String>,
    university: Option<String>,
    branch: Option<String>,
    semester: Option<String>,
    subject: Option<String>,
    category: Option<String>,
    year: Option<String>,
    is_premium: Option<String>,
    file: Option<UploadedFile>,
}

impl UploadForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == "file" {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                form.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
                continue;
            }

            let text = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            let slot = match name.as_str() {
                "title" => &mut form.title,
                "university" => &mut form.university,
                "branch" => &mut form.branch,
                "semester" => &mut form.semester,
                "subject" => &mut form.subject,
                "category" => &mut form.category,
                "year" => &mut form.year,
                "is_premium" => &mut form.is_premium,
                other => {
                    debug!("Ignoring unknown upload field '{}'", other);
                    continue;
                }
            };
            *slot = Some(text);
        }

        Ok(form)
    }

    fn into_parts(self) -> Result<(NewNote, UploadedFile), ApiError> {
        let meta = NewNote {
            title: required(self.title, "title")?,
            university: self.university,
            branch: required(self.branch, "branch")?,
            semester: parse_number(&required(self.semester, "semester")?, "semester")?,
            subject: required(self.subject, "subject")?,
            category: match self.category.as_deref().map(str::trim) {
                Some(c) if !c.is_empty() => c.parse::<NoteCategory>()?,
                _ => NoteCategory::default(),
            },
            year: match self.year.as_deref().map(str::trim) {
                Some(y) if !y.is_empty() => Some(parse_number(y, "year")?),
                _ => None,
            },
            is_premium: match self.is_premium.as_deref().map(str::trim) {
                None | Some("") => false,
                Some(flag) => parse_flag(flag)?,
            },
        };
        let file = self
            .file
            .ok_or_else(|| ApiError::validation("Missing form field 'file'"))?;

        Ok((meta, file))
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::validation(format!("Missing form field '{field}'")))
}

fn parse_number(value: &str, field: &str) -> Result<i32, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::validation(format!("Form field '{field}' must be an integer")))
}

fn parse_flag(value: &str) -> Result<bool, ApiError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ApiError::validation(
            "Form field 'is_premium' must be a boolean",
        )),
    }
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/v1/notes/pending
pub async fn pending(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let notes = NoteService::new(&app_state.platform.db)
        .list_pending(&actor)
        .await?;
    Ok(Json(notes_response(notes)))
}

/// GET /api/v1/notes/admin/all
pub async fn admin_all(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let notes = NoteService::new(&app_state.platform.db)
        .list_all(&actor)
        .await?;
    Ok(Json(notes_response(notes)))
}

/// PUT /api/v1/notes/{id}/verify?action=approve|reject
pub async fn verify(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(note_id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<VerifyParams>,
) -> Result<Json<NoteResponse>, ApiError> {
    let action: ModerationAction = params.action.parse()?;
    let note = NoteService::new(&app_state.platform.db)
        .moderate(&actor, note_id, action)
        .await?;
    Ok(Json(note.into()))
}

/// PUT /api/v1/notes/{id}
pub async fn update(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(note_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<NoteUpdateRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    let status = payload
        .status
        .as_deref()
        .map(str::parse::<NoteStatus>)
        .transpose()?;

    let update = NoteUpdate {
        title: payload.title,
        status,
        is_premium: payload.is_premium,
    };
    let note = NoteService::new(&app_state.platform.db)
        .update(&actor, note_id, update)
        .await?;
    Ok(Json(note.into()))
}

/// DELETE /api/v1/notes/{id}
pub async fn delete(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(note_id): ApiPath<Uuid>,
) -> Result<Json<Value>, ApiError> {
    NoteService::new(&app_state.platform.db)
        .delete(&actor, note_id)
        .await?;

    info!(note_id = %note_id, "Note deleted via API");
    Ok(Json(json!({"message": "Note deleted successfully"})))
}
