use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::{
    error::{validation, AppError, AppResult, OptionExt},
    state::AppState,
    types::{Book, BookPage, BookPayload, BookQuery},
};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Escapes LIKE wildcards so the title prefix is matched literally
/// (ASCII case is still ignored by SQLite's LIKE).
pub fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

const BOOK_COLUMNS: &str = "id, title, page_number, description, meta, created_at, updated_at";

fn book_from_row(r: &SqliteRow) -> AppResult<Book> {
    let meta_raw: String = r.try_get("meta")?;
    let meta = serde_json::from_str(&meta_raw)
        .map_err(|e| AppError::Database(format!("stored meta is not valid JSON: {}", e)))?;
    Ok(Book {
        id: r.try_get("id")?,
        title: r.try_get("title")?,
        page_number: r.try_get("page_number")?,
        description: r.try_get("description")?,
        meta,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

fn validate_payload(req: &BookPayload) -> AppResult<String> {
    validation::validate_required(&req.title, "title", 20)?;
    validation::validate_positive_number(Some(req.page_number), "pageNumber")?;
    let meta = req.meta.clone().unwrap_or(serde_json::Value::Null);
    serde_json::to_string(&meta).map_err(|e| AppError::BadRequest(format!("invalid meta: {}", e)))
}

async fn fetch_book(state: &AppState, id: i64) -> AppResult<Book> {
    let row = sqlx::query(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"))
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_not_found("book")?;
    book_from_row(&row)
}

pub async fn create_book(
    State(state): State<AppState>,
    Json(req): Json<BookPayload>,
) -> AppResult<impl IntoResponse> {
    let meta_json = validate_payload(&req)?;
    let result = sqlx::query(
        r#"INSERT INTO books (title, page_number, description, meta)
           VALUES (?1, ?2, ?3, ?4)"#,
    )
    .bind(req.title.trim())
    .bind(req.page_number)
    .bind(&req.description)
    .bind(meta_json)
    .execute(&state.db)
    .await?;

    state.metrics.inc_book_writes();
    let book = fetch_book(&state, result.last_insert_rowid()).await?;
    tracing::debug!(id = book.id, title = %book.title, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn get_book(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Book>> {
    Ok(Json(fetch_book(&state, id).await?))
}

pub async fn list_books(
    State(state): State<AppState>,
    Query(q): Query<BookQuery>,
) -> AppResult<Json<BookPage>> {
    let page_size = q.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(AppError::ValidationError {
            field: "pageSize".into(),
            message: format!("must be in 1..={}", MAX_PAGE_SIZE),
        });
    }
    let page_number = q.page_number.unwrap_or(1);
    validation::validate_positive_number(Some(page_number), "pageNumber")?;
    let order = match q.sort.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("") | Some("asc") => "ASC",
        Some("desc") => "DESC",
        Some(other) => return Err(AppError::BadRequest(format!("invalid sort: {} (expected asc|desc)", other))),
    };
    let pattern = like_prefix(q.title.as_deref().unwrap_or("").trim());

    let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM books WHERE title LIKE ?1 ESCAPE '\'"#)
        .bind(&pattern)
        .fetch_one(&state.db)
        .await?;

    let rows = sqlx::query(&format!(
        r#"SELECT {BOOK_COLUMNS} FROM books WHERE title LIKE ?1 ESCAPE '\'
           ORDER BY id {order} LIMIT ?2 OFFSET ?3"#
    ))
    .bind(&pattern)
    .bind(page_size)
    .bind((page_number - 1).saturating_mul(page_size))
    .fetch_all(&state.db)
    .await?;
    let data = rows.iter().map(book_from_row).collect::<AppResult<Vec<_>>>()?;

    Ok(Json(BookPage {
        page: page_size,
        page_number,
        total_page: (total + page_size - 1) / page_size,
        total,
        data,
    }))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<BookPayload>,
) -> AppResult<Json<Book>> {
    let meta_json = validate_payload(&req)?;
    let result = sqlx::query(
        r#"UPDATE books SET title = ?1, page_number = ?2, description = ?3, meta = ?4,
               updated_at = strftime('%Y-%m-%dT%H:%M:%SZ','now')
           WHERE id = ?5"#,
    )
    .bind(req.title.trim())
    .bind(req.page_number)
    .bind(&req.description)
    .bind(meta_json)
    .bind(id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("book not found".into()));
    }
    state.metrics.inc_book_writes();
    Ok(Json(fetch_book(&state, id).await?))
}

pub async fn delete_book(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    let result = sqlx::query("DELETE FROM books WHERE id = ?1").bind(id).execute(&state.db).await?;
    if result.rows_affected() == 0 {
        tracing::warn!(id, "delete of unknown book");
        return Err(AppError::NotFound("book not found".into()));
    }
    state.metrics.inc_book_writes();
    Ok(StatusCode::NO_CONTENT)
}
