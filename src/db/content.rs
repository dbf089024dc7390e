use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::content::Content;

type ContentRow = (i64, String, String, String, String);

const SELECT_COLUMNS: &str = "SELECT id, screen_id, data, created_at, updated_at FROM content";

fn row_to_content(row: ContentRow) -> Content {
    Content {
        id: row.0,
        screen_id: row.1,
        data: row.2,
        created_at: row.3,
        updated_at: row.4,
    }
}

pub async fn get_content(pool: &SqlitePool, content_id: i64) -> Result<Content, AppError> {
    sqlx::query_as::<_, ContentRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
        .bind(content_id)
        .fetch_optional(pool)
        .await?
        .map(row_to_content)
        .ok_or_else(|| AppError::NotFound("unknown_content".to_string()))
}

pub async fn list_content(
    pool: &SqlitePool,
    screen_id: Option<&str>,
) -> Result<Vec<Content>, AppError> {
    let rows = match screen_id {
        Some(screen_id) => {
            sqlx::query_as::<_, ContentRow>(&format!(
                "{SELECT_COLUMNS} WHERE screen_id = ? ORDER BY id"
            ))
            .bind(screen_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, ContentRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows.into_iter().map(row_to_content).collect())
}

pub async fn create_content(
    pool: &SqlitePool,
    screen_id: &str,
    data: &str,
) -> Result<Content, AppError> {
    let id = sqlx::query("INSERT INTO content (screen_id, data) VALUES (?, ?)")
        .bind(screen_id)
        .bind(data)
        .execute(pool)
        .await?
        .last_insert_rowid();

    get_content(pool, id).await
}

pub async fn update_content(
    pool: &SqlitePool,
    content_id: i64,
    data: &str,
) -> Result<Content, AppError> {
    let result =
        sqlx::query("UPDATE content SET data = ?, updated_at = datetime('now') WHERE id = ?")
            .bind(data)
            .bind(content_id)
            .execute(pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("unknown_content".to_string()));
    }

    get_content(pool, content_id).await
}

/// Delete a row and return it as it was, so the caller knows which screen
/// it belonged to.
pub async fn delete_content(pool: &SqlitePool, content_id: i64) -> Result<Content, AppError> {
    let content = get_content(pool, content_id).await?;
    sqlx::query("DELETE FROM content WHERE id = ?")
        .bind(content_id)
        .execute(pool)
        .await?;
    Ok(content)
}
