use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::screen::Screen;

type ScreenRow = (String, String);

fn row_to_screen(row: ScreenRow) -> Screen {
    Screen {
        id: row.0,
        created_at: row.1,
    }
}

pub async fn create_screen(pool: &SqlitePool, screen_id: &str) -> Result<Screen, AppError> {
    sqlx::query("INSERT INTO screens (id) VALUES (?)")
        .bind(screen_id)
        .execute(pool)
        .await?;

    get_screen(pool, screen_id).await
}

pub async fn get_screen(pool: &SqlitePool, screen_id: &str) -> Result<Screen, AppError> {
    sqlx::query_as::<_, ScreenRow>("SELECT id, created_at FROM screens WHERE id = ?")
        .bind(screen_id)
        .fetch_optional(pool)
        .await?
        .map(row_to_screen)
        .ok_or_else(|| AppError::NotFound("unknown_screen".to_string()))
}

pub async fn list_screens(pool: &SqlitePool) -> Result<Vec<Screen>, AppError> {
    let rows = sqlx::query_as::<_, ScreenRow>("SELECT id, created_at FROM screens ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(row_to_screen).collect())
}
