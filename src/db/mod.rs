use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

// ============================================================================
// Database - pool construction and schema bootstrap
// ============================================================================

pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    tracing::info!(max_connections = max_connections, "Connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    tracing::info!("Successfully connected to PostgreSQL");
    Ok(pool)
}

const SCHEMA: &[(&str, &str)] = &[
    (
        "categories",
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            category_id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    ),
    (
        "genres",
        r#"
        CREATE TABLE IF NOT EXISTS genres (
            genre_id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    ),
    (
        "category_genre",
        r#"
        CREATE TABLE IF NOT EXISTS category_genre (
            genre_id UUID NOT NULL REFERENCES genres(genre_id) ON DELETE CASCADE,
            category_id UUID NOT NULL REFERENCES categories(category_id) ON DELETE CASCADE,
            PRIMARY KEY (genre_id, category_id)
        )
        "#,
    ),
    (
        "idx_category_genre_category_id",
        "CREATE INDEX IF NOT EXISTS idx_category_genre_category_id ON category_genre(category_id)",
    ),
];

/// Idempotent: every statement is `IF NOT EXISTS`.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Ensuring database schema");

    for (name, statement) in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
        tracing::debug!(object = name, "Schema object ready");
    }

    Ok(())
}
