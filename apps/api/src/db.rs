use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Idempotent schema bootstrap, one statement per entry.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS resumes (
        id UUID PRIMARY KEY,
        owner_id UUID,
        filename TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS parsed_resumes (
        resume_id UUID PRIMARY KEY REFERENCES resumes(id) ON DELETE CASCADE,
        text TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS resume_profiles (
        resume_id UUID PRIMARY KEY REFERENCES resumes(id) ON DELETE CASCADE,
        status TEXT NOT NULL,
        model TEXT NOT NULL,
        error TEXT NOT NULL,
        profile JSONB NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vacancies (
        id UUID PRIMARY KEY,
        owner_id UUID,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vacancy_skills (
        vacancy_id UUID NOT NULL REFERENCES vacancies(id) ON DELETE CASCADE,
        position INTEGER NOT NULL,
        skill_key TEXT NOT NULL,
        skill TEXT NOT NULL,
        weight DOUBLE PRECISION NOT NULL CHECK (weight >= 0 AND weight <= 1),
        PRIMARY KEY (vacancy_id, skill_key)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS analyses (
        id UUID PRIMARY KEY,
        resume_id UUID NOT NULL REFERENCES resumes(id) ON DELETE CASCADE,
        vacancy_id UUID NOT NULL REFERENCES vacancies(id) ON DELETE CASCADE,
        score DOUBLE PRECISION NOT NULL,
        model TEXT NOT NULL,
        report JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_analyses_vacancy ON analyses(vacancy_id, created_at DESC)",
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates any missing tables. Safe to run on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema verified ({} statements)", SCHEMA.len());
    Ok(())
}
