use sqlx::{postgres::PgPoolOptions, PgPool};

pub type Database = PgPool;

pub async fn create_database_connection(database_url: &str, max_connections: u32) -> Result<Database, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    tracing::info!("✅ Database connected successfully");
    Ok(pool)
}

pub async fn run_migrations(pool: &Database) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("✅ Migrations executed successfully");
    Ok(())
}
