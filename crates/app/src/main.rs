use chrono_tz::Tz;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "consultorio={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let Some(server) = settings.server else {
        tracing::warn!("no [server] section configured, nothing to run");
        return Ok(());
    };

    let timezone = match settings.clinic.timezone.as_deref() {
        Some(name) => name
            .parse::<Tz>()
            .map_err(|err| format!("invalid clinic timezone {name:?}: {err}"))?,
        None => engine::DEFAULT_TIMEZONE,
    };

    let db = parse_database(&server.database).await?;
    let engine = engine::Engine::builder()
        .database(db)
        .timezone(timezone)
        .build()
        .await?;
    tracing::info!("using clinic timezone {}", engine.timezone());

    let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
