use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE_URL: &str = "sqlite:./consultorio.db?mode=rwc";

/// Applies or reverts the clinic schema: `migration [up|down|fresh|status]`.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let command = std::env::args().nth(1);
    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let db = Database::connect(&url).await?;

    match command.as_deref().unwrap_or("up") {
        "up" => migration::Migrator::up(&db, None).await?,
        "down" => migration::Migrator::down(&db, Some(1)).await?,
        "fresh" => migration::Migrator::fresh(&db).await?,
        "status" => migration::Migrator::status(&db).await?,
        other => {
            eprintln!("unknown command {other:?}; expected one of up, down, fresh, status");
            std::process::exit(2);
        }
    }

    Ok(())
}
