#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    Client, ClientInput, Engine, EngineError, Money, Package, PackageInput, PackageTier, Payment,
    PaymentInput, PaymentMethod, SessionInput, SessionRecord, SessionStatus,
};
use migration::MigratorTrait;
use uuid::Uuid;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .timezone(chrono_tz::America::Mexico_City)
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn engine() -> Engine {
    engine_with_db().await.0
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn client_input(name: &str) -> ClientInput {
    ClientInput {
        name: name.to_string(),
        age: 34,
        pathology: "Lumbalgia crónica".to_string(),
        email: Some("maria@email.com".to_string()),
        phone: Some("555-123-4567".to_string()),
        notes: None,
    }
}

pub async fn new_client(engine: &Engine, name: &str) -> Client {
    engine.create_client(client_input(name)).await.unwrap()
}

pub async fn sell(
    engine: &Engine,
    client_id: Uuid,
    tier: PackageTier,
    price: i64,
    start: DateTime<Utc>,
) -> Package {
    engine
        .create_package(PackageInput {
            client_id,
            tier,
            total_price: Money::from_major(price),
            start_date: start,
        })
        .await
        .unwrap()
}

pub async fn pay(engine: &Engine, package_id: Uuid, amount: i64, date: DateTime<Utc>) -> Payment {
    engine
        .create_payment(PaymentInput {
            package_id,
            amount: Money::from_major(amount),
            payment_date: date,
            method: PaymentMethod::Efectivo,
            notes: None,
        })
        .await
        .unwrap()
}

pub async fn log_session(
    engine: &Engine,
    package_id: Uuid,
    status: SessionStatus,
    date: Option<DateTime<Utc>>,
) -> Result<SessionRecord, EngineError> {
    engine
        .create_session(SessionInput {
            package_id,
            session_date: date,
            status,
            notes: None,
        })
        .await
}
