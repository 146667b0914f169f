mod common;

use common::{client_input, engine, engine_with_db, log_session, new_client, pay, sell, utc};
use engine::{ClientStatus, EngineError, Money, PackageTier, SessionStatus};
use sea_orm::{ConnectionTrait, Statement};

#[tokio::test]
async fn new_clients_start_active() {
    let engine = engine().await;
    let client = new_client(&engine, "María López").await;
    assert_eq!(client.status, ClientStatus::Activo);
    assert_eq!(client.active_package_id, None);
    assert_eq!(engine.client(client.id).await.unwrap(), client);
}

#[tokio::test]
async fn invalid_input_is_rejected() {
    let engine = engine().await;

    let mut input = client_input("María López");
    input.age = 0;
    assert!(matches!(
        engine.create_client(input).await,
        Err(EngineError::Validation(_))
    ));

    let mut input = client_input("María López");
    input.email = Some("maria.email.com".to_string());
    assert!(matches!(
        engine.create_client(input).await,
        Err(EngineError::Validation(_))
    ));

    assert!(engine.list_clients(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn out_of_range_age_is_rejected_instead_of_clamped() {
    let engine = engine().await;

    let mut input = client_input("María López");
    input.age = 3_000_000_000;
    assert_eq!(
        engine.create_client(input).await.err(),
        Some(EngineError::Validation(
            "La edad no puede ser mayor a 120".to_string()
        ))
    );
    assert!(engine.list_clients(None).await.unwrap().is_empty());

    let client = new_client(&engine, "María López").await;
    let mut input = client_input("María López");
    input.age = 121;
    assert!(matches!(
        engine
            .update_client(client.id, input, ClientStatus::Activo)
            .await,
        Err(EngineError::Validation(_))
    ));
    assert_eq!(engine.client(client.id).await.unwrap().age, 34);
}

#[tokio::test]
async fn update_is_idempotent() {
    let engine = engine().await;
    let client = new_client(&engine, "María López").await;
    let package = sell(&engine, client.id, PackageTier::S5, 1250, utc(2026, 3, 1, 9, 0)).await;

    let mut input = client_input("María López García");
    input.notes = Some("Prefiere horario vespertino".to_string());

    let first = engine
        .update_client(client.id, input.clone(), ClientStatus::Inactivo)
        .await
        .unwrap();
    let second = engine
        .update_client(client.id, input, ClientStatus::Inactivo)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(second.name, "María López García");
    assert_eq!(second.status, ClientStatus::Inactivo);
    assert_eq!(second.active_package_id, Some(package.id));
    assert_eq!(second.created_at, client.created_at);
    assert_eq!(engine.list_clients(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_of_unknown_client_is_not_found() {
    let engine = engine().await;
    let err = engine
        .update_client(
            uuid::Uuid::new_v4(),
            client_input("Nadie"),
            ClientStatus::Activo,
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("cliente".to_string()));
}

#[tokio::test]
async fn list_filters_by_status() {
    let engine = engine().await;
    let maria = new_client(&engine, "María López").await;
    let carlos = new_client(&engine, "Carlos Ruiz").await;
    engine
        .update_client(carlos.id, client_input("Carlos Ruiz"), ClientStatus::Inactivo)
        .await
        .unwrap();

    let active = engine.list_clients(Some(ClientStatus::Activo)).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, maria.id);
    assert_eq!(engine.list_clients(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn deleting_a_client_removes_everything_it_owns() {
    let (engine, db) = engine_with_db().await;
    let client = new_client(&engine, "María López").await;
    let other = new_client(&engine, "Carlos Ruiz").await;

    let p1 = sell(&engine, client.id, PackageTier::S5, 1250, utc(2026, 1, 1, 9, 0)).await;
    let p2 = sell(&engine, client.id, PackageTier::S5, 1250, utc(2026, 2, 1, 9, 0)).await;
    let kept = sell(&engine, other.id, PackageTier::S1, 350, utc(2026, 2, 1, 9, 0)).await;
    for package in [p1.id, p2.id, kept.id] {
        pay(&engine, package, 100, utc(2026, 2, 2, 9, 0)).await;
        log_session(&engine, package, SessionStatus::Completada, None)
            .await
            .unwrap();
    }

    engine.delete_client(client.id).await.unwrap();

    let backend = db.get_database_backend();
    for table in ["packages", "session_records", "payments"] {
        let row = db
            .query_one(Statement::from_string(
                backend,
                format!("SELECT COUNT(*) AS n FROM {table}"),
            ))
            .await
            .unwrap()
            .unwrap();
        let n: i64 = row.try_get("", "n").unwrap();
        assert_eq!(n, 1, "{table} should only keep the other client's row");
    }
    assert!(engine.client(client.id).await.is_err());
    assert_eq!(
        engine.package_ledger(kept.id).await.unwrap().paid(),
        Money::from_major(100)
    );
}

#[tokio::test]
async fn detail_of_client_without_packages_uses_defaults() {
    let engine = engine().await;
    let client = new_client(&engine, "Ana Martínez").await;

    let detail = engine.client_detail(client.id).await.unwrap();
    assert_eq!(detail.total_debt, Money::ZERO);
    assert!(detail.active_package.is_none());
    assert!(detail.next_session.is_none());
    assert!(engine.client_packages(client.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn detail_and_histories_follow_the_active_package() {
    let engine = engine().await;
    let client = new_client(&engine, "María López").await;

    let old = sell(&engine, client.id, PackageTier::S1, 350, utc(2026, 1, 1, 9, 0)).await;
    pay(&engine, old.id, 350, utc(2026, 1, 1, 10, 0)).await;
    log_session(&engine, old.id, SessionStatus::Completada, Some(utc(2026, 1, 2, 16, 0)))
        .await
        .unwrap();

    let current = sell(&engine, client.id, PackageTier::S5, 1250, utc(2026, 3, 1, 9, 0)).await;
    pay(&engine, current.id, 1000, utc(2026, 3, 1, 10, 0)).await;
    log_session(&engine, current.id, SessionStatus::Completada, Some(utc(2026, 3, 2, 16, 0)))
        .await
        .unwrap();
    log_session(&engine, current.id, SessionStatus::Pendiente, Some(utc(2026, 3, 16, 16, 0)))
        .await
        .unwrap();
    let next = log_session(
        &engine,
        current.id,
        SessionStatus::Pendiente,
        Some(utc(2026, 3, 9, 16, 0)),
    )
    .await
    .unwrap();

    let detail = engine.client_detail(client.id).await.unwrap();
    assert_eq!(detail.total_debt, Money::from_major(250));
    let active = detail.active_package.unwrap();
    assert_eq!(active.id, current.id);
    assert_eq!(active.sessions_total, 5);
    assert_eq!(active.sessions_remaining, 4);
    assert_eq!(detail.next_session.as_ref().map(|s| s.id), Some(next.id));
    assert_eq!(
        engine.next_session(client.id).await.unwrap().map(|s| s.id),
        Some(next.id)
    );

    let packages = engine.client_packages(client.id).await.unwrap();
    assert_eq!(
        packages.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![current.id, old.id]
    );
    assert_eq!(packages[1].badge.label(), "Concluido");

    let payments = engine.client_payments(client.id).await.unwrap();
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0].package_tier, PackageTier::S5);

    let sessions = engine.client_sessions(client.id).await.unwrap();
    let numbers: Vec<u32> = sessions.iter().map(|s| s.session.session_number).collect();
    assert_eq!(numbers, vec![3, 2, 1, 1]);
}
