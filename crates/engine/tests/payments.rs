mod common;

use common::{engine, new_client, pay, sell, utc};
use engine::{
    BalanceStatus, EngineError, Money, PackageBadge, PackageTier, PaymentFilter, PaymentInput,
    PaymentMethod, PaymentUpdate,
};

#[tokio::test]
async fn partial_payment_leaves_debt() {
    let engine = engine().await;
    let client = new_client(&engine, "María López").await;
    let package = sell(&engine, client.id, PackageTier::S5, 1250, utc(2026, 3, 1, 9, 0)).await;
    pay(&engine, package.id, 1000, utc(2026, 3, 1, 10, 0)).await;

    let ledger = engine.package_ledger(package.id).await.unwrap();
    assert_eq!(ledger.debt(), Money::from_major(250));
    assert_eq!(ledger.badge(), PackageBadge::ActivoAdeudo);
    assert_eq!(ledger.badge().label(), "Activo/Adeudo");
    assert_eq!(ledger.package.balance_status, BalanceStatus::Adeudo);

    pay(&engine, package.id, 250, utc(2026, 3, 8, 10, 0)).await;
    let ledger = engine.package_ledger(package.id).await.unwrap();
    assert_eq!(ledger.debt(), Money::ZERO);
    assert_eq!(ledger.badge().label(), "Activo/Pagado");
    assert_eq!(ledger.package.balance_status, BalanceStatus::Pagado);
}

#[tokio::test]
async fn overpayment_shows_credit() {
    let engine = engine().await;
    let client = new_client(&engine, "Carlos Ruiz").await;
    let package = sell(&engine, client.id, PackageTier::S1, 350, utc(2026, 3, 1, 9, 0)).await;
    pay(&engine, package.id, 400, utc(2026, 3, 1, 10, 0)).await;

    let ledger = engine.package_ledger(package.id).await.unwrap();
    assert_eq!(ledger.debt(), Money::from_major(-50));
    assert_eq!(ledger.badge(), PackageBadge::ActivoCredito);
    assert_eq!(ledger.package.balance_status, BalanceStatus::Credito);
}

#[tokio::test]
async fn edits_and_deletes_refresh_balance() {
    let engine = engine().await;
    let client = new_client(&engine, "Ana Martínez").await;
    let package = sell(&engine, client.id, PackageTier::S5, 1250, utc(2026, 3, 1, 9, 0)).await;
    let payment = pay(&engine, package.id, 1250, utc(2026, 3, 1, 10, 0)).await;
    assert_eq!(
        engine.package(package.id).await.unwrap().balance_status,
        BalanceStatus::Pagado
    );

    let updated = engine
        .update_payment(
            payment.id,
            PaymentUpdate {
                amount: Money::from_major(1000),
                payment_date: utc(2026, 3, 2, 10, 0),
                method: PaymentMethod::Otro,
                notes: Some("Transferencia".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.method, PaymentMethod::Otro);
    assert_eq!(
        engine.package(package.id).await.unwrap().balance_status,
        BalanceStatus::Adeudo
    );

    engine.delete_payment(payment.id).await.unwrap();
    let ledger = engine.package_ledger(package.id).await.unwrap();
    assert!(ledger.payments.is_empty());
    assert_eq!(ledger.debt(), Money::from_major(1250));
}

#[tokio::test]
async fn payments_below_one_peso_are_rejected() {
    let engine = engine().await;
    let client = new_client(&engine, "Luis Hernández").await;
    let package = sell(&engine, client.id, PackageTier::S1, 350, utc(2026, 3, 1, 9, 0)).await;

    let err = engine
        .create_payment(PaymentInput {
            package_id: package.id,
            amount: Money::new(50),
            payment_date: utc(2026, 3, 1, 10, 0),
            method: PaymentMethod::Efectivo,
            notes: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert!(engine.package_ledger(package.id).await.unwrap().payments.is_empty());
}

#[tokio::test]
async fn oversized_amounts_are_rejected_and_totals_stay_summable() {
    let engine = engine().await;
    let client = new_client(&engine, "Luis Hernández").await;
    let first = sell(&engine, client.id, PackageTier::S1, 350, utc(2026, 3, 1, 9, 0)).await;
    let other = new_client(&engine, "Ana Martínez").await;
    let second = sell(&engine, other.id, PackageTier::S1, 350, utc(2026, 3, 1, 9, 0)).await;

    let payment = |package_id, amount| PaymentInput {
        package_id,
        amount,
        payment_date: utc(2026, 3, 1, 10, 0),
        method: PaymentMethod::Efectivo,
        notes: None,
    };

    for package_id in [first.id, second.id] {
        let err = engine
            .create_payment(payment(package_id, Money::new(i64::MAX / 2 + 10)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation("El monto no puede exceder $10000000.00".to_string())
        );
    }

    let kept = engine
        .create_payment(payment(first.id, Money::LIMIT))
        .await
        .unwrap();
    engine
        .create_payment(payment(second.id, Money::LIMIT))
        .await
        .unwrap();

    let err = engine
        .update_payment(
            kept.id,
            PaymentUpdate {
                amount: Money::LIMIT + Money::new(1),
                payment_date: kept.payment_date,
                method: kept.method,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let total = engine.sum_payments(PaymentFilter::default()).await.unwrap();
    assert_eq!(total, Money::LIMIT + Money::LIMIT);
    assert!(engine.dashboard_stats().await.is_ok());
}

#[tokio::test]
async fn sum_and_listing_by_client() {
    let engine = engine().await;
    let maria = new_client(&engine, "María López").await;
    let carlos = new_client(&engine, "Carlos Ruiz").await;
    let p1 = sell(&engine, maria.id, PackageTier::S5, 1250, utc(2026, 1, 1, 9, 0)).await;
    let p2 = sell(&engine, maria.id, PackageTier::S10, 2500, utc(2026, 2, 1, 9, 0)).await;
    let p3 = sell(&engine, carlos.id, PackageTier::S1, 350, utc(2026, 2, 1, 9, 0)).await;
    pay(&engine, p1.id, 1250, utc(2026, 1, 2, 9, 0)).await;
    pay(&engine, p2.id, 1000, utc(2026, 2, 2, 9, 0)).await;
    pay(&engine, p3.id, 350, utc(2026, 2, 3, 9, 0)).await;

    let maria_filter = PaymentFilter {
        client_id: Some(maria.id),
        ..Default::default()
    };
    let listed = engine.find_payments(maria_filter.clone()).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].package_id, p2.id);
    assert_eq!(
        engine.sum_payments(maria_filter).await.unwrap(),
        Money::from_major(2250)
    );

    let february = engine
        .sum_payments(PaymentFilter {
            date_from: Some(utc(2026, 2, 1, 0, 0)),
            date_to: Some(utc(2026, 2, 28, 23, 59)),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(february, Money::from_major(1350));
}
