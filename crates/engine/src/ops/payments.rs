use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, Select,
    TransactionTrait, prelude::*,
};

use crate::{
    EngineError, Money, Payment, PaymentMethod, ResultEngine, packages, payments,
    util::{normalize_optional_text, parse_uuid},
};

use super::{Engine, require_package, sync_balance_status, with_tx};

/// Smallest amount accepted for a single payment.
const MIN_PAYMENT: Money = Money::from_major(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentInput {
    pub package_id: Uuid,
    pub amount: Money,
    pub payment_date: DateTime<Utc>,
    pub method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentUpdate {
    pub amount: Money,
    pub payment_date: DateTime<Utc>,
    pub method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    pub package_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    /// Inclusive lower bound on `payment_date`.
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `payment_date`.
    pub date_to: Option<DateTime<Utc>>,
}

impl PaymentFilter {
    fn query(&self) -> Select<payments::Entity> {
        let mut query = payments::Entity::find();
        if let Some(package_id) = self.package_id {
            query = query.filter(payments::Column::PackageId.eq(package_id.to_string()));
        }
        if let Some(client_id) = self.client_id {
            let owned = packages::Entity::find()
                .select_only()
                .column(packages::Column::Id)
                .filter(packages::Column::ClientId.eq(client_id.to_string()))
                .into_query();
            query = query.filter(payments::Column::PackageId.in_subquery(owned));
        }
        if let Some(from) = self.date_from {
            query = query.filter(payments::Column::PaymentDate.gte(from));
        }
        if let Some(to) = self.date_to {
            query = query.filter(payments::Column::PaymentDate.lte(to));
        }
        query
    }
}

fn validate_amount(amount: Money) -> ResultEngine<()> {
    if amount < MIN_PAYMENT {
        return Err(EngineError::Validation(
            "El monto debe ser al menos $1.00".to_string(),
        ));
    }
    if !amount.is_storable() {
        return Err(EngineError::Validation(format!(
            "El monto no puede exceder {}",
            Money::LIMIT
        )));
    }
    Ok(())
}

impl Engine {
    /// Records a payment and refreshes the balance state of its package.
    ///
    /// Paying more than the package costs is accepted; the package then
    /// shows a credit.
    pub async fn create_payment(&self, input: PaymentInput) -> ResultEngine<Payment> {
        validate_amount(input.amount)?;

        with_tx!(self, |db_tx| {
            require_package(&db_tx, input.package_id).await?;

            let payment = Payment {
                id: Uuid::new_v4(),
                package_id: input.package_id,
                amount: input.amount,
                payment_date: input.payment_date,
                method: input.method,
                notes: normalize_optional_text(input.notes.as_deref()),
            };
            payments::ActiveModel::from(&payment).insert(&db_tx).await?;
            let package = sync_balance_status(&db_tx, input.package_id).await?;

            tracing::info!(
                payment_id = %payment.id,
                package_id = %payment.package_id,
                amount = %payment.amount,
                balance = package.balance_status.as_str(),
                "payment created"
            );
            Ok(payment)
        })
    }

    pub async fn update_payment(
        &self,
        payment_id: Uuid,
        update: PaymentUpdate,
    ) -> ResultEngine<Payment> {
        validate_amount(update.amount)?;

        with_tx!(self, |db_tx| {
            let existing = require_payment(&db_tx, payment_id).await?;
            let package_id = parse_uuid(&existing.package_id, "package")?;

            let updated = payments::ActiveModel {
                id: ActiveValue::Set(existing.id),
                amount_minor: ActiveValue::Set(update.amount.minor()),
                payment_date: ActiveValue::Set(update.payment_date),
                method: ActiveValue::Set(update.method.as_str().to_string()),
                notes: ActiveValue::Set(normalize_optional_text(update.notes.as_deref())),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            sync_balance_status(&db_tx, package_id).await?;

            tracing::info!(%payment_id, amount = %update.amount, "payment updated");
            Payment::try_from(updated)
        })
    }

    pub async fn delete_payment(&self, payment_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let existing = require_payment(&db_tx, payment_id).await?;
            let package_id = parse_uuid(&existing.package_id, "package")?;

            payments::Entity::delete_by_id(existing.id)
                .exec(&db_tx)
                .await?;
            sync_balance_status(&db_tx, package_id).await?;

            tracing::info!(%payment_id, %package_id, "payment deleted");
            Ok(())
        })
    }

    /// Return a payment by id.
    pub async fn payment(&self, payment_id: Uuid) -> ResultEngine<Payment> {
        let model = require_payment(&self.database, payment_id).await?;
        Payment::try_from(model)
    }

    /// Payments matching `filter`, most recent first.
    pub async fn find_payments(&self, filter: PaymentFilter) -> ResultEngine<Vec<Payment>> {
        filter
            .query()
            .order_by_desc(payments::Column::PaymentDate)
            .order_by_desc(payments::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Payment::try_from)
            .collect()
    }

    /// Total amount of the payments matching `filter`.
    pub async fn sum_payments(&self, filter: PaymentFilter) -> ResultEngine<Money> {
        let total: Option<Option<i64>> = filter
            .query()
            .select_only()
            .column_as(payments::Column::AmountMinor.sum(), "total")
            .into_tuple()
            .one(&self.database)
            .await?;
        Ok(Money::new(total.flatten().unwrap_or(0)))
    }
}

async fn require_payment<C: ConnectionTrait>(
    db: &C,
    payment_id: Uuid,
) -> ResultEngine<payments::Model> {
    payments::Entity::find_by_id(payment_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("pago".to_string()))
}
