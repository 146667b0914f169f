use std::collections::HashMap;

use chrono_tz::Tz;
use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseConnection, QueryFilter, QueryOrder, QuerySelect,
    prelude::*, sea_query::Expr,
};

use crate::{
    BalanceStatus, EngineError, Money, Package, PackageLedger, Payment, ResultEngine,
    SessionRecord, session_records,
};

mod clients;
mod dashboard;
mod packages;
mod payments;
mod sessions;
mod users;

pub use clients::ClientInput;
pub use packages::{PackageFilter, PackageInput, PackageUpdate};
pub use payments::{PaymentFilter, PaymentInput, PaymentUpdate};
pub use sessions::{SessionFilter, SessionInput, SessionUpdate};
pub use users::StaffRegistration;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Clinic timezone used when the builder does not receive one.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Mexico_City;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    timezone: Tz,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Timezone that defines "today" and "this month" for the dashboard.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

async fn require_client<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
) -> ResultEngine<crate::clients::Model> {
    crate::clients::Entity::find_by_id(client_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("cliente".to_string()))
}

async fn require_package<C: ConnectionTrait>(
    db: &C,
    package_id: Uuid,
) -> ResultEngine<crate::packages::Model> {
    crate::packages::Entity::find_by_id(package_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("paquete".to_string()))
}

/// Sum of the payments recorded against a package.
async fn paid_for_package<C: ConnectionTrait>(db: &C, package_id: &str) -> ResultEngine<Money> {
    let total: Option<Option<i64>> = crate::payments::Entity::find()
        .select_only()
        .column_as(crate::payments::Column::AmountMinor.sum(), "total")
        .filter(crate::payments::Column::PackageId.eq(package_id))
        .into_tuple()
        .one(db)
        .await?;
    Ok(Money::new(total.flatten().unwrap_or(0)))
}

/// Rewrites `balance_status` so it matches the current debt of the package.
async fn sync_balance_status<C: ConnectionTrait>(
    db: &C,
    package_id: Uuid,
) -> ResultEngine<Package> {
    let model = require_package(db, package_id).await?;
    let paid = paid_for_package(db, &model.id).await?;
    let debt = Money::new(model.total_price_minor) - paid;
    let balance_status = BalanceStatus::for_debt(debt);

    if model.balance_status == balance_status.as_str() {
        return Package::try_from(model);
    }

    let active = crate::packages::ActiveModel {
        id: ActiveValue::Set(model.id.clone()),
        balance_status: ActiveValue::Set(balance_status.as_str().to_string()),
        ..Default::default()
    };
    let updated = active.update(db).await?;
    Package::try_from(updated)
}

/// Points the client to `new_active`, but only if the pointer still holds
/// `expected`. Losing the race means another promotion committed first.
async fn swap_active_package<C: ConnectionTrait>(
    db: &C,
    client_id: &str,
    expected: Option<&str>,
    new_active: Option<&str>,
) -> ResultEngine<()> {
    let update = crate::clients::Entity::update_many()
        .col_expr(
            crate::clients::Column::ActivePackageId,
            Expr::value(new_active.map(ToString::to_string)),
        )
        .filter(crate::clients::Column::Id.eq(client_id));
    let update = match expected {
        Some(id) => update.filter(crate::clients::Column::ActivePackageId.eq(id)),
        None => update.filter(crate::clients::Column::ActivePackageId.is_null()),
    };

    let result = update.exec(db).await?;
    if result.rows_affected != 1 {
        tracing::warn!(client_id, "active package changed concurrently");
        return Err(EngineError::Conflict(
            "el paquete activo del cliente cambió, intenta de nuevo".to_string(),
        ));
    }
    Ok(())
}

/// Loads sessions and payments of the given packages and pairs them up.
async fn load_ledgers<C: ConnectionTrait>(
    db: &C,
    package_models: Vec<crate::packages::Model>,
) -> ResultEngine<Vec<PackageLedger>> {
    if package_models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<String> = package_models.iter().map(|m| m.id.clone()).collect();

    let mut sessions_by_package: HashMap<String, Vec<SessionRecord>> = HashMap::new();
    for model in session_records::Entity::find()
        .filter(session_records::Column::PackageId.is_in(ids.clone()))
        .order_by_asc(session_records::Column::SessionNumber)
        .all(db)
        .await?
    {
        let key = model.package_id.clone();
        sessions_by_package
            .entry(key)
            .or_default()
            .push(SessionRecord::try_from(model)?);
    }

    let mut payments_by_package: HashMap<String, Vec<Payment>> = HashMap::new();
    for model in crate::payments::Entity::find()
        .filter(crate::payments::Column::PackageId.is_in(ids))
        .order_by_asc(crate::payments::Column::PaymentDate)
        .all(db)
        .await?
    {
        let key = model.package_id.clone();
        payments_by_package
            .entry(key)
            .or_default()
            .push(Payment::try_from(model)?);
    }

    package_models
        .into_iter()
        .map(|model| {
            let sessions = sessions_by_package.remove(&model.id).unwrap_or_default();
            let payments = payments_by_package.remove(&model.id).unwrap_or_default();
            Ok(PackageLedger::new(Package::try_from(model)?, sessions, payments))
        })
        .collect()
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    timezone: Option<Tz>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Clinic timezone (defaults to [`DEFAULT_TIMEZONE`]).
    pub fn timezone(mut self, timezone: Tz) -> EngineBuilder {
        self.timezone = Some(timezone);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            timezone: self.timezone.unwrap_or(DEFAULT_TIMEZONE),
        })
    }
}
