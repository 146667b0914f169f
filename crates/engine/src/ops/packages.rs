use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*, sea_query::Expr,
};

use crate::{
    EngineError, Money, Package, PackageLedger, PackageStatus, PackageTier, ResultEngine,
    packages, payments, session_records,
};

use super::{
    Engine, load_ledgers, require_client, require_package, swap_active_package,
    sync_balance_status, with_tx,
};

/// A new package bought by a client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageInput {
    pub client_id: Uuid,
    pub tier: PackageTier,
    pub total_price: Money,
    pub start_date: DateTime<Utc>,
}

/// Editable fields of an existing package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageUpdate {
    pub tier: PackageTier,
    pub total_price: Money,
    pub status: PackageStatus,
    /// Keeps the stored start date when `None`.
    pub start_date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackageFilter {
    pub client_id: Option<Uuid>,
    /// Empty means any status.
    pub statuses: Vec<PackageStatus>,
}

fn validate_price(total_price: Money) -> ResultEngine<()> {
    if total_price.is_negative() {
        return Err(EngineError::Validation(
            "El precio no puede ser negativo".to_string(),
        ));
    }
    if !total_price.is_storable() {
        return Err(EngineError::Validation(format!(
            "El precio no puede exceder {}",
            Money::LIMIT
        )));
    }
    Ok(())
}

/// Stored spellings of a lifecycle status, legacy balance values included.
fn stored_statuses(status: PackageStatus) -> &'static [&'static str] {
    match status {
        PackageStatus::Activo => &["Activo", "Adeudo", "Pagado"],
        PackageStatus::Terminado => &["Terminado"],
    }
}

/// Marks every non-terminal package of the client as `Terminado`, except
/// `keep` when given. Returns how many packages were demoted.
async fn demote_in_progress<C: ConnectionTrait>(
    db: &C,
    client_id: &str,
    keep: Option<&str>,
) -> ResultEngine<u64> {
    let mut update = packages::Entity::update_many()
        .col_expr(
            packages::Column::Status,
            Expr::value(PackageStatus::Terminado.as_str()),
        )
        .filter(packages::Column::ClientId.eq(client_id))
        .filter(packages::Column::Status.ne(PackageStatus::Terminado.as_str()));
    if let Some(keep) = keep {
        update = update.filter(packages::Column::Id.ne(keep));
    }
    Ok(update.exec(db).await?.rows_affected)
}

impl Engine {
    /// Sells a package to a client.
    ///
    /// Every other in-progress package of the client is terminated and the
    /// client's active package pointer moves to the new one, all inside one
    /// transaction.
    pub async fn create_package(&self, input: PackageInput) -> ResultEngine<Package> {
        validate_price(input.total_price)?;

        with_tx!(self, |db_tx| {
            let client = require_client(&db_tx, input.client_id).await?;
            let demoted = demote_in_progress(&db_tx, &client.id, None).await?;

            let package = Package::new(
                input.client_id,
                input.tier,
                input.total_price,
                input.start_date,
            );
            packages::ActiveModel::from(&package).insert(&db_tx).await?;

            let new_active = package.id.to_string();
            swap_active_package(
                &db_tx,
                &client.id,
                client.active_package_id.as_deref(),
                Some(&new_active),
            )
            .await?;

            tracing::info!(
                package_id = %package.id,
                client_id = %input.client_id,
                tier = input.tier.as_str(),
                demoted,
                "package created"
            );
            Ok(package)
        })
    }

    /// Edits a package. Setting it back to `Activo` terminates the other
    /// in-progress packages of the client and points the client at it.
    pub async fn update_package(
        &self,
        package_id: Uuid,
        update: PackageUpdate,
    ) -> ResultEngine<Package> {
        validate_price(update.total_price)?;

        with_tx!(self, |db_tx| {
            let model = require_package(&db_tx, package_id).await?;
            let current = Package::try_from(model.clone())?;

            if update.tier != current.tier {
                let ceiling = update.tier.session_ceiling();
                let existing = session_records::Entity::find()
                    .filter(session_records::Column::PackageId.eq(model.id.clone()))
                    .count(&db_tx)
                    .await?;
                if existing > u64::from(ceiling) {
                    tracing::warn!(%package_id, existing, ceiling, "tier change below session count");
                    return Err(EngineError::Capacity { ceiling });
                }
            }

            let client = require_client(&db_tx, current.client_id).await?;
            let pointer = client.active_package_id.as_deref();
            match update.status {
                PackageStatus::Activo => {
                    demote_in_progress(&db_tx, &client.id, Some(&model.id)).await?;
                    swap_active_package(&db_tx, &client.id, pointer, Some(&model.id)).await?;
                }
                PackageStatus::Terminado => {
                    if pointer == Some(model.id.as_str()) {
                        swap_active_package(&db_tx, &client.id, pointer, None).await?;
                    }
                }
            }

            let mut active = packages::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                tier: ActiveValue::Set(update.tier.as_str().to_string()),
                total_price_minor: ActiveValue::Set(update.total_price.minor()),
                status: ActiveValue::Set(update.status.as_str().to_string()),
                ..Default::default()
            };
            if let Some(start_date) = update.start_date {
                active.start_date = ActiveValue::Set(start_date);
            }
            active.update(&db_tx).await?;

            let package = sync_balance_status(&db_tx, package_id).await?;
            tracing::info!(%package_id, status = package.status.as_str(), "package updated");
            Ok(package)
        })
    }

    /// Deletes a package together with its sessions and payments.
    pub async fn delete_package(&self, package_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_package(&db_tx, package_id).await?;
            let client_id = crate::util::parse_uuid(&model.client_id, "cliente")?;
            let client = require_client(&db_tx, client_id).await?;

            if client.active_package_id.as_deref() == Some(model.id.as_str()) {
                swap_active_package(&db_tx, &client.id, Some(&model.id), None).await?;
            }

            let sessions = session_records::Entity::delete_many()
                .filter(session_records::Column::PackageId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?
                .rows_affected;
            let payments = payments::Entity::delete_many()
                .filter(payments::Column::PackageId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?
                .rows_affected;
            packages::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;

            tracing::info!(%package_id, sessions, payments, "package deleted");
            Ok(())
        })
    }

    /// Return a package by id.
    pub async fn package(&self, package_id: Uuid) -> ResultEngine<Package> {
        let model = require_package(&self.database, package_id).await?;
        Package::try_from(model)
    }

    /// A package with its sessions and payments, ready for derivations.
    pub async fn package_ledger(&self, package_id: Uuid) -> ResultEngine<PackageLedger> {
        let model = require_package(&self.database, package_id).await?;
        load_ledgers(&self.database, vec![model])
            .await?
            .pop()
            .ok_or_else(|| EngineError::KeyNotFound("paquete".to_string()))
    }

    /// Packages matching `filter`, newest start date first.
    pub async fn find_packages(&self, filter: PackageFilter) -> ResultEngine<Vec<Package>> {
        let mut query = packages::Entity::find()
            .order_by_desc(packages::Column::StartDate)
            .order_by_desc(packages::Column::Id);
        if let Some(client_id) = filter.client_id {
            query = query.filter(packages::Column::ClientId.eq(client_id.to_string()));
        }
        if !filter.statuses.is_empty() {
            let stored: Vec<&str> = filter
                .statuses
                .iter()
                .flat_map(|status| stored_statuses(*status).iter().copied())
                .collect();
            query = query.filter(packages::Column::Status.is_in(stored));
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Package::try_from)
            .collect()
    }
}
