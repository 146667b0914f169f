use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    QueryTrait, Select, TransactionTrait, prelude::*,
};

use crate::{
    EngineError, Package, ResultEngine, SessionRecord, SessionStatus, packages, session_records,
    util::{normalize_optional_text, parse_uuid},
};

use super::{Engine, require_package, sync_balance_status, with_tx};

/// Attendance logged by staff. The session number is assigned by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionInput {
    pub package_id: Uuid,
    pub session_date: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUpdate {
    pub session_date: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionFilter {
    pub package_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub statuses: Vec<SessionStatus>,
    /// Inclusive lower bound on `session_date`.
    pub date_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `session_date`.
    pub date_to: Option<DateTime<Utc>>,
}

impl SessionFilter {
    fn query(&self) -> Select<session_records::Entity> {
        let mut query = session_records::Entity::find();
        if let Some(package_id) = self.package_id {
            query = query.filter(session_records::Column::PackageId.eq(package_id.to_string()));
        }
        if let Some(client_id) = self.client_id {
            let owned = packages::Entity::find()
                .select_only()
                .column(packages::Column::Id)
                .filter(packages::Column::ClientId.eq(client_id.to_string()))
                .into_query();
            query = query.filter(session_records::Column::PackageId.in_subquery(owned));
        }
        if !self.statuses.is_empty() {
            query = query.filter(
                session_records::Column::Status
                    .is_in(self.statuses.iter().map(|status| status.as_str())),
            );
        }
        if let Some(from) = self.date_from {
            query = query.filter(session_records::Column::SessionDate.gte(from));
        }
        if let Some(to) = self.date_to {
            query = query.filter(session_records::Column::SessionDate.lt(to));
        }
        query
    }
}

impl Engine {
    /// Logs a session in a package.
    ///
    /// Fails with [`EngineError::Capacity`] once the package holds as many
    /// sessions as its tier allows. The number handed out is one past the
    /// highest ever issued for the package, so numbers freed by deletions are
    /// never reused.
    pub async fn create_session(&self, input: SessionInput) -> ResultEngine<SessionRecord> {
        with_tx!(self, |db_tx| {
            let model = require_package(&db_tx, input.package_id).await?;
            let package = Package::try_from(model.clone())?;

            let ceiling = package.tier.session_ceiling();
            let existing = session_records::Entity::find()
                .filter(session_records::Column::PackageId.eq(model.id.clone()))
                .count(&db_tx)
                .await?;
            if existing >= u64::from(ceiling) {
                tracing::warn!(package_id = %package.id, ceiling, "session ceiling reached");
                return Err(EngineError::Capacity { ceiling });
            }

            let highest: Option<Option<i32>> = session_records::Entity::find()
                .select_only()
                .column_as(session_records::Column::SessionNumber.max(), "highest")
                .filter(session_records::Column::PackageId.eq(model.id.clone()))
                .into_tuple()
                .one(&db_tx)
                .await?;
            let highest = u32::try_from(highest.flatten().unwrap_or(0)).unwrap_or(0);
            let session_number = package.sessions_issued.max(highest) + 1;

            let session = SessionRecord {
                id: Uuid::new_v4(),
                package_id: package.id,
                session_number,
                session_date: input.session_date,
                status: input.status,
                notes: normalize_optional_text(input.notes.as_deref()),
            };
            session_records::ActiveModel::from(&session)
                .insert(&db_tx)
                .await?;

            packages::ActiveModel {
                id: ActiveValue::Set(model.id),
                sessions_issued: ActiveValue::Set(
                    i32::try_from(session_number).unwrap_or(i32::MAX),
                ),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            sync_balance_status(&db_tx, package.id).await?;

            tracing::info!(
                session_id = %session.id,
                package_id = %package.id,
                session_number,
                "session created"
            );
            Ok(session)
        })
    }

    /// Overwrites date, status and notes. The session number never changes.
    pub async fn update_session(
        &self,
        session_id: Uuid,
        update: SessionUpdate,
    ) -> ResultEngine<SessionRecord> {
        with_tx!(self, |db_tx| {
            let existing = require_session(&db_tx, session_id).await?;
            let package_id = parse_uuid(&existing.package_id, "package")?;

            let updated = session_records::ActiveModel {
                id: ActiveValue::Set(existing.id),
                session_date: ActiveValue::Set(update.session_date),
                status: ActiveValue::Set(update.status.as_str().to_string()),
                notes: ActiveValue::Set(normalize_optional_text(update.notes.as_deref())),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            sync_balance_status(&db_tx, package_id).await?;

            tracing::info!(%session_id, status = update.status.as_str(), "session updated");
            SessionRecord::try_from(updated)
        })
    }

    /// Removes a session. Remaining sessions keep their numbers.
    pub async fn delete_session(&self, session_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let existing = require_session(&db_tx, session_id).await?;
            let package_id = parse_uuid(&existing.package_id, "package")?;

            session_records::Entity::delete_by_id(existing.id)
                .exec(&db_tx)
                .await?;
            sync_balance_status(&db_tx, package_id).await?;

            tracing::info!(%session_id, %package_id, "session deleted");
            Ok(())
        })
    }

    /// Return a session by id.
    pub async fn session(&self, session_id: Uuid) -> ResultEngine<SessionRecord> {
        let model = require_session(&self.database, session_id).await?;
        SessionRecord::try_from(model)
    }

    /// Sessions matching `filter`, ordered by package then session number.
    pub async fn find_sessions(&self, filter: SessionFilter) -> ResultEngine<Vec<SessionRecord>> {
        filter
            .query()
            .order_by_asc(session_records::Column::PackageId)
            .order_by_asc(session_records::Column::SessionNumber)
            .all(&self.database)
            .await?
            .into_iter()
            .map(SessionRecord::try_from)
            .collect()
    }

    pub async fn count_sessions(&self, filter: SessionFilter) -> ResultEngine<u64> {
        Ok(filter.query().count(&self.database).await?)
    }
}

async fn require_session<C: ConnectionTrait>(
    db: &C,
    session_id: Uuid,
) -> ResultEngine<session_records::Model> {
    session_records::Entity::find_by_id(session_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("sesión".to_string()))
}
