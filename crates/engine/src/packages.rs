//! Package primitives.
//!
//! A `Package` is a bundle of sessions bought by one client. Its lifecycle is
//! stored in `status` ([`PackageStatus`]) while `balance_status`
//! ([`BalanceStatus`]) mirrors the sign of the debt and is rewritten by the
//! engine every time a payment, a session or the package itself changes.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, PackageTier, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageStatus {
    /// In progress. At most one package per client is in this state.
    Activo,
    /// Concluded, either explicitly or because a newer package superseded it.
    Terminado,
}

impl PackageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activo => "Activo",
            Self::Terminado => "Terminado",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminado)
    }
}

impl TryFrom<&str> for PackageStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            // Older rows stored the balance state in the lifecycle column.
            "Activo" | "Adeudo" | "Pagado" => Ok(Self::Activo),
            "Terminado" => Ok(Self::Terminado),
            other => Err(EngineError::Validation(format!(
                "estatus de paquete inválido: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStatus {
    Adeudo,
    Pagado,
    Credito,
}

impl BalanceStatus {
    pub fn for_debt(debt: Money) -> Self {
        if debt.is_positive() {
            Self::Adeudo
        } else if debt.is_negative() {
            Self::Credito
        } else {
            Self::Pagado
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Adeudo => "Adeudo",
            Self::Pagado => "Pagado",
            Self::Credito => "Credito",
        }
    }
}

impl TryFrom<&str> for BalanceStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Adeudo" => Ok(Self::Adeudo),
            "Pagado" => Ok(Self::Pagado),
            "Credito" => Ok(Self::Credito),
            other => Err(EngineError::Validation(format!(
                "estatus de saldo inválido: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: Uuid,
    pub client_id: Uuid,
    pub tier: PackageTier,
    pub total_price: Money,
    pub start_date: DateTime<Utc>,
    pub status: PackageStatus,
    pub balance_status: BalanceStatus,
    /// Highest session number handed out so far. Numbers are never reused.
    pub sessions_issued: u32,
}

impl Package {
    /// Builds a new in-progress package with nothing paid yet.
    pub fn new(
        client_id: Uuid,
        tier: PackageTier,
        total_price: Money,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            tier,
            total_price,
            start_date,
            status: PackageStatus::Activo,
            balance_status: BalanceStatus::for_debt(total_price),
            sessions_issued: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "packages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub client_id: String,
    pub tier: String,
    pub total_price_minor: i64,
    pub start_date: DateTimeUtc,
    pub status: String,
    pub balance_status: String,
    pub sessions_issued: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Client,
    #[sea_orm(has_many = "super::session_records::Entity")]
    Sessions,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::session_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Package> for ActiveModel {
    fn from(package: &Package) -> Self {
        Self {
            id: ActiveValue::Set(package.id.to_string()),
            client_id: ActiveValue::Set(package.client_id.to_string()),
            tier: ActiveValue::Set(package.tier.as_str().to_string()),
            total_price_minor: ActiveValue::Set(package.total_price.minor()),
            start_date: ActiveValue::Set(package.start_date),
            status: ActiveValue::Set(package.status.as_str().to_string()),
            balance_status: ActiveValue::Set(package.balance_status.as_str().to_string()),
            sessions_issued: ActiveValue::Set(
                i32::try_from(package.sessions_issued).unwrap_or(i32::MAX),
            ),
        }
    }
}

impl TryFrom<Model> for Package {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "paquete")?,
            client_id: parse_uuid(&model.client_id, "cliente")?,
            tier: PackageTier::try_from(model.tier.as_str())?,
            total_price: Money::new(model.total_price_minor),
            start_date: model.start_date,
            status: PackageStatus::try_from(model.status.as_str())?,
            balance_status: BalanceStatus::try_from(model.balance_status.as_str())?,
            sessions_issued: u32::try_from(model.sessions_issued).unwrap_or(0),
        })
    }
}
