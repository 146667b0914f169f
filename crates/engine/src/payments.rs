//! Payments made against a package.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Efectivo,
    Otro,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Efectivo => "Efectivo",
            Self::Otro => "Otro",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Efectivo" => Ok(Self::Efectivo),
            "Otro" => Ok(Self::Otro),
            other => Err(EngineError::Validation(format!(
                "método de pago inválido: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub package_id: Uuid,
    pub amount: Money,
    pub payment_date: DateTime<Utc>,
    pub method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub package_id: String,
    pub amount_minor: i64,
    pub payment_date: DateTimeUtc,
    pub method: String,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::packages::Entity",
        from = "Column::PackageId",
        to = "super::packages::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Package,
}

impl Related<super::packages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Package.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Payment> for ActiveModel {
    fn from(payment: &Payment) -> Self {
        Self {
            id: ActiveValue::Set(payment.id.to_string()),
            package_id: ActiveValue::Set(payment.package_id.to_string()),
            amount_minor: ActiveValue::Set(payment.amount.minor()),
            payment_date: ActiveValue::Set(payment.payment_date),
            method: ActiveValue::Set(payment.method.as_str().to_string()),
            notes: ActiveValue::Set(payment.notes.clone()),
        }
    }
}

impl TryFrom<Model> for Payment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "pago")?,
            package_id: parse_uuid(&model.package_id, "paquete")?,
            amount: Money::new(model.amount_minor),
            payment_date: model.payment_date,
            method: PaymentMethod::try_from(model.method.as_str())?,
            notes: model.notes,
        })
    }
}
