//! The module contains the `Client` record and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientStatus {
    Activo,
    Inactivo,
}

impl ClientStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activo => "Activo",
            Self::Inactivo => "Inactivo",
        }
    }
}

impl TryFrom<&str> for ClientStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Activo" => Ok(Self::Activo),
            "Inactivo" => Ok(Self::Inactivo),
            other => Err(EngineError::Validation(format!(
                "estatus de cliente inválido: {other}"
            ))),
        }
    }
}

/// A client of the clinic.
///
/// `active_package_id` points to the only package of the client that is not
/// terminated, if any.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub age: u16,
    pub pathology: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub status: ClientStatus,
    pub active_package_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub age: i32,
    pub pathology: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub active_package_id: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::packages::Entity")]
    Packages,
}

impl Related<super::packages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Packages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Client> for ActiveModel {
    fn from(client: &Client) -> Self {
        Self {
            id: ActiveValue::Set(client.id.to_string()),
            name: ActiveValue::Set(client.name.clone()),
            age: ActiveValue::Set(i32::from(client.age)),
            pathology: ActiveValue::Set(client.pathology.clone()),
            email: ActiveValue::Set(client.email.clone()),
            phone: ActiveValue::Set(client.phone.clone()),
            notes: ActiveValue::Set(client.notes.clone()),
            status: ActiveValue::Set(client.status.as_str().to_string()),
            active_package_id: ActiveValue::Set(client.active_package_id.map(|id| id.to_string())),
            created_at: ActiveValue::Set(client.created_at),
        }
    }
}

impl TryFrom<Model> for Client {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "cliente")?,
            name: model.name,
            age: u16::try_from(model.age).unwrap_or_default(),
            pathology: model.pathology,
            email: model.email,
            phone: model.phone,
            notes: model.notes,
            status: ClientStatus::try_from(model.status.as_str())?,
            active_package_id: model
                .active_package_id
                .as_deref()
                .map(|id| parse_uuid(id, "paquete"))
                .transpose()?,
            created_at: model.created_at,
        })
    }
}
