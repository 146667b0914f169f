//! Attendance records of a package.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Pendiente,
    Completada,
    Cancelada,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pendiente => "Pendiente",
            Self::Completada => "Completada",
            Self::Cancelada => "Cancelada",
        }
    }
}

impl TryFrom<&str> for SessionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Pendiente" => Ok(Self::Pendiente),
            "Completada" => Ok(Self::Completada),
            "Cancelada" => Ok(Self::Cancelada),
            other => Err(EngineError::Validation(format!(
                "estatus de sesión inválido: {other}"
            ))),
        }
    }
}

/// One visit within a package.
///
/// `session_number` is assigned once at creation and never rewritten, so
/// deleting a session leaves a gap in the numbering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub package_id: Uuid,
    pub session_number: u32,
    pub session_date: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "session_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub package_id: String,
    pub session_number: i32,
    pub session_date: Option<DateTimeUtc>,
    pub status: String,
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

impl From<&SessionRecord> for ActiveModel {
    fn from(session: &SessionRecord) -> Self {
        Self {
            id: ActiveValue::Set(session.id.to_string()),
            package_id: ActiveValue::Set(session.package_id.to_string()),
            session_number: ActiveValue::Set(
                i32::try_from(session.session_number).unwrap_or(i32::MAX),
            ),
            session_date: ActiveValue::Set(session.session_date),
            status: ActiveValue::Set(session.status.as_str().to_string()),
            notes: ActiveValue::Set(session.notes.clone()),
        }
    }
}

impl TryFrom<Model> for SessionRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "sesión")?,
            package_id: parse_uuid(&model.package_id, "paquete")?,
            session_number: u32::try_from(model.session_number).unwrap_or_default(),
            session_date: model.session_date,
            status: SessionStatus::try_from(model.status.as_str())?,
            notes: model.notes,
        })
    }
}
