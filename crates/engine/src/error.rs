//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when an input is malformed or missing.
//! - [`KeyNotFound`] thrown when a referenced record does not exist.
//! - [`Capacity`] thrown when a package already holds as many sessions as its
//!   tier allows.
//! - [`Conflict`] thrown when a concurrent write changed the active package of
//!   a client while another promotion was running.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Capacity`]: EngineError::Capacity
//!  [`Conflict`]: EngineError::Conflict
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Datos inválidos: {0}")]
    Validation(String),
    #[error("\"{0}\" no encontrado")]
    KeyNotFound(String),
    #[error("El paquete permite un máximo de {ceiling} sesión(es)")]
    Capacity { ceiling: u32 },
    #[error("\"{0}\" ya existe")]
    ExistingKey(String),
    #[error("Conflicto: {0}")]
    Conflict(String),
    #[error("Credenciales inválidas")]
    Unauthorized,
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Capacity { ceiling: a }, Self::Capacity { ceiling: b }) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Unauthorized, Self::Unauthorized) => true,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
