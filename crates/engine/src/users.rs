//! Staff accounts allowed to use the dashboard.
//!
//! Passwords are never stored: each row keeps a random salt and the hex
//! SHA-256 digest of `salt || password`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffUser {
    pub email: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub email: String,
    pub name: String,
    pub password_salt: String,
    pub password_hash: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for StaffUser {
    fn from(model: Model) -> Self {
        Self {
            email: model.email,
            name: model.name,
        }
    }
}

pub(crate) fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

impl Model {
    pub(crate) fn verify_password(&self, password: &str) -> bool {
        let candidate = hash_password(&self.password_salt, password);
        candidate
            .as_bytes()
            .ct_eq(self.password_hash.as_bytes())
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_depends_on_salt() {
        let a = hash_password("salt-a", "secreto!123");
        let b = hash_password("salt-b", "secreto!123");
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }

    #[test]
    fn verify_accepts_only_the_registered_password() {
        let model = Model {
            email: "recepcion@clinica.mx".to_string(),
            name: "Recepción".to_string(),
            password_salt: "sal".to_string(),
            password_hash: hash_password("sal", "fisio#2026"),
        };
        assert!(model.verify_password("fisio#2026"));
        assert!(!model.verify_password("fisio#2027"));
        assert!(!model.verify_password(""));

        let truncated = Model {
            password_hash: model.password_hash[..32].to_string(),
            ..model.clone()
        };
        assert!(!truncated.verify_password("fisio#2026"));
    }
}
