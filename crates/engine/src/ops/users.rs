use uuid::Uuid;

use sea_orm::{ActiveValue, prelude::*};

use crate::{
    EngineError, ResultEngine, StaffUser, users,
    util::{is_valid_email, normalize_required_text, validate_password},
};

use super::Engine;

/// Sign-up form of a staff member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaffRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Engine {
    /// Creates a staff account. E-mails are unique and stored lowercase.
    pub async fn register_staff(&self, registration: StaffRegistration) -> ResultEngine<StaffUser> {
        let name = normalize_required_text(&registration.name, "El nombre es requerido")?;
        let email = normalize_required_text(&registration.email, "El email es requerido")?
            .to_lowercase();
        if !is_valid_email(&email) {
            return Err(EngineError::Validation("Email inválido".to_string()));
        }
        validate_password(&registration.password)?;
        if registration.password != registration.confirm_password {
            return Err(EngineError::Validation(
                "Las contraseñas no coinciden".to_string(),
            ));
        }

        if users::Entity::find_by_id(email.clone())
            .one(&self.database)
            .await?
            .is_some()
        {
            return Err(EngineError::ExistingKey(email));
        }

        let salt = Uuid::new_v4().simple().to_string();
        let password_hash = users::hash_password(&salt, &registration.password);
        let model = users::ActiveModel {
            email: ActiveValue::Set(email),
            name: ActiveValue::Set(name),
            password_salt: ActiveValue::Set(salt),
            password_hash: ActiveValue::Set(password_hash),
        }
        .insert(&self.database)
        .await?;

        tracing::info!(email = %model.email, "staff user registered");
        Ok(StaffUser::from(model))
    }

    /// Checks staff credentials.
    pub async fn authenticate(&self, email: &str, password: &str) -> ResultEngine<StaffUser> {
        self.current_session(email, password)
            .await?
            .ok_or(EngineError::Unauthorized)
    }

    /// The staff member behind a set of credentials, or `None` when they do
    /// not match any account.
    pub async fn current_session(
        &self,
        email: &str,
        password: &str,
    ) -> ResultEngine<Option<StaffUser>> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Ok(None);
        }

        let user = users::Entity::find_by_id(email).one(&self.database).await?;
        Ok(user
            .filter(|user| user.verify_password(password))
            .map(StaffUser::from))
    }
}
