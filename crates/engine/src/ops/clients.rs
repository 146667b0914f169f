use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Client, ClientStatus, EngineError, ResultEngine, clients, packages, payments,
    session_records,
    util::{is_valid_email, normalize_optional_text, normalize_required_text},
};

use super::{Engine, require_client, with_tx};

/// Oldest age accepted for a client.
const MAX_AGE: u16 = 120;

/// Fields staff fill in when registering or editing a client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientInput {
    pub name: String,
    pub age: i64,
    pub pathology: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

struct ValidClient {
    name: String,
    age: u16,
    pathology: String,
    email: Option<String>,
    phone: Option<String>,
    notes: Option<String>,
}

impl ClientInput {
    fn validate(&self) -> ResultEngine<ValidClient> {
        let name = normalize_required_text(&self.name, "El nombre es requerido")?;
        let pathology = normalize_required_text(&self.pathology, "La patología es requerida")?;
        if self.age < 1 {
            return Err(EngineError::Validation("La edad es requerida".to_string()));
        }
        let age = u16::try_from(self.age)
            .ok()
            .filter(|age| *age <= MAX_AGE)
            .ok_or_else(|| {
                EngineError::Validation(format!("La edad no puede ser mayor a {MAX_AGE}"))
            })?;
        let email = normalize_optional_text(self.email.as_deref());
        if let Some(email) = &email
            && !is_valid_email(email)
        {
            return Err(EngineError::Validation("Email inválido".to_string()));
        }

        Ok(ValidClient {
            name,
            age,
            pathology,
            email,
            phone: normalize_optional_text(self.phone.as_deref()),
            notes: normalize_optional_text(self.notes.as_deref()),
        })
    }
}

impl Engine {
    /// Registers a new client. New clients always start as `Activo`.
    pub async fn create_client(&self, input: ClientInput) -> ResultEngine<Client> {
        let valid = input.validate()?;
        let client = Client {
            id: Uuid::new_v4(),
            name: valid.name,
            age: valid.age,
            pathology: valid.pathology,
            email: valid.email,
            phone: valid.phone,
            notes: valid.notes,
            status: ClientStatus::Activo,
            active_package_id: None,
            created_at: Utc::now(),
        };

        clients::ActiveModel::from(&client)
            .insert(&self.database)
            .await?;
        tracing::info!(client_id = %client.id, "client created");
        Ok(client)
    }

    /// Overwrites the editable fields of a client.
    ///
    /// The active package pointer and the creation date are left untouched, so
    /// repeating the same update yields the same stored record.
    pub async fn update_client(
        &self,
        client_id: Uuid,
        input: ClientInput,
        status: ClientStatus,
    ) -> ResultEngine<Client> {
        let valid = input.validate()?;
        let existing = require_client(&self.database, client_id).await?;

        let model = clients::ActiveModel {
            id: ActiveValue::Set(existing.id),
            name: ActiveValue::Set(valid.name),
            age: ActiveValue::Set(i32::from(valid.age)),
            pathology: ActiveValue::Set(valid.pathology),
            email: ActiveValue::Set(valid.email),
            phone: ActiveValue::Set(valid.phone),
            notes: ActiveValue::Set(valid.notes),
            status: ActiveValue::Set(status.as_str().to_string()),
            ..Default::default()
        };
        let updated = model.update(&self.database).await?;
        tracing::info!(%client_id, "client updated");
        Client::try_from(updated)
    }

    /// Deletes a client with every package, session and payment it owns.
    pub async fn delete_client(&self, client_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let client = require_client(&db_tx, client_id).await?;

            let package_ids: Vec<String> = packages::Entity::find()
                .filter(packages::Column::ClientId.eq(client.id.clone()))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|p| p.id)
                .collect();

            if !package_ids.is_empty() {
                session_records::Entity::delete_many()
                    .filter(session_records::Column::PackageId.is_in(package_ids.clone()))
                    .exec(&db_tx)
                    .await?;
                payments::Entity::delete_many()
                    .filter(payments::Column::PackageId.is_in(package_ids.clone()))
                    .exec(&db_tx)
                    .await?;
                packages::Entity::delete_many()
                    .filter(packages::Column::Id.is_in(package_ids))
                    .exec(&db_tx)
                    .await?;
            }

            clients::Entity::delete_by_id(client.id)
                .exec(&db_tx)
                .await?;
            tracing::info!(%client_id, "client deleted");
            Ok(())
        })
    }

    /// Return a client by id.
    pub async fn client(&self, client_id: Uuid) -> ResultEngine<Client> {
        let model = require_client(&self.database, client_id).await?;
        Client::try_from(model)
    }

    /// Lists clients, newest first, optionally restricted to one status.
    pub async fn list_clients(&self, status: Option<ClientStatus>) -> ResultEngine<Vec<Client>> {
        let mut query = clients::Entity::find().order_by_desc(clients::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(clients::Column::Status.eq(status.as_str()));
        }
        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Client::try_from)
            .collect()
    }
}
