use std::collections::HashMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{
    CatalogEntry, Client, ClientDetail, ClientOverview, ClientPayment, ClientSession,
    ClientStatus, DashboardStats, PackageLedger, PackageSummary, ResultEngine, SessionRecord,
    StatsWindow, catalog, clients, ledger, packages, session_records,
};

use super::{Engine, PaymentFilter, load_ledgers, require_client};

impl Engine {
    async fn client_ledgers(&self, client_id: Uuid) -> ResultEngine<(Client, Vec<PackageLedger>)> {
        let client = Client::try_from(require_client(&self.database, client_id).await?)?;
        let models = packages::Entity::find()
            .filter(packages::Column::ClientId.eq(client_id.to_string()))
            .all(&self.database)
            .await?;
        let ledgers = load_ledgers(&self.database, models).await?;
        Ok((client, ledgers))
    }

    /// One row per client for the dashboard table, newest client first.
    pub async fn dashboard_clients(&self) -> ResultEngine<Vec<ClientOverview>> {
        let clients: Vec<Client> = clients::Entity::find()
            .order_by_desc(clients::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Client::try_from)
            .collect::<ResultEngine<_>>()?;

        let models = packages::Entity::find().all(&self.database).await?;
        let mut by_client: HashMap<Uuid, Vec<PackageLedger>> = HashMap::new();
        for ledger in load_ledgers(&self.database, models).await? {
            by_client
                .entry(ledger.package.client_id)
                .or_default()
                .push(ledger);
        }

        Ok(clients
            .iter()
            .map(|client| {
                let ledgers = by_client.get(&client.id).map(Vec::as_slice).unwrap_or(&[]);
                ledger::client_overview(client, ledgers)
            })
            .collect())
    }

    pub async fn client_detail(&self, client_id: Uuid) -> ResultEngine<ClientDetail> {
        let (client, ledgers) = self.client_ledgers(client_id).await?;
        Ok(ledger::client_detail(client, &ledgers))
    }

    pub async fn client_packages(&self, client_id: Uuid) -> ResultEngine<Vec<PackageSummary>> {
        let (_, ledgers) = self.client_ledgers(client_id).await?;
        Ok(ledger::package_history(&ledgers))
    }

    pub async fn client_payments(&self, client_id: Uuid) -> ResultEngine<Vec<ClientPayment>> {
        let (_, ledgers) = self.client_ledgers(client_id).await?;
        Ok(ledger::payment_history(&ledgers))
    }

    pub async fn client_sessions(&self, client_id: Uuid) -> ResultEngine<Vec<ClientSession>> {
        let (_, ledgers) = self.client_ledgers(client_id).await?;
        Ok(ledger::session_history(&ledgers))
    }

    /// Earliest pending, dated session of the client's active package.
    pub async fn next_session(&self, client_id: Uuid) -> ResultEngine<Option<SessionRecord>> {
        let (client, ledgers) = self.client_ledgers(client_id).await?;
        Ok(ledger::select_active(&client, &ledgers)
            .and_then(PackageLedger::next_session)
            .cloned())
    }

    pub fn catalog(&self) -> Vec<CatalogEntry> {
        catalog::catalog()
    }

    /// Dashboard counters as of now, in the clinic's time zone.
    pub async fn dashboard_stats(&self) -> ResultEngine<DashboardStats> {
        let now = Utc::now().with_timezone(&self.timezone);
        self.dashboard_stats_at(now).await
    }

    /// Dashboard counters as of `now`.
    ///
    /// Earnings add up payments dated from the first instant of the month up
    /// to `now`; the session count covers the whole local day of `now`.
    pub async fn dashboard_stats_at(&self, now: DateTime<Tz>) -> ResultEngine<DashboardStats> {
        let window = StatsWindow::at(&now);

        let total_clients = clients::Entity::find().count(&self.database).await?;
        let active_clients = clients::Entity::find()
            .filter(clients::Column::Status.eq(ClientStatus::Activo.as_str()))
            .count(&self.database)
            .await?;
        let monthly_earnings = self
            .sum_payments(PaymentFilter {
                date_from: Some(window.month_start),
                date_to: Some(window.now),
                ..Default::default()
            })
            .await?;
        let today_sessions = session_records::Entity::find()
            .filter(session_records::Column::SessionDate.gte(window.day_start))
            .filter(session_records::Column::SessionDate.lt(window.day_end))
            .count(&self.database)
            .await?;

        Ok(DashboardStats {
            active_clients,
            total_clients,
            monthly_earnings,
            today_sessions,
        })
    }
}
