//! JSON types exchanged with the clinic server.
//!
//! Money always travels as integer centavos (`*_minor` fields) and instants
//! as RFC 3339 UTC timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod client {
    use super::*;
    use crate::{package::ActivePackageView, session::SessionView};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum ClientStatus {
        Activo,
        Inactivo,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientNew {
        pub name: String,
        pub age: i64,
        pub pathology: String,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub notes: Option<String>,
    }

    /// Full replacement of a client's editable fields.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientUpdate {
        pub name: String,
        pub age: i64,
        pub pathology: String,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub notes: Option<String>,
        pub status: ClientStatus,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ClientListQuery {
        pub status: Option<ClientStatus>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct ClientView {
        pub id: Uuid,
        pub name: String,
        pub age: u32,
        pub pathology: String,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub notes: Option<String>,
        pub status: ClientStatus,
        pub active_package_id: Option<Uuid>,
        pub created_at: DateTime<Utc>,
    }

    /// Client page: the record plus what is owed and what comes next.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientDetailView {
        pub client: ClientView,
        pub total_debt_minor: i64,
        pub active_package: Option<ActivePackageView>,
        pub next_session: Option<SessionView>,
    }
}

pub mod package {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum PackageTier {
        S1,
        S5,
        S10,
        S15,
        S20,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum PackageStatus {
        Activo,
        Terminado,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum BalanceStatus {
        Adeudo,
        Pagado,
        Credito,
    }

    /// Badge shown next to a package.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum PackageBadge {
        #[serde(rename = "Concluido")]
        Concluido,
        #[serde(rename = "Activo/Adeudo")]
        ActivoAdeudo,
        #[serde(rename = "Activo/Pagado")]
        ActivoPagado,
        #[serde(rename = "Activo/Crédito")]
        ActivoCredito,
    }

    /// Request body for selling a package.
    ///
    /// Without `total_price_minor` the tier's suggested price is used, and
    /// without `start_date` the package starts now.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PackageNew {
        pub client_id: Uuid,
        pub tier: PackageTier,
        pub total_price_minor: Option<i64>,
        pub start_date: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PackageUpdate {
        pub tier: PackageTier,
        pub total_price_minor: i64,
        pub status: PackageStatus,
        pub start_date: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PackageListQuery {
        pub client_id: Option<Uuid>,
        pub status: Option<PackageStatus>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct PackageView {
        pub id: Uuid,
        pub client_id: Uuid,
        pub tier: PackageTier,
        pub total_price_minor: i64,
        pub start_date: DateTime<Utc>,
        pub status: PackageStatus,
        pub balance_status: BalanceStatus,
    }

    /// Package with its derived figures.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PackageSummaryView {
        pub id: Uuid,
        pub tier: PackageTier,
        pub cost_minor: i64,
        pub paid_minor: i64,
        pub debt_minor: i64,
        pub sessions_completed: u32,
        pub sessions_total: u32,
        pub start_date: DateTime<Utc>,
        pub status: PackageStatus,
        pub balance_status: BalanceStatus,
        pub badge: PackageBadge,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ActivePackageView {
        pub id: Uuid,
        pub tier: PackageTier,
        pub sessions_remaining: u32,
        pub sessions_total: u32,
        pub current_debt_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CatalogEntryView {
        pub tier: PackageTier,
        pub sessions: u32,
        pub suggested_price_minor: i64,
        pub display_name: String,
    }
}

pub mod session {
    use super::*;
    use crate::package::PackageTier;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum SessionStatus {
        Pendiente,
        Completada,
        Cancelada,
    }

    /// Request body for logging a session. Status defaults to `Pendiente`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionNew {
        pub package_id: Uuid,
        pub session_date: Option<DateTime<Utc>>,
        pub status: Option<SessionStatus>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionUpdate {
        pub session_date: Option<DateTime<Utc>>,
        pub status: SessionStatus,
        pub notes: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SessionListQuery {
        pub package_id: Option<Uuid>,
        pub client_id: Option<Uuid>,
        pub status: Option<SessionStatus>,
        /// Inclusive.
        pub from: Option<DateTime<Utc>>,
        /// Exclusive.
        pub to: Option<DateTime<Utc>>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct SessionView {
        pub id: Uuid,
        pub package_id: Uuid,
        pub session_number: u32,
        pub session_date: Option<DateTime<Utc>>,
        pub status: SessionStatus,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientSessionView {
        #[serde(flatten)]
        pub session: SessionView,
        pub package_tier: PackageTier,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionCount {
        pub count: u64,
    }
}

pub mod payment {
    use super::*;
    use crate::package::PackageTier;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum PaymentMethod {
        Efectivo,
        Otro,
    }

    /// Request body for a payment. Defaults: paid now, in cash.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentNew {
        pub package_id: Uuid,
        pub amount_minor: i64,
        pub payment_date: Option<DateTime<Utc>>,
        pub method: Option<PaymentMethod>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentUpdate {
        pub amount_minor: i64,
        pub payment_date: DateTime<Utc>,
        pub method: PaymentMethod,
        pub notes: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PaymentListQuery {
        pub package_id: Option<Uuid>,
        pub client_id: Option<Uuid>,
        /// Inclusive.
        pub from: Option<DateTime<Utc>>,
        /// Inclusive.
        pub to: Option<DateTime<Utc>>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct PaymentView {
        pub id: Uuid,
        pub package_id: Uuid,
        pub amount_minor: i64,
        pub payment_date: DateTime<Utc>,
        pub method: PaymentMethod,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientPaymentView {
        #[serde(flatten)]
        pub payment: PaymentView,
        pub package_tier: PackageTier,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentTotal {
        pub total_minor: i64,
    }
}

pub mod dashboard {
    use super::*;
    use crate::{
        client::ClientStatus,
        package::{PackageBadge, PackageTier},
    };

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct DashboardStatsView {
        pub active_clients: u64,
        pub total_clients: u64,
        pub monthly_earnings_minor: i64,
        pub today_sessions: u64,
    }

    /// One row of the dashboard client table.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClientRow {
        pub id: Uuid,
        pub name: String,
        pub age: u32,
        pub pathology: String,
        pub client_status: ClientStatus,
        pub active_tier: Option<PackageTier>,
        /// `"used / total"`.
        pub sessions: String,
        pub package_badge: Option<PackageBadge>,
        /// Badge text, `"Sin paquete"` when the client has no package.
        pub package_label: String,
        pub debt_minor: i64,
        pub next_session: Option<DateTime<Utc>>,
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct SessionUser {
        pub email: String,
        pub name: String,
    }
}
