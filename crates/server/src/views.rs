//! Conversions between engine records and wire types.

use api_types::{
    client::{ClientDetailView, ClientStatus, ClientView},
    dashboard::{ClientRow, DashboardStatsView},
    package::{
        ActivePackageView, BalanceStatus, CatalogEntryView, PackageBadge, PackageStatus,
        PackageSummaryView, PackageTier, PackageView,
    },
    payment::{ClientPaymentView, PaymentMethod, PaymentView},
    session::{ClientSessionView, SessionStatus, SessionView},
};

pub fn client_status(status: engine::ClientStatus) -> ClientStatus {
    match status {
        engine::ClientStatus::Activo => ClientStatus::Activo,
        engine::ClientStatus::Inactivo => ClientStatus::Inactivo,
    }
}

pub fn engine_client_status(status: ClientStatus) -> engine::ClientStatus {
    match status {
        ClientStatus::Activo => engine::ClientStatus::Activo,
        ClientStatus::Inactivo => engine::ClientStatus::Inactivo,
    }
}

pub fn tier(tier: engine::PackageTier) -> PackageTier {
    match tier {
        engine::PackageTier::S1 => PackageTier::S1,
        engine::PackageTier::S5 => PackageTier::S5,
        engine::PackageTier::S10 => PackageTier::S10,
        engine::PackageTier::S15 => PackageTier::S15,
        engine::PackageTier::S20 => PackageTier::S20,
    }
}

pub fn engine_tier(tier: PackageTier) -> engine::PackageTier {
    match tier {
        PackageTier::S1 => engine::PackageTier::S1,
        PackageTier::S5 => engine::PackageTier::S5,
        PackageTier::S10 => engine::PackageTier::S10,
        PackageTier::S15 => engine::PackageTier::S15,
        PackageTier::S20 => engine::PackageTier::S20,
    }
}

pub fn package_status(status: engine::PackageStatus) -> PackageStatus {
    match status {
        engine::PackageStatus::Activo => PackageStatus::Activo,
        engine::PackageStatus::Terminado => PackageStatus::Terminado,
    }
}

pub fn engine_package_status(status: PackageStatus) -> engine::PackageStatus {
    match status {
        PackageStatus::Activo => engine::PackageStatus::Activo,
        PackageStatus::Terminado => engine::PackageStatus::Terminado,
    }
}

fn balance_status(status: engine::BalanceStatus) -> BalanceStatus {
    match status {
        engine::BalanceStatus::Adeudo => BalanceStatus::Adeudo,
        engine::BalanceStatus::Pagado => BalanceStatus::Pagado,
        engine::BalanceStatus::Credito => BalanceStatus::Credito,
    }
}

fn badge(badge: engine::PackageBadge) -> PackageBadge {
    match badge {
        engine::PackageBadge::Concluido => PackageBadge::Concluido,
        engine::PackageBadge::ActivoAdeudo => PackageBadge::ActivoAdeudo,
        engine::PackageBadge::ActivoPagado => PackageBadge::ActivoPagado,
        engine::PackageBadge::ActivoCredito => PackageBadge::ActivoCredito,
    }
}

pub fn session_status(status: engine::SessionStatus) -> SessionStatus {
    match status {
        engine::SessionStatus::Pendiente => SessionStatus::Pendiente,
        engine::SessionStatus::Completada => SessionStatus::Completada,
        engine::SessionStatus::Cancelada => SessionStatus::Cancelada,
    }
}

pub fn engine_session_status(status: SessionStatus) -> engine::SessionStatus {
    match status {
        SessionStatus::Pendiente => engine::SessionStatus::Pendiente,
        SessionStatus::Completada => engine::SessionStatus::Completada,
        SessionStatus::Cancelada => engine::SessionStatus::Cancelada,
    }
}

fn method(method: engine::PaymentMethod) -> PaymentMethod {
    match method {
        engine::PaymentMethod::Efectivo => PaymentMethod::Efectivo,
        engine::PaymentMethod::Otro => PaymentMethod::Otro,
    }
}

pub fn engine_method(method: PaymentMethod) -> engine::PaymentMethod {
    match method {
        PaymentMethod::Efectivo => engine::PaymentMethod::Efectivo,
        PaymentMethod::Otro => engine::PaymentMethod::Otro,
    }
}

pub fn client(client: engine::Client) -> ClientView {
    ClientView {
        id: client.id,
        name: client.name,
        age: u32::from(client.age),
        pathology: client.pathology,
        email: client.email,
        phone: client.phone,
        notes: client.notes,
        status: client_status(client.status),
        active_package_id: client.active_package_id,
        created_at: client.created_at,
    }
}

pub fn client_detail(detail: engine::ClientDetail) -> ClientDetailView {
    ClientDetailView {
        client: client(detail.client),
        total_debt_minor: detail.total_debt.minor(),
        active_package: detail.active_package.map(|active| ActivePackageView {
            id: active.id,
            tier: tier(active.tier),
            sessions_remaining: active.sessions_remaining,
            sessions_total: active.sessions_total,
            current_debt_minor: active.current_debt.minor(),
        }),
        next_session: detail.next_session.map(session),
    }
}

pub fn client_row(row: engine::ClientOverview) -> ClientRow {
    ClientRow {
        sessions: row.sessions_label(),
        package_label: row
            .package_badge
            .map_or("Sin paquete", engine::PackageBadge::label)
            .to_string(),
        id: row.id,
        name: row.name,
        age: u32::from(row.age),
        pathology: row.pathology,
        client_status: client_status(row.client_status),
        active_tier: row.active_tier.map(tier),
        package_badge: row.package_badge.map(badge),
        debt_minor: row.debt.minor(),
        next_session: row.next_session,
    }
}

pub fn package(package: engine::Package) -> PackageView {
    PackageView {
        id: package.id,
        client_id: package.client_id,
        tier: tier(package.tier),
        total_price_minor: package.total_price.minor(),
        start_date: package.start_date,
        status: package_status(package.status),
        balance_status: balance_status(package.balance_status),
    }
}

pub fn package_summary(summary: engine::PackageSummary) -> PackageSummaryView {
    PackageSummaryView {
        id: summary.id,
        tier: tier(summary.tier),
        cost_minor: summary.cost.minor(),
        paid_minor: summary.paid.minor(),
        debt_minor: summary.debt.minor(),
        sessions_completed: summary.sessions_completed,
        sessions_total: summary.sessions_total,
        start_date: summary.start_date,
        status: package_status(summary.status),
        balance_status: balance_status(summary.balance_status),
        badge: badge(summary.badge),
    }
}

pub fn catalog_entry(entry: engine::CatalogEntry) -> CatalogEntryView {
    CatalogEntryView {
        tier: tier(entry.tier),
        sessions: entry.sessions,
        suggested_price_minor: entry.suggested_price.minor(),
        display_name: entry.display_name.to_string(),
    }
}

pub fn session(session: engine::SessionRecord) -> SessionView {
    SessionView {
        id: session.id,
        package_id: session.package_id,
        session_number: session.session_number,
        session_date: session.session_date,
        status: session_status(session.status),
        notes: session.notes,
    }
}

pub fn client_session(row: engine::ClientSession) -> ClientSessionView {
    ClientSessionView {
        session: session(row.session),
        package_tier: tier(row.package_tier),
    }
}

pub fn payment(payment: engine::Payment) -> PaymentView {
    PaymentView {
        id: payment.id,
        package_id: payment.package_id,
        amount_minor: payment.amount.minor(),
        payment_date: payment.payment_date,
        method: method(payment.method),
        notes: payment.notes,
    }
}

pub fn client_payment(row: engine::ClientPayment) -> ClientPaymentView {
    ClientPaymentView {
        payment: payment(row.payment),
        package_tier: tier(row.package_tier),
    }
}

pub fn stats(stats: engine::DashboardStats) -> DashboardStatsView {
    DashboardStatsView {
        active_clients: stats.active_clients,
        total_clients: stats.total_clients,
        monthly_earnings_minor: stats.monthly_earnings.minor(),
        today_sessions: stats.today_sessions,
    }
}
