//! Read-side projections over packages, sessions and payments.
//!
//! Nothing here touches the database: the engine loads a [`PackageLedger`]
//! per package and every figure shown to staff (paid, debt, remaining
//! sessions, badges, next visit, dashboard rows) is derived from it on each
//! read. Missing data never fails a projection; a client without packages
//! simply yields zero debt and no active package.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    BalanceStatus, Client, ClientStatus, Money, Package, PackageStatus, PackageTier, Payment,
    SessionRecord, SessionStatus,
};

/// UI badge of a package, a pure function of its lifecycle and its debt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageBadge {
    Concluido,
    ActivoAdeudo,
    ActivoPagado,
    ActivoCredito,
}

impl PackageBadge {
    pub fn for_package(status: PackageStatus, debt: Money) -> Self {
        if status.is_terminal() {
            return Self::Concluido;
        }
        match BalanceStatus::for_debt(debt) {
            BalanceStatus::Adeudo => Self::ActivoAdeudo,
            BalanceStatus::Pagado => Self::ActivoPagado,
            BalanceStatus::Credito => Self::ActivoCredito,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Concluido => "Concluido",
            Self::ActivoAdeudo => "Activo/Adeudo",
            Self::ActivoPagado => "Activo/Pagado",
            Self::ActivoCredito => "Activo/Crédito",
        }
    }
}

/// A package together with every session and payment recorded against it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageLedger {
    pub package: Package,
    pub sessions: Vec<SessionRecord>,
    pub payments: Vec<Payment>,
}

impl PackageLedger {
    pub fn new(package: Package, sessions: Vec<SessionRecord>, payments: Vec<Payment>) -> Self {
        Self {
            package,
            sessions,
            payments,
        }
    }

    pub fn paid(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// `total_price - paid`, negative when the client overpaid.
    pub fn debt(&self) -> Money {
        self.package.total_price - self.paid()
    }

    pub fn sessions_completed(&self) -> u32 {
        let completed = self
            .sessions
            .iter()
            .filter(|s| s.status == SessionStatus::Completada)
            .count();
        u32::try_from(completed).unwrap_or(u32::MAX)
    }

    /// Always the catalog ceiling of the tier, not the number of records.
    pub fn sessions_total(&self) -> u32 {
        self.package.tier.session_ceiling()
    }

    pub fn sessions_remaining(&self) -> u32 {
        self.sessions_total()
            .saturating_sub(self.sessions_completed())
    }

    pub fn badge(&self) -> PackageBadge {
        PackageBadge::for_package(self.package.status, self.debt())
    }

    /// Earliest pending session that has a date.
    pub fn next_session(&self) -> Option<&SessionRecord> {
        self.sessions
            .iter()
            .filter(|s| s.status == SessionStatus::Pendiente)
            .filter_map(|s| s.session_date.map(|date| (date, s)))
            .min_by_key(|(date, s)| (*date, s.session_number))
            .map(|(_, s)| s)
    }

    pub fn summary(&self) -> PackageSummary {
        PackageSummary {
            id: self.package.id,
            tier: self.package.tier,
            cost: self.package.total_price,
            paid: self.paid(),
            debt: self.debt(),
            sessions_completed: self.sessions_completed(),
            sessions_total: self.sessions_total(),
            start_date: self.package.start_date,
            status: self.package.status,
            balance_status: BalanceStatus::for_debt(self.debt()),
            badge: self.badge(),
        }
    }
}

/// Picks the package considered "in progress" for a client.
///
/// The client's `active_package_id` wins; otherwise the newest package still
/// in `Activo`; otherwise the most recently started package. `None` only when
/// the client owns no packages.
pub fn select_active<'a>(
    client: &Client,
    ledgers: &'a [PackageLedger],
) -> Option<&'a PackageLedger> {
    if let Some(active_id) = client.active_package_id
        && let Some(found) = ledgers.iter().find(|l| l.package.id == active_id)
    {
        return Some(found);
    }

    ledgers
        .iter()
        .filter(|l| !l.package.status.is_terminal())
        .max_by_key(|l| l.package.start_date)
        .or_else(|| ledgers.iter().max_by_key(|l| l.package.start_date))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub id: Uuid,
    pub tier: PackageTier,
    pub cost: Money,
    pub paid: Money,
    pub debt: Money,
    pub sessions_completed: u32,
    pub sessions_total: u32,
    pub start_date: DateTime<Utc>,
    pub status: PackageStatus,
    pub balance_status: BalanceStatus,
    pub badge: PackageBadge,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePackageSummary {
    pub id: Uuid,
    pub tier: PackageTier,
    pub sessions_remaining: u32,
    pub sessions_total: u32,
    pub current_debt: Money,
}

/// One row of the dashboard client table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOverview {
    pub id: Uuid,
    pub name: String,
    pub age: u16,
    pub pathology: String,
    pub client_status: ClientStatus,
    pub active_tier: Option<PackageTier>,
    pub sessions_used: u32,
    pub sessions_total: u32,
    pub package_badge: Option<PackageBadge>,
    pub debt: Money,
    pub next_session: Option<DateTime<Utc>>,
}

impl ClientOverview {
    /// `"used / total"` as printed in the sessions column.
    pub fn sessions_label(&self) -> String {
        format!("{} / {}", self.sessions_used, self.sessions_total)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDetail {
    pub client: Client,
    pub total_debt: Money,
    pub active_package: Option<ActivePackageSummary>,
    pub next_session: Option<SessionRecord>,
}

/// A payment annotated with the package it was made against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPayment {
    pub payment: Payment,
    pub package_tier: PackageTier,
}

/// A session annotated with the package it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSession {
    pub session: SessionRecord,
    pub package_tier: PackageTier,
}

pub fn client_overview(client: &Client, ledgers: &[PackageLedger]) -> ClientOverview {
    let active = select_active(client, ledgers);
    ClientOverview {
        id: client.id,
        name: client.name.clone(),
        age: client.age,
        pathology: client.pathology.clone(),
        client_status: client.status,
        active_tier: active.map(|l| l.package.tier),
        sessions_used: active.map(PackageLedger::sessions_completed).unwrap_or(0),
        sessions_total: active.map(PackageLedger::sessions_total).unwrap_or(0),
        package_badge: active.map(PackageLedger::badge),
        debt: active.map(PackageLedger::debt).unwrap_or(Money::ZERO),
        next_session: active
            .and_then(PackageLedger::next_session)
            .and_then(|s| s.session_date),
    }
}

pub fn client_detail(client: Client, ledgers: &[PackageLedger]) -> ClientDetail {
    let active = select_active(&client, ledgers);
    ClientDetail {
        total_debt: active.map(PackageLedger::debt).unwrap_or(Money::ZERO),
        active_package: active.map(|l| ActivePackageSummary {
            id: l.package.id,
            tier: l.package.tier,
            sessions_remaining: l.sessions_remaining(),
            sessions_total: l.sessions_total(),
            current_debt: l.debt(),
        }),
        next_session: active.and_then(PackageLedger::next_session).cloned(),
        client,
    }
}

/// Package history, newest start date first.
pub fn package_history(ledgers: &[PackageLedger]) -> Vec<PackageSummary> {
    let mut rows: Vec<PackageSummary> = ledgers.iter().map(PackageLedger::summary).collect();
    rows.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    rows
}

/// Every payment of every package, newest payment date first.
pub fn payment_history(ledgers: &[PackageLedger]) -> Vec<ClientPayment> {
    let mut rows: Vec<ClientPayment> = ledgers
        .iter()
        .flat_map(|l| {
            l.payments.iter().map(|p| ClientPayment {
                payment: p.clone(),
                package_tier: l.package.tier,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.payment.payment_date.cmp(&a.payment.payment_date));
    rows
}

/// Every session of every package, highest session number first.
pub fn session_history(ledgers: &[PackageLedger]) -> Vec<ClientSession> {
    let mut rows: Vec<ClientSession> = ledgers
        .iter()
        .flat_map(|l| {
            l.sessions.iter().map(|s| ClientSession {
                session: s.clone(),
                package_tier: l.package.tier,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.session.session_number.cmp(&a.session.session_number));
    rows
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub active_clients: u64,
    pub total_clients: u64,
    pub monthly_earnings: Money,
    pub today_sessions: u64,
}

/// Time ranges used by the dashboard counters, computed in the clinic's
/// local time zone and expressed in UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatsWindow {
    /// First instant of the current calendar month (inclusive).
    pub month_start: DateTime<Utc>,
    /// Upper bound of the earnings window (inclusive).
    pub now: DateTime<Utc>,
    /// First instant of the current local day (inclusive).
    pub day_start: DateTime<Utc>,
    /// First instant of the next local day (exclusive).
    pub day_end: DateTime<Utc>,
}

impl StatsWindow {
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let first_of_month = today.with_day(1).unwrap_or(today);
        let tomorrow = today.succ_opt().unwrap_or(today);

        Self {
            month_start: local_midnight(&tz, first_of_month),
            now: now.with_timezone(&Utc),
            day_start: local_midnight(&tz, today),
            day_end: local_midnight(&tz, tomorrow),
        }
    }
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        // Midnight fell in a DST gap; the day starts at the first valid hour.
        .or_else(|| {
            naive
                .checked_add_signed(chrono::TimeDelta::hours(1))
                .and_then(|shifted| tz.from_local_datetime(&shifted).earliest())
                .map(|dt| dt.with_timezone(&Utc))
        })
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;
    use crate::PaymentMethod;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn package(tier: PackageTier, price: i64, start: DateTime<Utc>) -> Package {
        Package::new(Uuid::new_v4(), tier, Money::from_major(price), start)
    }

    fn payment(package: &Package, amount: i64) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            package_id: package.id,
            amount: Money::from_major(amount),
            payment_date: package.start_date,
            method: PaymentMethod::Efectivo,
            notes: None,
        }
    }

    fn session(
        package: &Package,
        number: u32,
        status: SessionStatus,
        date: Option<DateTime<Utc>>,
    ) -> SessionRecord {
        SessionRecord {
            id: Uuid::new_v4(),
            package_id: package.id,
            session_number: number,
            session_date: date,
            status,
            notes: None,
        }
    }

    fn client(active: Option<Uuid>) -> Client {
        Client {
            id: Uuid::new_v4(),
            name: "María López".to_string(),
            age: 34,
            pathology: "Lumbalgia crónica".to_string(),
            email: None,
            phone: None,
            notes: None,
            status: ClientStatus::Activo,
            active_package_id: active,
            created_at: at(2025, 9, 1, 0),
        }
    }

    #[test]
    fn partial_payment_leaves_debt() {
        let pkg = package(PackageTier::S5, 1250, at(2025, 9, 22, 0));
        let ledger = PackageLedger::new(pkg.clone(), vec![], vec![payment(&pkg, 1000)]);
        assert_eq!(ledger.debt(), Money::from_major(250));
        assert_eq!(ledger.badge(), PackageBadge::ActivoAdeudo);
        assert_eq!(ledger.badge().label(), "Activo/Adeudo");
    }

    #[test]
    fn settled_package_is_paid() {
        let pkg = package(PackageTier::S5, 1250, at(2025, 9, 22, 0));
        let ledger = PackageLedger::new(
            pkg.clone(),
            vec![],
            vec![payment(&pkg, 1000), payment(&pkg, 250)],
        );
        assert!(ledger.debt().is_zero());
        assert_eq!(ledger.badge().label(), "Activo/Pagado");
    }

    #[test]
    fn overpayment_is_reported_as_credit_not_clamped() {
        let pkg = package(PackageTier::S1, 350, at(2025, 9, 22, 0));
        let ledger = PackageLedger::new(pkg.clone(), vec![], vec![payment(&pkg, 400)]);
        assert_eq!(ledger.debt(), Money::from_major(-50));
        assert_eq!(ledger.badge(), PackageBadge::ActivoCredito);
    }

    #[test]
    fn terminated_package_is_concluded_even_with_debt() {
        let mut pkg = package(PackageTier::S5, 1250, at(2025, 9, 22, 0));
        pkg.status = PackageStatus::Terminado;
        let ledger = PackageLedger::new(pkg, vec![], vec![]);
        assert_eq!(ledger.badge().label(), "Concluido");
    }

    #[test]
    fn remaining_uses_catalog_ceiling_and_completed_sessions() {
        let pkg = package(PackageTier::S5, 1250, at(2025, 9, 22, 0));
        let sessions = vec![
            session(&pkg, 1, SessionStatus::Completada, Some(at(2025, 9, 22, 12))),
            session(&pkg, 2, SessionStatus::Cancelada, Some(at(2025, 9, 24, 12))),
            session(&pkg, 3, SessionStatus::Pendiente, None),
        ];
        let ledger = PackageLedger::new(pkg, sessions, vec![]);
        assert_eq!(ledger.sessions_completed(), 1);
        assert_eq!(ledger.sessions_total(), 5);
        assert_eq!(ledger.sessions_remaining(), 4);
    }

    #[test]
    fn next_session_is_earliest_dated_pending() {
        let pkg = package(PackageTier::S10, 2500, at(2025, 9, 1, 0));
        let sessions = vec![
            session(&pkg, 1, SessionStatus::Completada, Some(at(2025, 9, 2, 12))),
            session(&pkg, 2, SessionStatus::Pendiente, None),
            session(&pkg, 3, SessionStatus::Pendiente, Some(at(2025, 9, 20, 12))),
            session(&pkg, 4, SessionStatus::Pendiente, Some(at(2025, 9, 10, 12))),
        ];
        let ledger = PackageLedger::new(pkg, sessions, vec![]);
        assert_eq!(ledger.next_session().map(|s| s.session_number), Some(4));
    }

    #[test]
    fn active_selection_prefers_pointer_then_activo_then_newest() {
        let older = package(PackageTier::S5, 1250, at(2025, 1, 1, 0));
        let mut newer = package(PackageTier::S10, 2500, at(2025, 6, 1, 0));
        newer.status = PackageStatus::Terminado;
        let ledgers = vec![
            PackageLedger::new(older.clone(), vec![], vec![]),
            PackageLedger::new(newer.clone(), vec![], vec![]),
        ];

        let pointed = client(Some(newer.id));
        assert_eq!(select_active(&pointed, &ledgers).map(|l| l.package.id), Some(newer.id));

        let unpointed = client(None);
        assert_eq!(select_active(&unpointed, &ledgers).map(|l| l.package.id), Some(older.id));

        let mut all_done = ledgers.clone();
        all_done[0].package.status = PackageStatus::Terminado;
        assert_eq!(select_active(&unpointed, &all_done).map(|l| l.package.id), Some(newer.id));

        assert!(select_active(&unpointed, &[]).is_none());
    }

    #[test]
    fn client_without_packages_projects_defaults() {
        let c = client(None);
        let overview = client_overview(&c, &[]);
        assert_eq!(overview.debt, Money::ZERO);
        assert_eq!(overview.sessions_label(), "0 / 0");
        assert!(overview.package_badge.is_none());

        let detail = client_detail(c, &[]);
        assert_eq!(detail.total_debt, Money::ZERO);
        assert!(detail.active_package.is_none());
        assert!(detail.next_session.is_none());
    }

    #[test]
    fn single_session_package_has_nothing_left_after_completion() {
        let pkg = package(PackageTier::S1, 350, at(2025, 9, 1, 0));
        let c = client(Some(pkg.id));
        let ledgers = vec![PackageLedger::new(
            pkg.clone(),
            vec![session(&pkg, 1, SessionStatus::Completada, Some(at(2025, 9, 1, 10)))],
            vec![],
        )];
        let detail = client_detail(c, &ledgers);
        let active = detail.active_package.unwrap();
        assert_eq!(active.sessions_remaining, 0);
        assert_eq!(active.sessions_total, 1);
    }

    #[test]
    fn histories_are_sorted_newest_first() {
        let a = package(PackageTier::S1, 350, at(2025, 1, 1, 0));
        let b = package(PackageTier::S5, 1250, at(2025, 3, 1, 0));
        let mut late_payment = payment(&a, 100);
        late_payment.payment_date = at(2025, 4, 1, 0);
        let ledgers = vec![
            PackageLedger::new(
                a.clone(),
                vec![session(&a, 1, SessionStatus::Completada, None)],
                vec![late_payment],
            ),
            PackageLedger::new(
                b.clone(),
                vec![
                    session(&b, 1, SessionStatus::Completada, None),
                    session(&b, 2, SessionStatus::Pendiente, None),
                ],
                vec![payment(&b, 500)],
            ),
        ];

        let packages = package_history(&ledgers);
        assert_eq!(packages[0].id, b.id);

        let payments = payment_history(&ledgers);
        assert_eq!(payments[0].package_tier, PackageTier::S1);

        let sessions = session_history(&ledgers);
        assert_eq!(sessions[0].session.session_number, 2);
    }

    #[test]
    fn stats_window_uses_local_calendar() {
        // 2025-10-15 08:30 in UTC-6 is 14:30 UTC.
        let offset = FixedOffset::west_opt(6 * 3600).unwrap();
        let now = offset.with_ymd_and_hms(2025, 10, 15, 8, 30, 0).unwrap();
        let window = StatsWindow::at(&now);
        assert_eq!(window.month_start, Utc.with_ymd_and_hms(2025, 10, 1, 6, 0, 0).unwrap());
        assert_eq!(window.day_start, Utc.with_ymd_and_hms(2025, 10, 15, 6, 0, 0).unwrap());
        assert_eq!(window.day_end, Utc.with_ymd_and_hms(2025, 10, 16, 6, 0, 0).unwrap());
        assert_eq!(window.now, Utc.with_ymd_and_hms(2025, 10, 15, 14, 30, 0).unwrap());
    }
}
