//! Ledger of a physiotherapy clinic.
//!
//! Clients buy session packages, attend sessions and pay for them. The
//! [`Engine`] stores those records through sea-orm and derives, on every
//! read, what staff need to see: the active package of each client, sessions
//! left, debt and the badges of the dashboard.

pub use catalog::{CatalogEntry, PackageTier};
pub use clients::{Client, ClientStatus};
pub use error::EngineError;
pub use ledger::{
    ActivePackageSummary, ClientDetail, ClientOverview, ClientPayment, ClientSession,
    DashboardStats, PackageBadge, PackageLedger, PackageSummary, StatsWindow, select_active,
};
pub use money::Money;
pub use ops::{
    ClientInput, DEFAULT_TIMEZONE, Engine, EngineBuilder, PackageFilter, PackageInput,
    PackageUpdate, PaymentFilter, PaymentInput, PaymentUpdate, SessionFilter, SessionInput,
    SessionUpdate, StaffRegistration,
};
pub use packages::{BalanceStatus, Package, PackageStatus};
pub use payments::{Payment, PaymentMethod};
pub use session_records::{SessionRecord, SessionStatus};
pub use users::StaffUser;

mod catalog;
mod clients;
mod error;
mod ledger;
mod money;
mod ops;
mod packages;
mod payments;
mod session_records;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
