//! Initial schema of the clinic ledger.
//!
//! - `users`: staff accounts allowed into the dashboard
//! - `clients`: patients, with the pointer to their active package
//! - `packages`: session bundles bought by a client
//! - `session_records`: attendance entries of a package
//! - `payments`: money received for a package

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Email,
    Name,
    PasswordSalt,
    PasswordHash,
}

#[derive(Iden)]
enum Clients {
    Table,
    Id,
    Name,
    Age,
    Pathology,
    Email,
    Phone,
    Notes,
    Status,
    ActivePackageId,
    CreatedAt,
}

#[derive(Iden)]
enum Packages {
    Table,
    Id,
    ClientId,
    Tier,
    TotalPriceMinor,
    StartDate,
    Status,
    BalanceStatus,
    SessionsIssued,
}

#[derive(Iden)]
enum SessionRecords {
    Table,
    Id,
    PackageId,
    SessionNumber,
    SessionDate,
    Status,
    Notes,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    PackageId,
    AmountMinor,
    PaymentDate,
    Method,
    Notes,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::PasswordSalt).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Clients
        // ───────────────────────────────────────────────────────────────────
        // `active_package_id` has no FK: packages reference clients, and the
        // engine keeps the pointer in sync inside its transactions.
        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clients::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clients::Name).string().not_null())
                    .col(ColumnDef::new(Clients::Age).integer().not_null())
                    .col(ColumnDef::new(Clients::Pathology).string().not_null())
                    .col(ColumnDef::new(Clients::Email).string())
                    .col(ColumnDef::new(Clients::Phone).string())
                    .col(ColumnDef::new(Clients::Notes).string())
                    .col(
                        ColumnDef::new(Clients::Status)
                            .string()
                            .not_null()
                            .default("Activo"),
                    )
                    .col(ColumnDef::new(Clients::ActivePackageId).string())
                    .col(ColumnDef::new(Clients::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-clients-status")
                    .table(Clients::Table)
                    .col(Clients::Status)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Packages
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Packages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Packages::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Packages::ClientId).string().not_null())
                    .col(ColumnDef::new(Packages::Tier).string().not_null())
                    .col(
                        ColumnDef::new(Packages::TotalPriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Packages::StartDate).timestamp().not_null())
                    .col(
                        ColumnDef::new(Packages::Status)
                            .string()
                            .not_null()
                            .default("Activo"),
                    )
                    .col(
                        ColumnDef::new(Packages::BalanceStatus)
                            .string()
                            .not_null()
                            .default("Adeudo"),
                    )
                    .col(
                        ColumnDef::new(Packages::SessionsIssued)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-packages-client_id")
                            .from(Packages::Table, Packages::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-packages-client_id-start_date")
                    .table(Packages::Table)
                    .col(Packages::ClientId)
                    .col(Packages::StartDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Session records
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SessionRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SessionRecords::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SessionRecords::PackageId).string().not_null())
                    .col(
                        ColumnDef::new(SessionRecords::SessionNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SessionRecords::SessionDate).timestamp())
                    .col(
                        ColumnDef::new(SessionRecords::Status)
                            .string()
                            .not_null()
                            .default("Pendiente"),
                    )
                    .col(ColumnDef::new(SessionRecords::Notes).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-session_records-package_id")
                            .from(SessionRecords::Table, SessionRecords::PackageId)
                            .to(Packages::Table, Packages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-session_records-package_id-number-unique")
                    .table(SessionRecords::Table)
                    .col(SessionRecords::PackageId)
                    .col(SessionRecords::SessionNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-session_records-session_date")
                    .table(SessionRecords::Table)
                    .col(SessionRecords::SessionDate)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Payments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::PackageId).string().not_null())
                    .col(
                        ColumnDef::new(Payments::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::PaymentDate).timestamp().not_null())
                    .col(
                        ColumnDef::new(Payments::Method)
                            .string()
                            .not_null()
                            .default("Efectivo"),
                    )
                    .col(ColumnDef::new(Payments::Notes).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-package_id")
                            .from(Payments::Table, Payments::PackageId)
                            .to(Packages::Table, Packages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-package_id-payment_date")
                    .table(Payments::Table)
                    .col(Payments::PackageId)
                    .col(Payments::PaymentDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SessionRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Packages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
