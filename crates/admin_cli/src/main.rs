use std::{error::Error, io::Write};

use chrono::{Duration, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{
    ClientInput, Engine, Money, PackageInput, PackageTier, PaymentInput, PaymentMethod,
    SessionInput, SessionStatus, StaffRegistration,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "consultorio_admin")]
#[command(about = "Admin utilities for the clinic ledger (staff accounts, demo data)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./consultorio.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    /// Loads a handful of demo clients with packages, payments and sessions.
    Seed,
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    name: String,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrumpido".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

/// Asks for the password and its confirmation, returning both as typed.
fn prompt_password_twice() -> Result<(String, String), Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Contraseña: ")?;
        if p1.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("La contraseña no puede estar vacía.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirmar contraseña: ")?;
        if p1 == p2 {
            return Ok((p1, p2));
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Las contraseñas no coinciden. Intenta de nuevo.\r\n")
        )?;
    }

    Err("demasiados intentos".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

struct DemoClient {
    name: &'static str,
    age: i64,
    pathology: &'static str,
    email: Option<&'static str>,
    tier: PackageTier,
    paid_major: i64,
    completed: u32,
    pending: u32,
}

const DEMO_CLIENTS: [DemoClient; 3] = [
    DemoClient {
        name: "María López",
        age: 34,
        pathology: "Lumbalgia crónica",
        email: Some("maria@email.com"),
        tier: PackageTier::S5,
        paid_major: 1000,
        completed: 2,
        pending: 3,
    },
    DemoClient {
        name: "Carlos Ramírez",
        age: 52,
        pathology: "Rehabilitación de rodilla",
        email: None,
        tier: PackageTier::S10,
        paid_major: 2500,
        completed: 6,
        pending: 1,
    },
    DemoClient {
        name: "Ana Martínez",
        age: 28,
        pathology: "Esguince de tobillo",
        email: Some("ana.martinez@email.com"),
        tier: PackageTier::S1,
        paid_major: 350,
        completed: 1,
        pending: 0,
    },
];

async fn seed(engine: &Engine) -> Result<(), Box<dyn Error + Send + Sync>> {
    let start = Utc
        .with_ymd_and_hms(2026, 3, 2, 16, 0, 0)
        .single()
        .ok_or("invalid seed date")?;

    for demo in DEMO_CLIENTS {
        let client = engine
            .create_client(ClientInput {
                name: demo.name.to_string(),
                age: demo.age,
                pathology: demo.pathology.to_string(),
                email: demo.email.map(str::to_string),
                phone: None,
                notes: None,
            })
            .await?;

        let package = engine
            .create_package(PackageInput {
                client_id: client.id,
                tier: demo.tier,
                total_price: demo.tier.suggested_price(),
                start_date: start,
            })
            .await?;

        engine
            .create_payment(PaymentInput {
                package_id: package.id,
                amount: Money::from_major(demo.paid_major),
                payment_date: start,
                method: PaymentMethod::Efectivo,
                notes: None,
            })
            .await?;

        let statuses = std::iter::repeat_n(SessionStatus::Completada, demo.completed as usize)
            .chain(std::iter::repeat_n(SessionStatus::Pendiente, demo.pending as usize));
        for (week, status) in statuses.enumerate() {
            engine
                .create_session(SessionInput {
                    package_id: package.id,
                    session_date: Some(start + Duration::weeks(week as i64)),
                    status,
                    notes: None,
                })
                .await?;
        }

        println!("seeded client: {} ({})", client.name, client.id);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let (password, confirm_password) = prompt_password_twice()?;

            match engine
                .register_staff(StaffRegistration {
                    name: args.name,
                    email: args.email,
                    password,
                    confirm_password,
                })
                .await
            {
                Ok(user) => println!("created user: {}", user.email),
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            }
        }
        Command::Seed => seed(&engine).await?,
    }

    Ok(())
}
