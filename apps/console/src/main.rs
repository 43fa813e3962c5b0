//! Regulator console - operator command line.
//!
//! Usage:
//!   regulator-console --health-check
//!   regulator-console list <resource> [search]
//!   regulator-console incident <id>
//!   regulator-console forward|return|close <id>
//!
//! Signs in with `CONSOLE_EMAIL` / `CONSOLE_PASSWORD` and prints every toast
//! the command raises.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use regulator_console_lib::Console;
use regulator_console_lib::auth::Credentials;
use regulator_console_lib::config::Config;
use regulator_console_lib::error::{AppError, AppResult};
use regulator_console_lib::models::{
    Company, Facility, Identified, Incident, Lga, NameItem, NameItemKind, Role, State, Template,
    User,
};
use regulator_console_lib::services::ToastLevel;
use regulator_console_lib::table::{Column, ManagementTable};
use regulator_console_lib::workflow::{Stepper, WorkflowAction};

enum Command {
    List {
        resource: String,
        search: Option<String>,
    },
    Show(String),
    Transition(WorkflowAction, String),
}

impl Command {
    fn parse(args: &[String]) -> Option<Self> {
        let (name, rest) = args.split_first()?;
        match (name.as_str(), rest) {
            ("list", [resource]) => Some(Self::List {
                resource: resource.clone(),
                search: None,
            }),
            ("list", [resource, search @ ..]) => Some(Self::List {
                resource: resource.clone(),
                search: Some(search.join(" ")),
            }),
            ("incident", [id]) => Some(Self::Show(id.clone())),
            ("forward", [id]) => Some(Self::Transition(WorkflowAction::Forward, id.clone())),
            ("return", [id]) => Some(Self::Transition(WorkflowAction::Return, id.clone())),
            ("close", [id]) => Some(Self::Transition(WorkflowAction::Close, id.clone())),
            _ => None,
        }
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  regulator-console --health-check");
    eprintln!("  regulator-console list <resource> [search]");
    eprintln!("  regulator-console incident <id>");
    eprintln!("  regulator-console forward|return|close <id>");
    eprintln!();
    eprintln!("Resources: facilities, companies, incidents, templates, users, roles, states, lgas,");
    eprintln!("           installationTypes, facilityTypes, injuryTypes, sectors");
}

/// Reachability of the configured backend (for container health checks).
async fn health_check() -> bool {
    let Ok(config) = Config::from_env() else {
        return false;
    };
    match Console::new(config, None) {
        Ok(console) => console.client().health_check().await,
        Err(_) => false,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--health-check") {
        return if health_check().await {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
        return ExitCode::FAILURE;
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, API_URL and AUTH_URL must use https");
            error!("  - CONSOLE_QUERY_GC_SECS must not be shorter than CONSOLE_QUERY_STALE_SECS");
            return ExitCode::FAILURE;
        }
    };

    let Some(command) = Command::parse(&args) else {
        print_usage();
        return ExitCode::from(2);
    };

    info!("Regulator console ({}) against {}", config.environment, config.api_url);
    if config.is_development() {
        warn!("Running in DEVELOPMENT mode");
    }

    let console = match sign_in(config).await {
        Ok(console) => console,
        Err(e) => {
            error!("Sign-in failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut toasts = console.notifier().subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match toasts.recv().await {
                Ok(toast) => match toast.level {
                    ToastLevel::Error => eprintln!("[{}] {}", toast.level, toast.message),
                    _ => println!("[{}] {}", toast.level, toast.message),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Toast printer lagged, {} notifications skipped", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let result = run(&console, command).await;

    // Closing the last notifier handle ends the printer once it has drained.
    drop(console);
    if let Err(e) = printer.await {
        warn!("Toast printer stopped: {}", e);
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn sign_in(config: Config) -> AppResult<Console> {
    let email = env::var("CONSOLE_EMAIL")
        .map_err(|_| AppError::InvalidInput("CONSOLE_EMAIL is not set".into()))?;
    let password = env::var("CONSOLE_PASSWORD")
        .map_err(|_| AppError::InvalidInput("CONSOLE_PASSWORD is not set".into()))?;

    let anonymous = Console::new(config, None)?;
    let session = anonymous
        .auth()?
        .sign_in(&Credentials::new(email, password))
        .await?;
    info!("Signed in as {}", session.user().full_name);
    Ok(anonymous.with_session(Some(session)).await)
}

async fn run(console: &Console, command: Command) -> AppResult<()> {
    match command {
        Command::List { resource, search } => list(console, &resource, search.as_deref()).await,
        Command::Show(id) => {
            let incident = load_incident(console, &id).await?;
            print_incident(console, &incident);
            Ok(())
        }
        Command::Transition(action, id) => {
            let incident = load_incident(console, &id).await?;
            let updated = console.workflow().apply(&incident, action).await?;
            print_incident(console, &updated);
            Ok(())
        }
    }
}

async fn load_incident(console: &Console, id: &str) -> AppResult<Arc<Incident>> {
    console
        .incidents()
        .detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Incident {}", id)))
}

fn print_incident(console: &Console, incident: &Incident) {
    let stepper = Stepper::for_incident(console.workflow().definition(), incident);
    println!("Incident {}", incident.id);
    println!("  Status:   {}", incident.status);
    println!("  Desk:     {}", incident.current_desk);
    println!("  Revision: {}", incident.revision);
    println!("  {}", stepper);
}

async fn list(console: &Console, resource: &str, search: Option<&str>) -> AppResult<()> {
    let page_size = console.config().page_size;
    match resource {
        "facilities" => {
            let rows = console.facilities().list().await?;
            print_rows(rows, page_size, search, vec![
                Column::new("name", "Name", |f: &Facility| f.name.clone()),
                Column::new("oml", "OML Number", |f: &Facility| f.oml_number.clone()),
                Column::new("state", "State", |f: &Facility| {
                    f.state_name.clone().unwrap_or_default()
                }),
            ]);
        }
        "companies" => {
            let rows = console.companies().list().await?;
            print_rows(rows, page_size, search, vec![Column::new(
                "name",
                "Name",
                |c: &Company| c.name.clone(),
            )]);
        }
        "incidents" => {
            let rows = console.incidents().list().await?;
            print_rows(rows, page_size, search, vec![
                Column::new("facility", "Facility", |i: &Incident| {
                    i.incident_detail.facility_name.clone().unwrap_or_default()
                }),
                Column::new("status", "Status", |i: &Incident| i.status.to_string()),
                Column::new("desk", "Desk", |i: &Incident| i.current_desk.clone()),
            ]);
        }
        "templates" => {
            let rows = console.templates().list().await?;
            print_rows(rows, page_size, search, vec![
                Column::new("name", "Name", |t: &Template| t.name.clone()),
                Column::new("type", "Type", |t: &Template| t.file_type.clone()),
            ]);
        }
        "users" => {
            let rows = console.users().list().await?;
            print_rows(rows, page_size, search, vec![
                Column::new("name", "Name", |u: &User| u.full_name.clone()),
                Column::new("email", "Email", |u: &User| u.email.clone()),
                Column::new("roles", "Roles", |u: &User| u.roles.join(", ")),
            ]);
        }
        "roles" => {
            let rows = console.roles().list().await?;
            print_rows(rows, page_size, search, vec![
                Column::new("name", "Name", |r: &Role| r.name.clone()),
                Column::new("users", "Users", |r: &Role| r.user_count.to_string()),
            ]);
        }
        "states" => {
            let rows = console.locations().states().await?;
            print_rows(rows, page_size, search, vec![Column::new(
                "name",
                "Name",
                |s: &State| s.name.clone(),
            )]);
        }
        "lgas" => {
            let rows = console.locations().lgas().await?;
            print_rows(rows, page_size, search, vec![
                Column::new("name", "Name", |l: &Lga| l.name.clone()),
                Column::new("state", "State", |l: &Lga| l.state_id.clone()),
            ]);
        }
        other => {
            let kind = NameItemKind::parse(other)
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown resource: {}", other)))?;
            let rows = console.name_items(kind).list().await?;
            print_rows(rows, page_size, search, vec![Column::new(
                "name",
                "Name",
                |n: &NameItem| n.name.clone(),
            )]);
        }
    }
    Ok(())
}

/// First page of the rows, searched through the same table the console uses.
fn print_rows<T: Identified + Clone>(
    rows: Arc<Vec<T>>,
    page_size: usize,
    search: Option<&str>,
    columns: Vec<Column<T>>,
) {
    let mut table = ManagementTable::new(Arc::unwrap_or_clone(rows), columns, page_size);
    if let Some(query) = search {
        table.set_search(query);
    }

    let header: Vec<&str> = table.columns().iter().map(|c| c.header.as_str()).collect();
    println!("ID\t{}", header.join("\t"));
    for row in table.page_rows() {
        let cells: Vec<String> = table.columns().iter().map(|c| c.value(row)).collect();
        println!("{}\t{}", row.id(), cells.join("\t"));
    }
    println!(
        "-- page 1 of {}, {} of {} rows",
        table.page_count().max(1),
        table.filtered_count(),
        table.rows().len()
    );
}
