use std::future::Future;
use std::io::Write as _;
use std::path::Path;

use api_client::{
    ApiClient, ApiError, BookAppointmentRequest, DoctorProfileUpdate, SubmitFeedbackRequest,
    UpdateAppointmentRequest,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use notifications::NotificationStream;
use portal_core::config::{
    request_timeout_from_env_value, session_file_from_env_value, DEFAULT_API_URL,
};
use portal_core::models::{Appointment, Doctor, Feedback, Medication, Notification, Nurse, Patient};
use portal_core::status::AppointmentStatus;
use portal_core::{
    filter_by_tab, gate_section, AppointmentCategory, CoreConfig, SearchFields, SectionAccess,
    Session, SessionStore,
};
use portal_types::{NonEmptyText, Role};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Healthcare portal terminal client")]
struct Cli {
    /// Re-invoke a failed fetch once before giving up
    #[arg(long, global = true)]
    retry: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        /// Account email
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Show the authenticated identity
    Whoami,
    /// Admin section
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Doctor section
    Doctor {
        #[command(subcommand)]
        command: DoctorCommands,
    },
    /// Nurse section
    Nurse {
        #[command(subcommand)]
        command: NurseCommands,
    },
    /// Patient section
    Patient {
        #[command(subcommand)]
        command: PatientCommands,
    },
    /// Notifications
    Notifications {
        #[command(subcommand)]
        command: NotificationCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Aggregate counts across the portal
    Dashboard,
    /// Patient roster
    Patients {
        /// Case-insensitive substring filter
        #[arg(long)]
        search: Option<String>,
    },
    /// Doctor directory
    Doctors {
        #[arg(long)]
        search: Option<String>,
    },
    /// Nurse directory
    Nurses {
        #[arg(long)]
        search: Option<String>,
    },
    /// Patient feedback review
    Feedback,
}

#[derive(Subcommand)]
enum DoctorCommands {
    /// Own appointment list
    Appointments {
        /// upcoming, completed or cancelled
        #[arg(long)]
        tab: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Own profile
    Profile,
    /// Toggle whether new appointments may be booked with you
    SetAvailability {
        /// true or false
        available: bool,
    },
    /// Mark an appointment completed, then show the refreshed list
    Complete {
        /// Appointment id
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum NurseCommands {
    /// Ward patient roster
    Patients {
        #[arg(long)]
        search: Option<String>,
    },
    /// Ward appointment list
    Appointments {
        #[arg(long)]
        tab: Option<String>,
    },
}

#[derive(Subcommand)]
enum PatientCommands {
    /// Book an appointment
    Book {
        /// Doctor id
        #[arg(long)]
        doctor_id: Uuid,
        /// Appointment time, RFC 3339 (e.g. 2025-06-03T09:30:00Z)
        #[arg(long)]
        date: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Own appointment list
    Appointments {
        #[arg(long)]
        tab: Option<String>,
    },
    /// Cancel an appointment, then show the refreshed list
    Cancel {
        /// Appointment id
        id: Uuid,
    },
    /// Current medications
    Medications,
    /// Previously submitted feedback
    FeedbackHistory,
    /// Leave feedback
    Feedback {
        message: String,
        /// 1-5
        #[arg(long)]
        rating: Option<u8>,
    },
}

#[derive(Subcommand)]
enum NotificationCommands {
    /// List notifications
    List {
        /// Only unread ones
        #[arg(long)]
        unread: bool,
    },
    /// Mark one notification read
    MarkRead {
        /// Notification id
        id: Uuid,
    },
    /// Stream notifications as the backend pushes them
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let cfg = resolve_config()?;

    match cli.command {
        Some(Commands::Login { email, password }) => {
            let password = match password {
                Some(password) => password,
                None => prompt_password()?,
            };
            let mut client = ApiClient::new(&cfg);
            let response = client.login(&email, &password).await?;
            let store = SessionStore::new(cfg.session_file());
            store.save(&Session {
                token: response.token,
                role: response.role,
            })?;
            println!("Logged in as {} ({})", email, response.role);
        }
        Some(Commands::Logout) => {
            SessionStore::new(cfg.session_file()).clear()?;
            println!("Logged out.");
        }
        Some(Commands::Whoami) => {
            let client = authed_client(&cfg)?;
            let user = fetch(cli.retry, || client.me()).await?;
            println!("{} <{}>: {}", user.display_name(), user.email, user.role);
        }
        Some(Commands::Admin { command }) => {
            let client = enter_section(&cfg, Role::Admin)?;
            run_admin(command, &client, cli.retry).await?;
        }
        Some(Commands::Doctor { command }) => {
            let client = enter_section(&cfg, Role::Doctor)?;
            run_doctor(command, &client, cli.retry).await?;
        }
        Some(Commands::Nurse { command }) => {
            let client = enter_section(&cfg, Role::Nurse)?;
            run_nurse(command, &client, cli.retry).await?;
        }
        Some(Commands::Patient { command }) => {
            let client = enter_section(&cfg, Role::Patient)?;
            run_patient(command, &client, cli.retry).await?;
        }
        Some(Commands::Notifications { command }) => {
            let client = authed_client(&cfg)?;
            run_notifications(command, &client, &cfg, cli.retry).await?;
        }
        None => {
            println!("Use 'portal --help' for commands");
        }
    }

    Ok(())
}

/// Resolve configuration from the environment, once, before dispatch.
fn resolve_config() -> anyhow::Result<CoreConfig> {
    let api_base_url =
        std::env::var("PORTAL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
    let ws_url = std::env::var("PORTAL_WS_URL").ok();
    let data_dir = std::env::var("PORTAL_DATA_DIR").unwrap_or_else(|_| ".portal".into());
    let session_file =
        session_file_from_env_value(std::env::var("PORTAL_SESSION_FILE").ok(), Path::new(&data_dir));
    let request_timeout =
        request_timeout_from_env_value(std::env::var("PORTAL_REQUEST_TIMEOUT_SECS").ok())?;
    Ok(CoreConfig::new(api_base_url, ws_url, session_file, request_timeout)?)
}

/// Gate a role section, returning an authenticated client when allowed.
fn enter_section(cfg: &CoreConfig, role: Role) -> anyhow::Result<ApiClient> {
    let store = SessionStore::new(cfg.session_file());
    match gate_section(role, &store, Utc::now()) {
        SectionAccess::Allow { .. } => {
            let session = store.load()?;
            Ok(ApiClient::with_token(cfg, session.token))
        }
        SectionAccess::RedirectToLogin { reason } => {
            anyhow::bail!("{reason}: run `portal login` first")
        }
    }
}

/// An authenticated client for commands any role may run.
fn authed_client(cfg: &CoreConfig) -> anyhow::Result<ApiClient> {
    let store = SessionStore::new(cfg.session_file());
    let session = store
        .load()
        .map_err(|_| anyhow::anyhow!("not logged in: run `portal login` first"))?;
    match gate_section(session.role, &store, Utc::now()) {
        SectionAccess::Allow { .. } => Ok(ApiClient::with_token(cfg, session.token)),
        SectionAccess::RedirectToLogin { reason } => {
            anyhow::bail!("{reason}: run `portal login` first")
        }
    }
}

fn prompt_password() -> anyhow::Result<String> {
    print!("password: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end().to_owned())
}

/// Run one fetch, re-invoking it once on failure when `--retry` was given.
/// This is the pages' manual "Retry" button, nothing more.
async fn fetch<T, F, Fut>(retry: bool, call: F) -> Result<T, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    match call().await {
        Ok(value) => Ok(value),
        Err(e) if retry => {
            eprintln!("fetch failed ({e}), retrying once");
            call().await
        }
        Err(e) => Err(e),
    }
}

fn parse_tab(tab: Option<String>) -> anyhow::Result<Option<AppointmentCategory>> {
    Ok(match tab {
        Some(raw) => Some(raw.parse()?),
        None => None,
    })
}

fn apply_search<T: SearchFields>(query: Option<&str>, list: &mut Vec<T>) {
    if let Some(query) = query {
        list.retain(|record| portal_core::search::matches(query, record));
    }
}

async fn run_admin(command: AdminCommands, client: &ApiClient, retry: bool) -> anyhow::Result<()> {
    match command {
        AdminCommands::Dashboard => {
            let dashboard = api_client::admin_dashboard(client).await;
            println!("Doctors:      {}", dashboard.doctor_count);
            println!("Patients:     {}", dashboard.patient_count);
            println!("Appointments: {}", dashboard.appointment_count);
            println!("Feedback:     {}", dashboard.feedback_count);
            if !dashboard.recent_appointments.is_empty() {
                println!("\nMost recent appointments:");
                print_appointments(dashboard.recent_appointments.iter(), Utc::now());
            }
        }
        AdminCommands::Patients { search } => {
            let mut patients = fetch(retry, || client.admin_patients()).await?;
            apply_search(search.as_deref(), &mut patients);
            print_patients(&patients);
        }
        AdminCommands::Doctors { search } => {
            let mut doctors = fetch(retry, || client.doctors()).await?;
            apply_search(search.as_deref(), &mut doctors);
            print_doctors(&doctors);
        }
        AdminCommands::Nurses { search } => {
            let mut nurses = fetch(retry, || client.nurses()).await?;
            apply_search(search.as_deref(), &mut nurses);
            print_nurses(&nurses);
        }
        AdminCommands::Feedback => {
            let feedback = fetch(retry, || client.admin_feedback()).await?;
            print_feedback(&feedback);
        }
    }
    Ok(())
}

async fn run_doctor(
    command: DoctorCommands,
    client: &ApiClient,
    retry: bool,
) -> anyhow::Result<()> {
    match command {
        DoctorCommands::Appointments { tab, search } => {
            let mut appointments = fetch(retry, || client.my_appointments()).await?;
            apply_search(search.as_deref(), &mut appointments);
            print_tabbed_appointments(&appointments, parse_tab(tab)?);
        }
        DoctorCommands::Profile => {
            let profile = fetch(retry, || client.doctor_me()).await?;
            println!("{}", profile.display_name());
            if let Some(specialization) = &profile.specialization {
                println!("Specialization: {specialization}");
            }
            if let Some(department) = &profile.department {
                println!("Department:     {department}");
            }
            if let Some(phone) = &profile.phone {
                println!("Phone:          {phone}");
            }
            if let Some(available) = profile.available {
                println!("Available:      {}", if available { "yes" } else { "no" });
            }
        }
        DoctorCommands::SetAvailability { available } => {
            let profile = client
                .update_doctor_me(&DoctorProfileUpdate {
                    available: Some(available),
                    ..Default::default()
                })
                .await?;
            println!(
                "{} is now {}",
                profile.display_name(),
                if available { "available" } else { "unavailable" }
            );
        }
        DoctorCommands::Complete { id } => {
            let update = UpdateAppointmentRequest {
                status: Some(AppointmentStatus::Completed),
                ..Default::default()
            };
            client.update_appointment(id, &update).await?;
            println!("Appointment {id} marked completed.\n");
            let appointments = fetch(retry, || client.my_appointments()).await?;
            print_tabbed_appointments(&appointments, None);
        }
    }
    Ok(())
}

async fn run_nurse(command: NurseCommands, client: &ApiClient, retry: bool) -> anyhow::Result<()> {
    match command {
        NurseCommands::Patients { search } => {
            let mut patients = fetch(retry, || client.patients()).await?;
            apply_search(search.as_deref(), &mut patients);
            print_patients(&patients);
        }
        NurseCommands::Appointments { tab } => {
            let appointments = fetch(retry, || client.appointments()).await?;
            print_tabbed_appointments(&appointments, parse_tab(tab)?);
        }
    }
    Ok(())
}

async fn run_patient(
    command: PatientCommands,
    client: &ApiClient,
    retry: bool,
) -> anyhow::Result<()> {
    match command {
        PatientCommands::Book {
            doctor_id,
            date,
            reason,
        } => {
            let date: DateTime<Utc> = date
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid --date (expected RFC 3339): {e}"))?;
            let booked = client
                .book_appointment(&BookAppointmentRequest {
                    doctor_id,
                    date,
                    reason,
                })
                .await?;
            println!(
                "Booked appointment {} with {} on {}",
                booked.id,
                booked.doctor_name(),
                booked.date.format("%Y-%m-%d %H:%M")
            );
        }
        PatientCommands::Appointments { tab } => {
            let appointments = fetch(retry, || client.my_appointments()).await?;
            print_tabbed_appointments(&appointments, parse_tab(tab)?);
        }
        PatientCommands::Cancel { id } => {
            client.cancel_appointment(id).await?;
            println!("Appointment {id} cancelled.\n");
            let appointments = fetch(retry, || client.my_appointments()).await?;
            print_tabbed_appointments(&appointments, None);
        }
        PatientCommands::Medications => {
            let medications = fetch(retry, || client.my_medications()).await?;
            print_medications(&medications);
        }
        PatientCommands::FeedbackHistory => {
            let feedback = fetch(retry, || client.my_feedback()).await?;
            print_feedback(&feedback);
        }
        PatientCommands::Feedback { message, rating } => {
            let message = NonEmptyText::new(&message)
                .map_err(|_| anyhow::anyhow!("feedback message cannot be empty"))?;
            client
                .submit_feedback(&SubmitFeedbackRequest {
                    message: message.as_str().to_owned(),
                    rating,
                })
                .await?;
            println!("Thanks, your feedback was submitted.");
        }
    }
    Ok(())
}

async fn run_notifications(
    command: NotificationCommands,
    client: &ApiClient,
    cfg: &CoreConfig,
    retry: bool,
) -> anyhow::Result<()> {
    match command {
        NotificationCommands::List { unread } => {
            let mut list = fetch(retry, || client.notifications()).await?;
            if unread {
                list.retain(|n| !n.read);
            }
            print_notifications(&list);
        }
        NotificationCommands::MarkRead { id } => {
            client.mark_notification_read(id).await?;
            println!("Notification {id} marked read.");
        }
        NotificationCommands::Watch => {
            let store = SessionStore::new(cfg.session_file());
            let session = store.load()?;
            let mut stream = NotificationStream::connect(cfg.ws_url(), &session.token).await?;
            println!("Watching notifications (Ctrl-C to stop)…");
            while let Some(event) = stream.next().await {
                match event {
                    Ok(notification) => print_notification_line(&notification),
                    Err(e) => eprintln!("notification error: {e}"),
                }
            }
            println!("Notification stream closed by the backend.");
        }
    }
    Ok(())
}

// --- rendering ---

fn print_tabbed_appointments(appointments: &[Appointment], tab: Option<AppointmentCategory>) {
    let now = Utc::now();
    match tab {
        Some(tab) => {
            let visible = filter_by_tab(appointments, tab, now);
            if visible.is_empty() {
                println!("No {tab} appointments.");
            } else {
                print_appointments(visible.into_iter(), now);
            }
        }
        None => {
            if appointments.is_empty() {
                println!("No appointments.");
            } else {
                print_appointments(appointments.iter(), now);
            }
        }
    }
}

fn print_appointments<'a>(
    appointments: impl Iterator<Item = &'a Appointment>,
    now: DateTime<Utc>,
) {
    println!(
        "{:<36}  {:<16}  {:<20}  {:<20}  {:<11}  {}",
        "ID", "Date", "Patient", "Doctor", "Status", "Category"
    );
    for a in appointments {
        println!(
            "{:<36}  {:<16}  {:<20}  {:<20}  {:<11}  {}",
            a.id,
            a.date.format("%Y-%m-%d %H:%M"),
            a.patient_name(),
            a.doctor_name(),
            a.status.to_string(),
            a.category(now)
        );
    }
}

fn print_patients(patients: &[Patient]) {
    if patients.is_empty() {
        println!("No patients found.");
        return;
    }
    println!("{:<36}  {:<24}  {:<28}  {}", "ID", "Name", "Email", "Phone");
    for p in patients {
        println!(
            "{:<36}  {:<24}  {:<28}  {}",
            p.id,
            p.display_name(),
            p.email.as_deref().unwrap_or("-"),
            p.phone.as_deref().unwrap_or("-")
        );
    }
}

fn print_doctors(doctors: &[Doctor]) {
    if doctors.is_empty() {
        println!("No doctors found.");
        return;
    }
    println!(
        "{:<36}  {:<24}  {:<20}  {}",
        "ID", "Name", "Specialization", "Department"
    );
    for d in doctors {
        println!(
            "{:<36}  {:<24}  {:<20}  {}",
            d.id,
            d.display_name(),
            d.specialization.as_deref().unwrap_or("-"),
            d.department.as_deref().unwrap_or("-")
        );
    }
}

fn print_nurses(nurses: &[Nurse]) {
    if nurses.is_empty() {
        println!("No nurses found.");
        return;
    }
    println!("{:<36}  {:<24}  {:<16}  {}", "ID", "Name", "Department", "Shift");
    for n in nurses {
        println!(
            "{:<36}  {:<24}  {:<16}  {}",
            n.id,
            n.display_name(),
            n.department.as_deref().unwrap_or("-"),
            n.shift.as_deref().unwrap_or("-")
        );
    }
}

fn print_feedback(feedback: &[Feedback]) {
    if feedback.is_empty() {
        println!("No feedback yet.");
        return;
    }
    for f in feedback {
        let from = f
            .patient
            .as_ref()
            .map(|p| p.display_name())
            .unwrap_or_else(|| "(anonymous)".into());
        let rating = f
            .rating
            .map(|r| format!("{r}/5"))
            .unwrap_or_else(|| "-".into());
        println!("[{rating}] {from}: {}", f.message);
    }
}

fn print_medications(medications: &[Medication]) {
    if medications.is_empty() {
        println!("No current medications.");
        return;
    }
    println!("{:<24}  {:<12}  {:<14}  {}", "Name", "Dosage", "Frequency", "Prescribed by");
    for m in medications {
        let prescriber = m
            .prescribed_by
            .as_ref()
            .map(|p| p.display_name())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<24}  {:<12}  {:<14}  {}",
            m.name,
            m.dosage.as_deref().unwrap_or("-"),
            m.frequency.as_deref().unwrap_or("-"),
            prescriber
        );
    }
}

fn print_notifications(notifications: &[Notification]) {
    if notifications.is_empty() {
        println!("No notifications.");
        return;
    }
    for n in notifications {
        print_notification_line(n);
    }
}

fn print_notification_line(n: &Notification) {
    let marker = if n.read { " " } else { "*" };
    let when = n
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".into());
    match &n.title {
        Some(title) => println!("{marker} [{when}] {title}: {}", n.message),
        None => println!("{marker} [{when}] {}", n.message),
    }
}
