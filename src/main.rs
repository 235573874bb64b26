// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Setoran-Dosen command line client
//!
//! Thin front end over the controllers: each subcommand runs one
//! operation, waits for its stream to settle and prints the result.

use clap::{Parser, Subcommand};
use setoran_dosen::{
    config::Config,
    controllers::{
        DashboardController, LoginController, SubmissionController, SubmissionDetailController,
    },
    error::SessionError,
    models::{DosenResponse, SetoranMahasiswaResponse},
    state::RequestState,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "setoran", version, about = "Track student setoran progress as an advisor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store tokens locally
    Login {
        #[arg(short, long)]
        username: String,
        /// Falls back to SETORAN_PASSWORD
        #[arg(short, long, env = "SETORAN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget stored tokens
    Logout,
    /// Show advisor profile and advised students
    Dashboard,
    /// Show one student's submission detail
    Detail { nim: String },
    /// List components a student has not submitted yet
    Pending { nim: String },
    /// Record a submission
    Add {
        nim: String,
        component_id: String,
        component_name: String,
    },
    /// Delete a submission
    Delete {
        nim: String,
        submission_id: String,
        component_id: String,
        component_name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    tracing::debug!(api = %config.api_base_url, "Configuration loaded");
    let state = AppState::from_config(config)?;

    let ok = match cli.command {
        Command::Login { username, password } => {
            let controller = LoginController::new(state.session.clone());
            controller.login(username, password).await?;
            report(controller.status().current(), |user| {
                println!("Signed in as {}", user)
            })
        }
        Command::Logout => {
            DashboardController::new(state.session.clone()).logout()?;
            println!("Signed out");
            true
        }
        Command::Dashboard => {
            let controller = DashboardController::new(state.session.clone());
            controller.fetch_advisor().await?;
            report(controller.advisor().current(), print_dashboard)
        }
        Command::Detail { nim } => {
            let controller = SubmissionDetailController::new(state.session.clone(), nim);
            controller.fetch().await?;
            report(controller.submissions().current(), print_detail)
        }
        Command::Pending { nim } => {
            let controller = SubmissionDetailController::new(state.session.clone(), nim);
            controller.fetch().await?;
            report(controller.submissions().current(), print_pending)
        }
        Command::Add {
            nim,
            component_id,
            component_name,
        } => {
            let controller = SubmissionController::new(state.session.clone());
            controller
                .add_submission(nim, component_id, component_name)
                .await?;
            report(controller.submissions().current(), print_detail)
        }
        Command::Delete {
            nim,
            submission_id,
            component_id,
            component_name,
        } => {
            let controller = SubmissionController::new(state.session.clone());
            controller
                .delete_submission(nim, submission_id, component_id, component_name)
                .await?;
            report(controller.submissions().current(), print_detail)
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Print a settled state; returns false on error.
fn report<T>(state: RequestState<T>, on_success: impl FnOnce(&T)) -> bool {
    match state {
        RequestState::Success(data) => {
            on_success(&data);
            true
        }
        RequestState::Error(err) => {
            eprintln!("Error: {}", err);
            if err.requires_login() {
                eprintln!("Run `setoran login` to sign in again.");
            } else if let SessionError::InvalidInput(_) = err {
                eprintln!("Check the command arguments.");
            }
            false
        }
        RequestState::Idle | RequestState::Loading => {
            eprintln!("Error: request did not complete");
            false
        }
    }
}

fn print_dashboard(response: &DosenResponse) {
    let dosen = &response.data;
    println!("{} (NIP {})", dosen.nama, dosen.nip);
    println!("{}", dosen.email);
    println!();
    for m in dosen.students() {
        println!(
            "{:<14} {:<32} {:>6}  {:>5.1}%",
            m.nim, m.nama, m.angkatan, m.info_setoran.persentase_progres_setor
        );
    }
}

fn print_detail(response: &SetoranMahasiswaResponse) {
    let info = &response.data.info;
    let summary = &response.data.setoran.info_dasar;
    println!("{} ({}), angkatan {}, semester {}", info.nama, info.nim, info.angkatan, info.semester);
    println!("Dosen PA: {}", info.dosen_pa.nama);
    println!(
        "Progres: {}/{} ({:.1}%), terakhir setor: {}",
        summary.total_sudah_setor,
        summary.total_wajib_setor,
        summary.persentase_progres_setor,
        summary.terakhir_setor
    );
    for r in &response.data.setoran.ringkasan {
        println!(
            "  {:<12} {}/{} ({:.1}%)",
            r.label, r.total_sudah_setor, r.total_wajib_setor, r.persentase_progres_setor
        );
    }
    println!();
    for d in &response.data.setoran.detail {
        match &d.info_setoran {
            Some(s) => println!(
                "[x] {:<10} {:<24} {:<8} {} by {} (setoran {})",
                d.id, d.nama, d.label, s.tgl_validasi, s.dosen_yang_mengesahkan.nama, s.id
            ),
            None => println!("[ ] {:<10} {:<24} {}", d.id, d.nama, d.label),
        }
    }
    for bad in response.data.inconsistent_items() {
        tracing::warn!(component_id = %bad.id, "Submission status and record disagree");
    }
}

fn print_pending(response: &SetoranMahasiswaResponse) {
    for d in response.data.pending_components() {
        println!("{:<10} {:<24} {}", d.id, d.nama, d.label);
    }
}

/// Initialize logging on stderr; `LOG_FORMAT=json` for structured output.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("setoran_dosen=info".parse().unwrap())
        .add_directive("warn".parse().unwrap());

    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json") {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .init();
    }
}
