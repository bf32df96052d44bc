// Tripbot command line
//
// Reads a trip request (free text or structured hints), runs one planning
// cycle and prints the plan. Progress goes to stderr, the plan to stdout.

use clap::Parser;
use std::process::ExitCode;
use tokio::sync::broadcast::error::RecvError;
use tripbot::{
    AppConfig, CancellationToken, EventKind, OrchestrationOutcome, TravelOutput, TripHints,
    TripPlannerApiBuilder, TripRequest, TripbotError,
};

const DEFAULT_DAYS: u32 = 5;

/// Plan a trip with a team of research agents.
#[derive(Parser, Debug)]
#[command(name = "tripbot", version, about = "Multi-agent trip planner")]
struct Cli {
    /// Free-text request, e.g. "5 days in Tokyo under $2000, love food"
    request: Vec<String>,

    /// Destination (switches to structured mode)
    #[arg(long)]
    destination: Option<String>,

    /// Number of days, 1-14
    #[arg(long)]
    days: Option<u32>,

    /// Total budget in USD
    #[arg(long)]
    budget: Option<f64>,

    /// Special preferences, e.g. "vegetarian food, art museums"
    #[arg(long)]
    preferences: Option<String>,

    /// Print the raw JSON answer
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// The request to plan; a blank one is rejected before any setup
    fn trip_request(&self) -> Result<TripRequest, TripbotError> {
        let request = match &self.destination {
            Some(destination) => TripRequest::from_hints(
                destination,
                self.days.unwrap_or(DEFAULT_DAYS),
                self.budget,
                self.preferences.as_deref(),
            )?,
            None => TripRequest::new(self.request.join(" ")),
        };

        if request.is_blank() {
            return Err(TripbotError::InvalidRequest(
                "trip request is empty".to_string(),
            ));
        }
        Ok(request)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), TripbotError> {
    let request = cli.trip_request()?;

    let config = AppConfig::load()?;
    tracing::info!(
        "{} using {} ({})",
        tripbot::version::full_version_info(),
        config.model,
        config.provider
    );

    let mut api = TripPlannerApiBuilder::from_config(&config)?.build()?;

    let mut events = api.subscribe_events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(line) = progress_line(&event.kind) {
                        eprintln!("[{}] {}", event.timestamp.format("%H:%M:%S"), line);
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling...");
            on_interrupt.cancel();
        }
    });

    let outcome = api.plan_trip_with_cancel(&request, &cancel).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome.output)?);
    } else {
        println!("{}", render(&outcome, request.hints()));
    }

    Ok(())
}

fn progress_line(kind: &EventKind) -> Option<String> {
    match kind {
        EventKind::AgentStatusChange { .. } => None,
        EventKind::DelegationStarted { tool, sub_query } => {
            Some(format!("-> {}: {:.80}", tool, sub_query.replace('\n', " ")))
        }
        other => Some(other.to_string()),
    }
}

fn render(outcome: &OrchestrationOutcome, hints: Option<&TripHints>) -> String {
    let TravelOutput {
        destination,
        duration,
        summary,
        cost,
        tips,
    } = &outcome.output;

    let mut out = String::new();
    out.push_str(&format!("== Itinerary: {} - {} ==\n{}\n\n", destination, duration, summary));
    out.push_str(&format!("== Budget ==\n{}\n", cost));
    if let Some(daily) = hints.and_then(TripHints::daily_budget) {
        out.push_str(&format!("Daily budget: ${:.2}\n", daily));
    }
    out.push_str(&format!("\n== Local Tips ==\n{}\n", tips));

    if !outcome.notes.is_empty() {
        out.push_str("\nNotes:\n");
        for note in &outcome.notes {
            out.push_str(&format!("- {}\n", note));
        }
    }

    out
}
