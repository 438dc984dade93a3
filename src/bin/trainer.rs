//! Terminal trainer for CareView
//!
//! Drives one training session against a running server: type to talk to
//! the patient, slash commands to switch case, move through the rubric and
//! check the monitor.

use careview::persona::CaseType;
use careview::session::{HttpResponseClient, Session, TurnOutcome};
use careview::vitals::{Reading, VitalsSnapshot};
use std::fmt::Display;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_URL: &str = "http://localhost:3000";

const HELP: &str = "\
Commands:
  /case <name>   switch case type (resets the session); /case alone uses the default
  /cases         list case types
  /next, /prev   move through the PEARLS rubric
  /vitals        show the patient monitor
  /help          show this help
  /quit          exit
Anything else is said to the patient.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they don't interleave with the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "careview=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base_url = std::env::var("CAREVIEW_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let client = HttpResponseClient::new(&base_url)?;
    tracing::info!(endpoint = client.endpoint(), "Trainer connected");

    let mut session = Session::default();
    println!("CareView trainer. Talking to {base_url}.");
    println!("{HELP}\n");
    print_step(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        match input.split_once(' ').unwrap_or((input, "")) {
            ("/quit" | "/exit", _) => break,
            ("/help", _) => println!("{HELP}"),
            ("/cases", _) => {
                for case in CaseType::ALL {
                    println!("  {case}");
                }
            }
            ("/case", name) => {
                let name = name.trim();
                let case_type = if name.is_empty() {
                    None
                } else if let Some(case) = CaseType::parse(name) {
                    Some(case)
                } else {
                    println!("Unknown case type: {name}. Try /cases.");
                    continue;
                };
                session.select_case(case_type);
                println!(
                    "Case: {}. Transcript, vitals and rubric reset.",
                    case_type.map_or("default", CaseType::label)
                );
                print_step(&session);
            }
            ("/next", _) => {
                if !session.advance_step() {
                    println!("Already at the last step.");
                }
                print_step(&session);
            }
            ("/prev", _) => {
                if !session.retreat_step() {
                    println!("Already at the first step.");
                }
                print_step(&session);
            }
            ("/vitals", _) => print_vitals(session.vitals()),
            _ => {
                let Some(outcome) = session.submit(input, &client).await else {
                    continue;
                };
                if let Some(reply) = session.transcript().last() {
                    println!("Patient: {}", reply.text);
                }
                match outcome {
                    TurnOutcome::Replied {
                        audio_url: Some(url),
                    } => println!("  (audio reply available, {} chars)", url.len()),
                    TurnOutcome::Fallback { error } => println!("  ({error})"),
                    TurnOutcome::Replied { audio_url: None } | TurnOutcome::Discarded => {}
                }
            }
        }
    }

    Ok(())
}

fn print_step(session: &Session) {
    let rubric = session.rubric();
    let step = rubric.current();
    println!(
        "[PEARLS {}/{}] {}: {}\n  e.g. \"{}\"",
        rubric.index() + 1,
        rubric.len(),
        step.name,
        step.description,
        step.example
    );
}

fn print_vitals(vitals: &VitalsSnapshot) {
    println!("  HR    {}", flag(&vitals.heart_rate, " bpm"));
    println!("  BP    {}", flag(&vitals.blood_pressure, " mmHg"));
    println!("  SpO2  {}", flag(&vitals.oxygen_saturation, "%"));
    println!(
        "  Temp  {:.1} C{}",
        vitals.temperature.value,
        if vitals.temperature.alert { " !" } else { "" }
    );
    for alert in &vitals.alerts {
        println!("  ! {alert}");
    }
}

fn flag<T: Display>(reading: &Reading<T>, unit: &str) -> String {
    let marker = if reading.alert { " !" } else { "" };
    format!("{}{unit}{marker}", reading.value)
}
