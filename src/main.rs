use clap::{Arg, Command};
use std::env;
use std::process;
use std::sync::Arc;
use tracing::{error, info};

mod document;
mod http;
mod quiz;
mod youtube;

use document::convert::SofficeConverter;
use http::server::{serve, AppState};
use quiz::agent::GeminiAgent;
use quiz::requester::QuizService;

const DEFAULT_PORT: u16 = 8000;

/// Prints a small startup box to stderr
fn print_banner() {
    let width = 46usize;
    eprintln!("\n\x1b[36m╔{}╗", "═".repeat(width));
    eprintln!("║{:^width$}║", "");
    eprintln!("║{:^width$}║", "quizgen: quiz generation server");
    eprintln!("║{:^width$}║", "documents and videos in, quizzes out");
    eprintln!("║{:^width$}║", "");
    eprintln!("╚{}╝\x1b[0m\n", "═".repeat(width));
}

#[tokio::main]
async fn main() {
    // Parse command line arguments first
    let matches = Command::new("quizgen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("An HTTP service that turns documents and YouTube videos into multiple-choice quizzes")
        .long_about(
            "This server exposes two endpoints:\n\
            - POST /generate-quiz: multipart upload of a PDF/PPT/PPTX file\n\
            - POST /generate-quiz-from-youtube: JSON body with a YouTube URL\n\
            Both respond with a generated quiz or an error body.",
        )
        .arg(
            Arg::new("gemini-api-key")
                .long("gemini-api-key")
                .value_name("KEY")
                .help("Gemini API key (falls back to GEMINI_API_KEY)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .value_name("PORT")
                .help("Port to listen on (default: 8000)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log errors")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Initialize tracing to stderr
    let log_level = if std::env::var("RUST_LOG").is_ok() {
        // Use RUST_LOG if set
        None
    } else if matches.get_flag("quiet") {
        Some("error")
    } else {
        Some("info")
    };

    let subscriber = tracing_subscriber::fmt().with_writer(std::io::stderr);

    if let Some(level) = log_level {
        std::env::set_var("RUST_LOG", level);
    }

    subscriber.init();

    // The Gemini key is the single required piece of configuration; without
    // it the process refuses to start.
    let api_key = matches
        .get_one::<String>("gemini-api-key")
        .cloned()
        .or_else(|| env::var("GEMINI_API_KEY").ok());

    let api_key = match api_key {
        Some(key) => key,
        None => {
            error!("GEMINI_API_KEY environment variable not set");
            process::exit(1);
        }
    };

    let port = matches
        .get_one::<String>("port")
        .cloned()
        .or_else(|| env::var("QUIZGEN_PORT").ok())
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    if !matches.get_flag("quiet") {
        print_banner();
    }

    // Agent and converter are constructed once and injected into handlers;
    // nothing request-scoped lives here.
    let state = Arc::new(AppState {
        quiz: QuizService::new(GeminiAgent::new(api_key)),
        converter: Arc::new(SofficeConverter),
    });

    info!("Starting quizgen server...");
    if let Err(e) = serve(state, port).await {
        error!("Failed to start server: {}", e);
        process::exit(1);
    }
}
