//! Line-oriented chat over the roster and the configured pages.
//!
//! ```text
//! SENA_OPENROUTER_API_KEY=sk-... cargo run -p sena_webscraper --example chat -- sena.json
//! ```
//!
//! The config path is optional. Each stdin line is one question.

use std::path::PathBuf;
use std::process::ExitCode;

use sena::assistant::Assistant;
use sena::config::Settings;
use sena::providers::completions;
use sena::roster::Roster;
use sena_webscraper::WebScraper;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = match Settings::load(config_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {e}");
            return ExitCode::FAILURE;
        }
    };
    let roster = match Roster::load(&settings.data_path, &settings.sheet) {
        Ok(roster) => roster,
        Err(e) => {
            eprintln!("❌ {e}");
            return ExitCode::FAILURE;
        }
    };
    let scraper = match WebScraper::new(&settings.web) {
        Ok(scraper) => scraper,
        Err(e) => {
            eprintln!("❌ Failed to build HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };
    let model = match completions::from_kinds(&settings.providers) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("❌ {e}");
            return ExitCode::FAILURE;
        }
    };
    let assistant = Assistant::new(roster, scraper, model, settings);

    println!("Hai 👋, saya SENA. Ada yang mau kamu ketahui tentang PSEKP dan kepegawaiannya?");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("❌ Failed to read input: {e}");
                return ExitCode::FAILURE;
            }
        };
        match assistant.ask(&line).await {
            Ok(Some(answer)) => {
                println!("Jawaban:\n{}\n", answer.text);
                println!("🔎 Konteks yang digunakan:\n{}\n", answer.context.block);
            }
            Ok(None) => {}
            Err(e) => eprintln!("Gagal memanggil model: {e}"),
        }
    }
    ExitCode::SUCCESS
}
