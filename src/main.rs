//! Console front end: a numbered menu over the shelter actions.
//!
//! Startup connects, (re)creates the schema (see `CLEAR_DB`), then reads
//! choices from stdin until Exit or end of input.

use pet_shelter::infra::{config, logging};
use pet_shelter::transport::console;
use pet_shelter::ShelterService;
use std::process::ExitCode;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> ExitCode {
    config::load_env();
    logging::init();

    let (service, report) =
        match ShelterService::connect(&config::database_url(), config::clear_db()).await {
            Ok(v) => v,
            Err(e) => {
                eprintln!("[{}] {}", e.title(), e);
                eprintln!("Could not connect to the database. Application closing.");
                return ExitCode::FAILURE;
            }
        };
    if !report.is_clean() {
        for (statement, error) in &report.failures {
            eprintln!("[Setup Error] {}: {}", statement, error);
        }
    }

    let stdin = BufReader::new(tokio::io::stdin());
    if let Err(e) = console::run(&service, stdin, tokio::io::stdout()).await {
        eprintln!("console I/O failed: {}", e);
        service.close().await;
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
