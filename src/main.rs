//! Command line front end: parses a smart search query and prints the
//! interpretation and the predicate it compiles to, without running it.
//!
//! ```text
//! ipam-search <prefix|pool|vrf> <query...>
//! ```

use std::process::ExitCode;

use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ipam_search::error::Result;
use ipam_search::profile::Entity;
use ipam_search::search::{Engine, Parsed};
use ipam_search::settings::Settings;

fn run(args: &[String]) -> Result<serde_json::Value> {
    let settings = Settings::load()?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log.filter)),
        )
        .init();

    let entity: Entity = args[0].parse()?;
    let query = args[1..].join(" ");
    let engine = Engine::new(settings);
    info!(%entity, query = %query, "parsing");

    let output = match engine.parse(entity, &query) {
        Parsed::Rejected(interpretation) => json!({
            "interpretation": [interpretation],
            "success": false,
        }),
        Parsed::Compiled { success: false, filter } => json!({
            "interpretation": filter,
            "success": false,
        }),
        Parsed::Compiled { success: true, filter } => {
            let predicate = engine.compile_query(entity, &filter)?;
            json!({
                "interpretation": filter,
                "success": true,
                "predicate": predicate,
            })
        }
    };
    Ok(output)
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("usage: ipam-search <prefix|pool|vrf> <query...>");
        return ExitCode::from(2);
    }
    match run(&args) {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
