//! Path manager simulation.
//!
//! Runs one scenario against the kinematic vehicle and prints the run
//! summary as JSON on stdout. Without `--scenario` the built-in demo flies
//! the canned racetrack program in path-planner flight mode.
//!
//! Usage:
//!   cargo run -p path_manager_sitl --bin path_manager_sim -- [OPTIONS]
//!
//! Options:
//!   -s, --scenario <PATH>   Scenario JSON file
//!   -d, --duration <MS>     Override the scenario duration
//!   --pretty                Pretty-print the summary

use std::env;
use std::process;

use path_manager_sitl::{run_scenario, ScenarioConfig};

const DEMO_SCENARIO: &str = r#"{
    "name": "racetrack-demo",
    "resolver": "flight_mode",
    "duration_ms": 120000,
    "mode_changes": [
        { "at_ms": 0, "flight_mode": "path_planner" },
        { "at_ms": 90000, "flight_mode": "return_to_home" }
    ],
    "vehicle": { "follower_start_ms": 2000 }
}"#;

struct Args {
    scenario: Option<String>,
    duration_ms: Option<u64>,
    pretty: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        scenario: None,
        duration_ms: None,
        pretty: false,
    };

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "-s" | "--scenario" => {
                i += 1;
                args.scenario = Some(arg_value(&raw, i, "scenario").to_string());
            }
            "-d" | "--duration" => {
                i += 1;
                args.duration_ms = Some(arg_value(&raw, i, "duration").parse().unwrap_or_else(
                    |_| {
                        eprintln!("Error: invalid value for --duration");
                        process::exit(1);
                    },
                ));
            }
            "--pretty" => args.pretty = true,
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    args
}

fn arg_value<'a>(raw: &'a [String], i: usize, name: &str) -> &'a str {
    raw.get(i).map(String::as_str).unwrap_or_else(|| {
        eprintln!("Error: --{name} requires a value");
        process::exit(1);
    })
}

fn print_usage() {
    eprintln!(
        "Usage: path_manager_sim [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 -s, --scenario <PATH>   Scenario JSON file (default: built-in racetrack demo)\n\
         \x20 -d, --duration <MS>     Override the scenario duration\n\
         \x20 --pretty                Pretty-print the summary\n\
         \x20 -h, --help              Show this help"
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args();

    let loaded = match &args.scenario {
        Some(path) => ScenarioConfig::load(path),
        None => ScenarioConfig::from_json(DEMO_SCENARIO),
    };
    let mut scenario = loaded.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });
    if let Some(duration_ms) = args.duration_ms {
        scenario.duration_ms = duration_ms;
        if let Err(e) = scenario.validate() {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }

    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal handler; run to completion
            std::future::pending::<()>().await;
        }
    };

    let summary = match run_scenario(scenario, shutdown).await {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Simulation failed: {e}");
            process::exit(1);
        }
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&summary)
    } else {
        serde_json::to_string(&summary)
    };
    match json {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
