//! MK Ultra headless match simulator
//!
//! Plays CPU-vs-CPU matches on the real match loop without a terminal and
//! prints a balance summary.
//!
//! Usage:
//!   cargo run --bin mkultra-sim -- [OPTIONS]
//!
//! Options:
//!   --matches N       Matches to play (default: 100)
//!   --seed N          Base RNG seed (default: 42)
//!   --difficulty D    CPU difficulty for both sides, 0.0 to 1.0 (default: 0.5)
//!   --p1 NAME         P1 character (default: nate)
//!   --p2 NAME         P2 character (default: scorpion)
//!   --stage NAME      Stage (default: MirabookaBusStation2)
//!   --json            Print the report as JSON

use mkultra::combat::HitboxDb;
use mkultra::config::GameConfig;
use mkultra::error::{GameError, Result};
use mkultra::logging::init_stderr_logging;
use mkultra::simulator::{run_simulation, SimConfig};
use mkultra::stage::Stage;
use std::time::Instant;

// ── CLI Configuration ────────────────────────────────────────────────

struct CliArgs {
    sim: SimConfig,
    p1: String,
    p2: String,
    json: bool,
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| GameError::Config(format!("{flag} requires a value")))
}

fn number<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T> {
    let raw = value(args, i, flag)?;
    raw.parse()
        .map_err(|_| GameError::Config(format!("{flag} requires a number, got '{raw}'")))
}

fn parse_args(args: &[String]) -> Result<Option<CliArgs>> {
    let mut cli = CliArgs {
        sim: SimConfig::default(),
        p1: "nate".to_string(),
        p2: "scorpion".to_string(),
        json: false,
    };
    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--matches" => {
                i += 1;
                cli.sim.num_matches = number(args, i, flag)?;
            }
            "--seed" => {
                i += 1;
                cli.sim.seed = number(args, i, flag)?;
            }
            "--difficulty" => {
                i += 1;
                cli.sim.difficulty = number(args, i, flag)?;
            }
            "--p1" => {
                i += 1;
                cli.p1 = value(args, i, flag)?.to_string();
            }
            "--p2" => {
                i += 1;
                cli.p2 = value(args, i, flag)?.to_string();
            }
            "--stage" => {
                i += 1;
                cli.sim.stage = Stage::from_name(value(args, i, flag)?)?;
            }
            "--json" => cli.json = true,
            "--help" | "-h" => return Ok(None),
            other => return Err(GameError::Config(format!("unknown argument: {other}"))),
        }
        i += 1;
    }
    cli.sim = cli.sim.with_characters(&cli.p1, &cli.p2)?;
    cli.sim.validate()?;
    Ok(Some(cli))
}

fn print_usage() {
    eprintln!(
        "MK Ultra Headless Match Simulator\n\
         \n\
         Usage: mkultra-sim [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --matches N       Matches to play (default: 100)\n\
         \x20 --seed N          Base RNG seed (default: 42)\n\
         \x20 --difficulty D    CPU difficulty for both sides, 0.0 to 1.0 (default: 0.5)\n\
         \x20 --p1 NAME         P1 character: nate, scorpion, connor, blake (default: nate)\n\
         \x20 --p2 NAME         P2 character (default: scorpion)\n\
         \x20 --stage NAME      Stage (default: MirabookaBusStation2)\n\
         \x20 --json            Print the report as JSON\n\
         \x20 --help, -h        Show this help"
    );
}

fn main() {
    dotenvy::dotenv().ok();
    init_stderr_logging();

    let args: Vec<String> = std::env::args().collect();
    let cli = match parse_args(&args) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            print_usage();
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            print_usage();
            std::process::exit(1);
        }
    };

    let game_config = GameConfig::load_or_default();
    let hitboxes = HitboxDb::load(&game_config.hitbox_path);

    tracing::info!(
        matches = cli.sim.num_matches,
        seed = cli.sim.seed,
        difficulty = cli.sim.difficulty,
        p1 = cli.sim.p1.name(),
        p2 = cli.sim.p2.name(),
        stage = %cli.sim.stage.name,
        "starting simulation"
    );
    let started = Instant::now();
    let report = run_simulation(&cli.sim, &hitboxes);
    tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "simulation finished");

    if cli.json {
        println!("{}", report.to_json());
    } else {
        print!("{}", report.to_text());
    }
}
