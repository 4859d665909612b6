//! Loop predictor CLI.
//!
//! Predict what a plan of actions does before running it in game.
//!
//! Usage:
//!   loop-predictor [OPTIONS]
//!
//! Examples:
//!   loop-predictor -a Wander -a "Smash Pots:10" -a "Buy Mana"
//!   loop-predictor --plan town1.txt --host save.json   # Plan file against a save
//!   loop-predictor --plan town1.txt --seed 42 --json   # Reproducible, JSON saved

use loop_predictor::actions::{ActionCatalog, ActionKind};
use loop_predictor::build_info;
use loop_predictor::host::{Host, HostSnapshot};
use loop_predictor::simulator::{parse_plan, PlannedAction, SimConfig, SimulationEngine};
use std::error::Error;
use std::path::PathBuf;
use std::{env, fs, process};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct CliOptions {
    actions: Vec<PlannedAction>,
    plan_file: Option<PathBuf>,
    host_file: Option<PathBuf>,
    catalog_file: Option<PathBuf>,
    config: SimConfig,
    json: bool,
    list: bool,
    verbose: bool,
}

#[derive(Debug)]
enum Command {
    Run(CliOptions),
    Help,
    Version,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if let Err(err) = run(&args) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let options = match parse_args(args)? {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Version => {
            println!("{}", build_info::version_line());
            return Ok(());
        }
        Command::Run(options) => options,
    };

    init_logging(options.verbose);

    let catalog = match &options.catalog_file {
        Some(path) => ActionCatalog::from_file(path)?,
        None => ActionCatalog::builtin()?,
    };
    let host = match &options.host_file {
        Some(path) => HostSnapshot::from_file(path)?,
        None => HostSnapshot::fresh_game(),
    };

    if options.list {
        print_catalog(&catalog, &host);
        return Ok(());
    }

    let mut plan = Vec::new();
    if let Some(path) = &options.plan_file {
        let text = fs::read_to_string(path)
            .map_err(|err| format!("failed to read plan {}: {}", path.display(), err))?;
        plan.extend(parse_plan(&text)?);
    }
    plan.extend(options.actions);
    if plan.is_empty() {
        return Err("nothing to simulate; pass --action or --plan (see --help)".into());
    }
    for entry in plan.iter().filter(|entry| !catalog.contains(&entry.name)) {
        tracing::warn!(action = %entry.name, "not in the catalog; entry will be skipped");
    }

    let prediction = SimulationEngine::new(&catalog, &host)
        .with_config(options.config)
        .simulate(&plan);

    println!("{}", prediction.to_text());

    if options.json {
        let filename = format!(
            "prediction_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        fs::write(&filename, prediction.to_json())?;
        println!("JSON report saved to: {}", filename);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("missing value for {}", flag))
}

fn parse_args(args: &[String]) -> Result<Command, Box<dyn Error>> {
    let mut options = CliOptions::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-a" | "--action" => {
                options.actions.push(next_value(args, &mut i, flag)?.parse::<PlannedAction>()?);
            }
            "-p" | "--plan" => {
                options.plan_file = Some(PathBuf::from(next_value(args, &mut i, flag)?));
            }
            "--host" => {
                options.host_file = Some(PathBuf::from(next_value(args, &mut i, flag)?));
            }
            "--catalog" => {
                options.catalog_file = Some(PathBuf::from(next_value(args, &mut i, flag)?));
            }
            "-s" | "--seed" => {
                let value = next_value(args, &mut i, flag)?;
                let seed = value
                    .parse::<u64>()
                    .map_err(|err| format!("invalid seed '{}': {}", value, err))?;
                options.config.seed = Some(seed);
            }
            "-m" | "--mana" => {
                let value = next_value(args, &mut i, flag)?;
                options.config.starting_mana = value
                    .parse::<f64>()
                    .map_err(|err| format!("invalid mana '{}': {}", value, err))?;
            }
            "--json" => options.json = true,
            "--list" => options.list = true,
            "-v" | "--verbose" => options.verbose = true,
            "--version" => return Ok(Command::Version),
            "-h" | "--help" => return Ok(Command::Help),
            other => return Err(format!("unknown option: {}", other).into()),
        }
        i += 1;
    }

    Ok(Command::Run(options))
}

fn print_catalog(catalog: &ActionCatalog, host: &dyn Host) {
    println!("{:<20} {:>7}  Kind", "Action", "Mana");
    for action in catalog.iter() {
        let kind = match &action.kind {
            ActionKind::Simple => "simple".to_string(),
            ActionKind::ResourceEffect(ops) => format!("effect ({} ops)", ops.len()),
            ActionKind::Loop(descriptor) => format!("loop ({} segments)", descriptor.segments),
        };
        println!("{:<20} {:>7.0}  {}", action.name, action.mana_cost(host), kind);
    }
}

fn print_help() {
    println!("Loop Predictor");
    println!();
    println!("USAGE:");
    println!("    loop-predictor [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -a, --action <NAME[:N]>  Add an action to the plan, N times (repeatable)");
    println!("    -p, --plan <FILE>        Read plan entries from a file, one per line");
    println!("        --host <FILE>        Host snapshot JSON (default: fresh game)");
    println!("        --catalog <FILE>     Action catalog JSON (default: built-in)");
    println!("    -s, --seed <S>           Roll soulstone drops with this seed");
    println!("    -m, --mana <M>           Starting mana (default: 250)");
    println!("        --json               Save the prediction as JSON");
    println!("        --list               List catalog actions and exit");
    println!("    -v, --verbose            Debug logging (RUST_LOG overrides)");
    println!("        --version            Show version information");
    println!("    -h, --help               Show this help message");
}
