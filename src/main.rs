use anyhow::Result;
use std::process::ExitCode;
use tracing::info;

use sqlfacts::SqlFactsError;
use sqlfacts::config::{Command, Config};
use sqlfacts::dump::DumpPlanGenerator;
use sqlfacts::{pipeline, report};

fn main() -> ExitCode {
    let config = Config::load();

    // Initialize logging; stdout is reserved for the report
    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.clone())
        .with_writer(std::io::stderr)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            let code = e
                .downcast_ref::<SqlFactsError>()
                .map(SqlFactsError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn run(config: &Config) -> Result<()> {
    info!("sqlfacts v{}", env!("CARGO_PKG_VERSION"));

    match config.resolved_command() {
        Command::Analyze(args) => {
            let sql = args.input.read_sql()?;
            let facts = pipeline::analyze(&sql)?;
            print!("{}", report::render(&facts, args.format)?);
        }
        Command::Check(input) => {
            let sql = input.read_sql()?;
            pipeline::check(&sql)?;
            println!("✓ SQL syntax is valid");
        }
        Command::Dump(args) => {
            let sql = args.input.read_sql()?;
            let generator = DumpPlanGenerator::new(args.connection.to_settings());
            for line in pipeline::dump_plan(&sql, &generator)? {
                println!("{line}");
            }
        }
    }

    Ok(())
}
