use std::path::PathBuf;

use cattask::config::{PgSettings, load_dotenv};
use cattask::logging;
use cattask::postgres::PgProvider;
use cattask::tasks::seed::{DEFAULT_SEED_TASKS, DEFAULT_SEED_USERS};
use cattask::tasks::{SeedOptions, TaskQueries, create_schema, run_demo, seed};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "PostgreSQL task tracker: schema, seed data and demo queries")]
struct Args {
    #[command(flatten)]
    pg: PgSettings,
    /// Copy log output into this file
    #[arg(long, global = true)]
    log: Option<PathBuf>,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drop and recreate the users, status and tasks tables
    Schema,
    /// Insert statuses, synthetic users and synthetic tasks
    Seed {
        #[arg(long, default_value_t = DEFAULT_SEED_USERS)]
        users: usize,
        #[arg(long, default_value_t = DEFAULT_SEED_TASKS)]
        tasks: usize,
        /// Fixed RNG seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a few catalog queries and print the results
    Demo,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();
    let args = Args::parse();
    logging::init(args.log.clone(), args.verbose)?;

    let provider = PgProvider::new(&args.pg)?;
    match args.command {
        Command::Schema => {
            create_schema(&provider).await?;
            println!("Schema created.");
        }
        Command::Seed { users, tasks, seed: rng_seed } => {
            let options = SeedOptions {
                users,
                tasks,
                rng_seed,
            };
            let report = seed(&provider, &options).await?;
            println!(
                "Seed done: {} statuses, {} users, {} tasks inserted.",
                report.statuses, report.users, report.tasks
            );
        }
        Command::Demo => {
            let queries = TaskQueries::new(provider);
            run_demo(&queries, &mut std::io::stdout().lock()).await?;
        }
    }
    Ok(())
}
