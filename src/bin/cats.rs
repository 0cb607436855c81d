use std::path::PathBuf;
use std::process::ExitCode;

use cattask::cats::{IoConsole, MongoCatStore, run_menu};
use cattask::config::{MongoSettings, load_dotenv};
use cattask::logging;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive CRUD console over a MongoDB cats collection")]
struct Args {
    #[command(flatten)]
    mongo: MongoSettings,
    /// Copy log output into this file
    #[arg(long)]
    log: Option<PathBuf>,
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    let args = Args::parse();
    if let Err(err) = logging::init(args.log.clone(), args.verbose) {
        eprintln!("failed to open log file: {err}");
        return ExitCode::FAILURE;
    }

    let store = match MongoCatStore::connect(&args.mongo).await {
        Ok(store) => store,
        Err(err) => {
            eprintln!("[{}] {err}", err.label());
            return ExitCode::FAILURE;
        }
    };

    let mut console = IoConsole::stdio();
    let outcome = run_menu(&store, &mut console).await;
    store.shutdown().await;
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("console error: {err}");
            ExitCode::FAILURE
        }
    }
}
