// src/main.rs

use elmpipe::{cli, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    match run_main().await {
        Ok(summary) if summary.halted => {
            // Only reachable with --fail-on-error; the diagnostic is already printed.
            std::process::exit(1);
        }
        Ok(_) => {}
        Err(err) => {
            eprintln!("elmpipe error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<elmpipe::engine::RunSummary> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    Ok(run(args).await?)
}
