// src/main.rs

use pagequeue::{cli, logging, run, PagequeueError};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        if !already_reported(&err) {
            eprintln!("pagequeue error: {err:?}");
        }
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await?;
    Ok(())
}

/// Task failures are printed as JSON by `run` before they get here.
fn already_reported(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<PagequeueError>(),
        Some(PagequeueError::Task(_))
    )
}
