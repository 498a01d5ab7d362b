use anyhow::Result;

use techbrief_core::{feed::default_sources, run_digest, AppConfig, RunMode};

pub async fn run(config: &AppConfig) -> Result<()> {
    let report = run_digest(config, &default_sources(), RunMode::Deliver).await?;

    match report.delivered {
        Some(true) => println!(
            "Pushed {} articles from {} sources.",
            report.articles, report.sources
        ),
        Some(false) => println!("Push failed, see the log above."),
        None => println!("No new articles, nothing pushed."),
    }

    Ok(())
}
