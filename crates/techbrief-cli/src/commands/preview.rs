use anyhow::Result;

use techbrief_core::{feed::default_sources, run_digest, AppConfig, RunMode};

pub async fn run(config: &AppConfig) -> Result<()> {
    let report = run_digest(config, &default_sources(), RunMode::Preview).await?;

    match report.message {
        Some(message) => {
            println!("{}", message.markdown_content());
            println!(
                "\n({} articles from {} sources, not pushed)",
                report.articles, report.sources
            );
        }
        None => println!("No new articles."),
    }

    Ok(())
}
