mod config;
mod error;
mod fields;
mod ingest;
mod model;
mod normalize;
mod pipeline;
mod site;

use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use fields::FieldTable;
use model::BuildOutcome;
use quiz_common::notion::{NotionClient, NotionClientConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    if dotenv::dotenv().is_ok() {
        info!("loaded .env");
    }

    info!("starting quiz-site build");

    let config = Config::from_env()?;
    let table = FieldTable::load(&config.fields_path)?;
    info!(
        database_id = %config.database_id,
        output_dir = %config.output_dir.display(),
        question_property = %table.question.property,
        option_slots = table.options.len(),
        "configuration loaded"
    );

    let client = NotionClient::new(NotionClientConfig::new(
        config.notion_token.clone(),
        config.database_id.clone(),
    ))?;

    let outcome = pipeline::run(&config, &table, &client).await.inspect_err(|e| {
        tracing::error!(error = %e, "build failed");
    })?;

    match outcome {
        BuildOutcome::Written(summary) => info!(
            questions = summary.questions,
            categories = summary.categories,
            output_dir = %summary.output_dir.display(),
            logo = summary.logo_copied,
            "site built"
        ),
        BuildOutcome::Empty { records } => {
            info!(records, "build finished without output")
        }
    }
    Ok(())
}
