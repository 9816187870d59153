// Line-oriented host for the pipeline: every stdin line is one keystroke value.
//
//   TYPEAHEAD_URL_TEMPLATE="https://example.org/search?q={term}" cargo run

use anyhow::Context;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use typeahead_lib::{
    init_logger, PipelineConfig, PipelineState, SearchCallbacks, SearchError, SearchPipeline,
};

const URL_TEMPLATE_ENV: &str = "TYPEAHEAD_URL_TEMPLATE";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logger();

    let template = std::env::var(URL_TEMPLATE_ENV)
        .with_context(|| format!("{} must be set, e.g. https://host/search?q={{term}}", URL_TEMPLATE_ENV))?;
    if !template.contains("{term}") {
        anyhow::bail!("{} must contain a {{term}} placeholder", URL_TEMPLATE_ENV);
    }

    let config = PipelineConfig::from_env()?;
    let settle_time = config.rate_limit.settle_time();
    let request_timeout = config.http.request_timeout;

    let callbacks = SearchCallbacks::new(
        move |term| Ok(template.replace("{term}", &urlencoding::encode(term.as_str()))),
        |response| {
            let body = response.text();
            let preview: String = body.chars().take(200).collect();
            println!("{} {} {}", response.status(), response.url(), preview);
            Ok(())
        },
        |error| eprintln!("fatal: {}", error),
    )
    // Network hiccups and server errors should not end an interactive session
    .with_should_retry(|error| match error {
        SearchError::Transport { .. } => true,
        SearchError::HttpStatus { status, .. } => *status >= 500,
        SearchError::Consumer { .. } => false,
    });

    let mut pipeline = SearchPipeline::with_http(config, callbacks)?;
    pipeline.activate()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        pipeline.push(line);
        if !pipeline.is_active() {
            break;
        }
    }

    // Give the last term time to settle and its lookup time to complete
    tokio::time::sleep(settle_time + Duration::from_millis(10)).await;
    let mut state = pipeline.watch_state();
    let _ = tokio::time::timeout(request_timeout, async {
        while matches!(
            *state.borrow_and_update(),
            PipelineState::AwaitingSettle | PipelineState::InFlight
        ) {
            if state.changed().await.is_err() {
                break;
            }
        }
    })
    .await;

    pipeline.deactivate().await;
    Ok(())
}
