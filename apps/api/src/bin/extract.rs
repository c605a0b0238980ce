use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use resume_extract::config::Config;
use resume_extract::db::create_pool;
use resume_extract::errors::PipelineError;
use resume_extract::extraction::pipeline::{Pipeline, RunOutcome};
use resume_extract::llm_client::{self, LlmClient};
use resume_extract::store::file::FileStore;
use resume_extract::store::log::{PgRecordLog, RecordLog};

/// One write-path run over the configured document.
#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    resume_extract::init_tracing();

    let llm = LlmClient::new(
        config.require_api_key()?.to_string(),
        config.llm_max_attempts,
    );
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let log: Option<Arc<dyn RecordLog>> = match &config.database_url {
        Some(url) => Some(Arc::new(PgRecordLog::new(create_pool(url)?)) as Arc<dyn RecordLog>),
        None => {
            info!("DATABASE_URL not set; database channel disabled");
            None
        }
    };

    let pipeline = Pipeline::new(
        Arc::new(llm),
        config.sanitize_policy,
        FileStore::new(config.json_output_path.clone()),
        log,
    );

    match pipeline.run(&config.pdf_path).await {
        Ok(RunOutcome::Saved { path, logged_id }) => {
            info!("Structured data saved to {}", path.display());
            if let Some(id) = logged_id {
                info!("Structured data logged as record {id}");
            }
            Ok(())
        }
        Ok(RunOutcome::NothingToSave) => {
            info!("Run finished without structured data; nothing was written");
            Ok(())
        }
        Err(PipelineError::Persistence(e)) => {
            error!("Run ended with a persistence failure: {e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
