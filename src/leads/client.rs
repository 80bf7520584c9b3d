use crate::config::LeadsConfig;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors from the lead-source pipeline API
#[derive(Debug, Error)]
pub enum LeadsError {
    #[error("Lead API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Lead API returned unexpected payload: {0}")]
    Payload(String),

    #[error("Lead pipeline run ended in state {0}")]
    RunFailed(String),
}

/// Client for the upstream lead-sourcing pipeline
///
/// The pipeline is asynchronous on the server side: a POST starts a
/// sourcing run and returns a run id, then the run is polled until its
/// state reaches `DONE`, at which point its outputs contain the list of
/// candidate website URLs.
pub struct LeadClient {
    client: reqwest::Client,
    config: LeadsConfig,
}

impl LeadClient {
    /// Creates a client for the configured pipeline
    pub fn new(config: LeadsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client, config })
    }

    /// Starts a sourcing run and returns its website URLs once done
    pub async fn fetch_lead_urls(&self) -> Result<Vec<String>, LeadsError> {
        let run_id = self.start_run().await?;
        tracing::info!("Lead pipeline run {} started", run_id);
        self.poll_until_done(&run_id).await
    }

    /// Kicks off a pipeline run and returns the run id
    async fn start_run(&self) -> Result<String, LeadsError> {
        let url = format!(
            "{}/start_pipeline?user_id={}&saved_item_id={}",
            self.config.api_base, self.config.user_id, self.config.saved_item_id
        );
        let payload = json!({
            "Number of companies": self.config.company_count,
            "Industry/Sector": self.config.sector,
        });

        let body: Value = self
            .client
            .post(&url)
            .bearer_auth(&self.config.auth_token)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        body.get("run_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| LeadsError::Payload("missing run_id".to_string()))
    }

    /// Polls the run until its state is `DONE`, then extracts the URLs
    ///
    /// Failure states end the poll loop with an error instead of spinning
    /// forever on a run that will never finish.
    async fn poll_until_done(&self, run_id: &str) -> Result<Vec<String>, LeadsError> {
        let url = format!(
            "{}/get_pl_run?run_id={}&user_id={}",
            self.config.api_base, run_id, self.config.user_id
        );

        loop {
            let body: Value = self
                .client
                .get(&url)
                .bearer_auth(&self.config.auth_token)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            match body.get("state").and_then(Value::as_str) {
                Some("DONE") => return self.extract_urls(&body),
                Some(state) if state == "FAILED" || state == "TERMINATED" => {
                    return Err(LeadsError::RunFailed(state.to_string()))
                }
                state => {
                    tracing::debug!(
                        "Lead pipeline run {} still {}, polling again",
                        run_id,
                        state.unwrap_or("pending")
                    );
                    tokio::time::sleep(self.config.poll_interval()).await;
                }
            }
        }
    }

    /// Pulls the URL list out of a finished run's outputs
    fn extract_urls(&self, body: &Value) -> Result<Vec<String>, LeadsError> {
        let outputs = body
            .get("outputs")
            .and_then(|outputs| outputs.get(&self.config.output_key))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                LeadsError::Payload(format!("missing outputs.{}", self.config.output_key))
            })?;

        Ok(outputs
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect())
    }
}
