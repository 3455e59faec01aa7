use crate::domain::payment::ProcessorPaymentRequest;
use crate::processors::{is_accepted, ProcessorClient, ProcessorError, ServiceHealth};
use std::time::Duration;

pub struct HttpProcessorClient {
    pub base_url: String,
    pub health_path: String,
    pub timeout: Duration,
    pub client: reqwest::Client,
}

impl HttpProcessorClient {
    pub fn new(
        base_url: &str,
        health_path: &str,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            health_path: health_path.to_string(),
            timeout,
            client,
        }
    }
}

#[async_trait::async_trait]
impl ProcessorClient for HttpProcessorClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn submit(&self, request: &ProcessorPaymentRequest) -> Result<(), ProcessorError> {
        let resp = self
            .client
            .post(format!("{}/payments", self.base_url))
            .json(request)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if is_accepted(status) {
            Ok(())
        } else {
            Err(ProcessorError::UnexpectedStatus(status.as_u16()))
        }
    }

    async fn service_health(&self) -> Result<ServiceHealth, ProcessorError> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, self.health_path))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProcessorError::UnexpectedStatus(status.as_u16()));
        }

        Ok(resp.json::<ServiceHealth>().await?)
    }
}
