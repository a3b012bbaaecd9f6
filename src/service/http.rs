use async_trait::async_trait;
use anyhow::Result;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Endpoints;
use crate::errors::ServiceError;
use crate::wire::{
    CategoriesResponse, EmailRequest, EmailResponse, GenerateRequest, GenerateResponse, Prompt, PromptsResponse,
};

/// reqwest-backed client for the workflow webhooks.
pub struct HttpService {
    client: Client,
    endpoints: Endpoints,
}

impl HttpService {
    pub fn new(endpoints: Endpoints, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(timeout_secs)).build()?;
        Ok(Self { client, endpoints })
    }

    /// Send and decode the body. HTTP status is not inspected: the services
    /// report failure through `success: false`.
    async fn exchange<T: DeserializeOwned>(&self, what: &str, req: RequestBuilder) -> Result<T, ServiceError> {
        let resp = req.send().await.map_err(|e| {
            warn!(endpoint = what, error = %e, "request failed");
            e
        })?;
        let status = resp.status();
        let text = resp.text().await?;
        debug!(endpoint = what, %status, body = %text, "workflow response");

        serde_json::from_str(&text).map_err(|e| {
            warn!(endpoint = what, %status, error = %e, "undecodable response body");
            ServiceError::from(e)
        })
    }
}

#[async_trait]
impl super::WorkflowService for HttpService {
    async fn categories(&self) -> Result<Vec<String>, ServiceError> {
        let body: CategoriesResponse =
            self.exchange("categories", self.client.get(&self.endpoints.categories_url)).await?;
        if body.success {
            Ok(body.categories)
        } else {
            Err(ServiceError::Rejected(body.error))
        }
    }

    async fn prompts(&self, category: &str) -> Result<Vec<Prompt>, ServiceError> {
        let req = self.client.get(&self.endpoints.prompts_url).query(&[("category", category)]);
        let body: PromptsResponse = self.exchange("prompts", req).await?;
        if body.success {
            Ok(body.prompts)
        } else {
            Err(ServiceError::Rejected(body.error))
        }
    }

    async fn generate(&self, req: &GenerateRequest) -> Result<String, ServiceError> {
        let body: GenerateResponse =
            self.exchange("generate", self.client.post(&self.endpoints.generate_url).json(req)).await?;
        match body {
            GenerateResponse { success: true, response: Some(text), .. } => Ok(text),
            GenerateResponse { error, .. } => Err(ServiceError::Rejected(error)),
        }
    }

    async fn send_email(&self, req: &EmailRequest) -> Result<(), ServiceError> {
        let body: EmailResponse =
            self.exchange("email", self.client.post(&self.endpoints.email_url).json(req)).await?;
        if body.success {
            Ok(())
        } else {
            Err(ServiceError::Rejected(body.error))
        }
    }
}
