use anyhow::Result;
use async_trait::async_trait;

use crate::config::Config;
use crate::errors::ServiceError;
use crate::wire::{EmailRequest, GenerateRequest, Prompt};

pub mod http;

/// The four remote workflow endpoints.
#[async_trait]
pub trait WorkflowService: Send + Sync {
    async fn categories(&self) -> Result<Vec<String>, ServiceError>;
    async fn prompts(&self, category: &str) -> Result<Vec<Prompt>, ServiceError>;
    async fn generate(&self, req: &GenerateRequest) -> Result<String, ServiceError>;
    async fn send_email(&self, req: &EmailRequest) -> Result<(), ServiceError>;
}

pub type DynService = Box<dyn WorkflowService + Send + Sync>;

pub fn make_service(cfg: &Config) -> Result<DynService> {
    Ok(Box::new(http::HttpService::new(cfg.endpoints.clone(), cfg.timeout_secs)?))
}
