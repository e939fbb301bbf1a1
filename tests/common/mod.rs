#![allow(dead_code)]

use async_trait::async_trait;
use financial_assistant::{
    gemini::GenerationService, memory::Turn, AdvisorGateway, AssistantError, Catalog, Product,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Generation double: echoes the question count, fails on demand, can stall
pub struct StubGenerator {
    pub fail_with: Option<String>,
    pub delay: Option<Duration>,
    pub submissions: Mutex<Vec<Vec<Turn>>>,
}

impl StubGenerator {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail_with: None,
            delay: None,
            submissions: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(detail.to_string()),
            delay: None,
            submissions: Mutex::new(Vec::new()),
        })
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            fail_with: None,
            delay: Some(delay),
            submissions: Mutex::new(Vec::new()),
        })
    }

    pub fn submissions(&self) -> Vec<Vec<Turn>> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationService for StubGenerator {
    async fn generate(&self, transcript: &[Turn]) -> financial_assistant::Result<String> {
        let call = {
            let mut submissions = self.submissions.lock().unwrap();
            submissions.push(transcript.to_vec());
            submissions.len()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.fail_with {
            Some(detail) => Err(AssistantError::GenerationError(detail.clone())),
            None => Ok(format!("answer #{}", call)),
        }
    }
}

pub fn product(name: &str, risk: &str, min: u64) -> Product {
    Product {
        name: name.to_string(),
        product_type: "Mutual Fund".to_string(),
        risk_level: risk.to_string(),
        min_investment: min,
        expected_returns: "8-10%".to_string(),
        description: format!("{} description", name),
    }
}

pub fn sample_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::new(vec![
        product("A", "Low", 500),
        product("B", "High", 5000),
        product("C", "Very Low", 250),
    ]))
}

pub fn gateway(generator: Arc<StubGenerator>) -> AdvisorGateway {
    AdvisorGateway::new(generator, sample_catalog())
}
