//! Advisor gateway
//!
//! Builds the advisor prompt from a question and the full catalog, submits it
//! to the generation service, and returns the generated text verbatim.
//! Failures come back as `GenerationError`; mapping them to a user-facing
//! message is left to the transport.

use crate::catalog::Catalog;
use crate::gemini::GenerationService;
use crate::memory::{ChatSession, Turn};
use crate::prompts;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AdvisorGateway {
    generator: Arc<dyn GenerationService>,
    catalog: Arc<Catalog>,
}

impl AdvisorGateway {
    pub fn new(generator: Arc<dyn GenerationService>, catalog: Arc<Catalog>) -> Self {
        Self { generator, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Single-shot ask. No state is carried between calls.
    pub async fn ask(&self, question: &str) -> crate::Result<String> {
        let prompt = prompts::advisor_prompt(question, &self.catalog);

        info!(question_len = question.len(), "Asking advisor (stateless)");

        self.generator
            .generate(&[Turn::user(prompt)])
            .await
            .map_err(|e| {
                warn!("Advisor ask failed: {}", e);
                e
            })
    }

    /// Multi-turn ask. Earlier turns are resubmitted as recorded; the new
    /// user turn carries the full advisor prompt. The session only records
    /// the exchange (plain question plus answer) once generation succeeds.
    pub async fn ask_in_session(
        &self,
        session: &mut ChatSession,
        question: &str,
    ) -> crate::Result<String> {
        let mut transcript = Vec::with_capacity(session.len() + 1);
        transcript.extend_from_slice(session.turns());
        transcript.push(Turn::user(prompts::advisor_prompt(question, &self.catalog)));

        info!(
            session_id = %session.session_id,
            prior_turns = session.len(),
            "Asking advisor (session)"
        );

        let answer = self.generator.generate(&transcript).await.map_err(|e| {
            warn!(session_id = %session.session_id, "Advisor ask failed: {}", e);
            e
        })?;

        session.record_exchange(question, answer.clone());

        Ok(answer)
    }
}
