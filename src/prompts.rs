//! Prompt text used by the advisor.
//!
//! Kept in one place so every transport sends the same wording.

use crate::catalog::Catalog;

/// Greeting shown by interactive clients. Never sent to the model.
pub const GREETING: &str = "Hello! I'm your financial assistant. I can help you with investment advice and finding suitable investment products in India. What would you like to know?";

/// Returned to callers in place of any generation failure detail.
pub const GENERIC_FAILURE: &str = "An error occurred while processing your question.";

/// Build the advisor prompt for one question against the whole catalog.
pub fn advisor_prompt(question: &str, catalog: &Catalog) -> String {
    format!(
        r#"You are a financial advisor in India helping users make better investment decisions.
Answer the following question about investing in India.

User Question: {}

Available Investment Products:
{}

Guidelines:
- Provide a clear, concise response with practical, risk-aware advice.
- If recommending products, choose them from the list above and explain why they might be suitable.
- For every product you mention, include its risk level, expected returns, and minimum investment.
- Avoid giving specific tax advice without a disclaimer.
- If the question is not related to investing in Indian markets, politely explain that you specialize in Indian markets and suggest rephrasing the question."#,
        question,
        catalog.render_table(),
    )
}
