//! The gateway contract shared by every AI backend.

use async_trait::async_trait;
use serde_json::{json, Value};
use udyamx_core::actions::InvoiceActions;

/// Answer used whenever advice cannot be produced.
pub const ADVICE_FALLBACK: &str =
    "Sorry, I'm having trouble connecting to the AI service right now. Please check your connection and try again.";

/// The two AI operations the app uses.
///
/// Neither can fail: implementations log upstream problems and return
/// [`ADVICE_FALLBACK`] or an empty [`InvoiceActions`] instead.
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Single-turn business advice. No conversation history is sent.
    async fn get_advice(&self, prompt: &str) -> String;

    /// Item edits spoken in free-form, possibly code-mixed, text.
    /// Every `add` comes back with price 0.
    async fn parse_invoice_actions(&self, spoken: &str) -> InvoiceActions;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Wraps a user question in the mentor instruction.
pub fn advice_prompt(question: &str) -> String {
    format!(
        "You are an AI business mentor for MSMEs. A user asked: \"{}\". Provide a concise, actionable answer.",
        question.trim()
    )
}

/// Instruction for extracting invoice actions from a transcript.
pub fn extraction_prompt(spoken: &str) -> String {
    format!(
        "You edit invoices for a small Indian business. The owner said: \"{}\". \
The sentence may mix English with Hindi or Marathi. \
Extract the line items to add, remove or update. \
Use \"add\" for new items with a quantity, \"remove\" for items to delete, \
and \"update\" for items whose quantity changes. \
Always set price to 0. Omit any list that would be empty.",
        spoken.trim()
    )
}

/// Response schema for action extraction (Gemini's OpenAPI subset).
pub fn actions_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "add": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "description": {"type": "STRING"},
                        "quantity": {"type": "INTEGER"},
                        "price": {"type": "NUMBER"}
                    },
                    "required": ["description", "quantity", "price"]
                }
            },
            "remove": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "description": {"type": "STRING"}
                    },
                    "required": ["description"]
                }
            },
            "update": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "description": {"type": "STRING"},
                        "quantity": {"type": "INTEGER"}
                    },
                    "required": ["description", "quantity"]
                }
            }
        }
    })
}
