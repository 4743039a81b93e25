//! # udyamx-ai: AI Gateway
//!
//! The two generative-text operations the app relies on, behind one trait.
//!
//! ```text
//! ┌────────────────────┐      ┌────────────────────────────────────────┐
//! │  copilot / voice   │ ───► │  Arc<dyn AiGateway>                    │
//! └────────────────────┘      │   ├── GeminiGateway  (HTTPS, API key)  │
//!                             │   └── CannedGateway  (offline)         │
//!                             └────────────────────────────────────────┘
//! ```
//!
//! Neither operation returns an error. Upstream failures are logged and
//! become [`ADVICE_FALLBACK`] or an empty action set.

pub mod canned;
pub mod error;
pub mod gateway;
pub mod gemini;
pub mod types;

pub use canned::CannedGateway;
pub use error::{AiError, AiResult};
pub use gateway::{AiGateway, ADVICE_FALLBACK};
pub use gemini::{GeminiConfig, GeminiGateway};
