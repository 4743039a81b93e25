//! # UdyamX Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           UdyamX (terminal)                             │
//! │                                                                         │
//! │   stdin ──► Shell ──► commands ──► AppContext ──► store / AI / sync     │
//! │     ▲                                                 │                 │
//! │     └──────────── rendered tab + alerts ◄─────────────┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The actual setup is in lib.rs so it can be tested.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    udyamx_app::run().await
}
