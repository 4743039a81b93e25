//! # Commands Module
//!
//! Every user action the shell can trigger.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── invoice.rs    ◄─── Form editing, save, print, voice
//! ├── inventory.rs  ◄─── Stock list, manual entry, scanning
//! ├── chat.rs       ◄─── Co-Pilot questions and dictation
//! ├── dashboard.rs  ◄─── Sales period, network search
//! ├── nav.rs        ◄─── Tabs, notifications, connectivity
//! └── profile.rs    ◄─── Language
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  shell line "item 1 qty 3"                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands::invoice::edit_item(                                          │
//! │      &ctx,                 ◄── AppContext (shared state)                │
//! │      0,                    ◄── parsed arguments                         │
//! │      ItemField::Quantity(3),                                            │
//! │  ) -> Result<DraftView, ApiError>                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  shell re-renders the active tab, then prints pending alerts            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod chat;
pub mod dashboard;
pub mod inventory;
pub mod invoice;
pub mod nav;
pub mod profile;
