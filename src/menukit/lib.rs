//! # Menukit Architecture
//!
//! Menukit is a **UI-agnostic document engine** for chat-bot menus. The
//! CLI in `main.rs` is just one client of the library; nothing below the
//! presentation layer knows it exists, and the same core could back a
//! desktop editor or a bot's admin panel.
//!
//! A menu document is an ordered list of named sections; each section has
//! body text, an optional file attachment, and a keyboard of buttons whose
//! `callback_data` names the section it jumps to. Those by-name references
//! are the interesting part: they are *soft* (dangling is legal), and the
//! engine's job is to keep an honest picture of them (who links where,
//! what an edit would leave dangling) without ever blocking an edit.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Presentation (main.rs + args.rs, binary only)              │
//! │  - Parses arguments, formats output, handles exit codes     │
//! │  - The ONLY place that knows about stdout/stderr            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Workspace (workspace.rs)                                   │
//! │  - One open document, its bound path, the dirty flag        │
//! │  - open/save/close protocol, backup-on-write, remote seam   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Model & views (model.rs, links.rs, search.rs)              │
//! │  - Sections, keyboards, mutation rules                      │
//! │  - Derived read-only views recomputed on demand             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Schema (schema.rs)                                         │
//! │  - The JSON wire format, strict shapes, unknown keys kept   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Edits Never Cascade
//!
//! Removing or renaming a section does not touch the buttons that point at
//! it. A reference that stops resolving simply dangles; the link views
//! report it and the presentation layer decides what to tell the user.
//! This mirrors how the documents behave in production: bots tolerate
//! dangling callbacks, and editors that "helpfully" rewrite keyboards lose
//! data.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `workspace.rs` inward, code takes regular Rust arguments, returns
//! regular Rust types, never writes to stdout/stderr, and never assumes a
//! terminal. Remote documents reach the workspace through the
//! [`transfer::RemoteTransfer`] trait; the crate ships an in-memory
//! implementation for tests and leaves real transports to the caller.
//!
//! ## Module Overview
//!
//! - [`model`]: Core data types (`Document`, `Section`, `Button`)
//! - [`schema`]: Parsing and serializing the document file format
//! - [`links`]: The back-reference view ("who links to me")
//! - [`search`]: Name filtering for section pickers
//! - [`workspace`]: Document lifecycle, saving, backups
//! - [`transfer`]: Remote pull/push seam
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod links;
pub mod model;
pub mod schema;
pub mod search;
pub mod transfer;
pub mod workspace;
