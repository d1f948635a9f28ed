//! # FAQ Forge
//!
//! A document-to-FAQ generation service backed by hosted assistant APIs.
//!
//! Clients upload documents to a hosted file store, the service drives a
//! hosted assistant over them (conversation → message → job → reply), and
//! the structured question/answer pairs extracted from the reply are
//! persisted under named collections in SQLite and served over a JSON
//! HTTP API.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌──────────┐   ┌──────────┐
//! │  Upload  │──▶│ Assistant job │──▶│ Extract  │──▶│  SQLite  │
//! │ (remote) │   │ create + poll │   │  pairs   │   │  faqs    │
//! └──────────┘   └───────────────┘   └──────────┘   └────┬─────┘
//!                                                        │
//!                                                   ┌────▼─────┐
//!                                                   │   HTTP   │
//!                                                   │   API    │
//!                                                   └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`error`] | Typed error taxonomy |
//! | [`files`] | Hosted document store client |
//! | [`assistant`] | Hosted assistant (conversation/job) client |
//! | [`poller`] | Bounded fixed-interval job polling |
//! | [`extract`] | Fence stripping and FAQ pair decoding |
//! | [`store`] | Collection-scoped FAQ persistence |
//! | [`generate`] | End-to-end orchestration |
//! | [`server`] | HTTP API server |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod assistant;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod files;
pub mod generate;
pub mod migrate;
pub mod models;
pub mod poller;
pub mod server;
pub mod store;
