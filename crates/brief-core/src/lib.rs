//! Core types and trait definitions for the activity briefing service.
//!
//! Nothing here talks HTTP or touches a database.
//! Storage backends implement [`store::ActivityStore`]; the summarization
//! pipeline consumes the [`selector`] and [`normalize`] stages.

// Native `async fn` in traits; the returned futures carry explicit `Send`
// bounds in the trait signatures.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod activity;
pub mod error;
pub mod expense;
pub mod file;
pub mod normalize;
pub mod selector;
pub mod store;

pub use error::{Error, Result};
