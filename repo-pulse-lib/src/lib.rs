#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for repo-pulse
//!
//! This library gathers collaboration and impact metrics for open-source repositories
//! hosted on GitHub and assembles them into one denormalized record per repository.
//!
//! # Module Organization
//!
//! - [`cache`]: In-memory response cache with a freshness window
//! - [`hosting`]: GitHub client, credential handling, and resilient fetching
//! - [`facets`]: The six independently fetched data facets of a repository
//! - [`aggregate`]: The repository record and its base form
//! - [`enrich`]: Concurrent fan-out that turns a base record into an aggregate
//! - [`search`]: Search and trending queries with pagination
//! - [`sample`]: Embedded sample dataset
//! - [`commands`]: Command-line interface and orchestration
//! - [`reports`]: Console and JSON output

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod aggregate;
pub mod cache;
pub mod enrich;
pub mod facets;
pub mod hosting;
pub mod sample;
pub mod search;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

pub use crate::commands::{Host, run};
