//! release-pulse crate
//!
//! This crate is an implementation detail of the `release-pulse` tool. This crate's API is fluid and may change without warning
//! and in a semver-incompatible way.

#[doc(hidden)]
pub mod aggregate;

#[doc(hidden)]
pub mod api;

#[doc(hidden)]
pub mod commands;

#[doc(hidden)]
pub mod config;

#[doc(hidden)]
pub mod enrich;

#[doc(hidden)]
pub mod feed;

#[doc(hidden)]
pub mod pipeline;

#[doc(hidden)]
pub mod store;
