//! # Furrow - a flat-file farm operations tracker
//!
//! Furrow keeps the day-to-day records of one or more farming companies as markdown
//! files with TOML (or YAML) frontmatter. It provides a CLI for people in the field and
//! a GraphQL API for dashboards and automation.
//!
//! ## Features
//!
//! - **Inventory**: stock levels, purchases, usage and reorder warnings
//! - **Needed items**: a shopping list that restocks inventory when goods arrive
//! - **Harvest payroll**: pickers, weigh-ins and batch payouts from a cash pool
//! - **Work**: daily work logs and work cards that go from plan to review to payment
//! - **Seasonal challenges**: pests, weather and other problems, summarised per season
//!
//! ## Quick Start
//!
//! ```bash
//! furrow init
//! furrow company add "Green Acres"
//! furrow item add "DAP fertilizer" --unit kg --quantity 100 --reorder-level 20
//! furrow harvest open --project block-a --crop tea --price 12
//! furrow overview
//! ```
//!
//! ## Modules
//!
//! - [`cli`]: Command-line interface definitions and handlers
//! - [`config`]: Configuration loading and management
//! - [`error`]: Error types and result aliases
//! - [`graphql`]: GraphQL schema, resolvers and HTTP server
//! - [`model`]: Domain records and enums
//! - [`ops`]: Business operations shared by the CLI and GraphQL
//! - [`store`]: File-based document storage
//! - [`validation`]: Input validation utilities

/// Command-line interface definitions using clap.
pub mod cli;

/// Configuration loading and management.
///
/// Handles `.furrow.toml` configuration files and project discovery.
pub mod config;

/// Error types and result aliases.
///
/// Defines `FurrowError` and the `Result<T>` alias.
pub mod error;

/// GraphQL schema and resolvers.
pub mod graphql;

pub mod logging;

/// Domain records: companies, inventory, harvests, cash, work and challenges.
pub mod model;

pub mod ops;

/// File-based storage layer.
///
/// Reads and writes documents as markdown files with frontmatter, one directory per collection.
pub mod store;

/// Input validation utilities.
pub mod validation;
