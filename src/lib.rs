//! # Payroll Report
//!
//! Monthly payroll reports built from an organization's departments and
//! employees, enriched with employee codes and salaries from external services.
//!
//! ## Usage
//!
//! ```bash
//! payroll-report serve [--bind 0.0.0.0:8080]
//! payroll-report generate --year 2017 --month 1 [--output-dir reports/]
//! ```
//!
//! ## Modules
//!
//! - `app` - Engine construction from configuration
//! - `config` - Layered TOML and environment configuration
//! - `domain` - Employees, money and report periods
//! - `error` - Unified error type with numbered codes
//! - `report` - Bounded fan-out enrichment, aggregation and rendering
//! - `server` - HTTP API for report downloads
//! - `sources` - Organization source and enrichment fetcher abstractions
//! - `testing` - Scripted collaborators for tests
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod report;
pub mod server;
pub mod sources;

pub mod testing;
