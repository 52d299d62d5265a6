//! BigQuery API client and authentication.
//!
//! This module provides the [`BigQueryClient`] for interacting with the
//! BigQuery v2 API, along with authentication types ([`Auth`], [`AuthType`]).

mod auth;
mod bigquery;

pub use auth::{Auth, AuthType};
pub use bigquery::BigQueryClient;
