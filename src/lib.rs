//! Phone Records API Library
//!
//! This library provides the core functionality for the Phone Records API:
//! a record store with server-side phone number uniqueness, a client for the
//! external phone validation provider, the record creation workflow, and the
//! HTTP handlers exposing it.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `data`: Data access layer.
//! - `integrations`: External service integrations.
//! - `config`: Configuration management.
//! - `db`: Database connection and pool management.
//! - `db_storage`: Postgres record store.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `openapi`: Generated OpenAPI document.
//! - `routes`: Router assembly.
//! - `services`: Record creation workflow.
//! - `store`: Record store abstraction and in-memory implementation.
//! - `validation_client`: Phone validation provider client.

pub mod api;
pub mod core;
pub mod data;
pub mod integrations;

// Re-export primary modules for shared use in tests and other binaries
pub mod config;
pub mod db;
pub mod db_storage;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod store;
pub mod validation_client;
