//! BCRA Central de Deudores batch lookup API.
//!
//! Accepts batches of Argentine CUITs, queries the BCRA debtor registry for
//! each one sequentially and returns normalized results.
//!
//! # Modules
//!
//! - `batch`: Sequential batch orchestration.
//! - `clock`: Injectable date source.
//! - `config`: Configuration management.
//! - `cuit`: CUIT checksum validation.
//! - `docs`: OpenAPI document and Swagger UI.
//! - `errors`: Error handling types.
//! - `export`: CSV rendering of results.
//! - `field_mapping`: Registry response key table.
//! - `handlers`: HTTP request handlers.
//! - `ingest`: CUIT extraction from text and CSV.
//! - `models`: Core data models.
//! - `pacing`: Delay policies between lookups.
//! - `registry_client`: BCRA API client.
//! - `routes`: Router assembly.

pub mod batch;
pub mod clock;
pub mod config;
pub mod cuit;
pub mod docs;
pub mod errors;
pub mod export;
pub mod field_mapping;
pub mod handlers;
pub mod ingest;
pub mod models;
pub mod pacing;
pub mod registry_client;
pub mod routes;
