//! # Flightprep - flight listing cleaning and feature engineering
//!
//! Flightprep turns raw flight-fare listings (CSV or XLSX) into a model-ready
//! table: dates and clock times are split into integer parts, durations are
//! normalized, stop counts become ordinals, and nominal columns are one-hot
//! encoded.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV / XLSX │────▶│   Parser    │────▶│   Stages    │────▶│  One-hot    │
//! │  (any enc.) │     │  (auto-fmt) │     │  (cleaning) │     │  + summary  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flightprep::{process_file, PipelineOptions};
//!
//! let output = process_file("Data_Train.xlsx", &PipelineOptions::default())?;
//! println!("{} rows, {} encoded columns", output.cleaned.len(), output.encoded.width());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`models`] - Column names and value shapes (dates, times, durations, stops)
//! - [`table`] - In-memory record table
//! - [`parser`] - CSV/XLSX loading with auto-detection
//! - [`transform`] - Cleaning stages, one-hot encoding and the pipeline
//! - [`report`] - Chart-ready run summary
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;
pub mod table;

// Loading
pub mod parser;

// Transformation
pub mod transform;

// Reporting
pub mod report;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{LoadError, PipelineError, ServerError, StageError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{ClockTime, FlightDuration, JourneyDate, TotalStops};
pub use table::{Record, Table};

// =============================================================================
// Re-exports - Loading
// =============================================================================

pub use parser::{load_bytes, load_file, LoadInfo, LoadedTable, SourceFormat};

// =============================================================================
// Re-exports - Stages
// =============================================================================

pub use transform::{
    decompose_arrival_time,
    decompose_departure_time,
    decompose_journey_date,
    describe_stages,
    map_total_stops,
    normalize_duration,
    one_hot_encode,
    prune_columns,
    EncodedFeature,
    OneHotEncoding,
    Stage,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    check_required_columns,
    clean_table,
    process_bytes,
    process_file,
    PipelineOptions,
    PipelineOutput,
};

// =============================================================================
// Re-exports - Report & API
// =============================================================================

pub use report::{build_summary, BoxplotStats, PriceByClass, Summary};
pub use api::types::{error_response, JobStatus, UploadResponse};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
