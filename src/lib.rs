//! Generate TypeScript types from a Directus OpenAPI spec.
//!
//! Fetches `/server/specs/oas` from a Directus instance, optionally strips
//! the Directus system collections, renders the document as TypeScript
//! declarations and prepends one aggregate type mapping every collection to
//! its schema.
//!
//! # Usage
//!
//! ```no_run
//! use directus2ts::{run, Config, HttpSpecSource, TypeScriptGenerator};
//!
//! let config = Config::new("http://localhost:8055", "token", "DirectusTypes", "types.ts")
//!     .simplified(true)
//!     .prefix("app_");
//! let source = HttpSpecSource::from_config(&config)?;
//! let outcome = run(&config, &source, &TypeScriptGenerator)?;
//! println!("{} collections", outcome.collections);
//! # Ok::<(), directus2ts::Error>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod pipeline;
pub mod spec;
pub mod typescript;

pub use aggregate::{export_properties, render_output, write_output, ExportProperty, HEADER};
pub use config::Config;
pub use error::Error;
pub use fetch::{HttpSpecSource, SpecSource, SPEC_PATH};
pub use pipeline::{run, Outcome};
pub use spec::{simplify, write_spec_file};
pub use typescript::{generate, TypeGenerator, TypeScriptGenerator};
