//! End-to-end generation run.
//!
//! fetch → (simplify) → (write spec) → generate → synthesize → write types

use std::path::PathBuf;

use tracing::{debug, info};

use crate::aggregate;
use crate::config::Config;
use crate::error::Error;
use crate::fetch::SpecSource;
use crate::spec;
use crate::typescript::TypeGenerator;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub out_file: PathBuf,
    pub spec_out_file: Option<PathBuf>,
    /// Number of members in the aggregate type
    pub collections: usize,
}

/// Run one generation. Stops at the first failing step; files written by
/// earlier steps are left in place.
pub fn run(
    config: &Config,
    source: &dyn SpecSource,
    generator: &dyn TypeGenerator,
) -> Result<Outcome, Error> {
    let fetched = source.fetch()?;

    let document = if config.simplified {
        spec::simplify(&fetched)
    } else {
        fetched
    };
    debug!(schemas = spec::schema_names(&document).len(), "spec ready");

    if let Some(path) = &config.spec_out_file {
        spec::write_spec_file(path, &document)?;
    }

    let source_text = generator.generate(&document)?;
    let collections = aggregate::write_output(
        &config.out_file,
        &config.type_name,
        &source_text,
        &config.prefix,
    )?;

    info!(collections, out_file = %config.out_file.display(), "generation finished");
    Ok(Outcome {
        out_file: config.out_file.clone(),
        spec_out_file: config.spec_out_file.clone(),
        collections,
    })
}
