use std::process::ExitCode;

use directus2ts::{logging, run, Config, Error, HttpSpecSource, TypeScriptGenerator};

fn main() -> ExitCode {
    let config = match Config::from_args(std::env::args_os()) {
        Ok(config) => config,
        Err(e) if e.is_informational() => {
            if let Error::InvalidArguments(help) = e {
                let _ = help.print();
            }
            return ExitCode::SUCCESS;
        }
        Err(e) => return fail(&e),
    };

    logging::init(config.verbose);
    tracing::debug!(?config, "configuration loaded");

    let result = HttpSpecSource::from_config(&config)
        .and_then(|source| run(&config, &source, &TypeScriptGenerator));
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(err: &Error) -> ExitCode {
    eprintln!("Error: {err}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    ExitCode::FAILURE
}
