//! Command-line arguments → validated `Config`.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::error::Error;
use crate::typescript::is_valid_identifier;

/// Environment variable consulted when `--token` is not given.
pub const TOKEN_ENV: &str = "DIRECTUS2TS_TOKEN";

/// Default timeout for the spec request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for a single generation run. Built once from the command line.
#[derive(Clone)]
#[non_exhaustive]
pub struct Config {
    /// Base URL of the Directus instance, without trailing slash
    pub host: String,
    /// Static bearer token
    pub token: String,
    /// Name of the aggregate type
    pub type_name: String,
    /// Destination of the generated `.ts` file
    pub out_file: PathBuf,
    /// Optional destination of the (possibly simplified) spec JSON
    pub spec_out_file: Option<PathBuf>,
    /// Strip Directus system collections before generating
    pub simplified: bool,
    /// Prepended to every referenced collection schema
    pub prefix: String,
    /// Upper bound on the spec request
    pub timeout: Duration,
    /// Debug-level logging
    pub verbose: bool,
}

impl Config {
    pub fn new(
        host: impl Into<String>,
        token: impl Into<String>,
        type_name: impl Into<String>,
        out_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_string(),
            token: token.into(),
            type_name: type_name.into(),
            out_file: out_file.into(),
            spec_out_file: None,
            simplified: false,
            prefix: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verbose: false,
        }
    }

    /// Also write the spec JSON to `path`.
    pub fn spec_out_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec_out_file = Some(path.into());
        self
    }

    pub fn simplified(mut self, simplified: bool) -> Self {
        self.simplified = simplified;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The clap command describing every accepted flag.
    pub fn command() -> Command {
        Command::new(env!("CARGO_PKG_NAME"))
            .version(env!("CARGO_PKG_VERSION"))
            .about("Generate TypeScript types from a Directus OpenAPI spec")
            .arg(
                Arg::new("host")
                    .long("host")
                    .required(true)
                    .action(ArgAction::Set)
                    .help("Host where the Directus API is served"),
            )
            .arg(
                Arg::new("token")
                    .long("token")
                    .env(TOKEN_ENV)
                    .hide_env_values(true)
                    .required(true)
                    .action(ArgAction::Set)
                    .help("Access token; generated types follow this token's permissions"),
            )
            .arg(
                Arg::new("typeName")
                    .long("typeName")
                    .required(true)
                    .action(ArgAction::Set)
                    .help("Name of the global type grouping every collection"),
            )
            .arg(
                Arg::new("outFile")
                    .long("outFile")
                    .required(true)
                    .value_parser(value_parser!(PathBuf))
                    .action(ArgAction::Set)
                    .help("Path of the generated .ts file"),
            )
            .arg(
                Arg::new("specOutFile")
                    .long("specOutFile")
                    .value_parser(value_parser!(PathBuf))
                    .action(ArgAction::Set)
                    .help("Optional path to write the OpenAPI spec file"),
            )
            .arg(
                Arg::new("simplified")
                    .long("simplified")
                    .num_args(0..=1)
                    .default_value("false")
                    .default_missing_value("true")
                    .value_parser(value_parser!(bool))
                    .action(ArgAction::Set)
                    .help("Remove Directus system collections from the spec"),
            )
            .arg(
                Arg::new("prefix")
                    .long("prefix")
                    .default_value("")
                    .action(ArgAction::Set)
                    .help("Prefix added to every collection type reference"),
            )
            .arg(
                Arg::new("timeout")
                    .long("timeout")
                    .value_name("SECONDS")
                    .default_value("30")
                    .value_parser(value_parser!(u64).range(1..))
                    .action(ArgAction::Set)
                    .help("Timeout for the spec request"),
            )
            .arg(
                Arg::new("verbose")
                    .long("verbose")
                    .short('v')
                    .action(ArgAction::SetTrue)
                    .help("Enable debug logging"),
            )
    }

    /// Parse and validate raw process arguments (including the program name).
    pub fn from_args<I, T>(args: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        Self::from_matches(&matches)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self, Error> {
        let host = required_string(matches, "host")?;
        if host.trim_end_matches('/').is_empty() {
            return Err(Error::InvalidValue {
                flag: "host",
                reason: "must not be empty".into(),
            });
        }

        let type_name = required_string(matches, "typeName")?;
        if !is_valid_identifier(&type_name) {
            return Err(Error::InvalidValue {
                flag: "typeName",
                reason: format!("{type_name:?} is not a valid TypeScript identifier"),
            });
        }

        let out_file = matches
            .get_one::<PathBuf>("outFile")
            .cloned()
            .ok_or_else(|| missing("outFile"))?;

        let mut config = Config::new(
            host,
            required_string(matches, "token")?,
            type_name,
            out_file,
        )
        .simplified(matches.get_one::<bool>("simplified").copied().unwrap_or(false))
        .prefix(
            matches
                .get_one::<String>("prefix")
                .cloned()
                .unwrap_or_default(),
        )
        .timeout(Duration::from_secs(
            matches
                .get_one::<u64>("timeout")
                .copied()
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        ));

        config.spec_out_file = matches.get_one::<PathBuf>("specOutFile").cloned();
        config.verbose = matches.get_flag("verbose");
        Ok(config)
    }
}

// The token never reaches logs or panic messages.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("type_name", &self.type_name)
            .field("out_file", &self.out_file)
            .field("spec_out_file", &self.spec_out_file)
            .field("simplified", &self.simplified)
            .field("prefix", &self.prefix)
            .field("timeout", &self.timeout)
            .field("verbose", &self.verbose)
            .finish()
    }
}

fn required_string(matches: &ArgMatches, id: &'static str) -> Result<String, Error> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| missing(id))
}

fn missing(flag: &'static str) -> Error {
    Error::InvalidValue {
        flag,
        reason: "is required".into(),
    }
}
