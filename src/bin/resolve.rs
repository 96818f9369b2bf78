//! Resolves a request template against an environment file.
//!
//! Reads a template from stdin, substitutes every `{{name}}` placeholder from
//! the given environment file and writes the result to stdout.
//!
//! ```text
//! rest-harness-resolve <environment-file> [config-file] < template.txt
//! ```
//!
//! The optional config file supplies the missing-variable policy. Log output
//! goes to stderr and is controlled by `RUST_LOG`.

use rest_harness::config::{load_config, load_config_file, HarnessConfig};
use rest_harness::environment::load_environment_file;
use rest_harness::{substitute_variables, EnvironmentStore, HarnessError};
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

const USAGE: &str = "usage: rest-harness-resolve <environment-file> [config-file] < template";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (env_file, config_file) = match args.as_slice() {
        [env_file] => (env_file, None),
        [env_file, config_file] => (env_file, Some(config_file)),
        _ => {
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    match run(Path::new(env_file), config_file.map(Path::new)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[rest-harness-resolve] {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(env_file: &Path, config_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_settings(config_file)?;

    let store = EnvironmentStore::with_policy(config.missing_variables);
    let count = load_environment_file(env_file, &store).map_err(HarnessError::from)?;
    log::info!("Loaded {} variables from {}", count, env_file.display());

    let mut template = String::new();
    io::stdin().read_to_string(&mut template)?;

    let resolved = substitute_variables(&template, &store).map_err(HarnessError::from)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(resolved.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn load_settings(config_file: Option<&Path>) -> Result<HarnessConfig, HarnessError> {
    let config = match config_file {
        Some(path) => load_config_file(path)?,
        None => load_config(None)?,
    };
    Ok(config.with_env_overrides()?)
}
