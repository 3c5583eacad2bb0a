use std::{env, error::Error, io, process::ExitCode};

use anyhow::{anyhow, Result};
use clap::Parser;
use semaphore_proof::{
    cli::{CliConfig, LoggingFormat},
    generate_proof, verification_key, write_hex, CircomProver, ProofError, SemaphoreWitness,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_logging(format: LoggingFormat) -> Result<()> {
    const LOG_CONFIGURATION_ENVVAR: &str = "RUST_LOG";

    let filter = EnvFilter::new(
        env::var(LOG_CONFIGURATION_ENVVAR)
            .as_deref()
            .unwrap_or("warn"),
    );

    // Standard output carries only the encoded proof.
    let subscriber = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(true)
        .with_env_filter(filter);

    match format {
        LoggingFormat::Json => subscriber.json().try_init(),
        LoggingFormat::Text => subscriber.try_init(),
    }
    .map_err(|err| anyhow!(err))
}

fn run(config: &CliConfig) -> Result<Vec<u8>, ProofError> {
    let verifying_key = verification_key::load(&config.verification_key)?;
    let witness = SemaphoreWitness::for_test_identity(&config.external_nullifier, &config.signal)?;
    debug!(
        signal_hash = ?witness.signal_hash,
        external_nullifier = ?witness.external_nullifier,
        "Built witness"
    );

    let prover = CircomProver::load(&config.wasm, &config.zkey)?;
    let generated = generate_proof(&prover, &verifying_key, &witness)?;
    Ok(generated.abi_encode())
}

fn report_failure(err: &ProofError) {
    let mut message = format!("❌ {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    eprintln!("{message}");
}

fn main() -> ExitCode {
    let config = CliConfig::parse();
    if let Err(err) = init_logging(config.logging_format) {
        eprintln!("❌ Couldn't initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    let written = run(&config).and_then(|output| {
        write_hex(&output, &mut io::stdout().lock()).map_err(ProofError::Output)
    });
    match written {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err);
            ExitCode::FAILURE
        }
    }
}
