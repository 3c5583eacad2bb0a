use std::{env, error::Error, io, process::ExitCode};

use anyhow::{anyhow, Result};
use clap::Parser;
use contract_deployer::{
    config::{CliConfig, LoggingFormat},
    deploy,
    providers::{create_provider_with_signer, RpcDeploymentClient},
    ContractArtifact, DeployError, DeploymentConfig, DeploymentResult, Progress, RegistryClient,
    TerminalPrompter, FAILURE_EXIT_CODE,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn init_logging(format: LoggingFormat) -> Result<()> {
    const LOG_CONFIGURATION_ENVVAR: &str = "RUST_LOG";

    let filter = EnvFilter::new(
        env::var(LOG_CONFIGURATION_ENVVAR)
            .as_deref()
            .unwrap_or("info"),
    );

    // Standard output is reserved for prompts and the deployment report.
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

async fn run(cli_config: CliConfig) -> Result<DeploymentResult, DeployError> {
    let artifact = ContractArtifact::load(&cli_config.artifact)?;

    let config = DeploymentConfig::resolve(&cli_config)?;
    let signer = config.signer()?;
    debug!(?config, deployer = %signer.address(), "Resolved deployment configuration");

    let deployer = signer.address();
    let provider = create_provider_with_signer(&config.rpc_url, signer).await?;
    let client = RpcDeploymentClient::new(provider, deployer);
    let registry = RegistryClient::new(cli_config.registry_url);

    deploy(
        &artifact,
        cli_config.chain,
        &client,
        &registry,
        &mut TerminalPrompter,
        &Progress::spinner(),
        &mut io::stdout(),
        &mut io::stderr(),
    )
    .await
}

/// Configuration problems are printed as they are, one line per problem. Everything else gets its
/// whole cause chain.
fn report_failure(err: &DeployError) {
    if err.is_config_error() {
        println!("{err}");
        return;
    }

    let mut message = format!("❌ {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    eprintln!("{message}");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A missing `.env` file is fine: the environment may be set up by other means.
    let _ = dotenvy::dotenv();

    let cli_config = CliConfig::parse();
    if let Err(err) = init_logging(cli_config.logging_format) {
        eprintln!("❌ Couldn't initialize logging: {err}");
        return ExitCode::from(FAILURE_EXIT_CODE);
    }

    match run(cli_config).await {
        Ok(result) => {
            info!(
                tx_hash = %result.transaction_hash,
                address = %result.contract_address,
                "Deployment finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_failure(&err);
            ExitCode::from(err.exit_status())
        }
    }
}
