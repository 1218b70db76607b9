//! Binary for deploying the guessing game contract.

use anyhow::{Context, Result};
use game_deployer::config::{self, Config};
use game_deployer::deployer::{Deployer, Deployment};
use game_deployer::secret::PrivateKey;
use std::path::PathBuf;
use structopt::StructOpt;
use url::Url;
use web3::types::{Address, U256};

/// Smallest amount of tokens the game needs in its pot before a round can
/// pay out, in base units of the 18 decimal pot token.
const MIN_POT_FUNDING: u64 = 5_000_000_000_000_000_000;

/// Length of a guessing round. Once a round is over anyone may finalize it.
const ROUND_DURATION_MINUTES: u64 = 7;

#[derive(Debug, StructOpt)]
#[structopt(about = "Deploys the GuessTheNumberGameWithPot contract.")]
struct Arguments {
    /// URL of the JSON-RPC endpoint of the target network node.
    #[structopt(long, env = "RPC_URL")]
    rpc_url: Url,

    /// Hex encoded private key of the deployment account.
    #[structopt(long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: PrivateKey,

    /// Address of the token the game pays its pot out in, passed to the
    /// contract constructor.
    #[structopt(long, env = "TOKEN_ADDRESS", parse(try_from_str = config::parse_address))]
    token_address: Address,

    /// Directory containing the Hardhat build output.
    #[structopt(
        long,
        env = "ARTIFACTS_ROOT",
        default_value = "artifacts/contracts",
        parse(from_os_str)
    )]
    artifacts_root: PathBuf,

    /// Name of the compiled contract to deploy.
    #[structopt(long, env = "CONTRACT_NAME", default_value = "GuessTheNumberGameWithPot")]
    contract_name: String,

    /// Gas ceiling for the creation transaction.
    #[structopt(
        long,
        env = "GAS_LIMIT",
        default_value = "3000000",
        parse(try_from_str = U256::from_dec_str)
    )]
    gas_limit: U256,

    /// Number of blocks to wait for the creation transaction to be mined
    /// before giving up.
    #[structopt(long, env = "BLOCK_TIMEOUT", default_value = "25")]
    block_timeout: u64,

    /// Tracing filter, e.g. `info` or `game_deployer=debug`.
    #[structopt(long, env = "LOG_FILTER", default_value = "info")]
    log_filter: String,
}

#[tokio::main]
async fn main() {
    let args = Arguments::from_args();
    initialize_tracing(&args.log_filter);
    tracing::debug!("running deployment with {:#?}", args);

    if let Err(err) = run(args).await {
        tracing::error!("deployment failed: {:?}", err);
        std::process::exit(1);
    }
}

async fn run(args: Arguments) -> Result<()> {
    let config = Config {
        rpc_url: args.rpc_url,
        private_key: args.private_key,
        token_address: args.token_address,
        artifacts_root: args.artifacts_root,
        contract_name: args.contract_name,
        gas_limit: args.gas_limit,
        block_timeout: args.block_timeout,
    };

    let transport = web3::transports::Http::new(config.rpc_url.as_str())
        .context("failed to create HTTP transport")?;
    let web3 = web3::Web3::new(transport);

    let contract_name = config.contract_name.clone();
    let token_address = config.token_address;
    let deployment = Deployer::new(web3, config)
        .deploy()
        .await
        .context("deployment did not complete")?;

    report(&contract_name, token_address, &deployment);
    Ok(())
}

/// Prints the deployed address and the manual follow-up steps to stdout,
/// keeping them separate from the progress log on stderr.
fn report(contract_name: &str, token_address: Address, deployment: &Deployment) {
    println!("{} deployed at {:?}", contract_name, deployment.address);
    println!();
    println!("Next steps:");
    println!(
        "1. Send at least {} base units of the pot token {:?} to {:?}",
        MIN_POT_FUNDING, token_address, deployment.address,
    );
    println!("2. Players submit their guesses through the contract");
    println!(
        "3. After each {} minute round anyone may call endRound() to distribute the pot",
        ROUND_DURATION_MINUTES,
    );
}

fn initialize_tracing(env_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .init();
}
