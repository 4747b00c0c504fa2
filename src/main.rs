// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use alloy::primitives::{Address, U256};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use swap_runner::{
    aggregator::{AggregatorClient, QuoteRequest},
    blockchain::{
        network_by_chain_id, parse_amount, tracked_tokens, ChainClient, POLYGON_USDC, POLYGON_USDT,
    },
    config::{init_tracing, SwapConfig},
    workflow::SwapChain,
    SwapError, SwapWorkflow, WorkflowOptions,
};

#[derive(Debug, Parser)]
#[command(name = "swap-runner", version, about = "Quote and execute token swaps through LI.FI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print native and tracked token balances of the wallet.
    Balances {
        #[arg(long, default_value_t = 137)]
        chain: u64,
    },
    /// Fetch a quote without executing it.
    Quote(SwapArgs),
    /// Quote, approve if needed, and execute the swap.
    Swap(SwapArgs),
}

#[derive(Debug, Args)]
struct SwapArgs {
    #[arg(long, default_value_t = 137)]
    from_chain: u64,
    #[arg(long, default_value_t = 137)]
    to_chain: u64,
    #[arg(long, default_value_t = POLYGON_USDT.address)]
    from_token: Address,
    #[arg(long, default_value_t = POLYGON_USDC.address)]
    to_token: Address,
    /// Amount in the source token's smallest unit.
    #[arg(long, conflicts_with = "ui_amount", default_value = "5000000")]
    amount: U256,
    /// Amount in whole tokens (e.g. `5.25`), scaled by the token's decimals.
    #[arg(long)]
    ui_amount: Option<String>,
    /// Receiving address on the destination chain; defaults to the wallet.
    #[arg(long)]
    to_address: Option<Address>,
    /// Maximum slippage as a fraction (0.005 = 0.5%).
    #[arg(long)]
    slippage: Option<f64>,
    /// Skip the source balance check and leave it to the node.
    #[arg(long)]
    skip_balance_check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "swap-runner failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), SwapError> {
    let config = SwapConfig::from_env()?;
    info!(wallet = %config.identity.address(), "Configuration loaded");

    match cli.command {
        Command::Balances { chain } => {
            let client = connect(&config, chain)?;
            let snapshot = client
                .balance_snapshot(config.identity.address(), &tracked_tokens(chain))
                .await?;
            print_json(&snapshot);
        }
        Command::Quote(args) => {
            let client = connect(&config, args.from_chain)?;
            let request = build_request(&client, &args).await?;
            let quote = AggregatorClient::from_config(&config)?.get_quote(&request).await?;
            print_json(&quote);
        }
        Command::Swap(args) => {
            let client = connect(&config, args.from_chain)?;
            let request = build_request(&client, &args).await?;
            let aggregator = AggregatorClient::from_config(&config)?;
            let options = WorkflowOptions {
                tracked_tokens: tracked_tokens(args.from_chain),
                require_sufficient_balance: !args.skip_balance_check,
                timeout: config.timeout,
            };
            let outcome = SwapWorkflow::new(&client, &aggregator, options)
                .execute(&request)
                .await?;
            print_json(&outcome);
        }
    }
    Ok(())
}

fn connect(config: &SwapConfig, chain_id: u64) -> Result<ChainClient, SwapError> {
    let network = network_by_chain_id(chain_id)
        .ok_or_else(|| SwapError::MissingConfig(format!("unsupported chain id {chain_id}")))?;
    let rpc_url = config
        .rpc_url_override
        .clone()
        .unwrap_or_else(|| network.drpc_url(config.rpc_api_key.expose()));
    ChainClient::connect(network, &rpc_url, &config.identity)
}

async fn build_request(client: &ChainClient, args: &SwapArgs) -> Result<QuoteRequest, SwapError> {
    let amount = match &args.ui_amount {
        Some(ui) => parse_amount(ui, client.token_decimals(args.from_token).await?)?,
        None => args.amount,
    };

    let wallet = client.wallet_address();
    let mut request = QuoteRequest::for_wallet(
        wallet,
        args.from_chain,
        args.to_chain,
        args.from_token,
        args.to_token,
        amount,
    );
    request.to_address = args.to_address.unwrap_or(wallet);
    request.slippage = args.slippage;
    Ok(request)
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => error!(error = %e, "Failed to render output"),
    }
}
