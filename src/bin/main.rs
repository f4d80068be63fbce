//! Beewallet CLI - single-key wallet on a Bitcoin test network
//!
//!   beewallet balance                   → balance over both owned addresses
//!   beewallet address                   → legacy + segwit receive addresses
//!   beewallet send <amount> <address>   → build, sign, broadcast; prints txid
//!
//! Configuration (flags override env, env overrides `.env`):
//!   --data-dir / BEEWALLET_DATA_DIR     directory holding wallet.key
//!   --network  / BEEWALLET_NETWORK      bitcoin|testnet|signet|regtest
//!   --api      / BEEWALLET_API_URL      Esplora-style API base

use anyhow::{bail, Context};
use beewallet::logging::init_logging;
use beewallet::{Money, Network, Wallet, WalletConfig};
use std::env;
use tracing::debug;

fn main() {
    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);
    init_logging();

    if opts.help {
        print_usage();
        return;
    }

    let result = match opts.command.as_deref() {
        Some("balance") => cmd_balance(&opts),
        Some("address") => cmd_address(&opts),
        Some("send") => cmd_send(&opts),
        Some("help") | None => {
            print_usage();
            return;
        }
        Some(cmd) => {
            println!("Unknown command: {}\n", cmd);
            print_usage();
            std::process::exit(1);
        }
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            println!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    positional: Vec<String>,
    data_dir: Option<String>,
    network: Option<String>,
    api_url: Option<String>,
    help: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        // Load .env file if present; never overrides the process environment
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let value = value.trim().trim_matches('"');
                    if !value.is_empty() && env::var(key.trim()).is_err() {
                        env::set_var(key.trim(), value);
                    }
                }
            }
        }

        let mut opts = ParsedArgs::default();
        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--data-dir" | "-d" | "--network" | "-n" | "--api" | "-a" => {
                    if let Some(value) = args.get(i + 1) {
                        let slot = match arg.as_str() {
                            "--data-dir" | "-d" => &mut opts.data_dir,
                            "--network" | "-n" => &mut opts.network,
                            _ => &mut opts.api_url,
                        };
                        *slot = Some(value.clone());
                        i += 1;
                    }
                }
                _ if opts.command.is_none() => opts.command = Some(arg.clone()),
                _ => opts.positional.push(arg.clone()),
            }
            i += 1;
        }
        opts
    }

    fn config(&self) -> anyhow::Result<WalletConfig> {
        let mut config = WalletConfig::from_env();
        if let Some(net) = &self.network {
            let network = Network::from_str(net).with_context(|| format!("Unknown network: {}", net))?;
            config = config.with_network(network);
        }
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir);
        }
        if let Some(url) = &self.api_url {
            config = config.with_api_base(url);
        }
        debug!(network = %config.network, data_dir = %config.data_dir.display(), "resolved config");
        Ok(config)
    }
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to create runtime")
}

fn cmd_balance(opts: &ParsedArgs) -> anyhow::Result<String> {
    let wallet = Wallet::open(&opts.config()?)?;
    let balance = runtime()?.block_on(wallet.balance())?;
    let [legacy, segwit] = wallet.addresses();
    Ok(format!("Current balance: {}\nLegacy address: {}\nSegwit address: {}", balance, legacy, segwit))
}

fn cmd_address(opts: &ParsedArgs) -> anyhow::Result<String> {
    let wallet = Wallet::open(&opts.config()?)?;
    let [legacy, segwit] = wallet.addresses();
    Ok(format!("Legacy address: {}\nSegwit address: {}", legacy, segwit))
}

fn cmd_send(opts: &ParsedArgs) -> anyhow::Result<String> {
    let (amount, destination) = match opts.positional.as_slice() {
        [amount, destination] => (amount, destination),
        _ => bail!("Usage: beewallet send <amount> <address>"),
    };
    let amount = Money::from_btc_str(amount)?;
    let config = opts.config()?;
    let wallet = Wallet::open(&config)?;
    let txid = runtime()?.block_on(wallet.send(amount, destination))?;
    Ok(format!(
        "Transaction broadcasted!\nTXID: {}\nView on explorer: {}",
        txid,
        config.network.explorer_tx_url(&txid)
    ))
}

fn print_usage() {
    println!(
        r#"beewallet - single-key Bitcoin wallet

USAGE:
    beewallet <command> [args] [options]

COMMANDS:
    balance                     Show balance and addresses
    address                     Show receive addresses
    send <amount> <address>     Send <amount> BTC (e.g. 0.0005) to <address>
    help                        Show this message

OPTIONS:
    --data-dir, -d <path>       Key directory (env: BEEWALLET_DATA_DIR)
    --network, -n <net>         bitcoin|testnet|signet|regtest (env: BEEWALLET_NETWORK, default: signet)
    --api, -a <url>             API base URL (env: BEEWALLET_API_URL)
    --help, -h                  Show this message

ENVIRONMENT:
    RUST_LOG                    Log filter (default: warn,beewallet=info)
    BEEWALLET_LOG_JSON=1        JSON logs on stderr

EXAMPLES:
    beewallet balance
    beewallet send 0.0005 tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx
    beewallet --network regtest --api http://127.0.0.1:3002/api balance
"#
    );
}
