//! vpnctl - Pritunl VPN orchestrator
//!
//! Resolves Pritunl profiles by name pattern, attaches one-time codes
//! generated from a keyring-held master password, and waits for the client
//! to report the requested state before returning.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use vpnctl_core::{error::VpnctlError, init_logging};

mod cli;

#[derive(Parser)]
#[command(name = "vpnctl")]
#[command(about = "Pritunl VPN orchestrator with keyring-backed OTP")]
struct Cli {
    /// Configuration file (default: ~/.config/vpnctl/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to a VPN target
    Connect {
        /// Configured target alias
        alias: String,
    },
    /// Disconnect a VPN target, or every target with `all`
    Disconnect {
        /// Configured target alias or `all`
        target: String,
    },
    /// Show VPN connection status
    Status,
    /// List configured targets
    Targets,
    /// Print the one-time code for a target
    Otp {
        /// Configured target alias
        alias: String,
    },
    /// Store the OTP generator master password in the keyring
    Setup,
    /// Print the current version
    Version,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            std::process::exit(2);
        }
    };

    let config_path = cli.config.as_deref();
    let result = runtime.block_on(async {
        match cli.command {
            Commands::Connect { alias } => cli::vpn::run_connect(config_path, &alias).await,
            Commands::Disconnect { target } => cli::vpn::run_disconnect(config_path, &target).await,
            Commands::Status => cli::vpn::run_status(config_path).await,
            Commands::Targets => cli::targets::run_targets(config_path),
            Commands::Otp { alias } => cli::otp::run_otp(config_path, &alias).await,
            Commands::Setup => cli::setup::run_setup(config_path),
            Commands::Version => {
                cli::run_version();
                Ok(())
            }
        }
    });

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            let exit_code = match e {
                // Configuration and credential setup problems (exit code 2)
                VpnctlError::Config(_) | VpnctlError::Toml(_) => 2,
                VpnctlError::Auth(_) => 2,
                // Runtime failures talking to the VPN client (exit code 1)
                VpnctlError::Vpn(_) => 1,
                VpnctlError::Io(_) => 1,
            };

            eprintln!("{} {}", "❌".red(), e.to_string().red());
            std::process::exit(exit_code);
        }
    }
}
