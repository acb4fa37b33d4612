//! VPN command implementations
//!
//! Implements `vpnctl connect`, `vpnctl disconnect` and `vpnctl status`.

use colored::Colorize;
use std::cell::Cell;
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;
use tracing::debug;
use vpnctl_core::auth::CotpGenerator;
use vpnctl_core::error::VpnctlError;
use vpnctl_core::types::ALL_TARGETS;
use vpnctl_core::vpn::status::StatusEntry;
use vpnctl_core::vpn::{ControlEvent, Controller, DesiredState, PritunlClient, StateMirror, StopOutcome};

use super::load_config;

/// Prints controller progress, keeping track of an unterminated wait line
#[derive(Default)]
struct ProgressPrinter {
    line_open: Cell<bool>,
}

impl ProgressPrinter {
    fn handle(&self, event: &ControlEvent) {
        match event {
            ControlEvent::Resolving { alias } => {
                println!("🔍 Resolving ID for target: {}...", alias);
            }
            ControlEvent::Resolved { .. } | ControlEvent::Starting { .. } => {}
            ControlEvent::SkippingOtp { .. } => {
                println!("🔑 Target uses SSO. Skipping OTP generation.");
            }
            ControlEvent::GeneratingOtp { label } => {
                println!("🔐 Fetching credentials & generating OTP for label: {}...", label);
            }
            ControlEvent::OtpGenerated => {
                println!("{}", "✅ Token generated successfully.".green());
            }
            ControlEvent::Stopping { alias, id } => {
                println!("🛑 Stopping {} ({})...", alias, id);
            }
            ControlEvent::Waiting { desired } => {
                match desired {
                    DesiredState::Connected => print!("⏳ Waiting for connection"),
                    DesiredState::Disconnected => print!("⏳ Waiting for disconnection"),
                }
                self.line_open.set(true);
                flush();
            }
            ControlEvent::Pending => {
                print!(".");
                flush();
            }
            ControlEvent::Converged { desired } => {
                self.finish_line();
                match desired {
                    DesiredState::Connected => println!("{}", "✅ Connected.".green().bold()),
                    DesiredState::Disconnected => println!("{}", "✅ Disconnected.".green().bold()),
                }
            }
            ControlEvent::DisconnectTimedOut { alias } => {
                self.finish_line();
                println!(
                    "{}",
                    format!(
                        "⚠️  {} did not report disconnected in time, but the stop signal was sent.",
                        alias
                    )
                    .yellow()
                );
            }
        }
    }

    fn finish_line(&self) {
        if self.line_open.replace(false) {
            println!();
        }
    }
}

/// Progress output only; a failed flush just delays the dots
fn flush() {
    io::stdout().flush().ok();
}

fn build_controller(
    config_path: Option<&Path>,
    printer: &Rc<ProgressPrinter>,
) -> Result<Controller<PritunlClient, CotpGenerator>, VpnctlError> {
    let config = load_config(config_path)?;
    let client = PritunlClient::from_settings(&config.client)?;
    let otp = CotpGenerator::from_settings(&config.credentials);
    let mirror = StateMirror::from_settings(&config.state)?;
    debug!(
        "Using VPN client at {} and state file {}",
        client.binary().display(),
        mirror.path().display()
    );

    let printer = Rc::clone(printer);
    Ok(Controller::new(config, client, otp, mirror).with_observer(move |event| printer.handle(event)))
}

/// Run the connect command
pub async fn run_connect(config_path: Option<&Path>, alias: &str) -> Result<(), VpnctlError> {
    let printer = Rc::new(ProgressPrinter::default());
    let controller = build_controller(config_path, &printer)?;

    match controller.connect(alias).await {
        Ok(outcome) => {
            if !outcome.output.is_empty() {
                println!("{}", outcome.output);
            }
            Ok(())
        }
        Err(e) => {
            printer.finish_line();
            Err(e)
        }
    }
}

/// Run the disconnect command for one alias or `all`
pub async fn run_disconnect(config_path: Option<&Path>, target: &str) -> Result<(), VpnctlError> {
    let printer = Rc::new(ProgressPrinter::default());
    let controller = build_controller(config_path, &printer)?;

    if target.eq_ignore_ascii_case(ALL_TARGETS) {
        println!("🛑 Disconnecting EVERYTHING...");
        let report = controller.disconnect_all().await;

        for (alias, result) in &report.results {
            match result {
                Ok(StopOutcome::Stopped(stop)) if stop.timed_out => {
                    println!(
                        "{}",
                        format!("⚠️  Stopped {} but it still reports connected", alias).yellow()
                    );
                }
                Ok(StopOutcome::Stopped(_)) => println!("{}", format!("✅ Stopped {}", alias).green()),
                Ok(StopOutcome::NotImported) => {}
                Err(e) => eprintln!("{}", format!("⚠️  {}: {}", alias, e).yellow()),
            }
        }

        if report.stopped().next().is_none() && report.failures().next().is_none() {
            println!("Nothing to disconnect.");
        }
        println!("✅ Disconnect sequence complete.");
        return Ok(());
    }

    match controller.disconnect(target).await {
        Ok(_) => Ok(()),
        Err(e) => {
            printer.finish_line();
            Err(e)
        }
    }
}

/// Run the status command
pub async fn run_status(config_path: Option<&Path>) -> Result<(), VpnctlError> {
    let printer = Rc::new(ProgressPrinter::default());
    let controller = build_controller(config_path, &printer)?;

    let entries = controller.status().await?;
    render_status(&entries);
    Ok(())
}

fn render_status(entries: &[StatusEntry]) {
    println!();
    println!("{}", "--- 🌐 VPN Connection Status ---".bold());

    if entries.is_empty() {
        println!("🤷 No Pritunl profiles found.");
    }

    for entry in entries {
        if entry.connected {
            println!("✅ ▶️ Profile: {}", entry.label.bold());
            println!("   Status: {}", "CONNECTED".green().bold());
            if let Some(uptime) = &entry.uptime {
                println!("   ⏱️  Uptime: {}", uptime);
            }
            if let Some(address) = &entry.client_address {
                println!("   💻 IP: {}", address);
            }
        } else {
            println!("❌ ▶️ Profile: {}", entry.label.bold());
            println!("   Status: {}", "DISCONNECTED".red().bold());
        }
        println!();
    }

    println!("{}", "--------------------------------".bold());
}
