//! `pursuit` – person-following controller, operator binary.
//!
//! 1. Initialises logging (see `pursuit_runtime::telemetry`).
//! 2. Loads `~/.pursuit/config.toml`, writing the defaults on first run.
//! 3. Builds the fuzzy controller and control loop from the loaded tuning.
//! 4. Runs the loop against the simulated target and a logging drive sink
//!    until **Ctrl-C**, which stops the loop and sends a final zero command.

mod config;

use std::process::ExitCode;

use colored::Colorize;
use pursuit_hal::RunFlag;
use pursuit_hal::sim::{LogSink, SimTarget};
use pursuit_runtime::{StopHandle, init_tracing};
use tracing::{error, warn};

fn main() -> ExitCode {
    let _telemetry = init_tracing("pursuit");

    print_banner();

    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            let mut cfg = config::Config::default();
            config::apply_env_overrides(&mut cfg);
            match config::save(&config::Config::default()) {
                Ok(()) => println!(
                    "  {} Default config written to {}",
                    "✓".green().bold(),
                    config::config_path().display().to_string().bold()
                ),
                Err(e) => println!("{}: {}", "Error saving config".red(), e),
            }
            cfg
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::Config::default()
        }
    };

    let control = match cfg.control_loop() {
        Ok(control) => control,
        Err(e) => {
            error!(error = %e, "invalid controller configuration");
            println!("{}: {}", "Invalid configuration".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "  Calibrated height {} px, cycle {} ms",
        cfg.calibrated_height.to_string().bold(),
        cfg.control_loop.period_ms.to_string().bold()
    );

    let (stop, signal) = StopHandle::new();
    let stop_on_ctrlc = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "⚠  Ctrl-C received – stopping the robot …".yellow().bold());
        stop_on_ctrlc.stop();
    }) {
        warn!(error = %e, "failed to install Ctrl-C handler; the loop can only be stopped by killing the process");
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            println!("{}: {}", "Failed to start runtime".red(), e);
            return ExitCode::FAILURE;
        }
    };

    let target = SimTarget::new(cfg.calibrated_height);
    let run_flag = RunFlag::new();
    let mut drive = LogSink;

    println!("  Following the simulated target. Press {} to stop.\n", "Ctrl-C".bold().cyan());
    run_flag.start();

    let stats = runtime.block_on(control.run(&target, &run_flag, &mut drive, signal));
    drop(stop);

    println!();
    println!("{}", "  ✓ Drive stopped.".green());
    println!(
        "  {} cycles, {} without a target, {} rejected commands",
        stats.cycles, stats.target_lost_cycles, stats.sink_faults
    );
    ExitCode::SUCCESS
}

fn print_banner() {
    println!();
    println!("{}", r#"    ___  __  _______ ____  __  __________"#.bold().cyan());
    println!("{}", r#"   / _ \/ / / / ___/ __/ / / / /  _/_  __/"#.bold().cyan());
    println!("{}", r#"  / ___/ /_/ / /  _\ \/ /_/ // /  / /   "#.bold().cyan());
    println!("{}", r#" /_/   \____/_/  /___/\____/___/ /_/    "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "Pursuit".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Fuzzy person-following controller");
    println!();
}
