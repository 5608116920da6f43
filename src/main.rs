use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use viewfinder::app::{apply_niceness, install_signal_handlers};
use viewfinder::{HardwareSession, LoopScheduler, LoopStats, ViewfinderConfig};

#[derive(Parser, Debug)]
#[command(name = "viewfinder")]
#[command(about = "Live camera viewfinder with shutter button for the 1.44\" LCD HAT")]
#[command(version)]
#[command(long_about = "Streams a low resolution camera preview to a small SPI framebuffer \
panel and saves a full resolution still whenever the shutter button is pressed. \
Intended to run as a systemd service on a Raspberry Pi.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "viewfinder.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Info level logging, which is also the default
    #[arg(short, long, help = "Enable info level logging (default)")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", help = "Append logs to a file in addition to stderr")]
    log_file: Option<String>,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit without opening devices")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Dry run mode - open and configure devices but don't start the loop
    #[arg(long, help = "Open and configure all devices, then shut down without running the loop")]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    let log_guard = init_logging(&args)?;

    info!("Starting viewfinder v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let config = match ViewfinderConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        if args.validate_config {
            eprintln!("✗ Configuration validation failed: {}", e);
        }
        drop(log_guard);
        std::process::exit(1);
    }

    if args.validate_config {
        info!("Configuration validation successful");
        println!("✓ Configuration is valid");
        return Ok(());
    }

    apply_niceness(config.frame_loop.niceness);

    let shutdown = CancellationToken::new();
    install_signal_handlers(&shutdown);

    let mut session = match HardwareSession::open(&config, shutdown.clone()).await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to open devices ({:?}): {}", e.kind(), e);
            drop(log_guard);
            std::process::exit(1);
        }
    };

    if args.dry_run {
        let result = dry_run(&mut session, &config).await;
        drop(session);
        drop(log_guard);
        if let Err(e) = result {
            eprintln!("✗ Dry run failed: {}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut scheduler = LoopScheduler::from_fps(config.frame_loop.frames_per_second);
    let exit_code = match session.run(&mut scheduler, shutdown).await {
        Ok(reason) => reason.exit_code(),
        Err(e) => {
            error!("Viewfinder stopped on {:?} error: {}", e.kind(), e);
            1
        }
    };

    info!("Viewfinder exited with code: {}", exit_code);

    // process::exit skips destructors; release devices and flush logs first
    drop(session);
    drop(log_guard);
    std::process::exit(exit_code);
}

/// Level for the `viewfinder` target; info covers shutter presses and saved stills
fn log_level(args: &Args) -> &'static str {
    if args.debug {
        "debug"
    } else if args.quiet && !args.verbose {
        "error"
    } else {
        "info"
    }
}

fn init_logging(args: &Args) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("viewfinder={}", log_level(args))));

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_target(true)
                .with_thread_ids(args.debug)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    let (file_layer, guard) = match args.log_file.as_deref() {
        Some(log_file) => {
            let path = Path::new(log_file);
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file path '{}' has no file name", log_file))?;
            let directory = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(file_layer)
        .with(env_filter)
        .init();

    Ok(guard)
}

/// Print default configuration in TOML format
fn print_default_config() -> Result<()> {
    let defaults = toml::to_string_pretty(&ViewfinderConfig::default())
        .context("Failed to serialize default configuration")?;

    println!("# Viewfinder Configuration File");
    println!("# Every value below is the built-in default. Any key can also be set with");
    println!("# an environment variable, e.g. VIEWFINDER_CAMERA__STILL_EXPOSURE_US=20000");
    println!();
    println!("{}", defaults);
    Ok(())
}

/// Open and configure every device once, then tear down without looping
async fn dry_run(session: &mut HardwareSession, config: &ViewfinderConfig) -> viewfinder::Result<()> {
    info!("Dry run mode - devices opened, frame loop will not start");
    let started = session.start().await;
    let teardown = session.shutdown(&LoopStats::default()).await;
    started?;
    teardown?;

    println!("✓ Dry run completed successfully");
    println!("  camera:      /dev/video{}", config.camera.index);
    println!(
        "  preview:     {}x{} @ {}us",
        config.camera.preview_resolution.0,
        config.camera.preview_resolution.1,
        config.camera.preview_exposure_us
    );
    println!(
        "  still:       {}x{} @ {}us",
        config.camera.still_resolution.0,
        config.camera.still_resolution.1,
        config.camera.still_exposure_us
    );
    println!(
        "  display:     {} ({}x{}, {}°)",
        config.display.framebuffer_device,
        config.display.resolution.0,
        config.display.resolution.1,
        config.display.rotation.degrees()
    );
    println!(
        "  buttons:     {:?} {}",
        config.input.backend, config.input.device
    );
    println!("  images:      {}", config.storage.image_dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level_shows_shutter_events() {
        let args = Args::parse_from(["viewfinder"]);
        assert_eq!(log_level(&args), "info");

        let args = Args::parse_from(["viewfinder", "--quiet"]);
        assert_eq!(log_level(&args), "error");

        let args = Args::parse_from(["viewfinder", "--debug"]);
        assert_eq!(log_level(&args), "debug");
    }
}
