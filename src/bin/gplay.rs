//! gplay CLI Binary
//!
//! Command-line interface for Google Play reviews and Android vitals.

use clap::error::ErrorKind;
use clap::Parser;
use gplay::cli::{emit, Cli, Rendered, RunContext};
use gplay::error::ErrorCode;
use gplay::logging::{init_logging, LoggingConfig};
use std::io::{self, Write};
use std::process;
use tracing::{debug, error};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ErrorCode::Success,
                _ => ErrorCode::ValidationError,
            };
            let _ = e.print();
            process::exit(code.exit_code());
        }
    };

    let context = RunContext::new(cli.config.as_deref());

    // Build logging config from CLI args and the loaded config file
    let logging_config = build_logging_config(&cli, &context.config().logging);
    if let Err(e) = init_logging(&logging_config) {
        let _ = writeln!(io::stderr(), "Failed to initialize logging: {}", e);
    }
    debug!("gplay starting");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start runtime: {}", e);
            let _ = writeln!(io::stderr(), "Failed to start runtime: {}", e);
            process::exit(ErrorCode::GeneralError.exit_code());
        }
    };

    let invocation = runtime.block_on(context.execute(&cli));
    let rendered = emit(&invocation.envelope, &invocation.options);
    let exit_code = write_rendered(&rendered, &mut io::stdout().lock(), &mut io::stderr().lock());
    process::exit(exit_code);
}

/// Write warnings and the payload, returning the exit code to use.
///
/// A closed reader (`gplay ... | head`) keeps the command's own exit code;
/// any other write failure exits as a general error.
fn write_rendered(rendered: &Rendered, out: &mut impl Write, err: &mut impl Write) -> i32 {
    let warnings = rendered
        .stderr_lines
        .iter()
        .try_for_each(|line| writeln!(err, "{}", line))
        .and_then(|_| err.flush());
    let payload = if rendered.stdout.is_empty() {
        Ok(())
    } else {
        writeln!(out, "{}", rendered.stdout).and_then(|_| out.flush())
    };

    let failed = [warnings, payload]
        .into_iter()
        .filter_map(Result::err)
        .any(|e| e.kind() != io::ErrorKind::BrokenPipe);
    if failed {
        ErrorCode::GeneralError.exit_code()
    } else {
        rendered.exit_code
    }
}

/// Build logging configuration from CLI args and the config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, base: &LoggingConfig) -> LoggingConfig {
    let mut config = base.clone();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
        // Mirror file logs to stderr; an explicit --log-output still wins below.
        if config.output == "file" {
            config.output = "both".to_string();
        }
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
