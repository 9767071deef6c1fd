use std::{
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{CommandFactory, Parser, ValueHint};
use tracing::error;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};
use tty2out::{open_raw, parse_baud_rate, run, FdWriter, DEFAULT_BAUD_RATE};

#[derive(Parser, Debug)]
#[command(version)]
#[command(disable_help_flag = true)]
#[command(override_usage = "tty2out tty [baudrate]")]
#[command(help_template = "{usage-heading} {usage}
example: tty2out /dev/ttyUSB0
example: tty2out /dev/ttyUSB0 9600
default baud rate is 300 if nothing is specified")]
#[cfg_attr(test, command(help_expected = true))]
struct Tty2Out {
    /// The serial device to read from, or -h for usage
    #[arg(value_hint = ValueHint::FilePath, allow_hyphen_values = true)]
    tty: Option<PathBuf>,

    /// Line speed applied to both directions
    #[arg(default_value_t = DEFAULT_BAUD_RATE)]
    #[arg(value_parser = parse_baud_rate, allow_hyphen_values = true)]
    baud_rate: i32,
}

fn main() -> ExitCode {
    let Tty2Out { tty, baud_rate } = Tty2Out::parse();

    let Some(tty) = tty.filter(|tty| tty != Path::new("-h")) else {
        eprint!("{}", Tty2Out::command().render_help());
        return ExitCode::FAILURE;
    };

    // A closed stdout ends the process, as it does for any other filter.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .without_time()
        .with_target(false)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    match open_raw(&tty, baud_rate) {
        Ok(device) => run(device, FdWriter(io::stdout())),
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
