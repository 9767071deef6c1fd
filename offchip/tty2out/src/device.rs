use std::{fs::File, io, os::fd::AsFd, path::Path};

use anyhow::{Context, Result};
use rustix::{
    fs::{Mode, OFlags},
    io::Errno,
    termios::{tcgetattr, tcsetattr, OptionalActions, Termios},
};
use tracing::info;

/// Opens `path` for reading without letting it become our controlling
/// terminal. Reads never block: an idle line reports `WouldBlock`.
pub fn open(path: &Path) -> Result<File> {
    let fd = rustix::fs::open(
        path,
        OFlags::RDONLY | OFlags::NOCTTY | OFlags::NONBLOCK | OFlags::CLOEXEC,
        Mode::empty(),
    )
    .map_err(io::Error::from)
    .with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(File::from(fd))
}

/// Puts the line into raw mode at `baud_rate` (both directions) and commits
/// the change immediately.
pub fn configure(device: impl AsFd, baud_rate: i32) -> Result<()> {
    let device = device.as_fd();

    let mut termios = tcgetattr(device)
        .map_err(io::Error::from)
        .context("tcgetattr failed")?;
    termios.make_raw();
    u32::try_from(baud_rate)
        .map_err(|_| Errno::INVAL)
        .and_then(|speed| termios.set_speed(speed))
        .map_err(io::Error::from)
        .with_context(|| format!("Failed to set baudrate to {baud_rate}"))?;
    commit(device, &termios, baud_rate)
}

/// Drivers may only refuse a speed once it is applied, so the failure names
/// the requested rate.
fn commit(device: impl AsFd, termios: &Termios, baud_rate: i32) -> Result<()> {
    tcsetattr(device, OptionalActions::Now, termios)
        .map_err(io::Error::from)
        .with_context(|| format!("tcsetattr failed for baudrate {baud_rate}"))
}

pub fn open_raw(path: &Path, baud_rate: i32) -> Result<File> {
    let device = open(path)?;
    configure(&device, baud_rate)?;
    info!(device = %path.display(), baud_rate, "Configured raw serial line");
    Ok(device)
}
