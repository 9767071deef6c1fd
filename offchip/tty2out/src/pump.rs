use std::{
    io::{self, ErrorKind, Read, Write},
    os::fd::AsFd,
    thread,
    time::Duration,
};

use tracing::{debug, error, warn};

pub const BUF_SIZE: usize = 8192;
pub const IDLE_SLEEP: Duration = Duration::from_micros(100);

/// Unbuffered writer straight to a file descriptor.
///
/// [`io::Stdout`] holds output back until it sees a newline, which is useless
/// for binary streams.
#[derive(Debug)]
pub struct FdWriter<Fd>(pub Fd);

impl<Fd: AsFd> Write for FdWriter<Fd> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(rustix::io::write(&self.0, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes as much of `buf` as possible, retrying partial writes.
///
/// Only fails if nothing at all could be written. An error after some
/// progress, or a write accepting zero bytes, ends the attempt and the count
/// written so far is returned.
pub fn write_fully(out: &mut impl Write, buf: &[u8]) -> io::Result<usize> {
    let mut remaining = buf;
    while !remaining.is_empty() {
        match out.write(remaining) {
            Ok(0) => break,
            Ok(n) => remaining = &remaining[n..],
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) if remaining.len() == buf.len() => return Err(e),
            Err(e) => {
                debug!(error = %e, "Write failed after partial progress");
                break;
            }
        }
    }
    Ok(buf.len() - remaining.len())
}

/// Moves whatever the device currently has into `out`.
///
/// Returns the number of bytes written, 0 when the device had nothing to
/// offer.
pub fn copy_once(
    device: &mut impl Read,
    buf: &mut [u8],
    out: &mut impl Write,
) -> io::Result<usize> {
    let len = match device.read(buf) {
        Ok(n) => n,
        Err(e) if e.kind() == ErrorKind::WouldBlock => 0,
        Err(e) => {
            debug!(error = %e, "Read failed");
            0
        }
    };
    if len == 0 {
        return Ok(0);
    }

    let written = write_fully(out, &buf[..len])?;
    if written < len {
        warn!(written, len, "Short write to stdout");
    }
    Ok(written)
}

pub fn run(mut device: impl Read, mut out: impl Write) -> ! {
    let mut buf = [0; BUF_SIZE];
    // Never returns: the process ends when someone sends it a signal.
    loop {
        if let Err(e) = copy_once(&mut device, &mut buf, &mut out) {
            error!("Error writing to stdout: {e}");
        }
        thread::sleep(IDLE_SLEEP);
    }
}
