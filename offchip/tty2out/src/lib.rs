//! Copies everything a serial line receives to stdout, byte for byte.

pub mod baud;
pub mod device;
pub mod pump;

pub use baud::{parse_baud_rate, DEFAULT_BAUD_RATE};
pub use device::open_raw;
pub use pump::{run, write_fully, FdWriter};
