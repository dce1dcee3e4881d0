// Command link to the driver
//
// The controller only needs two facts per tick: is a driver connected, and
// is a complete line waiting. Transports:
// - serial: Bluetooth SPP exposed as a serial device (rfcomm)
// - zenoh: lines on a topic, connection from liveliness tokens

mod line;
mod serial;
mod zenoh_link;

pub use line::LineBuffer;
pub use serial::{SerialTransport, TransportError};
pub use zenoh_link::ZenohTransport;

/// Source of protocol lines
pub trait Transport {
    /// Raw connection fact. May open or drop the underlying link.
    fn is_connected(&mut self) -> bool;

    /// Next complete line, without its terminating newline
    fn next_line(&mut self) -> Option<String>;
}
