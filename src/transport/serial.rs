// Serial transport for the Bluetooth link
//
// On the host a paired SPP device appears as a serial port (e.g. /dev/rfcomm0)
// that only exists while the link is up. The port is opened lazily and
// dropped on the first read error.

use serialport::SerialPort;
use std::io::Read;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{LineBuffer, Transport};
use crate::config::{MAX_LINE_LEN, RECONNECT_INTERVAL};

/// Read timeout, kept short so a tick never stalls on the port
const READ_TIMEOUT_MS: u64 = 1;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;

pub struct SerialTransport {
    path: String,
    baudrate: u32,
    port: Option<Box<dyn SerialPort>>,
    lines: LineBuffer,
    next_attempt: Option<Instant>,
}

impl SerialTransport {
    pub fn new(path: &str, baudrate: u32) -> Self {
        Self {
            path: path.to_string(),
            baudrate,
            port: None,
            lines: LineBuffer::new(MAX_LINE_LEN),
            next_attempt: None,
        }
    }

    fn open(&self) -> Result<Box<dyn SerialPort>> {
        let port = serialport::new(&self.path, self.baudrate)
            .timeout(Duration::from_millis(READ_TIMEOUT_MS))
            .open()?;
        Ok(port)
    }

    /// Try to open the port, at most once per reconnect interval
    fn try_connect(&mut self, now: Instant) {
        if self.next_attempt.is_some_and(|at| now < at) {
            return;
        }
        match self.open() {
            Ok(port) => {
                info!("Opened {} at {} baud", self.path, self.baudrate);
                self.lines.clear();
                self.port = Some(port);
                self.next_attempt = None;
            }
            Err(e) => {
                debug!("{} not available: {}", self.path, e);
                self.next_attempt = Some(now + RECONNECT_INTERVAL);
            }
        }
    }

    /// Move whatever the port has buffered into the line buffer
    fn fill(&mut self) -> Result<()> {
        let Some(port) = self.port.as_mut() else {
            return Ok(());
        };
        let available = port.bytes_to_read()? as usize;
        if available == 0 {
            return Ok(());
        }
        let mut buf = vec![0u8; available];
        let read = port.read(&mut buf)?;
        self.lines.push(&buf[..read]);
        Ok(())
    }
}

impl Transport for SerialTransport {
    fn is_connected(&mut self) -> bool {
        if self.port.is_none() {
            self.try_connect(Instant::now());
        }
        if let Err(e) = self.fill() {
            warn!("Lost {}: {}", self.path, e);
            self.port = None;
            self.lines.clear();
            self.next_attempt = Some(Instant::now() + RECONNECT_INTERVAL);
        }
        self.port.is_some()
    }

    fn next_line(&mut self) -> Option<String> {
        self.lines.pop()
    }
}
