use crate::config::SensorConfig;
use crate::constants::ACTIVATE_SCAN_DATA;
use crate::error::SickError;
use std::io::{ErrorKind, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Connects to the sensor and switches on continuous scan data.
pub fn connect(config: &SensorConfig) -> Result<TcpStream, SickError> {
    let timeout = Duration::from_millis(config.connect_timeout_ms);
    let addrs: Vec<SocketAddr> = config.address.to_socket_addrs()?.collect();

    let mut last_error = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(mut stream) => {
                // Reads block for as long as the sensor is silent.
                stream.set_read_timeout(None)?;
                activate_scan_data(&mut stream)?;
                log::info!("Lidar connected to {addr}");
                return Ok(stream);
            }
            Err(e) if e.kind() == ErrorKind::TimedOut => {
                log::warn!("Cannot connect to lidar at {addr} due to timeout");
                last_error = Some(SickError::ConnectionTimeout(addr.to_string()));
            }
            Err(e) => {
                log::warn!("Cannot connect to lidar at {addr}: {e}");
                last_error = Some(SickError::IoError(e));
            }
        }
    }
    Err(last_error.unwrap_or_else(|| {
        SickError::InvalidConfig(format!("{} does not resolve to an address", config.address))
    }))
}

pub(crate) fn activate_scan_data<W: Write>(port: &mut W) -> Result<(), SickError> {
    port.write_all(ACTIVATE_SCAN_DATA)?;
    port.flush()?;
    Ok(())
}
