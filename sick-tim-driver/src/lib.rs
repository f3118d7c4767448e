mod byte_source;
mod config;
mod connection;
mod constants;
mod driver_threads;
mod error;
mod filter;
mod frame;
mod numeric;
mod publisher;
mod telegram;

use crate::connection::connect;
use std::net::Shutdown;
use std::sync::Arc;

pub use crate::byte_source::{ByteSource, ReadByteSource};
pub use crate::config::{DriverConfig, SensorConfig};
pub use crate::driver_threads::{
    run_ingestion, spawn_ingestion, DriverThread, IngestionEnd, IngestionResult,
    IngestionSettings, IngestionState, IngestionStats, IngestionSummary,
};
pub use crate::error::SickError;
pub use crate::filter::{angle_window, clean_by_angle, clean_by_distance, FilterConfig, ScanFilter};
pub use crate::frame::{FrameAssembler, FrameEvent, FrameExtractor};
pub use crate::numeric::parse_number;
pub use crate::publisher::ScanPublisher;
pub use crate::telegram::decode_telegram;
pub use sick_tim_data::{
    model_geometry, DeviceInfo, FilteredScan, ScanGeometry, ScanRecord, SickModel,
    SENTINEL_DISTANCE,
};

/// Function to launch the SICK TiM driver.
///
/// Connects to the sensor, enables scan-data streaming and starts the
/// ingestion thread. The latest filtered scan is available through
/// [`DriverThread::latest`]. Dropping the returned handle closes the
/// connection and joins the thread.
pub fn run_driver(config: &DriverConfig) -> Result<DriverThread, SickError> {
    config.validate()?;
    let settings = config.ingestion_settings()?;

    let stream = connect(&config.sensor)?;
    let shutdown_handle = stream.try_clone()?;

    let publisher = Arc::new(ScanPublisher::new());
    let mut driver = spawn_ingestion(ReadByteSource::new(stream), publisher, settings)?;
    driver.set_unblock(Box::new(move || {
        if let Err(e) = shutdown_handle.shutdown(Shutdown::Both) {
            log::debug!("Lidar socket already closed: {e}");
        }
    }));
    Ok(driver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ACTIVATE_SCAN_DATA, ETX, STX};
    use crate::telegram::fixtures::{scan_telegram, uniform_scan_telegram};
    use crossbeam_channel::bounded;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    fn framed(payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![STX];
        bytes.extend_from_slice(payload);
        bytes.push(ETX);
        bytes
    }

    /// Accepts one client, checks the activation telegram and returns the socket.
    fn accept_client(listener: &TcpListener) -> TcpStream {
        let (mut sensor, _) = listener.accept().unwrap();
        let mut activation = [0u8; 20];
        sensor.read_exact(&mut activation).unwrap();
        assert_eq!(&activation[..], ACTIVATE_SCAN_DATA);
        sensor
    }

    fn test_config(listener: &TcpListener) -> DriverConfig {
        let mut config = DriverConfig::default();
        config.sensor.address = listener.local_addr().unwrap().to_string();
        config.warmup_ms = 0;
        config
    }

    #[test]
    fn test_run_driver_normal_data() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let config = test_config(&listener);

        let sensor = thread::spawn(move || {
            let mut sensor = accept_client(&listener);
            sensor.write_all(&framed(b"sEA LMDscandata 1")).unwrap();

            // Deliver the first scan in small pieces with noise in front.
            let mut first = b"\x00\x00".to_vec();
            first.extend(framed(&uniform_scan_telegram(811, 0x3E8)));
            for chunk in first.chunks(7) {
                sensor.write_all(chunk).unwrap();
                sensor.flush().unwrap();
            }
            sensor.write_all(&framed(&scan_telegram("0", "1", &["1A"]))).unwrap();
            sensor.write_all(&framed(&uniform_scan_telegram(811, 0x5DC))).unwrap();
        });

        let driver = run_driver(&config).unwrap();
        sensor.join().unwrap();

        let summary = driver.wait_timeout(WAIT).unwrap().unwrap();
        assert_eq!(summary.end, IngestionEnd::EndOfStream);
        assert_eq!(summary.stats.frames, 4);
        assert_eq!(summary.stats.published, 2);
        assert_eq!(summary.stats.skipped, 2);
        assert_eq!(summary.stats.malformed, 0);
        assert_eq!(driver.state(), IngestionState::Stopped);

        let scan = driver.latest().unwrap();
        assert_eq!(scan.len(), 270);
        assert_eq!(scan.angles_radian.len(), 270);
        assert!(scan.distances.iter().all(|d| *d == 1.5));
        let angles = model_geometry(SickModel::Tim561).angles_radian();
        assert_eq!(scan.angles_radian[0], angles[269]);
    }

    #[test]
    fn test_run_driver_malformed_telegram_does_not_stop_ingestion() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let config = test_config(&listener);

        let sensor = thread::spawn(move || {
            let mut sensor = accept_client(&listener);
            sensor.write_all(&framed(&uniform_scan_telegram(811, 1000))).unwrap();
            sensor.write_all(&framed(&scan_telegram("0", "0", &["1A", "+2B"]))).unwrap();
            sensor.write_all(&framed(b"sSN LMDscandata 1 1 B9A4F1")).unwrap();
            sensor.write_all(&framed(&uniform_scan_telegram(811, 2500))).unwrap();
        });

        let driver = run_driver(&config).unwrap();
        sensor.join().unwrap();

        let summary = driver.wait_timeout(WAIT).unwrap().unwrap();
        assert_eq!(summary.stats.malformed, 2);
        assert_eq!(summary.stats.published, 2);
        assert!(driver.latest().unwrap().distances.iter().all(|d| *d == 2.5));
    }

    #[test]
    fn test_run_driver_drop_releases_blocked_read() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let config = test_config(&listener);
        let (done_tx, done_rx) = bounded::<()>(1);

        let sensor = thread::spawn(move || {
            let mut sensor = accept_client(&listener);
            sensor.write_all(&framed(&uniform_scan_telegram(811, 1000))).unwrap();
            // Stay connected and silent until the test is over.
            let _ = done_rx.recv();
        });

        let driver = run_driver(&config).unwrap();
        let publisher = Arc::clone(driver.publisher());
        let deadline = std::time::Instant::now() + WAIT;
        while publisher.latest().is_none() {
            assert!(std::time::Instant::now() < deadline);
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(driver.state(), IngestionState::Running);

        drop(driver);
        assert!(publisher.is_stopped());
        assert_eq!(publisher.published_count(), 1);

        done_tx.send(()).unwrap();
        sensor.join().unwrap();
    }

    #[test]
    fn test_run_driver_rejects_invalid_config() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let mut config = test_config(&listener);
        config.filter.view_angle = 300.;
        assert!(matches!(
            run_driver(&config),
            Err(SickError::InvalidViewAngle(_))
        ));
    }

    #[test]
    fn test_parse_number_is_exported() {
        assert_eq!(parse_number(b"+42").unwrap(), 42);
        assert_eq!(parse_number(b"2A").unwrap(), 42);
    }
}
