pub(crate) const STX: u8 = 0x02;
pub(crate) const ETX: u8 = 0x03;
pub(crate) const TOKEN_SEPARATOR: u8 = b' ';
pub(crate) const READ_CHUNK_SIZE: usize = 256;

pub(crate) const SCAN_DATA_COMMAND_TYPE: &str = "sSN";
pub(crate) const SCAN_DATA_COMMAND: &str = "LMDscandata";
/// Enables continuous scan-data telegrams. The trailing NUL is expected by the sensor.
pub(crate) const ACTIVATE_SCAN_DATA: &[u8] = b"\x02sEN LMDscandata 1\x03\0";

// Token grid of an LMDscandata telegram
pub(crate) const IDX_COMMAND_TYPE: usize = 0;
pub(crate) const IDX_COMMAND: usize = 1;
pub(crate) const IDX_VERSION_NUMBER: usize = 2;
pub(crate) const IDX_DEVICE_NUMBER: usize = 3;
pub(crate) const IDX_SERIAL_NUMBER: usize = 4;
pub(crate) const IDX_DEVICE_STATUS_1: usize = 5;
pub(crate) const IDX_DEVICE_STATUS_2: usize = 6;
pub(crate) const IDX_TELEGRAM_COUNTER: usize = 7;
pub(crate) const IDX_TIME_SINCE_STARTUP: usize = 9;
pub(crate) const IDX_TIME_OF_TRANSMISSION: usize = 10;
pub(crate) const IDX_ANGULAR_STEP_WIDTH: usize = 24;
pub(crate) const IDX_NUMBER_OF_DATA: usize = 25;
pub(crate) const IDX_FIRST_SAMPLE: usize = 26;

pub(crate) const MILLIMETERS_PER_METER: f64 = 1000.;

pub(crate) const DEFAULT_SENSOR_ADDRESS: &str = "192.168.0.1:2112";
pub(crate) const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;
pub(crate) const DEFAULT_WARMUP_MS: u64 = 3_000;
pub(crate) const DEFAULT_MIN_DISTANCE: f64 = 0.1;
pub(crate) const DEFAULT_MAX_DISTANCE: f64 = 3.;
pub(crate) const DEFAULT_VIEW_ANGLE: f64 = 180.;
pub(crate) const WARMUP_POLL_MS: u64 = 10;
