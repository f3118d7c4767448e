pub mod device_info;
pub mod models;
pub mod scan;

pub use device_info::DeviceInfo;
pub use models::{model_geometry, ScanGeometry, SickModel};
pub use scan::{FilteredScan, ScanRecord, SENTINEL_DISTANCE};
