mod apply;
mod create;
mod lock;
mod report;
mod show;
mod storage;

pub use apply::unpack;
pub use create::pack;
pub use lock::{LOCK_FILE_NAME, StorageLock};
pub use report::{
    DriverReport, LayerReport, PackSummary, ReportDisplay, StorageReport, UnpackSummary,
};
pub use show::inspect_storage;
pub use storage::{BASE_FILE_NAME, Layer, Storage};
