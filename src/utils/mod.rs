mod fs;
mod hash;

pub use fs::{
    FileInfo, TEMP_PREFIX, copy_file_atomic, copy_tree, files_equal, is_temp_file,
    scan_directory, walk_files, walk_layer_files, write_file_atomic,
};
pub use hash::{
    DriverHash, HashResult, compute_file_hash, hash_driver_file, hash_driver_text,
    normalize_driver_text,
};
