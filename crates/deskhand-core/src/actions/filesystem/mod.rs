//! Filesystem actions confined to a base directory

mod file_operation;
mod path_utils;

pub use file_operation::{FileOperation, FileOperationKind};
pub use path_utils::{normalize_path, path_to_display, resolve_within};
