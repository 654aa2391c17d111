/// Analysis modules: classification, permission checks and ranking.

pub mod file_types;
pub mod permissions;
pub mod ranking;
pub mod top_files;

pub use file_types::{categorise_extension, classify, extension_of, Category, EXTENSION_TABLE};
pub use permissions::{format_permissions, PermissionPolicy, NORMAL_PERMISSIONS};
pub use ranking::{rank_by_size, rank_in_place};
pub use top_files::top_files;
