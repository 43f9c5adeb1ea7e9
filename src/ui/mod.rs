//! User interface module.
//!
//! - `formatter` - Pure formatting functions

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_status, display_success,
    display_updated_files, display_version_change, format_file_list, format_scan_summary,
};
