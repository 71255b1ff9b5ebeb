//! Upload validation

/// Image extensions accepted for upload (compared lower-case)
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// Whether a client-supplied file name carries an allowed image extension
///
/// Only the segment after the last `.` counts. Names without a `.` are rejected.
pub fn is_allowed(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, extension)) => {
            let extension = extension.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&extension.as_str())
        }
        None => false,
    }
}
