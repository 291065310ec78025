//! All Paths are recorded here for use throughout this codebase
pub mod base {
    pub const ROOT: &str = "/";
    pub const HEALTH: &str = "/health";
    pub const ABOUT: &str = "/about";
}

/// Read-only view of the server's vector clock
pub const CLOCK: &str = "/clock";

pub mod operations {
    pub const ADD: &str = "/add";
    pub const MULTIPLY: &str = "/multiply";
}

pub fn drop_leading_slash(path: &str) -> &str {
    if let Some(stripped) = path.strip_prefix('/') {
        stripped
    } else {
        path
    }
}
