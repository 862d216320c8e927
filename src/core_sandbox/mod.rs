// Path sandbox: every client path goes through here before the filesystem sees it.
pub mod resolve;
pub mod vpath;

pub use resolve::{resolve, resolve_dir, resolve_file, ResolvedPath};
pub use vpath::VirtualPath;
