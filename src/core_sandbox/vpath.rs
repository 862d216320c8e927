use crate::core_error::FtpError;
use std::fmt;
use std::path::{Path, PathBuf};

/// A client-visible path below the server root, stored as its normal segments.
///
/// `VirtualPath` never touches the filesystem: joining a request onto it is pure
/// arithmetic on segments, so it can be checked without a disk. The root itself
/// is the empty segment list and displays as `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VirtualPath {
    segments: Vec<String>,
}

impl VirtualPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Applies `requested` to this path.
    ///
    /// A leading `/` restarts from the root. Empty and `.` segments are skipped,
    /// `..` pops one segment and fails with `OutsideRoot` once there is nothing
    /// left to pop. Repeating `..` at the root therefore fails every time
    /// instead of wrapping around.
    pub fn join(&self, requested: &str) -> Result<VirtualPath, FtpError> {
        if requested.contains('\0') {
            return Err(FtpError::CommandSyntaxError("NUL byte in path".into()));
        }

        let mut segments = if requested.starts_with('/') {
            Vec::new()
        } else {
            self.segments.clone()
        };

        for segment in requested.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(FtpError::OutsideRoot(requested.to_string()));
                    }
                }
                name => segments.push(name.to_string()),
            }
        }

        Ok(VirtualPath { segments })
    }

    /// Maps this path under `root`. The result is not yet verified against symlinks.
    pub fn to_real(&self, root: &Path) -> PathBuf {
        let mut real = root.to_path_buf();
        for segment in &self.segments {
            real.push(segment);
        }
        real
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}
