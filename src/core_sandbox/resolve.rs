use crate::core_error::FtpError;
use crate::core_sandbox::vpath::VirtualPath;
use log::{debug, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A path that has been normalized, canonicalized and checked against the root.
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    pub real: PathBuf,
    pub virtual_path: VirtualPath,
    pub is_dir: bool,
}

/// Resolves `requested` against `cwd` and verifies the physical result.
///
/// `root` must already be canonical. The logical normalization rejects `..`
/// escapes before the disk is touched; the canonicalized path is then checked
/// again so a symlink cannot lead outside the root either.
pub async fn resolve(
    root: &Path,
    cwd: &VirtualPath,
    requested: &str,
) -> Result<ResolvedPath, FtpError> {
    let virtual_path = cwd.join(requested)?;
    resolve_virtual(root, virtual_path).await
}

pub async fn resolve_virtual(
    root: &Path,
    virtual_path: VirtualPath,
) -> Result<ResolvedPath, FtpError> {
    let joined = virtual_path.to_real(root);

    let real = match tokio::fs::canonicalize(&joined).await {
        Ok(path) => path,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => return Err(FtpError::Io(e)),
        Err(e) => {
            debug!("Failed to canonicalize {:?}: {}", joined, e);
            return Err(FtpError::NotFound(virtual_path.to_string()));
        }
    };

    if !real.starts_with(root) {
        warn!(
            "Resolved path {:?} for {} is outside of the root {:?}",
            real, virtual_path, root
        );
        return Err(FtpError::OutsideRoot(virtual_path.to_string()));
    }

    let metadata = tokio::fs::metadata(&real).await?;

    Ok(ResolvedPath {
        real,
        virtual_path,
        is_dir: metadata.is_dir(),
    })
}

pub async fn resolve_dir(
    root: &Path,
    cwd: &VirtualPath,
    requested: &str,
) -> Result<ResolvedPath, FtpError> {
    let resolved = resolve(root, cwd, requested).await?;
    if !resolved.is_dir {
        return Err(FtpError::NotADirectory(resolved.virtual_path.to_string()));
    }
    Ok(resolved)
}

pub async fn resolve_file(
    root: &Path,
    cwd: &VirtualPath,
    requested: &str,
) -> Result<ResolvedPath, FtpError> {
    let resolved = resolve(root, cwd, requested).await?;
    if resolved.is_dir {
        return Err(FtpError::IsADirectory(resolved.virtual_path.to_string()));
    }
    Ok(resolved)
}
