use crate::core_sandbox::ResolvedPath;
use chrono::{DateTime, Local};
use log::warn;
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// Directory contents of a resolved target.
///
/// Nothing is read until [`Listing::entries`] is called, and every call reads the
/// directory again. Entries are sorted by name, so two listings of an unchanged
/// directory are identical no matter how the directory was reached.
#[derive(Debug, Clone)]
pub struct Listing {
    target: ResolvedPath,
}

impl Listing {
    pub fn new(target: ResolvedPath) -> Self {
        Self { target }
    }

    pub async fn entries(&self) -> std::io::Result<Vec<ListEntry>> {
        if !self.target.is_dir {
            let metadata = tokio::fs::metadata(&self.target.real).await?;
            let name = self.target.virtual_path.file_name().unwrap_or("").to_string();
            return Ok(vec![ListEntry {
                name,
                is_dir: false,
                size: metadata.len(),
                modified: metadata.modified().ok(),
            }]);
        }

        let mut read_dir = tokio::fs::read_dir(&self.target.real).await?;
        let mut entries = Vec::new();

        while let Some(entry) = read_dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            // Follow symlinks so entries match what CWD and RETR resolve to.
            match tokio::fs::metadata(entry.path()).await {
                Ok(metadata) => entries.push(ListEntry {
                    name,
                    is_dir: metadata.is_dir(),
                    size: if metadata.is_dir() { 0 } else { metadata.len() },
                    modified: metadata.modified().ok(),
                }),
                Err(e) => {
                    warn!(
                        "Failed to get metadata for entry: {:?}, error: {:?}",
                        entry.path(),
                        e
                    );
                    entries.push(ListEntry {
                        name,
                        is_dir: false,
                        size: 0,
                        modified: None,
                    });
                }
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// NLST body: one name per line.
pub fn format_names(entries: &[ListEntry]) -> String {
    let mut listing = String::new();
    for entry in entries {
        listing.push_str(&entry.name);
        listing.push_str("\r\n");
    }
    listing
}

/// LIST body in the usual `ls -l` shape.
pub fn format_long(entries: &[ListEntry]) -> String {
    let mut listing = String::new();
    for entry in entries {
        let permissions = if entry.is_dir {
            "drwxr-xr-x"
        } else {
            "-rw-r--r--"
        };
        let date = entry
            .modified
            .map(|time| DateTime::<Local>::from(time).format("%b %d %H:%M").to_string())
            .unwrap_or_else(|| "Jan 01 00:00".to_string());

        listing.push_str(&format!(
            "{} 1 owner group {} {} {}\r\n",
            permissions, entry.size, date, entry.name
        ));
    }
    listing
}
