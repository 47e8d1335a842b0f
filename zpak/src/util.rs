use std::fs::File;
use std::path::{Component, Path, PathBuf};

use memmap2::Mmap;
use zpak_format::{Entry, Zpak};

use crate::error::{Error, Result};

/// Human-readable binary size, falling back to plain bytes.
pub fn format_size(bytes: usize) -> String {
    use humansize::{file_size_opts as options, FileSize};

    bytes
        .file_size(options::BINARY)
        .unwrap_or_else(|_| format!("{} B", bytes))
}

/// Space saved by compression, in percent. Negative when the entry grew.
pub fn ratio(stored: usize, size: usize) -> f64 {
    if size == 0 {
        return 0.0;
    }
    (1.0 - stored as f64 / size as f64) * 100.0
}

/// Maps an archive read-only so it can be loaded without copying.
pub fn map_archive(path: &Path) -> Result<Mmap> {
    let file = File::open(path).map_err(|source| Error::OpenArchive {
        path: path.to_path_buf(),
        source,
    })?;

    // The mapping is only read, and only while the file stays open here.
    unsafe { Mmap::map(&file) }.map_err(|source| Error::OpenArchive {
        path: path.to_path_buf(),
        source,
    })
}

/// Canonical form of `path`. A file that does not exist yet resolves through
/// its parent directory.
pub fn canonical_path(path: &Path) -> Result<PathBuf> {
    let err = |source| Error::CanonicalizePath {
        path: path.to_path_buf(),
        source,
    };

    if path.exists() {
        return path.canonicalize().map_err(err);
    }

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| Error::InvalidName {
        path: path.to_path_buf(),
    })?;

    Ok(parent.canonicalize().map_err(err)?.join(file_name))
}

/// Archive entry name for an input path: UTF-8, `/`-separated, relative.
/// Paths through `..` are refused, since they could not be extracted again.
pub fn entry_name(path: &Path) -> Result<String> {
    let parts = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_str()),
            Component::ParentDir => Some(None),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .filter(|parts| !parts.is_empty())
        .ok_or_else(|| Error::InvalidName {
            path: path.to_path_buf(),
        })?;

    Ok(parts.join("/"))
}

/// Resolves an entry name below `root`, refusing anything that would land
/// outside of it.
pub fn output_path(root: &Path, name: &str) -> Result<PathBuf> {
    let mut out = root.to_path_buf();

    for part in name.split('/').filter(|p| !p.is_empty() && *p != ".") {
        let mut components = Path::new(part).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => out.push(part),
            _ => {
                return Err(Error::UnsafeEntryName {
                    name: name.to_string(),
                })
            }
        }
    }

    if name.starts_with('/') || out.as_path() == root {
        return Err(Error::UnsafeEntryName {
            name: name.to_string(),
        });
    }

    Ok(out)
}

/// Whether `name` contains any of `filters`. No filters matches everything.
pub fn matches_filter(name: &str, filters: &[String]) -> bool {
    filters.is_empty() || filters.iter().any(|f| name.contains(f.as_str()))
}

/// Entries whose names match `filters`, in archive order.
pub fn select_entries<'z>(
    zpak: &'z Zpak<'_>,
    filters: &[String],
    path: &Path,
) -> Result<Vec<Entry<'z>>> {
    let mut out = vec![];
    for entry in zpak.iter() {
        let entry = entry.map_err(|source| Error::LoadArchive {
            path: path.to_path_buf(),
            source,
        })?;
        if matches_filter(entry.name(), filters) {
            out.push(entry);
        }
    }
    Ok(out)
}
