use std::path::PathBuf;

use zpak_format::Zpak;

use crate::error::{Error, Result};
use crate::util::{map_archive, output_path, select_entries};

pub fn run(path: PathBuf, output: Option<PathBuf>, selected_files: Vec<String>) -> Result<()> {
    let map = map_archive(&path)?;
    let zpak = Zpak::from_borrowed(&map).map_err(|source| Error::LoadArchive {
        path: path.clone(),
        source,
    })?;

    let root = match output {
        Some(root) => root,
        None => std::env::current_dir().map_err(|source| Error::CreateDirectory {
            path: PathBuf::from("."),
            source,
        })?,
    };

    // Every destination is checked before anything touches the disk.
    let targets = select_entries(&zpak, &selected_files, &path)?
        .into_iter()
        .map(|entry| output_path(&root, entry.name()).map(|dest| (entry, dest)))
        .collect::<Result<Vec<_>>>()?;

    for (entry, dest) in targets {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|source| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let data = entry.read().map_err(|source| Error::ReadEntry {
            name: entry.name().to_string(),
            source,
        })?;

        std::fs::write(&dest, &data).map_err(|source| Error::WriteFile {
            path: dest.clone(),
            source,
        })?;

        tracing::debug!(entry = entry.name(), path = %dest.display(), "extracted");
        println!("{}", entry.name());
    }

    Ok(())
}
