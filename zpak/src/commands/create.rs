use std::path::PathBuf;

use zpak_format::{Compression, Zpak, ZpakConfig};

use crate::error::{Error, Result};
use crate::util::{canonical_path, entry_name, format_size, ratio};

pub fn run(path: PathBuf, selected_files: Vec<PathBuf>, compression: Compression) -> Result<()> {
    let archive = canonical_path(&path)?;
    for file_path in selected_files.iter() {
        // filename check first, canonicalizing only the candidates
        if file_path.file_name() == path.file_name() && canonical_path(file_path)? == archive {
            return Err(Error::RecursiveArchive { path });
        }
    }

    tracing::info!(files = selected_files.len(), %compression, "packing");

    let mut zpak = Zpak::new(ZpakConfig::default().with_compression(compression));
    let mut total = 0usize;

    for file_path in selected_files.into_iter() {
        let name = entry_name(&file_path)?;
        let data = std::fs::read(&file_path).map_err(|source| Error::ReadInput {
            path: file_path.clone(),
            source,
        })?;

        if data.is_empty() {
            tracing::warn!(path = %file_path.display(), "skipping empty file");
            continue;
        }

        let stored = zpak
            .append(&name, &data)
            .map_err(|source| Error::AddEntry {
                path: file_path.clone(),
                source,
            })?;
        total += data.len();

        println!(
            "{:>8} {:>10}/{:<10} {:>6.1}% {}",
            compression.to_string(),
            format_size(stored),
            format_size(data.len()),
            ratio(stored, data.len()),
            name
        );
    }

    let blob = zpak.finish().map_err(|source| Error::FinishArchive {
        path: path.clone(),
        source,
    })?;

    std::fs::write(&path, &blob).map_err(|source| Error::WriteArchive {
        path: path.clone(),
        source,
    })?;

    println!(
        "Output {} {} -> {}",
        path.display(),
        format_size(total),
        format_size(blob.len())
    );

    Ok(())
}
