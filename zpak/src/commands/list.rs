use std::path::PathBuf;

use zpak_format::Zpak;

use crate::error::{Error, Result};
use crate::util::{format_size, map_archive, ratio, select_entries};

pub fn run(path: PathBuf, selected_files: Vec<String>) -> Result<()> {
    let map = map_archive(&path)?;
    let zpak = Zpak::from_borrowed(&map).map_err(|source| Error::LoadArchive {
        path: path.clone(),
        source,
    })?;

    let entries = select_entries(&zpak, &selected_files, &path)?;

    println!("Method    Compressed      Length      Ratio    Name");
    println!("--------  -------------  -------------  -------  --------");

    let (mut stored, mut size) = (0usize, 0usize);
    for entry in entries.iter() {
        stored += entry.compressed_size();
        size += entry.size();

        println!(
            "{:8}  {:>13}  {:>13}  {:>6.1}%  {}",
            entry.compression().to_string(),
            format_size(entry.compressed_size()),
            format_size(entry.size()),
            ratio(entry.compressed_size(), entry.size()),
            entry.name(),
        );
    }

    println!(
        "{:8}  {:>13}  {:>13}  {:>6.1}%  {} of {} entries",
        "",
        format_size(stored),
        format_size(size),
        ratio(stored, size),
        entries.len(),
        zpak.entry_count(),
    );

    Ok(())
}
