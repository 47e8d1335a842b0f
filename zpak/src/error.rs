use std::path::PathBuf;

use zpak_format::ZpakError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot open archive `{}`", .path.display())]
    OpenArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot load archive `{}`", .path.display())]
    LoadArchive {
        path: PathBuf,
        #[source]
        source: ZpakError,
    },

    #[error("Cannot read input file `{}`", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot canonicalize path `{}`", .path.display())]
    CanonicalizePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot use `{}` as an entry name", .path.display())]
    InvalidName { path: PathBuf },

    #[error("Cannot add `{}` to archive", .path.display())]
    AddEntry {
        path: PathBuf,
        #[source]
        source: ZpakError,
    },

    #[error("Cannot finish archive `{}`", .path.display())]
    FinishArchive {
        path: PathBuf,
        #[source]
        source: ZpakError,
    },

    #[error("Cannot write archive `{}`", .path.display())]
    WriteArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read entry `{name}`")]
    ReadEntry {
        name: String,
        #[source]
        source: ZpakError,
    },

    #[error("Refusing to extract `{name}` outside of the output directory")]
    UnsafeEntryName { name: String },

    #[error("Cannot create directory `{}`", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write file `{}`", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cowardly refusing to add archive `{}` to itself", .path.display())]
    RecursiveArchive { path: PathBuf },
}
