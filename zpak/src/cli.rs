use std::path::PathBuf;

use structopt::clap::AppSettings::*;
use structopt::StructOpt;
use zpak_format::Compression;

#[derive(Debug, StructOpt)]
pub enum Commands {
    #[structopt(name = "c", visible_alias = "create", about = "Create a new archive")]
    Create {
        #[structopt(
            short = "C",
            long,
            possible_values = Compression::available_variants(),
            default_value = "deflate",
            help = "Compression applied to every entry"
        )]
        compression: Compression,

        #[structopt(name = "archive", parse(from_os_str), help = "Path to the .zpak archive")]
        path: PathBuf,

        #[structopt(
            name = "files",
            parse(from_os_str),
            required = true,
            help = "Files to add to the archive"
        )]
        selected_files: Vec<PathBuf>,
    },

    #[structopt(name = "l", visible_alias = "list", about = "List entries of an archive")]
    List {
        #[structopt(name = "archive", parse(from_os_str), help = "Path to the .zpak archive")]
        path: PathBuf,

        #[structopt(
            name = "filters",
            help = "Only list entries whose name contains one of these strings"
        )]
        selected_files: Vec<String>,
    },

    #[structopt(
        name = "x",
        visible_alias = "extract",
        about = "Extract entries from an archive"
    )]
    Extract {
        #[structopt(name = "archive", parse(from_os_str), help = "Path to the .zpak archive")]
        path: PathBuf,

        #[structopt(
            short,
            long,
            parse(from_os_str),
            help = "Directory to extract into [default: current directory]"
        )]
        output: Option<PathBuf>,

        #[structopt(
            name = "filters",
            help = "Only extract entries whose name contains one of these strings"
        )]
        selected_files: Vec<String>,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "zpak",
    about = "Create, list and extract zpak archives.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands],
    usage = "zpak (c|l|x) [FLAGS|OPTIONS] <archive> [files]..."
)]
pub struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    pub verbose: bool,

    #[structopt(subcommand)]
    pub cmd: Commands,
}
