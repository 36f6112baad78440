use clap::{Parser, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Pdb,
    Cif,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "mxconv - convert macromolecular coordinate files between PDB, PDBx/mmCIF and JSON, with optional NCS expansion and chain editing.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Path to the input coordinate file (.pdb, .ent, .cif, .mmcif).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Path for the output file; use `-` for standard output.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Input format; default is sniffed from the file extension
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub from: Option<Format>,

    /// Output format; default is sniffed from the file extension
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub to: Option<Format>,

    /// Expand non-crystallographic symmetry into explicit chains
    #[arg(long)]
    pub expand_ncs: bool,

    /// Split chains on residue segment ids, appending the segment to the
    /// chain name
    #[arg(long)]
    pub segment_as_chain: bool,

    /// Remove hydrogen and deuterium atoms
    #[arg(long = "remove-h")]
    pub remove_hydrogens: bool,

    /// Remove water molecules
    #[arg(long)]
    pub remove_waters: bool,

    /// Remove everything that is not a standard polymer residue
    #[arg(long = "remove-lig-wat")]
    pub remove_ligands_and_waters: bool,

    /// Reduce standard amino acids to alanine (N, CA, C, O, CB)
    #[arg(long = "trim-to-ala")]
    pub trim_to_alanine: bool,

    /// Name NCS copies like iotbx.pdb does: keep chain names and tag
    /// copies with segment ids instead
    #[arg(long)]
    pub iotbx_compat: bool,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
