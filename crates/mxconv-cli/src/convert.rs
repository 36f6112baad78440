use crate::cli::{Cli, Format};
use crate::error::{CliError, Result};
use mxconv::core::io::mmcif::MmcifFile;
use mxconv::core::io::pdb::PdbFile;
use mxconv::core::io::traits::StructureFile;
use mxconv::core::models::structure::Structure;
use mxconv::transform::ncs::{ChainNaming, expand_ncs};
use mxconv::transform::{prune, segment};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

pub fn sniff_format(path: &Path) -> Option<Format> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "pdb" | "ent" => Some(Format::Pdb),
        "cif" | "mmcif" => Some(Format::Cif),
        "json" => Some(Format::Json),
        _ => None,
    }
}

fn input_format(cli: &Cli) -> Result<Format> {
    cli.from.or_else(|| sniff_format(&cli.input)).ok_or_else(|| {
        CliError::Argument(format!(
            "cannot determine input format of '{}'; use --from",
            cli.input.display()
        ))
    })
}

fn output_format(cli: &Cli) -> Result<Format> {
    if cli.output == Path::new("-") {
        return cli.to.ok_or_else(|| {
            CliError::Argument("--to is required when writing to standard output".to_string())
        });
    }
    cli.to.or_else(|| sniff_format(&cli.output)).ok_or_else(|| {
        CliError::Argument(format!(
            "cannot determine output format of '{}'; use --to",
            cli.output.display()
        ))
    })
}

fn naming_policy(cli: &Cli, to: Format) -> ChainNaming {
    if cli.iotbx_compat {
        ChainNaming::Dup
    } else if to == Format::Pdb {
        ChainNaming::Short
    } else {
        ChainNaming::AddNum
    }
}

fn atom_count(st: &Structure) -> usize {
    st.models
        .iter()
        .flat_map(|m| &m.chains)
        .flat_map(|c| &c.residues)
        .map(|r| r.atoms.len())
        .sum()
}

pub fn run(cli: &Cli) -> Result<()> {
    let from = input_format(cli)?;
    let to = output_format(cli)?;

    let mut st = match from {
        Format::Pdb => PdbFile::read_from_path(&cli.input)?,
        Format::Cif => MmcifFile::read_from_path(&cli.input)?,
        Format::Json => {
            return Err(CliError::Argument(
                "JSON input is not supported".to_string(),
            ));
        }
    };
    info!(
        "Read '{}': {} model(s), {} atoms.",
        cli.input.display(),
        st.models.len(),
        atom_count(&st)
    );

    if cli.expand_ncs {
        let naming = naming_policy(cli, to);
        expand_ncs(&mut st, naming);
        info!(
            "Expanded NCS: first model now has {} chain(s).",
            st.first_model().map_or(0, |m| m.chains.len())
        );
    }
    if cli.segment_as_chain {
        segment::split_all_segments(&mut st);
    }
    let mut pruned = false;
    if cli.remove_hydrogens {
        prune::remove_hydrogens(&mut st);
        pruned = true;
    }
    if cli.remove_waters {
        prune::remove_waters(&mut st);
        pruned = true;
    }
    if cli.remove_ligands_and_waters {
        prune::remove_ligands_and_waters(&mut st);
        pruned = true;
    }
    if cli.trim_to_alanine {
        prune::trim_to_alanine(&mut st);
        pruned = true;
    }
    if pruned {
        prune::remove_empty_chains(&mut st);
    }

    write_output(&st, to, &cli.output)?;
    info!("Wrote '{}' ({} atoms).", cli.output.display(), atom_count(&st));
    Ok(())
}

fn write_output(st: &Structure, to: Format, path: &Path) -> Result<()> {
    if path == Path::new("-") {
        let stdout = std::io::stdout();
        let mut writer = stdout.lock();
        write_structure(st, to, &mut writer)
    } else {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_structure(st, to, &mut writer)
    }
}

fn write_structure(st: &Structure, to: Format, writer: &mut impl Write) -> Result<()> {
    match to {
        Format::Pdb => PdbFile::write_to(st, writer)?,
        Format::Cif => {
            return Err(CliError::Argument(
                "mmCIF output is not supported".to_string(),
            ));
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut *writer, st)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    const FRAGMENT: &str = "\
ATOM      1  N   ALA A   1      11.104   6.134  -6.504  1.00  0.00           N
ATOM      2  CA  ALA A   1      11.639   6.071  -5.147  1.00  0.00           C
HETATM    3  O   HOH W   2       1.000   2.000   3.000  1.00  0.00           O
END
";

    #[test]
    fn extension_sniffing() {
        assert_eq!(sniff_format(Path::new("x.pdb")), Some(Format::Pdb));
        assert_eq!(sniff_format(Path::new("x.ENT")), Some(Format::Pdb));
        assert_eq!(sniff_format(Path::new("x.cif")), Some(Format::Cif));
        assert_eq!(sniff_format(Path::new("x.mmcif")), Some(Format::Cif));
        assert_eq!(sniff_format(Path::new("x.json")), Some(Format::Json));
        assert_eq!(sniff_format(Path::new("x.xyz")), None);
        assert_eq!(sniff_format(Path::new("noext")), None);
    }

    #[test]
    fn naming_policy_follows_compat_flag_and_output_format() {
        let base = |extra: &[&str]| {
            let mut args = vec!["mxconv", "in.pdb", "out.pdb"];
            args.extend_from_slice(extra);
            Cli::parse_from(args)
        };
        assert_eq!(naming_policy(&base(&[]), Format::Pdb), ChainNaming::Short);
        assert_eq!(naming_policy(&base(&[]), Format::Json), ChainNaming::AddNum);
        assert_eq!(
            naming_policy(&base(&["--iotbx-compat"]), Format::Pdb),
            ChainNaming::Dup
        );
    }

    #[test]
    fn stdout_output_requires_explicit_format() {
        let cli = Cli::parse_from(["mxconv", "in.pdb", "-"]);
        assert!(matches!(output_format(&cli), Err(CliError::Argument(_))));
        let cli = Cli::parse_from(["mxconv", "--to", "pdb", "in.pdb", "-"]);
        assert!(matches!(output_format(&cli), Ok(Format::Pdb)));
    }

    #[test]
    fn pdb_to_json_conversion_round_trips_names() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdb");
        let output = dir.path().join("out.json");
        std::fs::write(&input, FRAGMENT).unwrap();
        let cli = Cli::parse_from([
            PathBuf::from("mxconv"),
            input.clone(),
            output.clone(),
        ]);
        run(&cli).unwrap();
        let text = std::fs::read_to_string(&output).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let chains = &json["models"][0]["chains"];
        assert_eq!(chains[0]["name"], "A");
        assert_eq!(chains[1]["name"], "W");
        assert_eq!(chains[0]["residues"][0]["name"], "ALA");
    }

    #[test]
    fn prune_flags_drop_solvent_on_the_way_through() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdb");
        let output = dir.path().join("out.pdb");
        std::fs::write(&input, FRAGMENT).unwrap();
        let mut cli = Cli::parse_from([
            PathBuf::from("mxconv"),
            input.clone(),
            output.clone(),
        ]);
        cli.remove_waters = true;
        run(&cli).unwrap();
        let text = std::fs::read_to_string(&output).unwrap();
        assert!(!text.contains("HOH"));
        assert!(text.contains("ALA"));
    }

    #[test]
    fn cif_output_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.pdb");
        std::fs::write(&input, FRAGMENT).unwrap();
        let cli = Cli::parse_from([
            PathBuf::from("mxconv"),
            input.clone(),
            dir.path().join("out.cif"),
        ]);
        assert!(matches!(run(&cli), Err(CliError::Argument(_))));
    }
}
