use crate::core::models::structure::Structure;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Common interface for structure file formats.
///
/// Implementors handle format-specific parsing and serialization; the
/// path-based methods are provided in terms of the stream-based ones.
pub trait StructureFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error>;

    /// Writes a structure to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or I/O operations encounter issues.
    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a structure from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Structure, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a structure to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(structure: &Structure, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(structure, &mut writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::pdb::PdbFile;

    #[test]
    fn path_based_methods_round_trip_through_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fragment.pdb");
        std::fs::write(
            &path,
            "ATOM      1  CA  ALA A   1      11.000   6.000  -6.000  1.00  0.00           C\nEND\n",
        )
        .expect("write input");

        let st = PdbFile::read_from_path(&path).expect("read");
        assert_eq!(st.first_model().unwrap().chains[0].name, "A");

        let out = dir.path().join("copy.pdb");
        PdbFile::write_to_path(&st, &out).expect("write");
        let st2 = PdbFile::read_from_path(&out).expect("re-read");
        assert_eq!(st2.first_model().unwrap().chains[0].residues.len(), 1);
    }

    #[test]
    fn read_from_missing_path_is_an_io_error() {
        let err = PdbFile::read_from_path("/nonexistent/file.pdb").unwrap_err();
        assert!(matches!(err, crate::core::io::pdb::PdbError::Io(_)));
    }
}
