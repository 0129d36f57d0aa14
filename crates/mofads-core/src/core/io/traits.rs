use crate::core::models::structure::AtomicStructure;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing atomic structure file formats.
///
/// Implementors handle format-specific parsing and serialization; the provided path
/// helpers take care of opening files and naming structures after their file.
pub trait StructureFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// File extension (without the dot) conventionally used for the format.
    const EXTENSION: &'static str;

    /// Reads a structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<AtomicStructure, Self::Error>;

    /// Writes a structure to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the structure cannot be represented in the format or writing
    /// fails.
    fn write_to(structure: &AtomicStructure, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a structure from a file path.
    ///
    /// A structure that carries no name of its own is named after the file stem.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<AtomicStructure, Self::Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let structure = Self::read_from(&mut reader)?;
        match (structure.name(), path.file_stem().and_then(|s| s.to_str())) {
            (None, Some(stem)) => Ok(structure.with_name(stem)),
            _ => Ok(structure),
        }
    }

    /// Writes a structure to a file path, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        structure: &AtomicStructure,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(structure, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
