use super::traits::StructureFile;
use crate::core::models::lattice::{Lattice, LatticeError};
use crate::core::models::structure::{AtomicStructure, StructureError};
use crate::core::utils::elements::{canonical_symbol, symbol_from_label};
use nalgebra::{Matrix3, Point3, Vector3};
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("File ended after {found} of {expected} atom lines")]
    Truncated { expected: usize, found: usize },
    #[error("Invalid lattice: {0}")]
    Lattice(#[from] LatticeError),
    #[error("Invalid structure: {0}")]
    Structure(#[from] StructureError),
}

#[derive(Debug, Error)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count '{value}'")]
    InvalidCount { value: String },
    #[error("Atom line needs an element and three coordinates")]
    TooFewFields,
    #[error("Invalid coordinate '{value}'")]
    InvalidCoordinate { value: String },
    #[error("Cannot determine an element from '{value}'")]
    UnknownElement { value: String },
    #[error("Lattice needs nine numbers (value: '{value}')")]
    InvalidLattice { value: String },
}

pub struct XyzFile;

impl StructureFile for XyzFile {
    type Error = XyzError;
    const EXTENSION: &'static str = "xyz";

    /// Reads the first frame of a plain or extended XYZ file.
    fn read_from(reader: &mut impl BufRead) -> Result<AtomicStructure, Self::Error> {
        let mut lines = reader.lines().enumerate();

        let count = loop {
            let Some((idx, line)) = lines.next() else {
                return Err(XyzError::Truncated {
                    expected: 1,
                    found: 0,
                });
            };
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            break trimmed.parse::<usize>().map_err(|_| XyzError::Parse {
                line: idx + 1,
                kind: XyzParseErrorKind::InvalidCount {
                    value: trimmed.to_string(),
                },
            })?;
        };

        let (comment_line, comment) = match lines.next() {
            Some((idx, line)) => (idx + 1, line?),
            None => (0, String::new()),
        };
        let header = parse_comment(&comment, comment_line)?;

        let mut builder = AtomicStructure::builder();
        if let Some(name) = &header.name {
            builder = builder.name(name);
        }
        if let Some(lattice) = header.lattice {
            builder = builder.lattice(lattice);
        }

        for found in 0..count {
            let Some((idx, line)) = lines.next() else {
                return Err(XyzError::Truncated {
                    expected: count,
                    found,
                });
            };
            let (element, position) = parse_atom_line(&line?, idx + 1)?;
            builder.add_atom(&element, position);
        }

        Ok(builder.build()?)
    }

    /// Writes an XYZ frame; structures with a cell get an extended-XYZ comment line.
    fn write_to(structure: &AtomicStructure, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{}", structure.len())?;

        let name = structure.name().unwrap_or("");
        match structure.lattice() {
            Some(lattice) => {
                let m = lattice.matrix();
                let vectors: Vec<String> = (0..3)
                    .flat_map(|col| (0..3).map(move |row| (row, col)))
                    .map(|(row, col)| format!("{:.8}", m[(row, col)]))
                    .collect();
                write!(
                    writer,
                    "Lattice=\"{}\" Properties=species:S:1:pos:R:3",
                    vectors.join(" ")
                )?;
                if !name.is_empty() {
                    write!(writer, " name=\"{}\"", name.replace('"', "'"))?;
                }
                writeln!(writer)?;
            }
            None => writeln!(writer, "{}", name)?,
        }

        for atom in structure.atoms() {
            let p = &atom.position;
            writeln!(
                writer,
                "{:<3} {:>16.8} {:>16.8} {:>16.8}",
                atom.element, p.x, p.y, p.z
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct CommentHeader {
    name: Option<String>,
    lattice: Option<Lattice>,
}

/// Splits an extended-XYZ comment into `key=value` pairs, honouring double quotes.
fn key_values(comment: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut chars = comment.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=' && !c.is_whitespace()) {
            key.push(c);
        }
        let mut value = String::new();
        if chars.next_if_eq(&'=').is_some() {
            if chars.next_if_eq(&'"').is_some() {
                for c in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                    value.push(c);
                }
            } else {
                while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                    value.push(c);
                }
            }
        }
        pairs.push((key, value));
    }
    pairs
}

fn parse_comment(comment: &str, line: usize) -> Result<CommentHeader, XyzError> {
    let trimmed = comment.trim();
    if !trimmed.contains("Lattice=") {
        return Ok(CommentHeader {
            name: Some(trimmed.to_string()).filter(|n| !n.is_empty()),
            lattice: None,
        });
    }

    let mut header = CommentHeader::default();
    for (key, value) in key_values(trimmed) {
        match key.as_str() {
            "Lattice" => {
                let numbers: Vec<f64> = value
                    .split_whitespace()
                    .map(str::parse::<f64>)
                    .collect::<Result<_, _>>()
                    .ok()
                    .filter(|v: &Vec<f64>| v.len() == 9)
                    .ok_or_else(|| XyzError::Parse {
                        line,
                        kind: XyzParseErrorKind::InvalidLattice {
                            value: value.clone(),
                        },
                    })?;
                let matrix = Matrix3::from_columns(&[
                    Vector3::new(numbers[0], numbers[1], numbers[2]),
                    Vector3::new(numbers[3], numbers[4], numbers[5]),
                    Vector3::new(numbers[6], numbers[7], numbers[8]),
                ]);
                header.lattice = Some(Lattice::new(matrix)?);
            }
            "name" if !value.is_empty() => header.name = Some(value),
            _ => {}
        }
    }
    Ok(header)
}

fn parse_atom_line(line: &str, line_num: usize) -> Result<(String, Point3<f64>), XyzError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(XyzError::Parse {
            line: line_num,
            kind: XyzParseErrorKind::TooFewFields,
        });
    }

    let element = canonical_symbol(fields[0])
        .or_else(|| symbol_from_label(fields[0]))
        .ok_or_else(|| XyzError::Parse {
            line: line_num,
            kind: XyzParseErrorKind::UnknownElement {
                value: fields[0].to_string(),
            },
        })?;

    let mut xyz = [0.0; 3];
    for (slot, raw) in xyz.iter_mut().zip(&fields[1..4]) {
        *slot = raw.parse::<f64>().map_err(|_| XyzError::Parse {
            line: line_num,
            kind: XyzParseErrorKind::InvalidCoordinate {
                value: raw.to_string(),
            },
        })?;
    }
    Ok((element, Point3::new(xyz[0], xyz[1], xyz[2])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn read(content: &str) -> Result<AtomicStructure, XyzError> {
        XyzFile::read_from(&mut Cursor::new(content))
    }

    #[test]
    fn reads_plain_xyz_with_name() {
        let structure = read("3\nwater dimer fragment\nO 0 0 0\nH 0.96 0 0\nh -0.24 0.93 0\n").unwrap();
        assert_eq!(structure.name(), Some("water dimer fragment"));
        assert_eq!(structure.len(), 3);
        assert_eq!(structure.atoms()[2].element, "H");
        assert_eq!(structure.atoms()[1].position, Point3::new(0.96, 0.0, 0.0));
        assert!(structure.lattice().is_none());
    }

    #[test]
    fn reads_extended_xyz_lattice_and_extra_columns() {
        let content = "2\nLattice=\"10 0 0 0 12 0 0 0 14\" Properties=species:S:1:pos:R:3:forces:R:3 name=MOF-5 pbc=\"T T T\"\nZn 1 2 3 0.1 0.2 0.3\nO 4 5 6 0 0 0\n";
        let structure = read(content).unwrap();
        assert_eq!(structure.name(), Some("MOF-5"));
        let lattice = structure.lattice().unwrap();
        assert!((lattice.volume() - 1680.0).abs() < 1e-9);
        assert_eq!(structure.atoms()[0].position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn blank_comment_gives_unnamed_structure() {
        let structure = read("1\n\nCu 0 0 0\n").unwrap();
        assert_eq!(structure.name(), None);
    }

    #[test]
    fn only_the_first_frame_is_read() {
        let structure = read("1\nfirst\nCu 0 0 0\n2\nsecond\nO 0 0 0\nO 1 0 0\n").unwrap();
        assert_eq!(structure.len(), 1);
        assert_eq!(structure.name(), Some("first"));
    }

    #[test]
    fn truncated_file_is_rejected() {
        match read("3\nshort\nCu 0 0 0\n") {
            Err(XyzError::Truncated {
                expected: 3,
                found: 1,
            }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn bad_lines_report_line_numbers() {
        assert!(matches!(
            read("x\n"),
            Err(XyzError::Parse {
                line: 1,
                kind: XyzParseErrorKind::InvalidCount { .. }
            })
        ));
        assert!(matches!(
            read("1\n\nCu 0 zero 0\n"),
            Err(XyzError::Parse {
                line: 3,
                kind: XyzParseErrorKind::InvalidCoordinate { .. }
            })
        ));
        assert!(matches!(
            read("1\n\n42 0 0 0\n"),
            Err(XyzError::Parse {
                line: 3,
                kind: XyzParseErrorKind::UnknownElement { .. }
            })
        ));
        assert!(matches!(
            read("1\nLattice=\"1 0 0\"\nCu 0 0 0\n"),
            Err(XyzError::Parse {
                line: 2,
                kind: XyzParseErrorKind::InvalidLattice { .. }
            })
        ));
    }

    #[test]
    fn written_extended_xyz_keeps_cell_name_and_order() {
        let lattice = Lattice::from_parameters(10.0, 11.0, 12.0, 90.0, 100.0, 90.0).unwrap();
        let mut builder = AtomicStructure::builder().name("toy").lattice(lattice);
        builder
            .add_atom("Cu", Point3::new(0.0, 0.0, 0.0))
            .add_atom("O", Point3::new(1.9, 0.1, -0.2));
        let structure = builder.build().unwrap();

        let mut buffer = Vec::new();
        XyzFile::write_to(&structure, &mut buffer).unwrap();
        let reread = read(&String::from_utf8(buffer).unwrap()).unwrap();

        assert_eq!(reread.name(), Some("toy"));
        assert_eq!(reread.len(), 2);
        for (a, b) in structure.atoms().iter().zip(reread.atoms()) {
            assert_eq!(a.element, b.element);
            assert!((a.position - b.position).norm() < 1e-7);
        }
        let (a, _, _, _, beta, _) = reread.lattice().unwrap().parameters();
        assert!((a - 10.0).abs() < 1e-6);
        assert!((beta - 100.0).abs() < 1e-6);
    }

    #[test]
    fn read_from_path_names_structure_after_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Cu-BTC.xyz");
        let structure = AtomicStructure::new(vec![Atom::new("Cu", Point3::origin())]).unwrap();
        XyzFile::write_to_path(&structure, &path).unwrap();

        let reread = XyzFile::read_from_path(&path).unwrap();
        assert_eq!(reread.name(), Some("Cu-BTC"));
    }
}
