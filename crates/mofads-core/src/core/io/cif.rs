use super::traits::StructureFile;
use crate::core::models::lattice::{Lattice, LatticeError};
use crate::core::models::structure::{AtomicStructure, StructureBuilder, StructureError};
use crate::core::utils::elements::{canonical_symbol, symbol_from_label};
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::iter::Peekable;
use thiserror::Error;
use tracing::{debug, warn};

const CELL_TAGS: [&str; 6] = [
    "_cell_length_a",
    "_cell_length_b",
    "_cell_length_c",
    "_cell_angle_alpha",
    "_cell_angle_beta",
    "_cell_angle_gamma",
];

const SYMOP_TAGS: [&str; 2] = [
    "_symmetry_equiv_pos_as_xyz",
    "_space_group_symop_operation_xyz",
];

const DEFAULT_BLOCK_NAME: &str = "mofads";

#[derive(Debug, Error)]
pub enum CifError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: CifParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
    #[error("Invalid unit cell: {0}")]
    Lattice(#[from] LatticeError),
    #[error("Invalid structure: {0}")]
    Structure(#[from] StructureError),
    #[error("Structure has no unit cell; CIF output requires one")]
    MissingLattice,
}

#[derive(Debug, Error)]
pub enum CifParseErrorKind {
    #[error("Invalid number for {tag} (value: '{value}')")]
    InvalidNumber { tag: String, value: String },
    #[error("Cannot determine an element from '{value}'")]
    UnknownElement { value: String },
    #[error("Loop has {values} values, which is not a multiple of its {columns} columns")]
    LoopSize { columns: usize, values: usize },
    #[error("Text field is never terminated")]
    UnterminatedTextField,
    #[error("Quoted value is never terminated")]
    UnterminatedQuote,
    #[error("Tag {tag} has no value")]
    MissingValue { tag: String },
}

#[derive(Debug, Clone)]
struct Token {
    line: usize,
    text: String,
    quoted: bool,
}

impl Token {
    fn is_reserved(&self) -> bool {
        if self.quoted {
            return false;
        }
        let lower = self.text.to_ascii_lowercase();
        lower.starts_with('_')
            || lower == "loop_"
            || lower.starts_with("data_")
            || lower.starts_with("save_")
            || lower == "global_"
            || lower == "stop_"
    }
}

#[derive(Debug)]
struct Loop {
    headers: Vec<String>,
    rows: Vec<(usize, Vec<String>)>,
}

impl Loop {
    fn column(&self, tag: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == tag)
    }
}

#[derive(Debug, Default)]
struct DataBlock {
    name: Option<String>,
    items: HashMap<String, (usize, String)>,
    loops: Vec<Loop>,
}

pub struct CifFile;

impl StructureFile for CifFile {
    type Error = CifError;
    const EXTENSION: &'static str = "cif";

    fn read_from(reader: &mut impl BufRead) -> Result<AtomicStructure, Self::Error> {
        let tokens = tokenize(reader)?;
        let block = parse_first_block(tokens)?;
        warn_on_symmetry(&block);

        let lattice = read_lattice(&block)?;
        let mut builder = AtomicStructure::builder();
        if let Some(name) = &block.name {
            builder = builder.name(name);
        }
        if let Some(lattice) = &lattice {
            builder = builder.lattice(lattice.clone());
        }
        read_atoms(&block, lattice.as_ref(), &mut builder)?;

        let structure = builder.build()?;
        debug!(
            atoms = structure.len(),
            formula = %structure.formula(),
            "CIF data block parsed."
        );
        Ok(structure)
    }

    fn write_to(structure: &AtomicStructure, writer: &mut impl Write) -> Result<(), Self::Error> {
        let lattice = structure.lattice().ok_or(CifError::MissingLattice)?;
        let name = structure
            .name()
            .map(block_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_BLOCK_NAME.to_string());
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();

        writeln!(writer, "data_{}", name)?;
        writeln!(writer, "_symmetry_space_group_name_H-M    'P 1'")?;
        writeln!(writer, "_symmetry_Int_Tables_number       1")?;
        writeln!(writer, "_cell_length_a                    {:.6}", a)?;
        writeln!(writer, "_cell_length_b                    {:.6}", b)?;
        writeln!(writer, "_cell_length_c                    {:.6}", c)?;
        writeln!(writer, "_cell_angle_alpha                 {:.6}", alpha)?;
        writeln!(writer, "_cell_angle_beta                  {:.6}", beta)?;
        writeln!(writer, "_cell_angle_gamma                 {:.6}", gamma)?;
        writeln!(writer, "_cell_volume                      {:.6}", lattice.volume())?;
        writeln!(writer)?;
        writeln!(writer, "loop_")?;
        writeln!(writer, "_symmetry_equiv_pos_as_xyz")?;
        writeln!(writer, "  'x, y, z'")?;
        writeln!(writer)?;
        writeln!(writer, "loop_")?;
        writeln!(writer, "_atom_site_label")?;
        writeln!(writer, "_atom_site_type_symbol")?;
        writeln!(writer, "_atom_site_fract_x")?;
        writeln!(writer, "_atom_site_fract_y")?;
        writeln!(writer, "_atom_site_fract_z")?;

        let mut counters: HashMap<&str, usize> = HashMap::new();
        for atom in structure.atoms() {
            let count = counters.entry(atom.element.as_str()).or_insert(0);
            *count += 1;
            let f = lattice.to_fractional(&atom.position);
            writeln!(
                writer,
                "{}{:<6} {:<3} {:>14.10} {:>14.10} {:>14.10}",
                atom.element, count, atom.element, f.x, f.y, f.z
            )?;
        }
        Ok(())
    }
}

fn block_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

fn tokenize(reader: &mut impl BufRead) -> Result<Vec<Token>, CifError> {
    let mut tokens = Vec::new();
    let mut text_field: Option<(usize, String)> = None;

    for (idx, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = idx + 1;

        if let Some((start, mut buffer)) = text_field.take() {
            if let Some(rest) = line.strip_prefix(';') {
                tokens.push(Token {
                    line: start,
                    text: buffer.trim().to_string(),
                    quoted: true,
                });
                split_line(rest, line_num, &mut tokens)?;
            } else {
                buffer.push('\n');
                buffer.push_str(&line);
                text_field = Some((start, buffer));
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix(';') {
            text_field = Some((line_num, rest.to_string()));
            continue;
        }
        split_line(&line, line_num, &mut tokens)?;
    }

    if let Some((start, _)) = text_field {
        return Err(CifError::Parse {
            line: start,
            kind: CifParseErrorKind::UnterminatedTextField,
        });
    }
    Ok(tokens)
}

fn split_line(line: &str, line_num: usize, tokens: &mut Vec<Token>) -> Result<(), CifError> {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '#' {
            break;
        }

        if c == '\'' || c == '"' {
            // A quote only closes when followed by whitespace or the end of the line.
            let mut j = i + 1;
            while j < chars.len()
                && !(chars[j] == c && (j + 1 == chars.len() || chars[j + 1].is_whitespace()))
            {
                j += 1;
            }
            if j >= chars.len() {
                return Err(CifError::Parse {
                    line: line_num,
                    kind: CifParseErrorKind::UnterminatedQuote,
                });
            }
            tokens.push(Token {
                line: line_num,
                text: chars[i + 1..j].iter().collect(),
                quoted: true,
            });
            i = j + 1;
        } else {
            let mut j = i;
            while j < chars.len() && !chars[j].is_whitespace() {
                j += 1;
            }
            tokens.push(Token {
                line: line_num,
                text: chars[i..j].iter().collect(),
                quoted: false,
            });
            i = j;
        }
    }
    Ok(())
}

fn parse_first_block(tokens: Vec<Token>) -> Result<DataBlock, CifError> {
    let mut block = DataBlock::default();
    let mut seen_block = false;
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if token.quoted {
            continue;
        }
        let lower = token.text.to_ascii_lowercase();

        if lower.starts_with("data_") {
            if seen_block {
                debug!(line = token.line, "Ignoring data blocks after the first.");
                break;
            }
            seen_block = true;
            block.name = Some(token.text[5..].to_string()).filter(|n| !n.is_empty());
        } else if lower == "loop_" {
            block.loops.push(parse_loop(token.line, &mut iter)?);
        } else if lower.starts_with('_') {
            let Some(value) = iter.next_if(|t| !t.is_reserved()) else {
                return Err(CifError::Parse {
                    line: token.line,
                    kind: CifParseErrorKind::MissingValue { tag: token.text },
                });
            };
            block.items.insert(lower, (value.line, value.text));
        }
    }

    if !seen_block {
        return Err(CifError::MissingRecord("data_ block".to_string()));
    }
    Ok(block)
}

fn parse_loop(
    line: usize,
    iter: &mut Peekable<impl Iterator<Item = Token>>,
) -> Result<Loop, CifError> {
    let mut headers = Vec::new();
    while let Some(tag) = iter.next_if(|t| !t.quoted && t.text.starts_with('_')) {
        headers.push(tag.text.to_ascii_lowercase());
    }
    let mut values = Vec::new();
    while let Some(value) = iter.next_if(|t| !t.is_reserved()) {
        values.push(value);
    }

    if headers.is_empty() || values.len() % headers.len() != 0 {
        return Err(CifError::Parse {
            line,
            kind: CifParseErrorKind::LoopSize {
                columns: headers.len(),
                values: values.len(),
            },
        });
    }

    let rows = values
        .chunks(headers.len())
        .map(|chunk| {
            (
                chunk[0].line,
                chunk.iter().map(|t| t.text.clone()).collect(),
            )
        })
        .collect();
    Ok(Loop { headers, rows })
}

/// Parses a CIF number, dropping a trailing standard uncertainty such as `(4)`.
fn parse_number(tag: &str, value: &str, line: usize) -> Result<f64, CifError> {
    let stripped = match value.find('(') {
        Some(pos) => &value[..pos],
        None => value,
    };
    stripped.parse::<f64>().map_err(|_| CifError::Parse {
        line,
        kind: CifParseErrorKind::InvalidNumber {
            tag: tag.to_string(),
            value: value.to_string(),
        },
    })
}

fn read_lattice(block: &DataBlock) -> Result<Option<Lattice>, CifError> {
    if CELL_TAGS.iter().all(|tag| !block.items.contains_key(*tag)) {
        return Ok(None);
    }
    let mut values = [0.0; 6];
    for (slot, tag) in values.iter_mut().zip(CELL_TAGS) {
        let (line, raw) = block
            .items
            .get(tag)
            .ok_or_else(|| CifError::MissingRecord(tag.to_string()))?;
        *slot = parse_number(tag, raw, *line)?;
    }
    let [a, b, c, alpha, beta, gamma] = values;
    Ok(Some(Lattice::from_parameters(a, b, c, alpha, beta, gamma)?))
}

fn resolve_element(raw: &str) -> Option<String> {
    canonical_symbol(raw).or_else(|| symbol_from_label(raw))
}

fn read_atoms(
    block: &DataBlock,
    lattice: Option<&Lattice>,
    builder: &mut StructureBuilder,
) -> Result<(), CifError> {
    let atom_loop = block
        .loops
        .iter()
        .find(|l| l.column("_atom_site_fract_x").is_some() || l.column("_atom_site_cartn_x").is_some())
        .ok_or_else(|| CifError::MissingRecord("_atom_site_ loop with coordinates".to_string()))?;

    let type_col = atom_loop.column("_atom_site_type_symbol");
    let label_col = atom_loop.column("_atom_site_label");
    let source_col = type_col.or(label_col).ok_or_else(|| {
        CifError::MissingRecord("_atom_site_type_symbol or _atom_site_label".to_string())
    })?;

    let columns = |prefix: &str| -> Option<Vec<(String, usize)>> {
        ["x", "y", "z"]
            .iter()
            .map(|axis| {
                let tag = format!("{}{}", prefix, axis);
                atom_loop.column(&tag).map(|col| (tag, col))
            })
            .collect()
    };

    let (coords, fractional) = if let Some(cols) = columns("_atom_site_fract_") {
        (cols, true)
    } else if let Some(cols) = columns("_atom_site_cartn_") {
        (cols, false)
    } else {
        return Err(CifError::MissingRecord(
            "complete set of _atom_site_ coordinates".to_string(),
        ));
    };
    let lattice = match (fractional, lattice) {
        (true, None) => {
            return Err(CifError::MissingRecord(
                "cell parameters for fractional coordinates".to_string(),
            ));
        }
        (_, lattice) => lattice,
    };

    for (line, row) in &atom_loop.rows {
        let element = type_col
            .and_then(|c| resolve_element(&row[c]))
            .or_else(|| label_col.and_then(|c| symbol_from_label(&row[c])))
            .ok_or_else(|| CifError::Parse {
                line: *line,
                kind: CifParseErrorKind::UnknownElement {
                    value: row[source_col].clone(),
                },
            })?;

        let mut xyz = [0.0; 3];
        for (slot, (tag, col)) in xyz.iter_mut().zip(&coords) {
            *slot = parse_number(tag, &row[*col], *line)?;
        }
        let v = Vector3::new(xyz[0], xyz[1], xyz[2]);
        let position = match lattice {
            Some(lattice) if fractional => lattice.to_cartesian(&v),
            _ => Point3::from(v),
        };
        builder.add_atom(&element, position);
    }
    Ok(())
}

fn is_identity_op(op: &str) -> bool {
    let normalized: String = op
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '+')
        .collect::<String>()
        .to_ascii_lowercase();
    normalized == "x,y,z"
}

fn warn_on_symmetry(block: &DataBlock) {
    let mut non_identity = 0;
    for lp in &block.loops {
        for tag in SYMOP_TAGS {
            if let Some(col) = lp.column(tag) {
                non_identity += lp
                    .rows
                    .iter()
                    .filter(|(_, row)| !is_identity_op(&row[col]))
                    .count();
            }
        }
    }
    if non_identity > 0 {
        warn!(
            operators = non_identity,
            "CIF lists symmetry operators other than the identity; they are not expanded and only the listed atoms are used."
        );
    }
}
