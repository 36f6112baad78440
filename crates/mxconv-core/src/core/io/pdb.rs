use crate::core::io::hybrid36;
use crate::core::io::traits::StructureFile;
use crate::core::models::atom::{Anisou, Atom};
use crate::core::models::element::Element;
use crate::core::models::ncs::NcsOp;
use crate::core::models::residue::Residue;
use crate::core::models::structure::Structure;
use crate::core::symmetry::{Op, TripletError};
use nalgebra::{Matrix3, Point3, Vector3};
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}\n  {content}")]
    Parse {
        line: usize,
        content: String,
        kind: PdbParseErrorKind,
    },
    #[error("Inconsistent records on line {line}: {message}")]
    Inconsistency { line: usize, message: String },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
    #[error("REMARK 290: {0}")]
    Remark290(#[from] TripletError),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid hybrid-36 field in columns {columns} (value: '{value}')")]
    InvalidHybrid36 {
        columns: &'static str,
        value: String,
    },
    #[error("Invalid number in columns {columns} (value: '{value}')")]
    InvalidReal {
        columns: &'static str,
        value: String,
    },
    #[error("Invalid integer in columns {columns} (value: '{value}')")]
    InvalidInt {
        columns: &'static str,
        value: String,
    },
    #[error("Required field in columns {columns} is empty")]
    MissingField { columns: &'static str },
    #[error("Line is too short for this record type")]
    LineTooShort,
}

/// Record keywords recognized by the parser. The vocabulary of the format
/// is fixed, so dispatch is a closed match rather than string lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Record {
    Atom { hetero: bool },
    Anisou,
    Model,
    EndModel,
    Ter,
    Cryst1,
    Mtrix,
    Remark,
    Header,
    Title,
    Keywords,
    ExpData,
    End,
    Other,
}

/// Packs the first four bytes lowercased into one id; NUL and space are
/// equivalent, so short lines compare equal to space-padded keywords.
fn ialpha4_id(s: &[u8]) -> u32 {
    let b = |i: usize| u32::from(s.get(i).copied().unwrap_or(0) | 0x20);
    (b(0) << 24) | (b(1) << 16) | (b(2) << 8) | b(3)
}

/// Compare the first 4 characters with an uppercase keyword, ignoring case.
fn is_record_type4(s: &[u8], keyword: &[u8; 4]) -> bool {
    ialpha4_id(s) == ialpha4_id(keyword)
}

/// Length-aware match for 3-letter keywords: "TER ", "TER\n", "TER\r" match
/// "TER", while "TERE" and "TER1" do not. Clearing the low nibble of the
/// last byte maps all trailing filler characters onto the space value.
fn is_record_type3(s: &[u8], keyword: &[u8; 4]) -> bool {
    (ialpha4_id(s) & !0xF) == ialpha4_id(keyword)
}

fn recognize(line: &str) -> Record {
    let s = line.as_bytes();
    if is_record_type4(s, b"ATOM") {
        Record::Atom { hetero: false }
    } else if is_record_type4(s, b"HETA") {
        Record::Atom { hetero: true }
    } else if is_record_type4(s, b"ANIS") {
        Record::Anisou
    } else if is_record_type4(s, b"MODE") {
        Record::Model
    } else if is_record_type4(s, b"ENDM") {
        Record::EndModel
    } else if is_record_type3(s, b"TER ") {
        Record::Ter
    } else if is_record_type4(s, b"CRYS") {
        Record::Cryst1
    } else if is_record_type4(s, b"MTRI") {
        Record::Mtrix
    } else if is_record_type4(s, b"REMA") {
        Record::Remark
    } else if is_record_type4(s, b"HEAD") {
        Record::Header
    } else if is_record_type4(s, b"TITL") {
        Record::Title
    } else if is_record_type4(s, b"KEYW") {
        Record::Keywords
    } else if is_record_type4(s, b"EXPD") {
        Record::ExpData
    } else if is_record_type3(s, b"END ") {
        Record::End
    } else {
        Record::Other
    }
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end)
        .or_else(|| line.get(start..))
        .unwrap_or("")
        .trim()
}

fn char_at(line: &str, idx: usize) -> char {
    line.as_bytes()
        .get(idx)
        .map(|&b| b as char)
        .filter(|c| *c != '\0')
        .unwrap_or(' ')
}

/// Incremental construction state: which model/chain/residue the next atom
/// row belongs to, threaded through the line loop. Each parse call owns its
/// own cursor.
#[derive(Debug, Default)]
struct Cursor {
    model: Option<usize>,
    chain: Option<usize>,
    residue: Option<usize>,
    /// True between MODEL and ENDMDL.
    model_open: bool,
    /// Serial of the most recent atom, for matching ANISOU records.
    last_serial: i32,
    /// Count of implicitly opened models, for naming.
    model_count: usize,
}

/// Accumulates the three rows of an MTRIXn group.
#[derive(Debug, Default)]
struct MtrixBuilder {
    id: String,
    rows: Vec<[f64; 4]>,
    given: bool,
}

pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let mut st = Structure::new();
        let mut cursor = Cursor::default();
        let mut mtrix = MtrixBuilder::default();

        for (line_idx, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_idx + 1;
            match recognize(&line) {
                Record::Atom { hetero: _ } => {
                    read_atom_line(&mut st, &mut cursor, &line, line_num)?;
                }
                Record::Anisou => read_anisou_line(&mut st, &cursor, &line, line_num)?,
                Record::Model => {
                    if cursor.model_open {
                        return Err(PdbError::Inconsistency {
                            line: line_num,
                            message: "MODEL record before ENDMDL closed the previous model"
                                .to_string(),
                        });
                    }
                    if cursor.model.is_some() {
                        return Err(PdbError::Inconsistency {
                            line: line_num,
                            message: "MODEL record after atoms outside any MODEL/ENDMDL block"
                                .to_string(),
                        });
                    }
                    let name = slice_and_trim(&line, 6, 80);
                    if name.is_empty() {
                        return Err(parse_err(
                            line_num,
                            &line,
                            PdbParseErrorKind::MissingField { columns: "11-14" },
                        ));
                    }
                    st.models.push(crate::core::models::model::Model::new(name));
                    cursor.model = Some(st.models.len() - 1);
                    cursor.chain = None;
                    cursor.residue = None;
                    cursor.model_open = true;
                }
                Record::EndModel => {
                    if !cursor.model_open {
                        return Err(PdbError::Inconsistency {
                            line: line_num,
                            message: "ENDMDL without a preceding MODEL record".to_string(),
                        });
                    }
                    cursor.model = None;
                    cursor.chain = None;
                    cursor.residue = None;
                    cursor.model_open = false;
                }
                Record::Ter => {
                    // a missing or surplus TER never invalidates parsed data
                    cursor.chain = None;
                    cursor.residue = None;
                }
                Record::Cryst1 => read_cryst1_line(&mut st, &line, line_num)?,
                Record::Mtrix => read_mtrix_line(&mut st, &mut mtrix, &line, line_num)?,
                Record::Remark => st.raw_remarks.push(line),
                Record::Header => {
                    add_info(&mut st, "_struct_keywords.pdbx_keywords", &line, 10, 50);
                    add_info(&mut st, "_database_PDB_rev.date_original", &line, 50, 59);
                    let id = slice_and_trim(&line, 62, 66);
                    if !id.is_empty() {
                        st.name = id.to_string();
                        st.info.insert("_entry.id".to_string(), id.to_string());
                    }
                }
                Record::Title => append_info(&mut st, "_struct.title", &line),
                Record::Keywords => append_info(&mut st, "_struct_keywords.text", &line),
                Record::ExpData => append_info(&mut st, "_exptl.method", &line),
                Record::End => break,
                Record::Other => {}
            }
        }

        if !mtrix.rows.is_empty() && mtrix.rows.len() != 3 {
            return Err(PdbError::MissingRecord(format!(
                "MTRIX group '{}' has {} of 3 rows",
                mtrix.id,
                mtrix.rows.len()
            )));
        }
        if st.models.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".to_string()));
        }
        Ok(st)
    }

    fn write_to(st: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        write_pdb(st, writer)
    }
}

fn parse_err(line: usize, content: &str, kind: PdbParseErrorKind) -> PdbError {
    PdbError::Parse {
        line,
        content: content.to_string(),
        kind,
    }
}

fn read_hy36(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    width: u32,
    columns: &'static str,
) -> Result<i32, PdbError> {
    let field = slice_and_trim(line, start, end);
    hybrid36::decode(width, field).ok_or_else(|| {
        parse_err(
            line_num,
            line,
            PdbParseErrorKind::InvalidHybrid36 {
                columns,
                value: field.to_string(),
            },
        )
    })
}

fn read_real(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    columns: &'static str,
) -> Result<f64, PdbError> {
    let field = slice_and_trim(line, start, end);
    field.parse().map_err(|_| {
        parse_err(
            line_num,
            line,
            PdbParseErrorKind::InvalidReal {
                columns,
                value: field.to_string(),
            },
        )
    })
}

fn read_real_or(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    columns: &'static str,
    default: f64,
) -> Result<f64, PdbError> {
    if slice_and_trim(line, start, end).is_empty() {
        Ok(default)
    } else {
        read_real(line, line_num, start, end, columns)
    }
}

fn add_info(st: &mut Structure, key: &str, line: &str, start: usize, end: usize) {
    let value = slice_and_trim(line, start, end);
    if !value.is_empty() {
        st.info.insert(key.to_string(), value.to_string());
    }
}

/// Continuation records (TITLE, KEYWDS, EXPDTA) concatenate across lines.
fn append_info(st: &mut Structure, key: &str, line: &str) {
    let value = slice_and_trim(line, 10, 80);
    if value.is_empty() {
        return;
    }
    let entry = st.info.entry(key.to_string()).or_default();
    if !entry.is_empty() {
        entry.push(' ');
    }
    entry.push_str(value);
}

fn read_atom_line(
    st: &mut Structure,
    cursor: &mut Cursor,
    line: &str,
    line_num: usize,
) -> Result<(), PdbError> {
    if line.len() < 54 {
        return Err(parse_err(line_num, line, PdbParseErrorKind::LineTooShort));
    }

    let serial = read_hy36(line, line_num, 6, 11, 5, "7-11")?;
    let name = slice_and_trim(line, 12, 16);
    if name.is_empty() {
        return Err(parse_err(
            line_num,
            line,
            PdbParseErrorKind::MissingField { columns: "13-16" },
        ));
    }
    let altloc = char_at(line, 16);
    let res_name = slice_and_trim(line, 17, 20);
    // one- or two-character chain ids live in columns 21-22
    let chain_name = slice_and_trim(line, 20, 22);
    let seq_id = read_hy36(line, line_num, 22, 26, 4, "23-26")?;
    let ins_code = char_at(line, 26);
    let x = read_real(line, line_num, 30, 38, "31-38")?;
    let y = read_real(line, line_num, 38, 46, "39-46")?;
    let z = read_real(line, line_num, 46, 54, "47-54")?;
    let occ = read_real_or(line, line_num, 54, 60, "55-60", 1.0)?;
    let b_iso = read_real_or(line, line_num, 60, 66, "61-66", 50.0)?;
    let segment = slice_and_trim(line, 72, 76);
    let element_field = slice_and_trim(line, 76, 78);
    let charge = read_charge(line, line_num)?;

    if cursor.model.is_none() {
        cursor.model_count += 1;
        let model_name = cursor.model_count.to_string();
        st.models
            .push(crate::core::models::model::Model::new(&model_name));
        cursor.model = Some(st.models.len() - 1);
        cursor.chain = None;
        cursor.residue = None;
    }
    let model = &mut st.models[cursor.model.unwrap_or(0)];

    let chain_changed = match cursor.chain {
        Some(ci) => model.chains[ci].name != chain_name,
        None => true,
    };
    if chain_changed {
        let ci = match model.chains.iter().position(|c| c.name == chain_name) {
            Some(ci) => ci,
            None => {
                model
                    .chains
                    .push(crate::core::models::chain::Chain::new(chain_name));
                model.chains.len() - 1
            }
        };
        cursor.chain = Some(ci);
        cursor.residue = None;
    }
    let chain = &mut model.chains[cursor.chain.unwrap_or(0)];

    let residue_changed = match cursor.residue {
        Some(ri) => !chain.residues[ri].matches(seq_id, seq_id, res_name),
        None => true,
    };
    if residue_changed {
        let ri = match chain
            .residues
            .iter()
            .position(|r| r.matches(seq_id, seq_id, res_name))
        {
            Some(ri) => ri,
            None => {
                chain.residues.push(Residue::new(seq_id, seq_id, res_name));
                chain.residues.len() - 1
            }
        };
        cursor.residue = Some(ri);
    }
    let residue = &mut chain.residues[cursor.residue.unwrap_or(0)];
    residue.ins_code = ins_code;
    residue.segment = segment.to_string();

    let element = if element_field.is_empty() {
        element_from_atom_name(name)
    } else {
        Element::new(element_field)
    };
    let mut atom = Atom::new(name, element, Point3::new(x, y, z));
    atom.altloc = altloc;
    atom.occ = occ;
    atom.b_iso = b_iso;
    atom.charge = charge;
    residue.atoms.push(atom);
    cursor.last_serial = serial;
    Ok(())
}

/// Charge columns 79-80 hold forms like "2+", "1-", or are blank.
fn read_charge(line: &str, line_num: usize) -> Result<i32, PdbError> {
    let field = slice_and_trim(line, 78, 80);
    if field.is_empty() {
        return Ok(0);
    }
    let bytes = field.as_bytes();
    let (digit, sign) = match *bytes {
        [d] if d.is_ascii_digit() => (d, b'+'),
        [d, s] if d.is_ascii_digit() && (s == b'+' || s == b'-') => (d, s),
        [s, d] if d.is_ascii_digit() && (s == b'+' || s == b'-') => (d, s),
        _ => {
            return Err(parse_err(
                line_num,
                line,
                PdbParseErrorKind::InvalidInt {
                    columns: "79-80",
                    value: field.to_string(),
                },
            ));
        }
    };
    let value = i32::from(digit - b'0');
    Ok(if sign == b'-' { -value } else { value })
}

/// The element field takes precedence; when it is blank the first letter of
/// the atom name is used.
fn element_from_atom_name(name: &str) -> Element {
    match name.chars().find(|c| c.is_ascii_alphabetic()) {
        Some(c) => Element::new(&c.to_string()),
        None => Element::new(""),
    }
}

fn read_anisou_line(
    st: &mut Structure,
    cursor: &Cursor,
    line: &str,
    line_num: usize,
) -> Result<(), PdbError> {
    let serial = read_hy36(line, line_num, 6, 11, 5, "7-11")?;
    let name = slice_and_trim(line, 12, 16);
    let atom = cursor
        .model
        .and_then(|mi| st.models.get_mut(mi))
        .and_then(|m| cursor.chain.and_then(|ci| m.chains.get_mut(ci)))
        .and_then(|c| cursor.residue.and_then(|ri| c.residues.get_mut(ri)))
        .and_then(|r| r.atoms.last_mut());
    let atom = match atom {
        Some(a) if cursor.last_serial == serial && a.name == name => a,
        _ => {
            return Err(PdbError::Inconsistency {
                line: line_num,
                message: format!("ANISOU record does not match the preceding atom ('{name}')"),
            });
        }
    };
    let mut u = [0.0f64; 6];
    for (i, slot) in u.iter_mut().enumerate() {
        let start = 28 + 7 * i;
        let field = slice_and_trim(line, start, start + 7);
        let raw: i32 = field.parse().map_err(|_| {
            parse_err(
                line_num,
                line,
                PdbParseErrorKind::InvalidInt {
                    columns: "29-70",
                    value: field.to_string(),
                },
            )
        })?;
        *slot = f64::from(raw) * 1e-4;
    }
    atom.aniso = Some(Anisou {
        u11: u[0],
        u22: u[1],
        u33: u[2],
        u12: u[3],
        u13: u[4],
        u23: u[5],
    });
    Ok(())
}

fn read_cryst1_line(st: &mut Structure, line: &str, line_num: usize) -> Result<(), PdbError> {
    if line.len() < 54 {
        return Err(parse_err(line_num, line, PdbParseErrorKind::LineTooShort));
    }
    let a = read_real(line, line_num, 6, 15, "7-15")?;
    let b = read_real(line, line_num, 15, 24, "16-24")?;
    let c = read_real(line, line_num, 24, 33, "25-33")?;
    let alpha = read_real(line, line_num, 33, 40, "34-40")?;
    let beta = read_real(line, line_num, 40, 47, "41-47")?;
    let gamma = read_real(line, line_num, 47, 54, "48-54")?;
    st.cell.set(a, b, c, alpha, beta, gamma);
    st.space_group = slice_and_trim(line, 55, 66).to_string();
    add_info(st, "_cell.Z_PDB", line, 66, 70);
    Ok(())
}

fn read_mtrix_line(
    st: &mut Structure,
    mtrix: &mut MtrixBuilder,
    line: &str,
    line_num: usize,
) -> Result<(), PdbError> {
    let row_char = char_at(line, 5);
    let row = match row_char.to_digit(10) {
        Some(r @ 1..=3) => r as usize,
        _ => {
            return Err(parse_err(
                line_num,
                line,
                PdbParseErrorKind::InvalidInt {
                    columns: "6",
                    value: row_char.to_string(),
                },
            ));
        }
    };
    if row != mtrix.rows.len() + 1 {
        return Err(PdbError::Inconsistency {
            line: line_num,
            message: format!(
                "MTRIX{} out of sequence (expected row {})",
                row,
                mtrix.rows.len() + 1
            ),
        });
    }
    if row == 1 {
        mtrix.id = slice_and_trim(line, 7, 10).to_string();
        mtrix.given = char_at(line, 59) == '1';
    }
    let m1 = read_real(line, line_num, 10, 20, "11-20")?;
    let m2 = read_real(line, line_num, 20, 30, "21-30")?;
    let m3 = read_real(line, line_num, 30, 40, "31-40")?;
    let v = read_real(line, line_num, 45, 55, "46-55")?;
    mtrix.rows.push([m1, m2, m3, v]);
    if mtrix.rows.len() == 3 {
        let r = &mtrix.rows;
        let rot = Matrix3::new(
            r[0][0], r[0][1], r[0][2], r[1][0], r[1][1], r[1][2], r[2][0], r[2][1], r[2][2],
        );
        let tran = Vector3::new(r[0][3], r[1][3], r[2][3]);
        st.ncs.push(NcsOp::new(&mtrix.id, mtrix.given, rot, tran));
        mtrix.rows.clear();
    }
    Ok(())
}

/// Returns the symmetry operations listed as `NNN555   x,y,z` entries in
/// REMARK 290 text, in listing order.
pub fn read_remark_290(raw_remarks: &[String]) -> Result<Vec<Op>, TripletError> {
    let mut ops = Vec::new();
    for line in raw_remarks {
        if slice_and_trim(line, 7, 10) != "290" {
            continue;
        }
        let mut words = line.get(10..).unwrap_or("").split_whitespace();
        let (Some(code), Some(triplet), None) = (words.next(), words.next(), words.next()) else {
            continue;
        };
        if code.len() > 3 && code.ends_with("555") && code.bytes().all(|b| b.is_ascii_digit()) {
            ops.push(Op::from_triplet(triplet)?);
        }
    }
    Ok(ops)
}

// --- writer ---

/// Atom names shorter than four characters start one column later when the
/// element symbol is a single letter.
fn format_atom_name(atom: &Atom) -> String {
    if atom.name.len() >= 4 || atom.element.symbol().len() > 1 {
        format!("{:<4}", atom.name)
    } else {
        format!(" {:<3}", atom.name)
    }
}

fn write_pdb(st: &Structure, writer: &mut impl Write) -> Result<(), PdbError> {
    if st.cell.is_crystal() {
        let z = st.info.get("_cell.Z_PDB").map(String::as_str).unwrap_or("");
        writeln!(
            writer,
            "CRYST1{:>9.3}{:>9.3}{:>9.3}{:>7.2}{:>7.2}{:>7.2} {:<11}{:>4}",
            st.cell.a,
            st.cell.b,
            st.cell.c,
            st.cell.alpha,
            st.cell.beta,
            st.cell.gamma,
            st.space_group,
            z
        )?;
    }
    for (i, op) in st.ncs.iter().enumerate() {
        for row in 0..3 {
            writeln!(
                writer,
                "MTRIX{} {:>3}{:>10.6}{:>10.6}{:>10.6}     {:>10.5}{}",
                row + 1,
                i + 1,
                op.rot[(row, 0)],
                op.rot[(row, 1)],
                op.rot[(row, 2)],
                op.tran[row],
                if op.given { "    1" } else { "" }
            )?;
        }
    }

    let multi_model = st.models.len() > 1;
    let mut serial = 0i32;
    for model in &st.models {
        if multi_model {
            writeln!(writer, "MODEL {:>8}", model.name)?;
        }
        for chain in &model.chains {
            let mut last_polymer = None;
            for residue in &chain.residues {
                let record = if residue.is_standard() {
                    "ATOM"
                } else {
                    "HETATM"
                };
                for atom in &residue.atoms {
                    serial += 1;
                    let serial_field = hybrid36::encode(5, serial)
                        .ok_or_else(|| PdbError::MissingRecord("serial overflow".to_string()))?;
                    let seq_field = hybrid36::encode(4, residue.seq_id).ok_or_else(|| {
                        PdbError::MissingRecord("sequence id overflow".to_string())
                    })?;
                    let charge_field = if atom.charge == 0 {
                        "  ".to_string()
                    } else {
                        format!(
                            "{}{}",
                            atom.charge.abs(),
                            if atom.charge > 0 { '+' } else { '-' }
                        )
                    };
                    writeln!(
                        writer,
                        "{:<6}{} {}{}{:>3}{:>2}{}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}      {:<4}{:>2}{}",
                        record,
                        serial_field,
                        format_atom_name(atom),
                        atom.altloc,
                        residue.name,
                        chain.name,
                        seq_field,
                        residue.ins_code,
                        atom.pos.x,
                        atom.pos.y,
                        atom.pos.z,
                        atom.occ,
                        atom.b_iso,
                        residue.segment,
                        atom.element.symbol().to_ascii_uppercase(),
                        charge_field
                    )?;
                    if let Some(u) = &atom.aniso {
                        writeln!(
                            writer,
                            "ANISOU{} {}{}{:>3}{:>2}{}{} {:>7}{:>7}{:>7}{:>7}{:>7}{:>7}      {:>2}{}",
                            serial_field,
                            format_atom_name(atom),
                            atom.altloc,
                            residue.name,
                            chain.name,
                            seq_field,
                            residue.ins_code,
                            (u.u11 * 1e4).round() as i64,
                            (u.u22 * 1e4).round() as i64,
                            (u.u33 * 1e4).round() as i64,
                            (u.u12 * 1e4).round() as i64,
                            (u.u13 * 1e4).round() as i64,
                            (u.u23 * 1e4).round() as i64,
                            atom.element.symbol().to_ascii_uppercase(),
                            charge_field
                        )?;
                    }
                }
                if residue.is_standard() {
                    last_polymer = Some(residue);
                }
            }
            if let Some(residue) = last_polymer {
                serial += 1;
                let serial_field = hybrid36::encode(5, serial)
                    .ok_or_else(|| PdbError::MissingRecord("serial overflow".to_string()))?;
                let seq_field = hybrid36::encode(4, residue.seq_id)
                    .ok_or_else(|| PdbError::MissingRecord("sequence id overflow".to_string()))?;
                writeln!(
                    writer,
                    "TER   {}      {:>3}{:>2}{}{}",
                    serial_field, residue.name, chain.name, seq_field, residue.ins_code
                )?;
            }
        }
        if multi_model {
            writeln!(writer, "ENDMDL")?;
        }
    }
    writeln!(writer, "END")?;
    Ok(())
}
