use crate::core::io::cif::{Block, CellError, CifError, Document};
use crate::core::io::traits::StructureFile;
use crate::core::models::atom::{Anisou, Atom};
use crate::core::models::chain::Chain;
use crate::core::models::element::Element;
use crate::core::models::ncs::NcsOp;
use crate::core::models::residue::{Residue, UNKNOWN_ID};
use crate::core::models::structure::Structure;
use nalgebra::{Matrix3, Point3, Vector3};
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MmcifError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Syntax(#[from] CifError),
    #[error("Bad value for {tag} in row {row}: {source}")]
    Value {
        tag: String,
        row: usize,
        source: CellError,
    },
    #[error("Bad value for {tag} in row {row}: {message}")]
    Content {
        tag: String,
        row: usize,
        message: String,
    },
    #[error("Missing required category: {0}")]
    MissingCategory(String),
    #[error("mmCIF output is not supported")]
    WriterUnsupported,
}

fn value_err(prefix: &str, col: &str, row: usize, source: CellError) -> MmcifError {
    MmcifError::Value {
        tag: format!("{prefix}{col}"),
        row,
        source,
    }
}

pub struct MmcifFile;

impl StructureFile for MmcifFile {
    type Error = MmcifError;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let doc = Document::parse(&text)?;
        let block = doc
            .first_block()
            .ok_or_else(|| MmcifError::MissingCategory("data block".to_string()))?;
        structure_from_block(block)
    }

    fn write_to(_structure: &Structure, _writer: &mut impl Write) -> Result<(), Self::Error> {
        Err(MmcifError::WriterUnsupported)
    }
}

/// Scalar tags copied verbatim into the info map when present.
const INFO_TAGS: [&str; 7] = [
    "_entry.id",
    "_cell.Z_PDB",
    "_struct.title",
    "_exptl.method",
    "_database_PDB_rev.date_original",
    "_struct_keywords.pdbx_keywords",
    "_struct_keywords.text",
];

pub fn structure_from_block(block: &Block) -> Result<Structure, MmcifError> {
    let mut st = Structure::new();
    st.name = block
        .find_str("_entry.id")
        .unwrap_or(block.name.as_str())
        .to_string();
    for tag in INFO_TAGS {
        if let Some(v) = block.find_str(tag) {
            st.info.insert(tag.to_string(), v.to_string());
        }
    }
    read_cell(block, &mut st)?;
    if let Some(sg) = block.find_str("_symmetry.space_group_name_H-M") {
        st.space_group = sg.to_string();
    }
    read_ncs_oper(block, &mut st)?;
    let sites = read_atom_sites(block, &mut st)?;
    read_aniso(block, &mut st, &sites)?;
    Ok(st)
}

fn read_cell(block: &Block, st: &mut Structure) -> Result<(), MmcifError> {
    const PREFIX: &str = "_cell.";
    const COLS: [&str; 6] = [
        "length_a",
        "length_b",
        "length_c",
        "angle_alpha",
        "angle_beta",
        "angle_gamma",
    ];
    // absent cell category leaves the degenerate default in place
    let Some(table) = block.find_table(PREFIX, &COLS) else {
        return Ok(());
    };
    let row = table.row(0);
    let mut v = [0.0, 0.0, 0.0, 90.0, 90.0, 90.0];
    for (i, slot) in v.iter_mut().enumerate() {
        *slot = row
            .f64_or(i, *slot)
            .map_err(|e| value_err(PREFIX, COLS[i], 0, e))?;
    }
    st.cell.set(v[0], v[1], v[2], v[3], v[4], v[5]);
    Ok(())
}

fn read_ncs_oper(block: &Block, st: &mut Structure) -> Result<(), MmcifError> {
    const PREFIX: &str = "_struct_ncs_oper.";
    const COLS: [&str; 14] = [
        "id",
        "code",
        "matrix[1][1]",
        "matrix[1][2]",
        "matrix[1][3]",
        "matrix[2][1]",
        "matrix[2][2]",
        "matrix[2][3]",
        "matrix[3][1]",
        "matrix[3][2]",
        "matrix[3][3]",
        "vector[1]",
        "vector[2]",
        "vector[3]",
    ];
    let Some(table) = block.find_table(PREFIX, &COLS) else {
        return Ok(());
    };
    for (ri, row) in table.rows().enumerate() {
        let id = match row.str(0) {
            Some(s) => s.to_string(),
            None => (ri + 1).to_string(),
        };
        let given = row.str(1).is_some_and(|c| c.eq_ignore_ascii_case("given"));
        let mut m = [0.0f64; 9];
        for (k, slot) in m.iter_mut().enumerate() {
            *slot = row
                .f64(2 + k)
                .map_err(|e| value_err(PREFIX, COLS[2 + k], ri, e))?;
        }
        let mut t = [0.0f64; 3];
        for (k, slot) in t.iter_mut().enumerate() {
            *slot = row
                .f64(11 + k)
                .map_err(|e| value_err(PREFIX, COLS[11 + k], ri, e))?;
        }
        let rot = Matrix3::new(m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], m[8]);
        st.ncs.push(NcsOp::new(&id, given, rot, Vector3::new(t[0], t[1], t[2])));
    }
    Ok(())
}

const SITE_PREFIX: &str = "_atom_site.";
const SITE_COLS: [&str; 17] = [
    "id",
    "type_symbol",
    "label_atom_id",
    "label_alt_id",
    "label_comp_id",
    "label_asym_id",
    "auth_asym_id",
    "label_seq_id",
    "auth_seq_id",
    "pdbx_PDB_ins_code",
    "Cartn_x",
    "Cartn_y",
    "Cartn_z",
    "occupancy",
    "B_iso_or_equiv",
    "pdbx_formal_charge",
    "pdbx_PDB_model_num",
];
const S_ID: usize = 0;
const S_SYMBOL: usize = 1;
const S_ATOM: usize = 2;
const S_ALT: usize = 3;
const S_COMP: usize = 4;
const S_ASYM: usize = 5;
const S_AUTH_ASYM: usize = 6;
const S_SEQ: usize = 7;
const S_AUTH_SEQ: usize = 8;
const S_INS: usize = 9;
const S_X: usize = 10;
const S_Y: usize = 11;
const S_Z: usize = 12;
const S_OCC: usize = 13;
const S_B: usize = 14;
const S_CHARGE: usize = 15;
const S_MODEL: usize = 16;

/// Location of one atom in the ownership tree, paired with its site id
/// for anisotropic-parameter matching.
type SiteIndex = Vec<(String, [usize; 4])>;

fn read_atom_sites(block: &Block, st: &mut Structure) -> Result<SiteIndex, MmcifError> {
    let table = block
        .find_table(SITE_PREFIX, &SITE_COLS)
        .ok_or_else(|| MmcifError::MissingCategory("_atom_site".to_string()))?;
    let mut sites = SiteIndex::with_capacity(table.len());
    // cursor into the tree being built; rows extend the current
    // model/chain/residue until a key field changes
    let mut mi: Option<usize> = None;
    let mut ci: Option<usize> = None;
    let mut ri: Option<usize> = None;

    for (row_idx, row) in table.rows().enumerate() {
        let model_name = row.str(S_MODEL).unwrap_or("1");
        let model_changed = match mi {
            Some(m) => st.models[m].name != model_name,
            None => true,
        };
        if model_changed {
            let m = match st.models.iter().position(|m| m.name == model_name) {
                Some(m) => m,
                None => {
                    st.models
                        .push(crate::core::models::model::Model::new(model_name));
                    st.models.len() - 1
                }
            };
            mi = Some(m);
            ci = None;
            ri = None;
        }
        let m = mi.unwrap_or(0);

        let chain_name = row.str(S_ASYM).ok_or_else(|| MmcifError::Content {
            tag: format!("{SITE_PREFIX}label_asym_id"),
            row: row_idx,
            message: "missing chain id".to_string(),
        })?;
        let chain_changed = match ci {
            Some(c) => st.models[m].chains[c].name != chain_name,
            None => true,
        };
        if chain_changed {
            let chains = &mut st.models[m].chains;
            let c = match chains.iter().position(|c| c.name == chain_name) {
                Some(c) => c,
                None => {
                    chains.push(Chain::new(chain_name));
                    chains.len() - 1
                }
            };
            ci = Some(c);
            ri = None;
        }
        let c = ci.unwrap_or(0);
        if let Some(auth) = row.str(S_AUTH_ASYM) {
            st.models[m].chains[c].auth_name = auth.to_string();
        }

        let seq_id = match row.str(S_SEQ) {
            Some(s) => s
                .parse()
                .map_err(|_| value_err(SITE_PREFIX, "label_seq_id", row_idx, CellError {
                    value: s.to_string(),
                }))?,
            None => UNKNOWN_ID,
        };
        let auth_seq_id = match row.str(S_AUTH_SEQ) {
            Some(s) => s
                .parse()
                .map_err(|_| value_err(SITE_PREFIX, "auth_seq_id", row_idx, CellError {
                    value: s.to_string(),
                }))?,
            None => seq_id,
        };
        let comp = row.str(S_COMP).ok_or_else(|| MmcifError::Content {
            tag: format!("{SITE_PREFIX}label_comp_id"),
            row: row_idx,
            message: "missing residue name".to_string(),
        })?;
        let ins_code = match row.str(S_INS) {
            None => ' ',
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => ch,
                    _ => {
                        return Err(MmcifError::Content {
                            tag: format!("{SITE_PREFIX}pdbx_PDB_ins_code"),
                            row: row_idx,
                            message: format!("insertion code '{s}' is not one character"),
                        });
                    }
                }
            }
        };

        let residues = &mut st.models[m].chains[c].residues;
        let residue_changed = match ri {
            Some(r) => !residues[r].matches(seq_id, auth_seq_id, comp),
            None => true,
        };
        if residue_changed {
            let r = match residues
                .iter()
                .position(|r| r.matches(seq_id, auth_seq_id, comp))
            {
                Some(r) => r,
                None => {
                    residues.push(Residue::new(seq_id, auth_seq_id, comp));
                    residues.len() - 1
                }
            };
            ri = Some(r);
        }
        let r = ri.unwrap_or(0);
        let residue = &mut st.models[m].chains[c].residues[r];
        residue.ins_code = ins_code;

        let name = row.str(S_ATOM).ok_or_else(|| MmcifError::Content {
            tag: format!("{SITE_PREFIX}label_atom_id"),
            row: row_idx,
            message: "missing atom name".to_string(),
        })?;
        let element = match row.str(S_SYMBOL) {
            Some(sym) => Element::new(sym),
            None => element_from_name(name),
        };
        let x = row
            .f64(S_X)
            .map_err(|e| value_err(SITE_PREFIX, "Cartn_x", row_idx, e))?;
        let y = row
            .f64(S_Y)
            .map_err(|e| value_err(SITE_PREFIX, "Cartn_y", row_idx, e))?;
        let z = row
            .f64(S_Z)
            .map_err(|e| value_err(SITE_PREFIX, "Cartn_z", row_idx, e))?;
        let mut atom = Atom::new(name, element, Point3::new(x, y, z));
        atom.altloc = row
            .str(S_ALT)
            .and_then(|s| s.chars().next())
            .unwrap_or(' ');
        atom.occ = row
            .f64_or(S_OCC, 1.0)
            .map_err(|e| value_err(SITE_PREFIX, "occupancy", row_idx, e))?;
        atom.b_iso = row
            .f64_or(S_B, 50.0)
            .map_err(|e| value_err(SITE_PREFIX, "B_iso_or_equiv", row_idx, e))?;
        atom.charge = row
            .i32_or(S_CHARGE, 0)
            .map_err(|e| value_err(SITE_PREFIX, "pdbx_formal_charge", row_idx, e))?;
        residue.atoms.push(atom);

        let id = row.str(S_ID).unwrap_or("").to_string();
        sites.push((id, [m, c, r, residue.atoms.len() - 1]));
    }
    Ok(sites)
}

fn element_from_name(name: &str) -> Element {
    match name.chars().find(|c| c.is_ascii_alphabetic()) {
        Some(c) => Element::new(&c.to_string()),
        None => Element::new(""),
    }
}

fn read_aniso(block: &Block, st: &mut Structure, sites: &SiteIndex) -> Result<(), MmcifError> {
    const PREFIX: &str = "_atom_site_anisotrop.";
    const COLS: [&str; 7] = [
        "id", "U[1][1]", "U[2][2]", "U[3][3]", "U[1][2]", "U[1][3]", "U[2][3]",
    ];
    let Some(table) = block.find_table(PREFIX, &COLS) else {
        return Ok(());
    };
    // the anisotrop loop is normally co-sorted with atom_site, so a
    // moving pointer matches each row in O(1); out-of-order files fall
    // back to a scan
    let mut next = 0usize;
    for (ri, row) in table.rows().enumerate() {
        let id = row.str(0).ok_or_else(|| MmcifError::Content {
            tag: format!("{PREFIX}id"),
            row: ri,
            message: "missing id".to_string(),
        })?;
        let loc = if sites.get(next).is_some_and(|(sid, _)| sid == id) {
            let loc = sites[next].1;
            next += 1;
            loc
        } else {
            match sites.iter().position(|(sid, _)| sid == id) {
                Some(i) => {
                    next = i + 1;
                    sites[i].1
                }
                None => {
                    return Err(MmcifError::Content {
                        tag: format!("{PREFIX}id"),
                        row: ri,
                        message: format!("no atom_site with id '{id}'"),
                    });
                }
            }
        };
        let mut u = [0.0f64; 6];
        for (k, slot) in u.iter_mut().enumerate() {
            *slot = row
                .f64(1 + k)
                .map_err(|e| value_err(PREFIX, COLS[1 + k], ri, e))?;
        }
        let [m, c, r, a] = loc;
        st.models[m].chains[c].residues[r].atoms[a].aniso = Some(Anisou {
            u11: u[0],
            u22: u[1],
            u33: u[2],
            u12: u[3],
            u13: u[4],
            u23: u[5],
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Structure {
        let mut reader = std::io::Cursor::new(text);
        MmcifFile::read_from(&mut reader).expect("parse failed")
    }

    fn parse_err_of(text: &str) -> MmcifError {
        let mut reader = std::io::Cursor::new(text);
        MmcifFile::read_from(&mut reader).expect_err("parse unexpectedly succeeded")
    }

    const SITE_HEADER: &str = "\
loop_
_atom_site.id
_atom_site.type_symbol
_atom_site.label_atom_id
_atom_site.label_alt_id
_atom_site.label_comp_id
_atom_site.label_asym_id
_atom_site.auth_asym_id
_atom_site.label_seq_id
_atom_site.auth_seq_id
_atom_site.pdbx_PDB_ins_code
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
_atom_site.occupancy
_atom_site.B_iso_or_equiv
_atom_site.pdbx_formal_charge
_atom_site.pdbx_PDB_model_num
";

    #[test]
    fn atom_site_rows_build_the_tree() {
        let text = format!(
            "data_1ABC\n_entry.id 1ABC\n{SITE_HEADER}\
1 N N . ALA A AA 1 1 ? 11.104 6.134 -6.504 1.00 12.3 ? 1
2 C CA . ALA A AA 1 1 ? 11.639 6.071 -5.147 1.00 13.0 ? 1
3 N N . GLY A AA 2 2 ? 12.953 4.106 -4.894 1.00 14.1 ? 1
"
        );
        let st = parse(&text);
        assert_eq!(st.name, "1ABC");
        assert_eq!(st.models.len(), 1);
        let chain = &st.first_model().unwrap().chains[0];
        assert_eq!(chain.name, "A");
        assert_eq!(chain.auth_name, "AA");
        assert_eq!(chain.residues.len(), 2);
        assert_eq!(chain.residues[0].atoms.len(), 2);
        assert_eq!(chain.residues[0].atoms[1].name, "CA");
        assert_eq!(chain.residues[1].seq_id, 2);
    }

    #[test]
    fn null_label_seq_id_uses_unknown_sentinel_and_auth_fallback() {
        let text = format!(
            "data_w\n{SITE_HEADER}\
1 O O . HOH W W . 301 ? 1.0 2.0 3.0 1.00 20.0 ? 1
2 O O . HOH W W . 302 ? 2.0 3.0 4.0 1.00 20.0 ? 1
"
        );
        let st = parse(&text);
        let chain = &st.first_model().unwrap().chains[0];
        assert_eq!(chain.residues.len(), 2, "auth_seq_id separates waters");
        assert_eq!(chain.residues[0].seq_id, UNKNOWN_ID);
        assert_eq!(chain.residues[0].auth_seq_id, 301);
    }

    #[test]
    fn occupancy_b_factor_and_charge_defaults() {
        let text = format!(
            "data_d\n{SITE_HEADER}\
1 C CA . ALA A A 1 1 ? 1.0 2.0 3.0 ? ? ? 1
"
        );
        let st = parse(&text);
        let atom = &st.first_model().unwrap().chains[0].residues[0].atoms[0];
        assert_eq!(atom.occ, 1.0);
        assert_eq!(atom.b_iso, 50.0);
        assert_eq!(atom.charge, 0);
    }

    #[test]
    fn long_insertion_code_is_a_content_error() {
        let text = format!(
            "data_d\n{SITE_HEADER}\
1 C CA . ALA A A 1 1 AB 1.0 2.0 3.0 1.0 1.0 ? 1
"
        );
        match parse_err_of(&text) {
            MmcifError::Content { tag, row, .. } => {
                assert_eq!(tag, "_atom_site.pdbx_PDB_ins_code");
                assert_eq!(row, 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_coordinate_names_tag_and_row() {
        let text = format!(
            "data_d\n{SITE_HEADER}\
1 C CA . ALA A A 1 1 ? 1.0 2.0 3.0 1.0 1.0 ? 1
2 C CB . ALA A A 1 1 ? 1.0 oops 3.0 1.0 1.0 ? 1
"
        );
        match parse_err_of(&text) {
            MmcifError::Value { tag, row, .. } => {
                assert_eq!(tag, "_atom_site.Cartn_y");
                assert_eq!(row, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn model_numbers_split_models() {
        let text = format!(
            "data_d\n{SITE_HEADER}\
1 C CA . ALA A A 1 1 ? 1.0 2.0 3.0 1.0 1.0 ? 1
2 C CA . ALA A A 1 1 ? 1.5 2.0 3.0 1.0 1.0 ? 2
"
        );
        let st = parse(&text);
        assert_eq!(st.models.len(), 2);
        assert_eq!(st.models[0].name, "1");
        assert_eq!(st.models[1].name, "2");
    }

    #[test]
    fn missing_atom_site_category_is_an_error() {
        assert!(matches!(
            parse_err_of("data_empty\n_entry.id empty\n"),
            MmcifError::MissingCategory(_)
        ));
    }

    #[test]
    fn cell_symmetry_and_info_tags() {
        let text = format!(
            "data_d\n\
_cell.length_a 61.95(2)\n\
_cell.length_b 61.95\n\
_cell.length_c 150.49\n\
_cell.angle_alpha 90.0\n\
_cell.angle_beta 90.0\n\
_cell.angle_gamma 90.0\n\
_symmetry.space_group_name_H-M 'P 43 21 2'\n\
_struct.title 'A TEST STRUCTURE'\n\
_exptl.method 'X-RAY DIFFRACTION'\n\
{SITE_HEADER}\
1 C CA . ALA A A 1 1 ? 1.0 2.0 3.0 1.0 1.0 ? 1
"
        );
        let st = parse(&text);
        assert!(st.cell.is_crystal());
        assert_eq!(st.cell.a, 61.95);
        assert_eq!(st.space_group, "P 43 21 2");
        assert_eq!(
            st.info.get("_struct.title").map(String::as_str),
            Some("A TEST STRUCTURE")
        );
    }

    #[test]
    fn ncs_operators_with_given_code() {
        let text = format!(
            "data_d\n\
loop_
_struct_ncs_oper.id
_struct_ncs_oper.code
_struct_ncs_oper.matrix[1][1]
_struct_ncs_oper.matrix[1][2]
_struct_ncs_oper.matrix[1][3]
_struct_ncs_oper.matrix[2][1]
_struct_ncs_oper.matrix[2][2]
_struct_ncs_oper.matrix[2][3]
_struct_ncs_oper.matrix[3][1]
_struct_ncs_oper.matrix[3][2]
_struct_ncs_oper.matrix[3][3]
_struct_ncs_oper.vector[1]
_struct_ncs_oper.vector[2]
_struct_ncs_oper.vector[3]
1 given 1.0 0.0 0.0 0.0 1.0 0.0 0.0 0.0 1.0 0.0 0.0 0.0
2 generate -1.0 0.0 0.0 0.0 1.0 0.0 0.0 0.0 -1.0 0.0 10.0 0.0
{SITE_HEADER}\
1 C CA . ALA A A 1 1 ? 1.0 2.0 3.0 1.0 1.0 ? 1
"
        );
        let st = parse(&text);
        assert_eq!(st.ncs.len(), 2);
        assert!(st.ncs[0].given);
        assert!(!st.ncs[1].given);
        assert_eq!(st.ncs[1].id, "2");
        assert_eq!(st.ncs[1].rot[(0, 0)], -1.0);
        assert_eq!(st.ncs[1].tran.y, 10.0);
    }

    #[test]
    fn aniso_matches_in_order_and_out_of_order() {
        let aniso = "\
loop_
_atom_site_anisotrop.id
_atom_site_anisotrop.U[1][1]
_atom_site_anisotrop.U[2][2]
_atom_site_anisotrop.U[3][3]
_atom_site_anisotrop.U[1][2]
_atom_site_anisotrop.U[1][3]
_atom_site_anisotrop.U[2][3]
";
        let sites = format!(
            "{SITE_HEADER}\
1 N N . ALA A A 1 1 ? 1.0 2.0 3.0 1.0 1.0 ? 1
2 C CA . ALA A A 1 1 ? 1.5 2.0 3.0 1.0 1.0 ? 1
"
        );
        let in_order = format!(
            "data_d\n{sites}{aniso}\
1 0.01 0.02 0.03 0.0 0.0 0.0
2 0.04 0.05 0.06 0.0 0.0 0.0
"
        );
        let reversed = format!(
            "data_d\n{sites}{aniso}\
2 0.04 0.05 0.06 0.0 0.0 0.0
1 0.01 0.02 0.03 0.0 0.0 0.0
"
        );
        for text in [in_order, reversed] {
            let st = parse(&text);
            let atoms = &st.first_model().unwrap().chains[0].residues[0].atoms;
            assert_eq!(atoms[0].aniso.map(|u| u.u11), Some(0.01));
            assert_eq!(atoms[1].aniso.map(|u| u.u33), Some(0.06));
        }
    }

    #[test]
    fn aniso_with_unknown_id_is_an_error() {
        let text = format!(
            "data_d\n{SITE_HEADER}\
1 C CA . ALA A A 1 1 ? 1.0 2.0 3.0 1.0 1.0 ? 1
loop_
_atom_site_anisotrop.id
_atom_site_anisotrop.U[1][1]
_atom_site_anisotrop.U[2][2]
_atom_site_anisotrop.U[3][3]
_atom_site_anisotrop.U[1][2]
_atom_site_anisotrop.U[1][3]
_atom_site_anisotrop.U[2][3]
9 0.01 0.02 0.03 0.0 0.0 0.0
"
        );
        assert!(matches!(parse_err_of(&text), MmcifError::Content { .. }));
    }

    #[test]
    fn writing_mmcif_is_unsupported() {
        let st = Structure::new();
        let mut out = Vec::new();
        assert!(matches!(
            MmcifFile::write_to(&st, &mut out),
            Err(MmcifError::WriterUnsupported)
        ));
    }
}
