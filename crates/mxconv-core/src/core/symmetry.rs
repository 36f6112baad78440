//! Integer-coded crystallographic symmetry operators.
//!
//! Space-group operators are exact: the rotation part holds only -1/0/1
//! entries and translations are multiples of small fractions, so they are
//! stored as integers (translations in 24ths) rather than floats.

use thiserror::Error;

/// Denominator of the integer-coded translation part.
pub const DEN: i32 = 24;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TripletError {
    #[error("triplet must have 3 comma-separated parts: '{0}'")]
    WrongPartCount(String),
    #[error("unexpected character '{0}' in triplet part '{1}'")]
    UnexpectedChar(char, String),
    #[error("translation {num}/{den} is not a multiple of 1/24")]
    BadFraction { num: i32, den: i32 },
}

/// A symmetry operation in integer form: `rot` entries are -1/0/1, `tran`
/// entries are in units of 1/24.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Op {
    pub rot: [[i32; 3]; 3],
    pub tran: [i32; 3],
}

impl Op {
    pub fn identity() -> Self {
        Op {
            rot: [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
            tran: [0, 0, 0],
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Op::identity()
    }

    /// Parses a coordinate triplet such as `"X,Y,Z"` or `"-y,x-y,z+1/3"`.
    ///
    /// Each part is a sum of terms; a term is an optionally signed axis
    /// letter (x/y/z, case-insensitive), an integer, or a fraction `n/d`.
    pub fn from_triplet(triplet: &str) -> Result<Self, TripletError> {
        let parts: Vec<&str> = triplet.split(',').collect();
        if parts.len() != 3 {
            return Err(TripletError::WrongPartCount(triplet.to_string()));
        }
        let mut op = Op {
            rot: [[0; 3]; 3],
            tran: [0; 3],
        };
        for (i, part) in parts.iter().enumerate() {
            let (row, tr) = parse_triplet_part(part)?;
            op.rot[i] = row;
            op.tran[i] = tr;
        }
        Ok(op)
    }
}

/// Parses one part of a triplet into a rotation row and a translation in
/// 24ths.
fn parse_triplet_part(part: &str) -> Result<([i32; 3], i32), TripletError> {
    let mut row = [0i32; 3];
    let mut tran = 0i32;
    let mut sign = 1i32;
    let mut chars = part.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' => continue,
            '+' => sign = 1,
            '-' => sign = -1,
            'x' | 'X' => {
                row[0] += sign;
                sign = 1;
            }
            'y' | 'Y' => {
                row[1] += sign;
                sign = 1;
            }
            'z' | 'Z' => {
                row[2] += sign;
                sign = 1;
            }
            '0'..='9' => {
                let mut num = (c as u8 - b'0') as i32;
                while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                    num = num * 10 + d as i32;
                    chars.next();
                }
                let mut den = 1;
                if chars.peek() == Some(&'/') {
                    chars.next();
                    den = 0;
                    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                        den = den * 10 + d as i32;
                        chars.next();
                    }
                }
                if den == 0 || (num * DEN) % den != 0 {
                    return Err(TripletError::BadFraction { num, den });
                }
                tran += sign * num * DEN / den;
                sign = 1;
            }
            other => {
                return Err(TripletError::UnexpectedChar(other, part.to_string()));
            }
        }
    }
    Ok((row, tran))
}
