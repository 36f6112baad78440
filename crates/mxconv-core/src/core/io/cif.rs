//! CIF 1.1 syntax layer: tokenizer and document model.
//!
//! This layer knows nothing about crystallography. It turns CIF text into
//! data blocks holding tag/value pairs and loops, and exposes a uniform
//! table view over both so that category consumers never care whether a
//! category was written as a loop or as individual pairs.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CifError {
    #[error("CIF syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },
}

fn syntax(line: usize, message: impl Into<String>) -> CifError {
    CifError::Syntax {
        line,
        message: message.into(),
    }
}

/// A CIF data value. The two null forms are distinct tokens in the syntax
/// and are preserved as such; quoted `'.'` and `'?'` are ordinary strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    /// The `.` token: value inapplicable.
    Inapplicable,
    /// The `?` token: value unknown.
    Unknown,
}

impl Value {
    /// The string content, or `None` for either null form.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Inapplicable | Value::Unknown => None,
        }
    }

    pub fn is_null(&self) -> bool {
        !matches!(self, Value::Text(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Inapplicable => f.write_str("."),
            Value::Unknown => f.write_str("?"),
        }
    }
}

/// Parses a CIF number, tolerating the `12.5(3)` standard-uncertainty
/// suffix.
pub fn parse_number(s: &str) -> Option<f64> {
    let bare = match s.find('(') {
        Some(i) if s.ends_with(')') => &s[..i],
        _ => s,
    };
    bare.parse().ok()
}

#[derive(Debug, Default)]
pub struct Loop {
    pub tags: Vec<String>,
    /// Cell values in row-major order; length is a multiple of `tags.len()`.
    pub values: Vec<Value>,
}

impl Loop {
    pub fn width(&self) -> usize {
        self.tags.len()
    }

    pub fn len(&self) -> usize {
        if self.tags.is_empty() {
            0
        } else {
            self.values.len() / self.tags.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn tag_index(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| t == tag)
    }
}

#[derive(Debug, Default)]
pub struct Block {
    pub name: String,
    pub pairs: Vec<(String, Value)>,
    pub loops: Vec<Loop>,
}

impl Block {
    /// Looks up a scalar value: a tag/value pair, or a cell of a
    /// single-row loop.
    pub fn find_value(&self, tag: &str) -> Option<&Value> {
        if let Some((_, v)) = self.pairs.iter().find(|(t, _)| t == tag) {
            return Some(v);
        }
        self.loops.iter().find_map(|lp| {
            let i = lp.tag_index(tag)?;
            if lp.len() == 1 { lp.values.get(i) } else { None }
        })
    }

    /// Non-null scalar string for a tag.
    pub fn find_str(&self, tag: &str) -> Option<&str> {
        self.find_value(tag)?.as_str()
    }

    /// Locates the category `prefix` (e.g. `"_cell."`) and presents the
    /// requested columns as a table, whether the file wrote the category
    /// as a loop or as individual tag/value pairs. Returns `None` when no
    /// requested column exists in the block.
    pub fn find_table<'a>(&'a self, prefix: &str, columns: &[&str]) -> Option<Table<'a>> {
        let full: Vec<String> = columns.iter().map(|c| format!("{prefix}{c}")).collect();
        for (li, lp) in self.loops.iter().enumerate() {
            let cols: Vec<Option<usize>> = full.iter().map(|t| lp.tag_index(t)).collect();
            if cols.iter().any(Option::is_some) {
                return Some(Table {
                    block: self,
                    source: TableSource::Loop { index: li, cols },
                });
            }
        }
        let cells: Vec<Option<&Value>> = full.iter().map(|t| self.find_value(t)).collect();
        if cells.iter().any(Option::is_some) {
            return Some(Table {
                block: self,
                source: TableSource::Pairs { cells },
            });
        }
        None
    }
}

enum TableSource<'a> {
    Loop {
        index: usize,
        cols: Vec<Option<usize>>,
    },
    Pairs {
        cells: Vec<Option<&'a Value>>,
    },
}

/// A view of one category's columns, uniform over loops and pair groups.
pub struct Table<'a> {
    block: &'a Block,
    source: TableSource<'a>,
}

impl<'a> Table<'a> {
    pub fn len(&self) -> usize {
        match &self.source {
            TableSource::Loop { index, .. } => self.block.loops[*index].len(),
            TableSource::Pairs { .. } => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the requested column was present at all.
    pub fn has_column(&self, col: usize) -> bool {
        match &self.source {
            TableSource::Loop { cols, .. } => cols.get(col).is_some_and(Option::is_some),
            TableSource::Pairs { cells } => cells.get(col).is_some_and(Option::is_some),
        }
    }

    pub fn row(&self, row: usize) -> Row<'a, '_> {
        Row { table: self, row }
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'a, '_>> {
        (0..self.len()).map(|i| self.row(i))
    }

    fn cell(&self, row: usize, col: usize) -> Option<&'a Value> {
        match &self.source {
            TableSource::Loop { index, cols } => {
                let lp = &self.block.loops[*index];
                let ci = (*cols.get(col)?)?;
                lp.values.get(row * lp.width() + ci)
            }
            TableSource::Pairs { cells } => {
                if row == 0 {
                    *cells.get(col)?
                } else {
                    None
                }
            }
        }
    }
}

/// Raised by typed cell accessors when a present, non-null cell fails to
/// parse; the caller supplies tag and row context.
#[derive(Debug, Error)]
#[error("cannot parse '{value}'")]
pub struct CellError {
    pub value: String,
}

pub struct Row<'a, 't> {
    table: &'t Table<'a>,
    row: usize,
}

impl<'a> Row<'a, '_> {
    pub fn value(&self, col: usize) -> Option<&'a Value> {
        self.table.cell(self.row, col)
    }

    /// Non-null string content of a cell; `None` when the column is
    /// absent or the cell is a null form.
    pub fn str(&self, col: usize) -> Option<&'a str> {
        self.value(col)?.as_str()
    }

    pub fn is_null(&self, col: usize) -> bool {
        self.value(col).is_none_or(Value::is_null)
    }

    /// Float value with a default for absent or null cells.
    pub fn f64_or(&self, col: usize, default: f64) -> Result<f64, CellError> {
        match self.str(col) {
            None => Ok(default),
            Some(s) => parse_number(s).ok_or_else(|| CellError {
                value: s.to_string(),
            }),
        }
    }

    /// Required float value; absent and null cells are errors too.
    pub fn f64(&self, col: usize) -> Result<f64, CellError> {
        let s = self.str(col).ok_or_else(|| CellError {
            value: self.value(col).map(Value::to_string).unwrap_or_default(),
        })?;
        parse_number(s).ok_or_else(|| CellError {
            value: s.to_string(),
        })
    }

    /// Integer value with a default for absent or null cells.
    pub fn i32_or(&self, col: usize, default: i32) -> Result<i32, CellError> {
        match self.str(col) {
            None => Ok(default),
            Some(s) => s.parse().map_err(|_| CellError {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn parse(text: &str) -> Result<Document, CifError> {
        Parser::new(text).run()
    }

    pub fn first_block(&self) -> Option<&Block> {
        self.blocks.first()
    }
}

#[derive(Debug)]
enum Token {
    DataHeader(String),
    Loop,
    Tag(String),
    Value(Value),
}

struct Parser<'a> {
    text: &'a str,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text }
    }

    fn run(self) -> Result<Document, CifError> {
        let tokens = tokenize(self.text)?;
        let mut doc = Document::default();
        let mut it = tokens.into_iter().peekable();
        while let Some((line, token)) = it.next() {
            match token {
                Token::DataHeader(name) => doc.blocks.push(Block {
                    name,
                    ..Block::default()
                }),
                Token::Loop => {
                    let block = doc
                        .blocks
                        .last_mut()
                        .ok_or_else(|| syntax(line, "loop_ before any data block"))?;
                    let mut lp = Loop::default();
                    while let Some((_, Token::Tag(_))) = it.peek() {
                        if let Some((_, Token::Tag(tag))) = it.next() {
                            lp.tags.push(tag);
                        }
                    }
                    if lp.tags.is_empty() {
                        return Err(syntax(line, "loop_ without tags"));
                    }
                    while let Some((_, Token::Value(_))) = it.peek() {
                        if let Some((_, Token::Value(v))) = it.next() {
                            lp.values.push(v);
                        }
                    }
                    if lp.values.is_empty() || lp.values.len() % lp.tags.len() != 0 {
                        return Err(syntax(
                            line,
                            format!(
                                "loop_ with {} values for {} tags",
                                lp.values.len(),
                                lp.tags.len()
                            ),
                        ));
                    }
                    block.loops.push(lp);
                }
                Token::Tag(tag) => {
                    let block = doc
                        .blocks
                        .last_mut()
                        .ok_or_else(|| syntax(line, format!("tag {tag} before any data block")))?;
                    match it.next() {
                        Some((_, Token::Value(v))) => block.pairs.push((tag, v)),
                        _ => return Err(syntax(line, format!("tag {tag} has no value"))),
                    }
                }
                Token::Value(v) => {
                    return Err(syntax(line, format!("unexpected value '{v}'")));
                }
            }
        }
        Ok(doc)
    }
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, CifError> {
    let mut tokens = Vec::new();
    let mut lines = text.lines().enumerate().peekable();
    while let Some((idx, line)) = lines.next() {
        let line_num = idx + 1;
        // A semicolon in column 1 opens a text field running to the next
        // line whose column 1 is a semicolon.
        if let Some(first) = line.strip_prefix(';') {
            let mut field = String::from(first);
            let mut closed = false;
            for (_, more) in lines.by_ref() {
                if more.starts_with(';') {
                    closed = true;
                    break;
                }
                if !field.is_empty() {
                    field.push('\n');
                }
                field.push_str(more);
            }
            if !closed {
                return Err(syntax(line_num, "unterminated text field"));
            }
            tokens.push((line_num, Token::Value(Value::Text(field))));
            continue;
        }
        tokenize_line(line, line_num, &mut tokens)?;
    }
    Ok(tokens)
}

fn tokenize_line(
    line: &str,
    line_num: usize,
    tokens: &mut Vec<(usize, Token)>,
) -> Result<(), CifError> {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if b == b'#' {
            break;
        }
        if b == b'\'' || b == b'"' {
            // A closing quote counts only when followed by whitespace.
            let mut j = i + 1;
            let end = loop {
                if j >= bytes.len() {
                    return Err(syntax(line_num, "unterminated quoted string"));
                }
                if bytes[j] == b
                    && bytes
                        .get(j + 1)
                        .is_none_or(|next| next.is_ascii_whitespace())
                {
                    break j;
                }
                j += 1;
            };
            tokens.push((
                line_num,
                Token::Value(Value::Text(line[i + 1..end].to_string())),
            ));
            i = end + 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let word = &line[start..i];
        let token = if let Some(rest) = word.strip_prefix('_') {
            if rest.is_empty() {
                return Err(syntax(line_num, "empty tag"));
            }
            Token::Tag(word.to_string())
        } else if word.eq_ignore_ascii_case("loop_") {
            Token::Loop
        } else if word.len() >= 5 && word[..5].eq_ignore_ascii_case("data_") {
            Token::DataHeader(word[5..].to_string())
        } else if word.len() >= 5 && word[..5].eq_ignore_ascii_case("save_")
            || word.eq_ignore_ascii_case("global_")
            || word.eq_ignore_ascii_case("stop_")
        {
            return Err(syntax(line_num, format!("unsupported keyword '{word}'")));
        } else if word == "." {
            Token::Value(Value::Inapplicable)
        } else if word == "?" {
            Token::Value(Value::Unknown)
        } else {
            Token::Value(Value::Text(word.to_string()))
        };
        tokens.push((line_num, token));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_and_loop_parse_into_one_block() {
        let doc = Document::parse(
            "data_test\n_cell.length_a 61.95\nloop_\n_x.id\n_x.name\n1 alpha\n2 beta\n",
        )
        .unwrap();
        let block = doc.first_block().unwrap();
        assert_eq!(block.name, "test");
        assert_eq!(block.find_str("_cell.length_a"), Some("61.95"));
        assert_eq!(block.loops.len(), 1);
        assert_eq!(block.loops[0].len(), 2);
    }

    #[test]
    fn quoting_forms_and_comments() {
        let doc = Document::parse(concat!(
            "data_q # trailing comment\n",
            "_a 'two words'\n",
            "_b \"don't\"\n",
            "_c 'it''s fine' # no: quote ends only before whitespace\n",
        ))
        .unwrap();
        let block = doc.first_block().unwrap();
        assert_eq!(block.find_str("_a"), Some("two words"));
        assert_eq!(block.find_str("_b"), Some("don't"));
        assert_eq!(block.find_str("_c"), Some("it''s fine"));
    }

    #[test]
    fn semicolon_text_field_spans_lines() {
        let doc = Document::parse("data_t\n_title\n;first line\nsecond line\n;\n").unwrap();
        let block = doc.first_block().unwrap();
        assert_eq!(block.find_str("_title"), Some("first line\nsecond line"));
    }

    #[test]
    fn null_forms_are_distinct_from_quoted_dot() {
        let doc = Document::parse("data_t\n_a .\n_b ?\n_c '.'\n").unwrap();
        let block = doc.first_block().unwrap();
        assert_eq!(block.find_value("_a"), Some(&Value::Inapplicable));
        assert_eq!(block.find_value("_b"), Some(&Value::Unknown));
        assert_eq!(block.find_str("_c"), Some("."));
    }

    #[test]
    fn ragged_loop_is_a_syntax_error() {
        let err = Document::parse("data_t\nloop_\n_a\n_b\n1 2 3\n").unwrap_err();
        assert!(matches!(err, CifError::Syntax { line: 2, .. }));
    }

    #[test]
    fn tag_without_value_is_a_syntax_error() {
        assert!(Document::parse("data_t\n_a\n_b 1\n").is_err());
        assert!(Document::parse("data_t\n_a\n").is_err());
    }

    #[test]
    fn values_before_a_block_are_rejected() {
        assert!(Document::parse("_a 1\n").is_err());
        assert!(Document::parse("stray\n").is_err());
    }

    #[test]
    fn number_parsing_strips_uncertainty() {
        assert_eq!(parse_number("61.95"), Some(61.95));
        assert_eq!(parse_number("12.5(3)"), Some(12.5));
        assert_eq!(parse_number("-1e3"), Some(-1000.0));
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn find_table_over_loop_and_pairs() {
        let doc = Document::parse(concat!(
            "data_t\n",
            "_cell.length_a 61.95(2)\n",
            "_cell.length_b 62.0\n",
            "loop_\n_s.id\n_s.x\n1 0.5\n2 ?\n",
        ))
        .unwrap();
        let block = doc.first_block().unwrap();

        let cell = block.find_table("_cell.", &["length_a", "length_b", "length_c"]).unwrap();
        assert_eq!(cell.len(), 1);
        let row = cell.row(0);
        assert_eq!(row.f64(0).unwrap(), 61.95);
        assert_eq!(row.f64_or(2, 0.0).unwrap(), 0.0);
        assert!(!cell.has_column(2));

        let s = block.find_table("_s.", &["id", "x"]).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.row(0).i32_or(0, 0).unwrap(), 1);
        assert_eq!(s.row(1).f64_or(1, 9.0).unwrap(), 9.0, "null takes default");
        assert!(s.row(1).is_null(1));
        assert!(s.row(0).f64(1).is_ok());
    }

    #[test]
    fn multiple_data_blocks() {
        let doc = Document::parse("data_one\n_a 1\ndata_two\n_a 2\n").unwrap();
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[1].find_str("_a"), Some("2"));
    }
}
