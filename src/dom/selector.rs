//! Selector subset understood by the in-memory DOM.
//!
//! Supported: type (`a`), universal (`*`), class (`.page`), id (`#main`),
//! attribute presence (`[download]`) and equality (`[data-static="true"]`),
//! compounds of those (`a.button[href]`) and comma groups. Combinators are
//! not supported; every selector the runtime issues is a single compound.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected `{0}` at offset {1}")]
    Unexpected(char, usize),

    #[error("unterminated attribute selector")]
    Unterminated,
}

/// Attribute condition inside `[...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrMatch {
    pub name: String,
    pub value: Option<String>,
}

/// One compound selector: every part must match the same element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrMatch>,
}

impl Compound {
    /// Match against an element described by its tag and attribute lookup.
    pub fn matches<'a>(&self, tag: &str, attr: impl Fn(&str) -> Option<&'a str>) -> bool {
        if let Some(expected) = &self.tag
            && !expected.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && attr("id") != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.is_empty() {
            let class = attr("class").unwrap_or_default();
            let has = |name: &String| class.split_whitespace().any(|c| c == name);
            if !self.classes.iter().all(has) {
                return false;
            }
        }
        self.attrs.iter().all(|m| match (&m.value, attr(&m.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(expected), Some(actual)) => expected == actual,
        })
    }
}

/// Parsed selector: a comma-separated group of compounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    groups: Vec<Compound>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut cursor = Cursor::new(input);
        let mut groups = vec![cursor.compound()?];
        while cursor.eat(',') {
            groups.push(cursor.compound()?);
        }
        Ok(Self { groups })
    }

    #[inline]
    pub fn groups(&self) -> &[Compound] {
        &self.groups
    }

    pub fn matches<'a>(&self, tag: &str, attr: impl Fn(&str) -> Option<&'a str>) -> bool {
        self.groups.iter().any(|c| c.matches(tag, &attr))
    }
}

// ============================================================================
// parser
// ============================================================================

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.unexpected());
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(c) => SelectorError::Unexpected(c, self.pos),
            None => SelectorError::Empty,
        }
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        self.skip_ws();
        let mut compound = Compound::default();
        let mut empty = true;

        loop {
            match self.peek() {
                None | Some(',') => break,
                Some(c) if c.is_whitespace() => {
                    self.skip_ws();
                    match self.peek() {
                        None | Some(',') => break,
                        Some(_) => return Err(self.unexpected()),
                    }
                }
                Some('*') if empty => self.pos += 1,
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.attr()?);
                }
                Some(c) if empty && c.is_alphanumeric() => {
                    compound.tag = Some(self.ident()?.to_ascii_lowercase());
                }
                Some(_) => return Err(self.unexpected()),
            }
            empty = false;
        }

        if empty {
            return Err(SelectorError::Empty);
        }
        Ok(compound)
    }

    fn attr(&mut self) -> Result<AttrMatch, SelectorError> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();

        let value = match self.peek() {
            Some(']') => None,
            Some('=') => {
                self.pos += 1;
                self.skip_ws();
                Some(self.value()?)
            }
            Some(_) => return Err(self.unexpected()),
            None => return Err(SelectorError::Unterminated),
        };

        self.skip_ws();
        if self.peek() != Some(']') {
            return Err(SelectorError::Unterminated);
        }
        self.pos += 1;
        Ok(AttrMatch { name, value })
    }

    fn value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(SelectorError::Unterminated);
                }
                let value = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                Ok(value)
            }
            _ => self.ident(),
        }
    }
}
