//! CSS selector subset used for exclusion rules
//!
//! Supported: type (`input`), universal (`*`), `#id`, `.class`, `[attr]`,
//! `[attr=value]`, compound selectors (`input.search[type=text]`), the
//! descendant (` `) and child (`>`) combinators, and comma separated lists.

use std::fmt;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

use super::element::Element;

/// Errors produced while parsing a selector
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("unexpected end of selector")]
    UnexpectedEnd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeMatch {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatch>,
}

impl Compound {
    fn matches(&self, el: &Element) -> bool {
        self.tag.as_deref().is_none_or(|tag| el.tag_name() == tag)
            && self.id.as_deref().is_none_or(|id| el.html_id() == Some(id))
            && self.classes.iter().all(|class| el.has_class(class))
            && self.attributes.iter().all(|attr| match &attr.value {
                Some(value) => el.attribute(&attr.name) == Some(value.as_str()),
                None => el.has_attribute(&attr.name),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// `compounds[i]` and `compounds[i + 1]` are joined by `combinators[i]`
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

impl Complex {
    fn matches(&self, el: &Element) -> bool {
        self.matches_at(self.compounds.len() - 1, el)
    }

    fn matches_at(&self, index: usize, el: &Element) -> bool {
        if !self.compounds[index].matches(el) {
            return false;
        }
        if index == 0 {
            return true;
        }

        match self.combinators[index - 1] {
            Combinator::Child => el
                .parent()
                .is_some_and(|parent| self.matches_at(index - 1, parent)),
            Combinator::Descendant => el
                .ancestors()
                .any(|ancestor| self.matches_at(index - 1, ancestor)),
        }
    }
}

/// A parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser {
            chars: input.char_indices().peekable(),
        };
        let alternatives = parser.selector_list()?;
        Ok(Self {
            source: input.trim().to_owned(),
            alternatives,
        })
    }

    /// True when any alternative in the list matches `el`
    pub fn matches(&self, el: &Element) -> bool {
        self.alternatives.iter().any(|complex| complex.matches(el))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct Parser<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl Parser<'_> {
    fn selector_list(&mut self) -> Result<Vec<Complex>, SelectorError> {
        let mut list = Vec::new();
        loop {
            list.push(self.complex()?);
            match self.chars.next() {
                None => return Ok(list),
                Some((_, ',')) => continue,
                Some((offset, found)) => return Err(SelectorError::Unexpected { found, offset }),
            }
        }
    }

    /// Parses up to, but not including, a `,` or the end of input
    fn complex(&mut self) -> Result<Complex, SelectorError> {
        self.skip_whitespace();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();

        loop {
            let saw_whitespace = self.skip_whitespace();
            let combinator = match self.chars.peek() {
                None | Some((_, ',')) => break,
                Some((_, '>')) => {
                    self.chars.next();
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(_) if saw_whitespace => Combinator::Descendant,
                Some(&(offset, found)) => return Err(SelectorError::Unexpected { found, offset }),
            };
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }

        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let mut consumed = false;

        if let Some(&(_, c)) = self.chars.peek() {
            if c == '*' {
                self.chars.next();
                consumed = true;
            } else if is_ident_char(c) {
                compound.tag = Some(self.ident()?.to_ascii_lowercase());
                consumed = true;
            }
        }

        while let Some(&(_, c)) = self.chars.peek() {
            match c {
                '#' => {
                    self.chars.next();
                    compound.id = Some(self.ident()?);
                }
                '.' => {
                    self.chars.next();
                    compound.classes.push(self.ident()?);
                }
                '[' => {
                    self.chars.next();
                    compound.attributes.push(self.attribute()?);
                }
                _ => break,
            }
            consumed = true;
        }

        if consumed {
            return Ok(compound);
        }
        match self.chars.peek() {
            None => Err(SelectorError::Empty),
            Some(&(_, ',')) => Err(SelectorError::Empty),
            Some(&(offset, found)) => Err(SelectorError::Unexpected { found, offset }),
        }
    }

    /// Parses the inside of `[...]`; the opening bracket is already consumed
    fn attribute(&mut self) -> Result<AttributeMatch, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let value = match self.chars.next() {
            Some((_, ']')) => return Ok(AttributeMatch { name, value: None }),
            Some((_, '=')) => {
                self.skip_whitespace();
                let value = match self.chars.peek() {
                    Some(&(_, quote @ ('"' | '\''))) => {
                        self.chars.next();
                        self.quoted(quote)?
                    }
                    _ => self.ident()?,
                };
                self.skip_whitespace();
                value
            }
            Some((offset, found)) => return Err(SelectorError::Unexpected { found, offset }),
            None => return Err(SelectorError::UnexpectedEnd),
        };

        match self.chars.next() {
            Some((_, ']')) => Ok(AttributeMatch {
                name,
                value: Some(value),
            }),
            Some((offset, found)) => Err(SelectorError::Unexpected { found, offset }),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut value = String::new();
        for (_, c) in self.chars.by_ref() {
            if c == quote {
                return Ok(value);
            }
            value.push(c);
        }
        Err(SelectorError::UnexpectedEnd)
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut ident = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if !is_ident_char(c) {
                break;
            }
            ident.push(c);
            self.chars.next();
        }

        if !ident.is_empty() {
            return Ok(ident);
        }
        match self.chars.peek() {
            Some(&(offset, found)) => Err(SelectorError::Unexpected { found, offset }),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    /// Returns whether anything was skipped
    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {
            skipped = true;
        }
        skipped
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
