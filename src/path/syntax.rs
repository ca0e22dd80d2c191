use super::CommandKind;
use crate::errors::ParseError;
use crate::geometry::Point;

type ParseResult<T> = std::result::Result<T, ParseError>;

pub struct SvgPathSyntax {
    data: Vec<char>,
    index: usize,
}

impl SvgPathSyntax {
    pub fn new(data: &str) -> Self {
        Self {
            data: data.chars().collect(),
            index: 0,
        }
    }
}

impl PathSyntax for SvgPathSyntax {
    fn current(&self) -> Option<char> {
        self.data.get(self.index).copied()
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn position(&self) -> usize {
        self.index
    }

    fn at_end(&self) -> bool {
        self.index >= self.data.len()
    }
}

/// Character-level scanner for the SVG path grammar.
pub trait PathSyntax {
    fn current(&self) -> Option<char>;
    fn advance(&mut self);
    fn position(&self) -> usize;
    fn at_end(&self) -> bool;

    fn at_command(&self) -> bool {
        self.current()
            .is_some_and(|c| CommandKind::from_letter(c).is_some())
    }

    /// An error describing whatever is at the current position.
    fn malformed(&self) -> ParseError {
        ParseError::MalformedToken {
            position: self.position(),
            found: self
                .current()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "end of data".to_string()),
        }
    }

    fn skip_whitespace(&mut self) {
        // SVG definition of whitespace is 0x20, 0x9, 0xA, 0xD. Rust's is_ascii_whitespace()
        // also includes 0xC, but is close enough and convenient.
        while self.current().is_some_and(|c| c.is_ascii_whitespace()) {
            self.advance();
        }
    }

    fn skip_wsp_comma(&mut self) {
        self.skip_whitespace();
        if self.current() == Some(',') {
            self.advance();
            self.skip_whitespace();
        }
    }

    fn read_flag(&mut self) -> ParseResult<bool> {
        // per the grammar for `a`/`A`, could have '00' etc for
        // the two adjacent flags...
        let res = match self.current() {
            Some('0') => false,
            Some('1') => true,
            Some(c) => return Err(ParseError::InvalidFlag(c)),
            None => return Err(self.malformed()),
        };
        self.advance();
        self.skip_wsp_comma();
        Ok(res)
    }

    fn read_number(&mut self) -> ParseResult<f64> {
        let mut mult = 1.;
        match self.current() {
            Some('-') => {
                mult = -1.;
                self.advance();
            }
            Some('+') => {
                self.advance();
            }
            _ => {}
        };
        Ok(mult * self.read_non_negative()?)
    }

    fn read_non_negative(&mut self) -> ParseResult<f64> {
        let start = self.position();
        let mut s = String::new();
        let mut dot_valid = true;
        let mut exp_valid = true;
        while let Some(ch) = self.current() {
            match ch {
                '0'..='9' => {
                    s.push(ch);
                    self.advance();
                }
                '.' if dot_valid => {
                    s.push(ch);
                    self.advance();
                    dot_valid = false;
                }
                'e' | 'E' if exp_valid && s.ends_with(|c: char| c.is_ascii_digit()) => {
                    s.push(ch);
                    self.advance();
                    // include sign character if present
                    if let Some(sign @ ('-' | '+')) = self.current() {
                        s.push(sign);
                        self.advance();
                    }
                    exp_valid = false;
                    dot_valid = false;
                }
                _ => break,
            }
        }
        if s.is_empty() {
            return Err(self.malformed());
        }
        let value = s
            .parse()
            .map_err(|_| ParseError::MalformedToken {
                position: start,
                found: s.clone(),
            })?;
        self.skip_wsp_comma();
        Ok(value)
    }

    fn read_coord(&mut self) -> ParseResult<Point> {
        let x = self.read_number()?;
        self.skip_wsp_comma();
        let y = self.read_number()?;
        self.skip_wsp_comma();
        Ok(Point::new(x, y))
    }

    fn read_command(&mut self) -> ParseResult<CommandKind> {
        match self.current().and_then(CommandKind::from_letter) {
            Some(kind) => {
                self.advance();
                self.skip_whitespace();
                Ok(kind)
            }
            None => Err(self.malformed()),
        }
    }
}
