//! Character cursor over a route definition.
//!
//! The cursor owns a decoded copy of the definition so that positions are
//! character indices, which is what the pointer rendering of
//! [`Location`](crate::error::Location) expects.

use crate::error::{DefinitionError, DefinitionResult, Location};

/// Lookahead/consume cursor with positional error context.
pub(crate) struct Cursor<'a> {
    definition: &'a str,
    chars: Vec<char>,
    index: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(definition: &'a str) -> Self {
        Self {
            definition,
            chars: definition.chars().collect(),
            index: 0,
        }
    }

    /// Character index of the next character to be consumed.
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn at_end(&self) -> bool {
        self.index >= self.chars.len()
    }

    /// The next character, `None` at the end of input.
    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    /// The most recently consumed character.
    pub(crate) fn last(&self) -> Option<char> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.chars.get(i).copied())
    }

    /// Consume one character, `None` at the end of input.
    pub(crate) fn take(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += 1;
        Some(c)
    }

    /// Consume `expected` or fail, recording it as the only acceptable character.
    pub(crate) fn expect(&mut self, expected: char) -> DefinitionResult<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.index += 1;
                Ok(())
            }
            Some(found) => Err(self.unexpected(found, vec![expected])),
            None => Err(self.unexpected_end(vec![expected])),
        }
    }

    /// Consume everything up to (not including) the first character in `stop`.
    pub(crate) fn take_all_until(&mut self, stop: &[char]) -> String {
        let start = self.index;
        while let Some(c) = self.peek() {
            if stop.contains(&c) {
                break;
            }
            self.index += 1;
        }
        self.chars[start..self.index].iter().collect()
    }

    /// Consume identifier characters up to the first character in `stop`.
    ///
    /// Any other character, or the end of input, is an error listing `stop` as
    /// the acceptable set.
    pub(crate) fn take_all_alnum_until(&mut self, stop: &[char]) -> DefinitionResult<String> {
        let start = self.index;
        loop {
            match self.peek() {
                Some(c) if stop.contains(&c) => break,
                Some(c) if is_identifier_char(c) => self.index += 1,
                Some(found) => return Err(self.unexpected(found, stop.to_vec())),
                None => return Err(self.unexpected_end(stop.to_vec())),
            }
        }
        Ok(self.chars[start..self.index].iter().collect())
    }

    pub(crate) fn location_at(&self, index: usize) -> Location {
        Location::new(self.definition, index)
    }

    pub(crate) fn location(&self) -> Location {
        self.location_at(self.index)
    }

    pub(crate) fn unexpected(&self, found: char, expected: Vec<char>) -> DefinitionError {
        DefinitionError::UnexpectedChar {
            found,
            at: self.location(),
            expected,
        }
    }

    pub(crate) fn unexpected_end(&self, expected: Vec<char>) -> DefinitionError {
        DefinitionError::UnexpectedEnd {
            at: self.location(),
            expected,
        }
    }
}

/// Characters allowed in attribute and type names.
pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_take_and_end_marker() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.take(), Some('a'));
        assert_eq!(cursor.last(), Some('a'));
        assert_eq!(cursor.take(), Some('b'));
        assert_eq!(cursor.take(), None);
        assert!(cursor.at_end());
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn test_take_all_until_stops_before_meta() {
        let mut cursor = Cursor::new("/users/{id}");
        assert_eq!(cursor.take_all_until(&['{', '[']), "/users/");
        assert_eq!(cursor.peek(), Some('{'));
    }

    #[test]
    fn test_expect_records_expected_char() {
        let mut cursor = Cursor::new("x");
        match cursor.expect('}') {
            Err(DefinitionError::UnexpectedChar { found, expected, at }) => {
                assert_eq!(found, 'x');
                assert_eq!(expected, vec!['}']);
                assert_eq!(at.index, 0);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_alnum_rejects_other_chars() {
        let mut cursor = Cursor::new("ab-c}");
        let err = cursor.take_all_alnum_until(&[':', '}']).unwrap_err();
        assert!(matches!(err, DefinitionError::UnexpectedChar { found: '-', .. }));
        assert_eq!(err.location().map(|l| l.index), Some(2));
    }

    #[test]
    fn test_alnum_unexpected_end() {
        let mut cursor = Cursor::new("name");
        let err = cursor.take_all_alnum_until(&['}']).unwrap_err();
        assert!(matches!(err, DefinitionError::UnexpectedEnd { .. }));
    }

    #[test]
    fn test_positions_count_characters_not_bytes() {
        let mut cursor = Cursor::new("/ü{");
        cursor.take_all_until(&['{']);
        assert_eq!(cursor.index(), 2);
    }
}
