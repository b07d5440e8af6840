//! Recognized alphabet for hand-sign classification.
//!
//! The classifier emits class indices; this module maps them onto the fixed
//! set of letters the system can spell with. Only runtime-required data is
//! kept (the ordered symbol list) - rendering concerns live elsewhere.

use std::fmt;

use anyhow::Result;

/// One symbol from the recognized alphabet.
///
/// Always stored uppercase; obtained through [`Alphabet`] so an invalid
/// character can never enter the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Letter(char);

impl Letter {
    /// The underlying uppercase character.
    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The ordered set of letters the classifier is trained on.
///
/// Class index `i` corresponds to the i-th symbol, so the default Latin
/// alphabet maps class 0 to 'A' through class 25 to 'Z'.
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from a string of symbols.
    ///
    /// Symbols are normalized to uppercase and must be unique letters.
    ///
    /// # Errors
    /// Returns an error if the string is empty, contains a non-letter, or
    /// contains a duplicate symbol.
    pub fn from_symbols(symbols: &str) -> Result<Self> {
        let mut normalized = Vec::new();

        for c in symbols.trim().chars() {
            if !c.is_ascii_alphabetic() {
                anyhow::bail!("Alphabet symbol '{}' is not a letter", c);
            }
            let upper = c.to_ascii_uppercase();
            if normalized.contains(&upper) {
                anyhow::bail!("Duplicate symbol '{}' in alphabet", upper);
            }
            normalized.push(upper);
        }

        if normalized.is_empty() {
            anyhow::bail!("Recognized alphabet must not be empty");
        }

        Ok(Self { symbols: normalized })
    }

    /// Map a classifier class index to its letter (class 0 = first symbol).
    pub fn letter_for_class(&self, class_index: usize) -> Option<Letter> {
        self.symbols.get(class_index).copied().map(Letter)
    }

    /// Look up a character in the alphabet, ignoring case.
    pub fn letter(&self, c: char) -> Option<Letter> {
        let upper = c.to_ascii_uppercase();
        self.symbols.contains(&upper).then_some(Letter(upper))
    }

    /// Number of symbols in the alphabet.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for Alphabet {
    /// The 26 uppercase Latin letters A-Z.
    fn default() -> Self {
        Self { symbols: ('A'..='Z').collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_maps_class_indices_to_latin_letters() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.len(), 26);
        assert_eq!(alphabet.letter_for_class(0).unwrap().as_char(), 'A');
        assert_eq!(alphabet.letter_for_class(25).unwrap().as_char(), 'Z');
        assert!(alphabet.letter_for_class(26).is_none());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.letter('q').unwrap().as_char(), 'Q');
        assert_eq!(alphabet.letter('Q').unwrap().as_char(), 'Q');
        assert!(alphabet.letter('3').is_none());
    }

    #[test]
    fn empty_alphabet_is_rejected() {
        assert!(Alphabet::from_symbols("").is_err());
        assert!(Alphabet::from_symbols("   ").is_err());
    }

    #[test]
    fn invalid_symbols_are_rejected() {
        assert!(Alphabet::from_symbols("AB1").is_err());
        assert!(Alphabet::from_symbols("ABA").is_err());
        assert!(Alphabet::from_symbols("aba").is_err());
    }

    #[test]
    fn custom_alphabet_normalizes_to_uppercase() {
        let alphabet = Alphabet::from_symbols("abc").unwrap();
        assert_eq!(alphabet.letter_for_class(2).unwrap().as_char(), 'C');
        assert_eq!(alphabet.len(), 3);
    }
}
