use crate::config::CharacterClasses;
use crate::error::ConfigurationError;

pub const MAX_ALPHABET_SIZE: usize = 26 + 26 + 10 + 32;

#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    table: [u8; MAX_ALPHABET_SIZE],
    len: usize,
}

impl Alphabet {
    pub fn build(classes: CharacterClasses) -> Result<Self, ConfigurationError> {
        let mut table = [0u8; MAX_ALPHABET_SIZE];
        let mut len = 0;

        for class in classes.iter() {
            let set = class.charset();
            table[len..len + set.len()].copy_from_slice(set);
            len += set.len();
        }

        if len == 0 {
            return Err(ConfigurationError::EmptyAlphabet);
        }

        tracing::debug!(size = len, "character table built");
        Ok(Self { table, len })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.table[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, byte: u8) -> bool {
        self.as_bytes().contains(&byte)
    }

    pub fn last(&self) -> u8 {
        self.table[self.len - 1]
    }
}

impl std::fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Alphabet")
            .field("table", &String::from_utf8_lossy(self.as_bytes()))
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CharacterClass;

    fn classes_from_mask(mask: u8) -> CharacterClasses {
        CharacterClass::ALL
            .into_iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, class)| class)
            .collect()
    }

    #[test]
    fn test_every_combination_size() {
        for mask in 0u8..16 {
            let classes = classes_from_mask(mask);
            let a = (mask & 1) as usize;
            let b = ((mask >> 1) & 1) as usize;
            let c = ((mask >> 2) & 1) as usize;
            let d = ((mask >> 3) & 1) as usize;
            let expected = 26 * a + 26 * b + 10 * c + 32 * d;

            match Alphabet::build(classes) {
                Ok(alphabet) => assert_eq!(alphabet.len(), expected, "mask {:04b}", mask),
                Err(err) => {
                    assert_eq!(expected, 0);
                    assert_eq!(err, ConfigurationError::EmptyAlphabet);
                }
            }
        }
    }

    #[test]
    fn test_empty_alphabet_rejected() {
        let result = Alphabet::build(CharacterClasses::NONE);
        assert_eq!(result.unwrap_err(), ConfigurationError::EmptyAlphabet);
    }

    #[test]
    fn test_canonical_order() {
        let alphabet = Alphabet::build(CharacterClasses::ALL).unwrap();
        assert_eq!(alphabet.len(), MAX_ALPHABET_SIZE);

        let bytes = alphabet.as_bytes();
        assert_eq!(&bytes[..26], b"abcdefghijklmnopqrstuvwxyz");
        assert_eq!(&bytes[26..52], b"ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        assert_eq!(&bytes[52..62], b"0123456789");
        assert_eq!(bytes[62], b'!');
        assert_eq!(alphabet.last(), b'~');
    }

    #[test]
    fn test_order_independent_of_insertion() {
        let mut classes = CharacterClasses::NONE;
        classes.insert(CharacterClass::Symbol);
        classes.insert(CharacterClass::Digit);

        let alphabet = Alphabet::build(classes).unwrap();
        assert_eq!(&alphabet.as_bytes()[..10], b"0123456789");
        assert_eq!(alphabet.len(), 42);
    }

    #[test]
    fn test_single_class_membership() {
        let alphabet = Alphabet::build(CharacterClass::Digit.into()).unwrap();
        assert!(alphabet.contains(b'7'));
        assert!(!alphabet.contains(b'a'));
        assert!(!alphabet.is_empty());
        assert_eq!(alphabet.last(), b'9');
    }
}
