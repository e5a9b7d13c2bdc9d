pub const MAX_PASSWORD_LENGTH: usize = 125;

pub const MAX_ENTROPY_LENGTH: usize = 120;

pub const DIGEST_BYTES: usize = 64;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterClass {
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
}

impl CharacterClass {
    pub const ALL: [Self; 4] = [Self::Lowercase, Self::Uppercase, Self::Digit, Self::Symbol];

    pub const fn charset(self) -> &'static [u8] {
        match self {
            Self::Lowercase => LOWERCASE,
            Self::Uppercase => UPPERCASE,
            Self::Digit => DIGITS,
            Self::Symbol => SYMBOLS,
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Lowercase => 0x01,
            Self::Uppercase => 0x02,
            Self::Digit => 0x04,
            Self::Symbol => 0x08,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CharacterClasses(u8);

impl CharacterClasses {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0x0f);

    #[must_use]
    pub const fn with(self, class: CharacterClass) -> Self {
        Self(self.0 | class.bit())
    }

    pub fn insert(&mut self, class: CharacterClass) {
        self.0 |= class.bit();
    }

    pub const fn contains(self, class: CharacterClass) -> bool {
        self.0 & class.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = CharacterClass> {
        CharacterClass::ALL
            .into_iter()
            .filter(move |class| self.contains(*class))
    }
}

impl FromIterator<CharacterClass> for CharacterClasses {
    fn from_iter<T: IntoIterator<Item = CharacterClass>>(iter: T) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

impl From<CharacterClass> for CharacterClasses {
    fn from(class: CharacterClass) -> Self {
        Self::NONE.with(class)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LockPolicy {
    Strict,
    #[default]
    Permissive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    classes: CharacterClasses,
    length: usize,
    format: bool,
    supplement_entropy: bool,
    lock_policy: LockPolicy,
}

impl Config {
    pub fn new(classes: CharacterClasses, length: usize) -> Self {
        Self {
            classes,
            length,
            format: false,
            supplement_entropy: false,
            lock_policy: LockPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_format(self, format: bool) -> Self {
        Self { format, ..self }
    }

    #[must_use]
    pub fn with_entropy(self, supplement_entropy: bool) -> Self {
        Self {
            supplement_entropy,
            ..self
        }
    }

    #[must_use]
    pub fn with_lock_policy(self, lock_policy: LockPolicy) -> Self {
        Self {
            lock_policy,
            ..self
        }
    }

    pub fn classes(&self) -> CharacterClasses {
        self.classes
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn format(&self) -> bool {
        self.format
    }

    pub fn supplement_entropy(&self) -> bool {
        self.supplement_entropy
    }

    pub fn lock_policy(&self) -> LockPolicy {
        self.lock_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_charset_sizes() {
        assert_eq!(CharacterClass::Lowercase.charset().len(), 26);
        assert_eq!(CharacterClass::Uppercase.charset().len(), 26);
        assert_eq!(CharacterClass::Digit.charset().len(), 10);
        assert_eq!(CharacterClass::Symbol.charset().len(), 32);
    }

    #[test]
    fn test_charsets_sorted_and_disjoint() {
        let mut seen = HashSet::new();
        for class in CharacterClass::ALL {
            let set = class.charset();
            assert!(set.windows(2).all(|w| w[0] < w[1]), "{:?} not ascending", class);
            for byte in set {
                assert!(byte.is_ascii_graphic());
                assert!(seen.insert(*byte), "duplicate byte {}", *byte as char);
            }
        }
        assert_eq!(seen.len(), 94);
    }

    #[test]
    fn test_class_set_operations() {
        let mut classes = CharacterClasses::NONE;
        assert!(classes.is_empty());

        classes.insert(CharacterClass::Symbol);
        classes.insert(CharacterClass::Lowercase);
        assert!(classes.contains(CharacterClass::Symbol));
        assert!(!classes.contains(CharacterClass::Digit));

        let order: Vec<_> = classes.iter().collect();
        assert_eq!(order, vec![CharacterClass::Lowercase, CharacterClass::Symbol]);
    }

    #[test]
    fn test_all_equals_every_class() {
        let collected: CharacterClasses = CharacterClass::ALL.into_iter().collect();
        assert_eq!(collected, CharacterClasses::ALL);
        assert_eq!(CharacterClasses::ALL.iter().count(), 4);
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = Config::new(CharacterClasses::ALL, 20);
        assert_eq!(config.length(), 20);
        assert!(!config.format());
        assert!(!config.supplement_entropy());
        assert_eq!(config.lock_policy(), LockPolicy::Permissive);

        let config = config
            .with_format(true)
            .with_entropy(true)
            .with_lock_policy(LockPolicy::Strict);
        assert!(config.format());
        assert!(config.supplement_entropy());
        assert_eq!(config.lock_policy(), LockPolicy::Strict);
        assert_eq!(config.classes(), CharacterClasses::ALL);
    }
}
