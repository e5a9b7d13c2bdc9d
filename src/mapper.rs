use crate::alphabet::Alphabet;
use crate::config::MAX_PASSWORD_LENGTH;
use crate::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantization {
    alphabet_size: u64,
    local_limit: u64,
    quanta_per_char: u64,
}

impl Quantization {
    pub fn for_alphabet(alphabet: &Alphabet) -> Self {
        Self::new(alphabet.len())
    }

    // Callers guarantee a non-zero size.
    pub(crate) const fn new(alphabet_size: usize) -> Self {
        let n = alphabet_size as u64;
        let local_limit = u64::MAX - (u64::MAX % n);
        Self {
            alphabet_size: n,
            local_limit,
            quanta_per_char: local_limit / n,
        }
    }

    pub const fn local_limit(&self) -> u64 {
        self.local_limit
    }

    pub const fn quanta_per_char(&self) -> u64 {
        self.quanta_per_char
    }

    /// Table offset selected by `word`. Always `< alphabet_size`.
    pub const fn offset(&self, word: u64) -> usize {
        let last = self.alphabet_size - 1;
        if word <= self.local_limit {
            // local_limit itself divides to alphabet_size; it belongs to the last run.
            let offset = word / self.quanta_per_char;
            if offset > last { last as usize } else { offset as usize }
        } else {
            last as usize
        }
    }
}

pub fn check_length(length: usize) -> Result<(), ConfigurationError> {
    if (1..=MAX_PASSWORD_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(ConfigurationError::SizeOutOfRange { requested: length })
    }
}

pub fn map_words(
    alphabet: &Alphabet,
    words: &[u64],
    length: usize,
    out: &mut [u8],
) -> Result<(), ConfigurationError> {
    check_length(length)?;
    if length > words.len() || length > out.len() {
        return Err(ConfigurationError::SizeOutOfRange { requested: length });
    }

    let table = alphabet.as_bytes();
    let quantization = Quantization::for_alphabet(alphabet);

    for (byte, word) in out[..length].iter_mut().zip(words) {
        *byte = table[quantization.offset(*word)];
    }

    tracing::debug!(length, alphabet_size = table.len(), "mapped random words");
    Ok(())
}
