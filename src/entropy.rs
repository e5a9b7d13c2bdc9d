use blake2::{Blake2b512, Digest};
use console::Term;
use rpassword::read_password;
use zeroize::{Zeroize, Zeroizing};

use crate::config::{DIGEST_BYTES, MAX_ENTROPY_LENGTH};
use crate::csprng::{Csprng, CsprngState};
use crate::error::GenerationError;
use crate::secure::EntropyScratch;

pub const MIN_ENTROPY_LENGTH: usize = 1;

pub const ENTROPY_PROMPT: &str = "Please input up to 120 random characters.\n> ";

pub trait SecretInput {
    /// Writes between `min_len` and `max_len` bytes into `out` and returns the count.
    fn read_secret_line(
        &mut self,
        prompt: &str,
        min_len: usize,
        max_len: usize,
        out: &mut [u8],
    ) -> Result<usize, GenerationError>;
}

pub struct TerminalInput {
    term: Term,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for TerminalInput {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretInput for TerminalInput {
    fn read_secret_line(
        &mut self,
        prompt: &str,
        min_len: usize,
        max_len: usize,
        out: &mut [u8],
    ) -> Result<usize, GenerationError> {
        let max_len = max_len.min(out.len());

        loop {
            self.term
                .write_str(prompt)
                .and_then(|()| self.term.flush())
                .map_err(GenerationError::Terminal)?;

            let line = Zeroizing::new(read_password().map_err(GenerationError::Terminal)?);

            match check_line(line.as_bytes(), min_len, max_len) {
                Ok(len) => {
                    out[..len].copy_from_slice(line.as_bytes());
                    return Ok(len);
                }
                Err(reason) => self
                    .term
                    .write_line(&reason)
                    .map_err(GenerationError::Terminal)?,
            }
        }
    }
}

fn check_line(line: &[u8], min_len: usize, max_len: usize) -> Result<usize, String> {
    if line.len() < min_len || line.len() > max_len {
        return Err(format!(
            "Input must be between {} and {} characters.",
            min_len, max_len
        ));
    }
    if let Some(pos) = line.iter().position(|b| !(b.is_ascii_graphic() || *b == b' ')) {
        return Err(format!(
            "Input contains a non-printable character at position {}.",
            pos
        ));
    }
    Ok(line.len())
}

pub fn hash_into(out: &mut [u8; DIGEST_BYTES], input: &[u8]) {
    let mut digest = Blake2b512::digest(input);
    out.copy_from_slice(&digest);
    digest.as_mut_slice().zeroize();
}

pub fn supplement_entropy<C, I>(
    csprng: &C,
    state: &mut CsprngState,
    scratch: &mut EntropyScratch,
    input: &mut I,
) -> Result<(), GenerationError>
where
    C: Csprng + ?Sized,
    I: SecretInput + ?Sized,
{
    let length = input.read_secret_line(
        ENTROPY_PROMPT,
        MIN_ENTROPY_LENGTH,
        MAX_ENTROPY_LENGTH,
        &mut scratch.input,
    )?;
    if !(MIN_ENTROPY_LENGTH..=MAX_ENTROPY_LENGTH).contains(&length) {
        return Err(GenerationError::EntropyLength { length });
    }

    hash_into(&mut scratch.digest, &scratch.input[..length]);
    csprng.reseed(state, &scratch.digest);

    tracing::debug!(length, "operator entropy mixed into csprng");
    Ok(())
}
