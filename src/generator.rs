use zeroize::Zeroizing;

use crate::alphabet::Alphabet;
use crate::config::Config;
use crate::csprng::{ChaChaDrbg, Csprng};
use crate::entropy::{SecretInput, TerminalInput, supplement_entropy};
use crate::error::GenerationError;
use crate::mapper::{check_length, map_words};
use crate::secure::{SecretRegion, SecretState, words_as_bytes_mut};

pub struct Generator<C, I> {
    csprng: C,
    input: I,
}

impl Generator<ChaChaDrbg, TerminalInput> {
    pub fn system() -> Self {
        Self::with_parts(ChaChaDrbg, TerminalInput::new())
    }
}

impl<C: Csprng, I: SecretInput> Generator<C, I> {
    pub fn with_parts(csprng: C, input: I) -> Self {
        Self { csprng, input }
    }

    /// Generates one password and hands it to `emit` while it still lives in
    /// the locked region. The region is wiped when this returns, on success
    /// and on error alike.
    pub fn generate_with<T, F>(&mut self, config: &Config, emit: F) -> Result<T, GenerationError>
    where
        F: FnOnce(&[u8]) -> T,
    {
        let alphabet = Alphabet::build(config.classes())?;
        check_length(config.length())?;

        let mut region = SecretRegion::acquire(config.lock_policy())?;
        self.fill(region.state_mut(), &alphabet, config)?;

        Ok(emit(&region.state_mut().password[..config.length()]))
    }

    pub fn generate(&mut self, config: &Config) -> Result<Zeroizing<Vec<u8>>, GenerationError> {
        self.generate_with(config, |password| Zeroizing::new(password.to_vec()))
    }

    fn fill(
        &mut self,
        state: &mut SecretState,
        alphabet: &Alphabet,
        config: &Config,
    ) -> Result<(), GenerationError> {
        let SecretState {
            csprng,
            words,
            entropy,
            password,
        } = state;

        self.csprng.init_seed(csprng)?;
        if config.supplement_entropy() {
            supplement_entropy(&self.csprng, csprng, entropy, &mut self.input)?;
        }

        self.csprng.get(csprng, words_as_bytes_mut(&mut words[..]));
        for word in words.iter_mut() {
            *word = u64::from_le(*word);
        }

        map_words(alphabet, &words[..], config.length(), &mut password[..])?;
        Ok(())
    }
}

pub fn generate(config: &Config) -> Result<Zeroizing<Vec<u8>>, GenerationError> {
    Generator::system().generate(config)
}
