use blake2::{Blake2b512, Digest};
use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use zeroize::{Zeroize, Zeroizing};

use crate::config::DIGEST_BYTES;
use crate::error::GenerationError;

pub const KEY_BYTES: usize = 32;
pub const NONCE_BYTES: usize = 12;

const STATE_BYTES: usize = KEY_BYTES + NONCE_BYTES;
const RESEED_DOMAIN: &[u8] = b"threegen-csprng-reseed-v1";

#[repr(C)]
#[derive(Zeroize)]
pub struct CsprngState {
    key: [u8; KEY_BYTES],
    nonce: [u8; NONCE_BYTES],
}

impl CsprngState {
    #[cfg(test)]
    pub(crate) fn from_parts(key: [u8; KEY_BYTES], nonce: [u8; NONCE_BYTES]) -> Self {
        Self { key, nonce }
    }

    fn set(&mut self, material: &[u8]) {
        self.key.copy_from_slice(&material[..KEY_BYTES]);
        self.nonce.copy_from_slice(&material[KEY_BYTES..STATE_BYTES]);
    }
}

pub trait Csprng {
    fn init_seed(&self, state: &mut CsprngState) -> Result<(), GenerationError>;

    /// Mixes `digest` into `state`. The previous state must not be recoverable.
    fn reseed(&self, state: &mut CsprngState, digest: &[u8; DIGEST_BYTES]);

    fn get(&self, state: &mut CsprngState, out: &mut [u8]);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ChaChaDrbg;

impl Csprng for ChaChaDrbg {
    fn init_seed(&self, state: &mut CsprngState) -> Result<(), GenerationError> {
        getrandom::fill(&mut state.key).map_err(GenerationError::OsEntropy)?;
        getrandom::fill(&mut state.nonce).map_err(GenerationError::OsEntropy)?;
        Ok(())
    }

    fn reseed(&self, state: &mut CsprngState, digest: &[u8; DIGEST_BYTES]) {
        let mut hasher = Blake2b512::new();
        hasher.update(RESEED_DOMAIN);
        hasher.update(state.key);
        hasher.update(state.nonce);
        hasher.update(digest);

        let mut mixed = hasher.finalize();
        state.set(&mixed);
        mixed.as_mut_slice().zeroize();

        tracing::debug!("csprng reseeded");
    }

    fn get(&self, state: &mut CsprngState, out: &mut [u8]) {
        let mut cipher = ChaCha20::new((&state.key).into(), &state.nonce.into());

        out.fill(0);
        cipher.apply_keystream(out);

        let mut next = Zeroizing::new([0u8; STATE_BYTES]);
        cipher.apply_keystream(&mut next[..]);
        state.set(&next[..]);
    }
}
