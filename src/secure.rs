use std::alloc::{self, Layout};
use std::io;
use std::ptr::NonNull;

use zeroize::Zeroize;

use crate::config::{DIGEST_BYTES, LockPolicy, MAX_ENTROPY_LENGTH, MAX_PASSWORD_LENGTH};
use crate::csprng::CsprngState;
use crate::error::GenerationError;

pub const PASSWORD_BUFFER_BYTES: usize = MAX_PASSWORD_LENGTH + 1;
pub const RANDOM_WORDS: usize = PASSWORD_BUFFER_BYTES;
pub const ENTROPY_INPUT_BYTES: usize = MAX_ENTROPY_LENGTH + 1;

const FALLBACK_PAGE_SIZE: usize = 4096;

#[repr(C)]
pub struct EntropyScratch {
    pub digest: [u8; DIGEST_BYTES],
    pub input: [u8; ENTROPY_INPUT_BYTES],
}

#[repr(C)]
pub struct SecretState {
    pub csprng: CsprngState,
    pub words: [u64; RANDOM_WORDS],
    pub entropy: EntropyScratch,
    pub password: [u8; PASSWORD_BUFFER_BYTES],
}

pub struct SecretRegion {
    ptr: NonNull<u8>,
    layout: Layout,
    locked: bool,
}

impl SecretRegion {
    pub fn acquire(policy: LockPolicy) -> Result<Self, GenerationError> {
        Self::acquire_with(policy, lock_memory)
    }

    fn acquire_with<L>(policy: LockPolicy, lock: L) -> Result<Self, GenerationError>
    where
        L: FnOnce(NonNull<u8>, usize) -> io::Result<()>,
    {
        let page = page_size();
        let size = std::mem::size_of::<SecretState>().next_multiple_of(page);
        let layout = Layout::from_size_align(size, page)
            .map_err(|_| GenerationError::AllocationFailure { size })?;

        // SAFETY: layout has a non-zero size.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or(GenerationError::AllocationFailure { size })?;

        // From here on Drop wipes and frees, whatever happens below.
        let mut region = Self {
            ptr,
            layout,
            locked: false,
        };

        match lock(region.ptr, size) {
            Ok(()) => region.locked = true,
            Err(source) => match policy {
                LockPolicy::Strict => return Err(GenerationError::MemoryLockFailure { source }),
                LockPolicy::Permissive => {
                    tracing::warn!(error = %source, "secret memory not locked; it may be swapped to disk");
                }
            },
        }

        tracing::debug!(size, locked = region.locked, "secret region acquired");
        Ok(region)
    }

    pub fn state_mut(&mut self) -> &mut SecretState {
        // SAFETY: the allocation is page aligned, at least size_of::<SecretState>()
        // bytes, and all-zero or previously written bytes are a valid SecretState
        // (it is made only of integer arrays). &mut self guarantees exclusivity.
        unsafe { &mut *self.ptr.as_ptr().cast::<SecretState>() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: ptr is valid for layout.size() initialized bytes while self lives.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.layout.size()) }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn len(&self) -> usize {
        self.layout.size()
    }

    pub fn is_empty(&self) -> bool {
        self.layout.size() == 0
    }

    /// Overwrites the whole allocation with zeros.
    pub fn wipe(&mut self) {
        // SAFETY: ptr is valid for layout.size() bytes and uniquely borrowed.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.layout.size()) }
            .zeroize();
    }
}

impl Drop for SecretRegion {
    fn drop(&mut self) {
        #[cfg(test)]
        let held_secret = self.as_bytes().iter().any(|b| *b != 0);
        self.wipe();
        #[cfg(test)]
        release_log::record(release_log::Release {
            held_secret,
            zeroed: self.as_bytes().iter().all(|b| *b == 0),
        });
        if self.locked
            && let Err(error) = unlock_memory(self.ptr, self.layout.size())
        {
            tracing::warn!(%error, "failed to unlock secret memory");
        }
        // SAFETY: ptr was returned by alloc_zeroed with this exact layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) };
        tracing::debug!("secret region wiped and released");
    }
}


pub fn words_as_bytes_mut(words: &mut [u64]) -> &mut [u8] {
    let len = std::mem::size_of_val(words);
    // SAFETY: u8 has no alignment requirement and every bit pattern is a valid u64.
    unsafe { std::slice::from_raw_parts_mut(words.as_mut_ptr().cast::<u8>(), len) }
}

#[cfg(unix)]
fn page_size() -> usize {
    // SAFETY: sysconf has no preconditions.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    match usize::try_from(size) {
        Ok(size) if size.is_power_of_two() => size,
        _ => FALLBACK_PAGE_SIZE,
    }
}

#[cfg(not(unix))]
fn page_size() -> usize {
    FALLBACK_PAGE_SIZE
}

#[cfg(unix)]
fn lock_memory(ptr: NonNull<u8>, len: usize) -> io::Result<()> {
    // SAFETY: the range is a live allocation owned by the caller.
    if unsafe { libc::mlock(ptr.as_ptr() as *const libc::c_void, len) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(unix)]
fn unlock_memory(ptr: NonNull<u8>, len: usize) -> io::Result<()> {
    // SAFETY: the range was locked by lock_memory and is still allocated.
    if unsafe { libc::munlock(ptr.as_ptr() as *const libc::c_void, len) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn lock_memory(_ptr: NonNull<u8>, _len: usize) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "memory locking is not available on this platform",
    ))
}

#[cfg(not(unix))]
fn unlock_memory(_ptr: NonNull<u8>, _len: usize) -> io::Result<()> {
    Ok(())
}
