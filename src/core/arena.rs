//! Anonymous Mmap Arena untuk Zero-Copy Serialization
//!
//! Satu region memory di-reserve sekali per session:
//! - Anonymous shared mapping (`MAP_SHARED`): di Linux dibuat dari memfd,
//!   jadi tidak ada file di filesystem dan region bisa dibagi ke I/O stack lain
//! - Pre-filled: semua page di-touch saat init, isi deterministik
//! - Move-only handle: unmap terjadi tepat sekali saat di-drop

use std::io;

use memmap2::{MmapMut, MmapOptions};
use tracing::{debug, error};

use crate::error::{Error, Result};

/// Ukuran page yang diasumsikan untuk sizing arena
pub const PAGE_SIZE: usize = 4096;

/// Default capacity: 1000 page (4,096,000 bytes)
pub const DEFAULT_ARENA_CAPACITY: usize = PAGE_SIZE * 1000;

/// Byte pattern untuk pre-fill seluruh region ('m')
pub const FILL_BYTE: u8 = b'm';

/// Memory arena dengan mmap backing
///
/// Region hidup selama handle ini hidup. `release()` mengonsumsi handle,
/// jadi akses setelah release tidak bisa dikompilasi.
pub struct Arena {
    mmap: MmapMut,
    valid_len: usize,
}

impl Arena {
    /// Reserve anonymous read/write shared mapping sebesar `total_bytes`
    ///
    /// Seluruh region diisi `FILL_BYTE` dan `valid_len` = capacity.
    pub fn reserve(total_bytes: usize) -> Result<Self> {
        if total_bytes == 0 {
            return Err(Error::ZeroCapacity);
        }

        let mut mmap = map_shared_anon(total_bytes).map_err(|source| Error::Reserve {
            len: total_bytes,
            source,
        })?;

        mmap.fill(FILL_BYTE);

        debug!(
            base = ?mmap.as_ptr(),
            capacity = total_bytes,
            "arena reserved"
        );

        Ok(Self {
            mmap,
            valid_len: total_bytes,
        })
    }

    /// Seperti `reserve`, tapi terminate process jika mapping gagal
    ///
    /// Benchmark tidak bisa jalan tanpa working memory, jadi tidak ada mode degraded.
    pub fn reserve_or_exit(total_bytes: usize) -> Self {
        match Self::reserve(total_bytes) {
            Ok(arena) => arena,
            Err(e) => {
                error!(error = %e, "failed to mmap arena memory");
                std::process::exit(1);
            }
        }
    }

    /// Alamat awal region
    #[inline(always)]
    pub fn base_address(&self) -> *const u8 {
        self.mmap.as_ptr()
    }

    /// Total bytes yang di-reserve
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.mmap.len()
    }

    /// Jumlah bytes di awal region yang berisi payload bermakna
    #[inline(always)]
    pub fn valid_len(&self) -> usize {
        self.valid_len
    }

    /// Set jumlah bytes yang dianggap populated
    ///
    /// Nilai di atas capacity ditolak, tidak di-clamp.
    pub fn set_valid_len(&mut self, len: usize) -> Result<()> {
        if len > self.capacity() {
            return Err(Error::ValidLengthOutOfRange {
                len,
                capacity: self.capacity(),
            });
        }
        self.valid_len = len;
        Ok(())
    }

    /// Seluruh region (read-only view)
    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }

    /// Seluruh region untuk caller yang menaruh payload sebelum serialize
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.mmap
    }

    /// Bytes `[0, valid_len)`
    #[inline(always)]
    pub fn valid_bytes(&self) -> &[u8] {
        &self.mmap[..self.valid_len]
    }

    /// Tulis `payload` di awal region dan set `valid_len` = panjang payload
    pub fn load_payload(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() > self.capacity() {
            return Err(Error::ValidLengthOutOfRange {
                len: payload.len(),
                capacity: self.capacity(),
            });
        }
        self.mmap[..payload.len()].copy_from_slice(payload);
        self.valid_len = payload.len();
        Ok(())
    }

    /// Unmap region. Handle tidak bisa dipakai lagi setelah ini.
    pub fn release(self) {
        drop(self);
    }
}

/// `MAP_SHARED` tanpa file: memfd di-size lalu di-map, fd ditutup setelah map
#[cfg(target_os = "linux")]
fn map_shared_anon(len: usize) -> io::Result<MmapMut> {
    use std::fs::File;
    use std::os::fd::{FromRawFd, OwnedFd};

    let fd = unsafe { libc::memfd_create(c"cornflake-arena".as_ptr(), libc::MFD_CLOEXEC) };
    if fd < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: fd baru dari memfd_create, belum dimiliki siapa pun
    let file = File::from(unsafe { OwnedFd::from_raw_fd(fd) });
    file.set_len(len as u64)?;

    // SAFETY: memfd hanya dikenal mapping ini, tidak ada yang truncate dari luar
    unsafe { MmapOptions::new().len(len).populate().map_mut(&file) }
}

/// Platform tanpa memfd: anonymous mapping biasa (private)
#[cfg(not(target_os = "linux"))]
fn map_shared_anon(len: usize) -> io::Result<MmapMut> {
    MmapOptions::new().len(len).populate().map_anon()
}

impl Drop for Arena {
    fn drop(&mut self) {
        // MmapMut melakukan munmap sendiri setelah ini
        debug!(
            base = ?self.mmap.as_ptr(),
            capacity = self.mmap.len(),
            "arena released"
        );
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("base", &self.base_address())
            .field("capacity", &self.capacity())
            .field("valid_len", &self.valid_len)
            .finish()
    }
}
