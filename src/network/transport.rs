//! Transport boundary
//!
//! Transport menerima descriptor set untuk dikirim dan menyerahkan descriptor set
//! untuk setiap frame yang diterima. Bytes yang diterima tinggal di buffer milik
//! caller, jadi view hasil `pop` otomatis invalid saat buffer dipakai ulang.

use std::io::{self, IoSlice, Write};

use crate::protocol::SgArray;

/// Libos-style transport untuk echo message
pub trait Transport {
    /// Kirim semua segment di `sga` sebagai satu frame. Returns qtoken.
    fn push(&mut self, sga: &SgArray<'_>) -> io::Result<u64>;

    /// Terima satu frame ke `buf` dan kembalikan descriptor set yang menunjuk ke sana
    fn pop<'b>(&mut self, buf: &'b mut [u8]) -> io::Result<SgArray<'b>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn push(&mut self, sga: &SgArray<'_>) -> io::Result<u64> {
        (**self).push(sga)
    }

    fn pop<'b>(&mut self, buf: &'b mut [u8]) -> io::Result<SgArray<'b>> {
        (**self).pop(buf)
    }
}

/// Vectored write semua segment sampai selesai atau `WouldBlock`
///
/// Returns jumlah bytes yang sudah ditulis. Caller cek terhadap `sga.total_len()`.
pub(crate) fn write_sga<W: Write>(writer: &mut W, sga: &SgArray<'_>) -> io::Result<usize> {
    let mut slices = sga.io_slices();
    let mut bufs = &mut slices[..sga.num_segments()];
    let mut written = 0;

    while !bufs.is_empty() {
        match writer.write_vectored(bufs) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to write descriptor set",
                ));
            }
            Ok(n) => {
                written += n;
                IoSlice::advance_slices(&mut bufs, n);
            }
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    Ok(written)
}

/// Append bytes `sga` mulai dari offset `skip` ke `out`
pub(crate) fn stash_remaining(sga: &SgArray<'_>, mut skip: usize, out: &mut Vec<u8>) {
    for seg in sga.segments() {
        let bytes = seg.as_slice();
        if skip >= bytes.len() {
            skip -= bytes.len();
            continue;
        }
        out.extend_from_slice(&bytes[skip..]);
        skip = 0;
    }
}
