//! Scatter-Gather Descriptor Set
//!
//! Urutan pasangan (address, length) yang menunjuk ke lokasi fisik payload.
//! Descriptor tidak pernah meng-copy bytes, hanya menyimpan pointer.
//! Lifetime `'a` mengikat descriptor ke memory yang direferensikan
//! (arena untuk send, receive buffer transport untuk recv).

use std::io::IoSlice;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::{Error, Result};

/// Jumlah segment maksimum per descriptor set (inline, tanpa heap)
pub const SGARRAY_MAX_SEGMENTS: usize = 4;

/// Satu segment: pointer + panjang
#[derive(Clone, Copy)]
pub struct SgSegment<'a> {
    addr: NonNull<u8>,
    len: usize,
    _marker: PhantomData<&'a [u8]>,
}

impl<'a> SgSegment<'a> {
    const EMPTY: Self = Self {
        addr: NonNull::dangling(),
        len: 0,
        _marker: PhantomData,
    };

    /// Segment yang menunjuk ke `bytes` (tanpa copy)
    #[inline(always)]
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        Self {
            addr: NonNull::from(bytes).cast(),
            len: bytes.len(),
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    pub fn addr(&self) -> *const u8 {
        self.addr.as_ptr()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// View ke bytes yang direferensikan (zero-copy)
    #[inline(always)]
    pub fn as_slice(&self) -> &'a [u8] {
        // SAFETY: dibangun dari from_slice (range valid selama 'a) atau EMPTY (len 0)
        unsafe { std::slice::from_raw_parts(self.addr.as_ptr(), self.len) }
    }
}

impl std::fmt::Debug for SgSegment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SgSegment")
            .field("addr", &self.addr)
            .field("len", &self.len)
            .finish()
    }
}

/// Descriptor set dengan kapasitas tetap
#[derive(Clone, Copy)]
pub struct SgArray<'a> {
    segs: [SgSegment<'a>; SGARRAY_MAX_SEGMENTS],
    num_segs: usize,
}

impl Default for SgArray<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> SgArray<'a> {
    /// Descriptor set kosong
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            segs: [SgSegment::EMPTY; SGARRAY_MAX_SEGMENTS],
            num_segs: 0,
        }
    }

    /// Descriptor set dengan satu segment
    #[inline(always)]
    pub fn single(bytes: &'a [u8]) -> Self {
        let mut sga = Self::new();
        sga.segs[0] = SgSegment::from_slice(bytes);
        sga.num_segs = 1;
        sga
    }

    /// Tambah segment di akhir
    #[inline(always)]
    pub fn push(&mut self, seg: SgSegment<'a>) -> Result<()> {
        if self.num_segs == SGARRAY_MAX_SEGMENTS {
            return Err(Error::DescriptorFull {
                max: SGARRAY_MAX_SEGMENTS,
            });
        }
        self.segs[self.num_segs] = seg;
        self.num_segs += 1;
        Ok(())
    }

    #[inline(always)]
    pub fn segments(&self) -> &[SgSegment<'a>] {
        &self.segs[..self.num_segs]
    }

    #[inline(always)]
    pub fn num_segments(&self) -> usize {
        self.num_segs
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.num_segs == 0
    }

    /// Total bytes dari semua segment
    #[inline(always)]
    pub fn total_len(&self) -> usize {
        self.segments().iter().map(SgSegment::len).sum()
    }

    /// Reset ke kosong untuk reuse
    #[inline(always)]
    pub fn clear(&mut self) {
        self.num_segs = 0;
    }

    /// View untuk vectored write. Hanya `num_segments()` slot pertama yang terisi.
    #[inline(always)]
    pub fn io_slices(&self) -> [IoSlice<'a>; SGARRAY_MAX_SEGMENTS] {
        let mut slices = [IoSlice::new(&[]); SGARRAY_MAX_SEGMENTS];
        for (slot, seg) in slices.iter_mut().zip(self.segments()) {
            *slot = IoSlice::new(seg.as_slice());
        }
        slices
    }
}

impl std::fmt::Debug for SgArray<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.segments()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_segment_aliases_source() {
        let buf = [7u8; 32];
        let sga = SgArray::single(&buf[..16]);

        assert_eq!(sga.num_segments(), 1);
        assert_eq!(sga.segments()[0].addr(), buf.as_ptr());
        assert_eq!(sga.segments()[0].len(), 16);
        assert_eq!(sga.total_len(), 16);
    }

    #[test]
    fn test_push_until_full() {
        let buf = [0u8; 8];
        let mut sga = SgArray::new();
        assert!(sga.is_empty());

        for i in 0..SGARRAY_MAX_SEGMENTS {
            sga.push(SgSegment::from_slice(&buf[i..i + 1])).unwrap();
        }
        assert_eq!(sga.total_len(), SGARRAY_MAX_SEGMENTS);

        let err = sga.push(SgSegment::from_slice(&buf)).unwrap_err();
        assert!(matches!(err, Error::DescriptorFull { max: SGARRAY_MAX_SEGMENTS }));

        sga.clear();
        assert!(sga.is_empty());
    }

    #[test]
    fn test_io_slices_match_segments() {
        let a = b"hello";
        let b = b"world!";
        let mut sga = SgArray::new();
        sga.push(SgSegment::from_slice(a)).unwrap();
        sga.push(SgSegment::from_slice(b)).unwrap();

        let slices = sga.io_slices();
        assert_eq!(&*slices[0], a);
        assert_eq!(&*slices[1], b);
        assert!(slices[2].is_empty());
    }

    #[test]
    fn test_segment_view_of_subslice() {
        let buf = vec![3u8; 10];
        let seg = SgSegment::from_slice(&buf[2..6]);

        assert_eq!(seg.addr(), &buf[2] as *const u8);
        assert_eq!(seg.as_slice(), &[3, 3, 3, 3]);
    }
}
