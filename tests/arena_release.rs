//! Mapping arena benar-benar hilang setelah release
//!
//! Satu test per binary: tidak ada thread lain yang bisa me-mmap ulang
//! alamat yang sama di antara release dan pengecekan.

use cornflake::core::{Arena, PAGE_SIZE};

/// `mincore` gagal dengan ENOMEM untuk range yang tidak ter-map
#[cfg(target_os = "linux")]
fn is_mapped(addr: *const u8, len: usize) -> bool {
    let pages = len.div_ceil(PAGE_SIZE);
    let mut vec = vec![0u8; pages];
    let rc = unsafe { libc::mincore(addr as *mut libc::c_void, len, vec.as_mut_ptr()) };
    rc == 0
}

#[cfg(target_os = "linux")]
#[test]
fn release_unmaps_region() {
    let arena = Arena::reserve(4096 * 1000).unwrap();
    let base = arena.base_address();
    let len = arena.capacity();

    assert_eq!(base as usize % PAGE_SIZE, 0);
    assert!(is_mapped(base, len));

    arena.release();
    // `arena` sudah di-move: arena.base_address() tidak bisa dikompilasi lagi

    assert!(!is_mapped(base, len));
}
