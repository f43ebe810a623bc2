//! Completion Queue
//!
//! Setiap push ke transport menghasilkan satu `Completion` (qtoken + panjang frame).
//! Ring buffer dengan kapasitas tetap, slot di-alokasi sekali saat init,
//! tidak ada alokasi di hot path.
//!
//! Producer dan consumer adalah owner yang sama: semua mutasi lewat `&mut self`,
//! jadi queue bisa di-move antar thread tapi tidak bisa di-push dari dua thread
//! sekaligus.
//!
//! ```compile_fail
//! use cornflake::core::{Completion, CompletionQueue};
//!
//! let cq: CompletionQueue<8> = CompletionQueue::new();
//! let shared = &cq;
//! shared.push(Completion { qtoken: 1, len: 8 });
//! ```

/// Satu operasi yang sudah selesai
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Completion {
    /// Token yang dikembalikan ke caller saat push
    pub qtoken: u64,
    /// Panjang frame dalam bytes
    pub len: usize,
}

/// Completion queue dengan kapasitas tetap `N` (power of 2)
#[derive(Debug)]
pub struct CompletionQueue<const N: usize> {
    head: usize,
    tail: usize,
    slots: Box<[Completion]>,
}

impl<const N: usize> Default for CompletionQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CompletionQueue<N> {
    /// # Panics
    /// Panic jika N bukan power of 2
    pub fn new() -> Self {
        assert!(N > 0 && N.is_power_of_two(), "N must be power of 2");

        Self {
            head: 0,
            tail: 0,
            slots: vec![Completion::default(); N].into_boxed_slice(),
        }
    }

    /// `false` jika queue penuh
    #[inline(always)]
    pub fn push(&mut self, completion: Completion) -> bool {
        if self.is_full() {
            return false;
        }

        self.slots[self.head & (N - 1)] = completion;
        self.head = self.head.wrapping_add(1);
        true
    }

    /// `None` jika kosong
    #[inline(always)]
    pub fn pop(&mut self) -> Option<Completion> {
        let completion = self.peek()?;
        self.tail = self.tail.wrapping_add(1);
        Some(completion)
    }

    /// Lihat completion berikutnya tanpa mengonsumsi
    #[inline(always)]
    pub fn peek(&self) -> Option<Completion> {
        if self.is_empty() {
            return None;
        }
        Some(self.slots[self.tail & (N - 1)])
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.head.wrapping_sub(self.tail)
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len() >= N
    }

    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(qtoken: u64, len: usize) -> Completion {
        Completion { qtoken, len }
    }

    #[test]
    fn test_push_pop_order() {
        let mut cq: CompletionQueue<8> = CompletionQueue::new();
        assert!(cq.is_empty());

        assert!(cq.push(completion(1, 64)));
        assert!(cq.push(completion(2, 128)));
        assert_eq!(cq.len(), 2);

        assert_eq!(cq.peek(), Some(completion(1, 64)));
        assert_eq!(cq.pop(), Some(completion(1, 64)));
        assert_eq!(cq.pop(), Some(completion(2, 128)));
        assert_eq!(cq.peek(), None);
        assert_eq!(cq.pop(), None);
    }

    #[test]
    fn test_full_queue_rejects() {
        let mut cq: CompletionQueue<2> = CompletionQueue::new();

        assert!(cq.push(completion(1, 1)));
        assert!(cq.push(completion(2, 1)));
        assert!(cq.is_full());
        assert!(!cq.push(completion(3, 1)));

        // Completion yang ditolak tidak menimpa slot lama
        assert_eq!(cq.pop(), Some(completion(1, 1)));
        assert!(cq.push(completion(3, 1)));
        assert_eq!(cq.pop(), Some(completion(2, 1)));
        assert_eq!(cq.pop(), Some(completion(3, 1)));
    }

    #[test]
    fn test_wraparound_many_rounds() {
        let mut cq: CompletionQueue<4> = CompletionQueue::new();

        for round in 0..16u64 {
            for i in 0..4 {
                assert!(cq.push(completion(round * 4 + i, i as usize)));
            }
            for i in 0..4 {
                assert_eq!(cq.pop().map(|c| c.qtoken), Some(round * 4 + i));
            }
        }
    }

    #[test]
    fn test_handoff_between_threads() {
        let mut cq: CompletionQueue<64> = CompletionQueue::new();
        for qtoken in 0..64u64 {
            assert!(cq.push(completion(qtoken, 8)));
        }

        // Ownership pindah ke thread lain, tidak ada akses bersamaan
        let drained = std::thread::spawn(move || {
            let mut qtokens = Vec::new();
            while let Some(c) = cq.pop() {
                qtokens.push(c.qtoken);
            }
            qtokens
        })
        .join()
        .unwrap();

        assert_eq!(drained, (0..64u64).collect::<Vec<_>>());
    }
}
