//! Reusable payload buffers
//!
//! Each worker borrows a byte buffer for the duration of one job and hands
//! it back afterwards. Buffers keep their grown capacity across jobs, so
//! allocation cost is paid roughly once per worker rather than once per
//! page.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Initial capacity of a freshly allocated payload buffer.
const BUFFER_CAPACITY: usize = 32 * 1024;

/// Free list of payload buffers shared by the worker pool.
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
    allocated: AtomicU64,
}

impl BufferPool {
    pub fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            allocated: AtomicU64::new(0),
        }
    }

    /// Takes a buffer from the pool, allocating a fresh one when none is
    /// free. The returned buffer is always empty.
    pub fn acquire(&self) -> Vec<u8> {
        if let Some(buf) = self.free.lock().unwrap().pop() {
            return buf;
        }
        self.allocated.fetch_add(1, Ordering::Relaxed);
        Vec::with_capacity(BUFFER_CAPACITY)
    }

    /// Returns a buffer to the pool, cleared but with capacity retained.
    pub fn release(&self, mut buf: Vec<u8>) {
        buf.clear();
        self.free.lock().unwrap().push(buf);
    }

    /// Total buffers allocated over the lifetime of the pool.
    pub fn allocated(&self) -> u64 {
        self.allocated.load(Ordering::Relaxed)
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_allocates_when_empty() {
        let pool = BufferPool::new();
        let buf = pool.acquire();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= BUFFER_CAPACITY);
        assert_eq!(pool.allocated(), 1);
    }

    #[test]
    fn test_release_then_acquire_reuses() {
        let pool = BufferPool::new();
        let mut buf = pool.acquire();
        buf.extend_from_slice(b"payload bytes");
        pool.release(buf);

        let buf = pool.acquire();
        assert!(buf.is_empty());
        assert_eq!(pool.allocated(), 1);
    }

    #[test]
    fn test_capacity_survives_reuse() {
        let pool = BufferPool::new();
        let mut buf = pool.acquire();
        buf.resize(BUFFER_CAPACITY * 4, 0);
        pool.release(buf);

        let buf = pool.acquire();
        assert!(buf.capacity() >= BUFFER_CAPACITY * 4);
    }

    #[test]
    fn test_allocated_counts_misses_only() {
        let pool = BufferPool::new();
        let a = pool.acquire();
        let b = pool.acquire();
        assert_eq!(pool.allocated(), 2);

        pool.release(a);
        pool.release(b);
        let _a = pool.acquire();
        let _b = pool.acquire();
        assert_eq!(pool.allocated(), 2);
    }
}
