// ───────────── BOUNDED WRITER (vsnprintf style sink) ────────────────────
use core::fmt;
use core::marker::PhantomData;
use core::mem::MaybeUninit;
use core::ptr;
use core::slice;

/// A byte sink over a fixed buffer that keeps counting after it runs out of room.
///
/// This is the storage contract of C's `vsnprintf`: at most `capacity - 1`
/// bytes are stored, one slot is reserved for the NUL that [`finish`](Self::finish)
/// writes, and [`total`](Self::total) reports how long the output would have
/// been without truncation. Running out of room is never an error.
///
/// The internal pointer is only written through, never read, so the backing
/// slice may start out uninitialized.
///
/// # Layout
///
/// ```text
///   base
///     │
///     ▼
///   [ w w w w ... free ... | nul ]
///             ▲              ▲
///             └─ len         └─ reserved terminator slot
/// ```
///
/// # Example
///
/// ```rust
/// use piece_pool::sink::BoundedWriter;
/// use core::fmt::Write;
///
/// let mut buf = [0u8; 8];
/// let mut w = BoundedWriter::from_bytes(&mut buf);
/// write!(w, "{}-{}", "hello", 42).unwrap();
///
/// assert_eq!(w.written(), b"hello-4");
/// assert_eq!(w.total(), 8);
/// assert!(w.is_truncated());
/// assert_eq!(w.finish(), 8);
/// assert_eq!(&buf, b"hello-4\0");
/// ```
pub struct BoundedWriter<'mem> {
    base: *mut u8,
    cap: usize,   // full slot count, terminator included
    len: usize,   // bytes actually stored
    total: usize, // bytes offered so far
    _ph: PhantomData<&'mem mut [MaybeUninit<u8>]>,
}

impl<'mem> BoundedWriter<'mem> {
    /// Creates an empty writer over possibly uninitialized memory.
    #[inline]
    pub const fn from_slice(raw: &'mem mut [MaybeUninit<u8>]) -> Self {
        Self {
            base: raw.as_mut_ptr() as *mut u8,
            cap: raw.len(),
            len: 0,
            total: 0,
            _ph: PhantomData,
        }
    }

    /// Creates an empty writer over an initialized buffer.
    #[inline]
    pub fn from_bytes(raw: &'mem mut [u8]) -> Self {
        // SAFETY: only initialized bytes are ever written, so the buffer stays initialized
        let raw = unsafe { &mut *(raw as *mut [u8] as *mut [MaybeUninit<u8>]) };
        Self::from_slice(raw)
    }

    /// Bytes that can still be stored before truncation starts.
    #[inline]
    pub fn room_left(&self) -> usize {
        self.cap.saturating_sub(1) - self.len
    }

    /// Bytes stored so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes offered so far, stored or not.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.total > self.len
    }

    #[inline]
    pub fn push(&mut self, b: u8) {
        self.total = self.total.saturating_add(1);
        if self.room_left() == 0 {
            return;
        }
        unsafe {
            self.base.add(self.len).write(b);
        }
        self.len += 1;
    }

    #[inline]
    pub fn push_slice(&mut self, src: &[u8]) {
        self.total = self.total.saturating_add(src.len());
        let n = src.len().min(self.room_left());
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), self.base.add(self.len), n);
        }
        self.len += n;
    }

    /// Offers `count` copies of `b`; only the part that fits is touched.
    #[inline]
    pub fn push_repeat(&mut self, b: u8, count: usize) {
        self.total = self.total.saturating_add(count);
        let n = count.min(self.room_left());
        unsafe {
            ptr::write_bytes(self.base.add(self.len), b, n);
        }
        self.len += n;
    }

    /// The stored prefix of the output.
    #[inline]
    pub fn written(&self) -> &[u8] {
        // SAFETY: the first `len` slots were written by the push methods
        unsafe { slice::from_raw_parts(self.base, self.len) }
    }

    /// Terminates the stored bytes with a NUL (if there is any room at all)
    /// and returns the untruncated length.
    #[inline]
    pub fn finish(self) -> usize {
        if self.cap > 0 {
            unsafe {
                self.base.add(self.len).write(0);
            }
        }
        self.total
    }
}

impl fmt::Write for BoundedWriter<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_slice(s.as_bytes());
        Ok(())
    }
}
