// ───────────── STRING POOL (owned copies, borrowed pieces) ────────────────
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::Cell;
use core::cell::RefCell;
use core::fmt;
use core::ptr::NonNull;
use tracing::trace;

use crate::error::PoolError;
use crate::piece::StringPiece;

/// An arena of immutable byte strings.
///
/// [`add`](StringPool::add) copies its input into a fresh heap buffer owned by
/// the pool and returns a [`StringPiece`] into that copy. Buffers are never
/// moved, resized or freed one at a time, so every piece stays valid until
/// the pool is dropped (or [`clear`](StringPool::clear)ed, which needs `&mut`
/// and therefore proves no piece is alive). The borrow checker ties each
/// piece to the pool that made it.
///
/// The pool always copies: adding equal contents twice gives two buffers.
///
/// There is no `Clone`, two pools owning the same buffers would free them
/// twice. Moving a pool moves the whole collection.
///
/// ```rust
/// use piece_pool::pool::StringPool;
///
/// let pool = StringPool::new();
/// let mut line = String::from("abc");
/// let saved = pool.add(&line);
///
/// line.replace_range(.., "XYZ");
/// assert_eq!(saved, "abc");
///
/// let a = pool.add("dup");
/// let b = pool.add("dup");
/// assert_eq!(a, b);
/// assert_ne!(a.data(), b.data());
/// ```
pub struct StringPool {
    pool: RefCell<Vec<NonNull<[u8]>>>,
    bytes: Cell<usize>,
}

// the pool owns every buffer outright, nothing is shared with other threads
unsafe impl Send for StringPool {}

impl StringPool {
    #[inline]
    pub const fn new() -> Self {
        Self {
            pool: RefCell::new(Vec::new()),
            bytes: Cell::new(0),
        }
    }

    /// A pool whose bookkeeping has room for `n` strings before it grows.
    #[inline]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            pool: RefCell::new(Vec::with_capacity(n)),
            bytes: Cell::new(0),
        }
    }

    /// Copies `s` into the pool and returns a piece viewing the copy.
    ///
    /// An empty input allocates nothing, the returned piece is empty and its
    /// pointer is dangling but non-null. It still counts towards [`len`](Self::len).
    ///
    /// Allocation failure goes to the global allocation error handler.
    ///
    /// Dropping the piece leaves an unreachable copy behind, so it is `#[must_use]`:
    ///
    /// ```compile_fail
    /// #![deny(unused_must_use)]
    /// let pool = piece_pool::StringPool::new();
    /// pool.add("lost");
    /// ```
    #[inline]
    #[must_use]
    pub fn add(&self, s: impl AsRef<[u8]>) -> StringPiece<'_> {
        self.keep(Box::from(s.as_ref()))
    }

    /// [`add`](Self::add), reporting allocation failure instead of aborting.
    #[must_use = "the piece is the only way to read the copy"]
    pub fn try_add(&self, s: impl AsRef<[u8]>) -> Result<StringPiece<'_>, PoolError> {
        let s = s.as_ref();
        let mut copy = Vec::new();
        copy.try_reserve_exact(s.len())?;
        copy.extend_from_slice(s);
        self.pool.borrow_mut().try_reserve(1)?;
        Ok(self.keep(copy.into_boxed_slice()))
    }

    /// [`add`](Self::add) for text.
    #[inline]
    #[must_use]
    pub fn add_str(&self, s: &str) -> &str {
        let piece = self.add(s.as_bytes());
        // SAFETY: the piece is a byte for byte copy of a `str`
        unsafe { core::str::from_utf8_unchecked(piece.as_bytes()) }
    }

    fn keep(&self, copy: Box<[u8]>) -> StringPiece<'_> {
        let len = copy.len();
        let raw = NonNull::from(Box::leak(copy));
        self.pool.borrow_mut().push(raw);
        self.bytes.set(self.bytes.get() + len);
        // SAFETY: the buffer is owned by `self` and lives, unmoved and unmodified,
        // until `self` is dropped or cleared through `&mut`
        unsafe { StringPiece::from_raw_parts(raw.as_ptr() as *const u8, len) }
    }

    /// Number of strings added since creation or the last clear.
    #[inline]
    pub fn len(&self) -> usize {
        self.pool.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes held by the pool's buffers.
    #[inline]
    pub fn bytes_allocated(&self) -> usize {
        self.bytes.get()
    }

    /// Every stored string, in the order it was added.
    pub fn iter(&self) -> impl Iterator<Item = StringPiece<'_>> + '_ {
        let count = self.len();
        (0..count).map(move |i| {
            let raw = self.pool.borrow()[i];
            // SAFETY: same ownership argument as in `keep`
            unsafe { StringPiece::from_raw_parts(raw.as_ptr() as *const u8, raw.len()) }
        })
    }

    /// Frees every buffer and leaves the pool empty but usable.
    pub fn clear(&mut self) {
        self.release();
        self.bytes.set(0);
    }

    fn release(&mut self) {
        let pool = self.pool.get_mut();
        if pool.is_empty() {
            return;
        }
        trace!(
            buffers = pool.len(),
            bytes = self.bytes.get(),
            "releasing string pool"
        );
        for raw in pool.drain(..) {
            // SAFETY: every entry came from `Box::leak` in `keep` and is released once
            drop(unsafe { Box::from_raw(raw.as_ptr()) });
        }
    }
}

impl Drop for StringPool {
    fn drop(&mut self) {
        self.release();
    }
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringPool")
            .field("len", &self.len())
            .field("bytes", &self.bytes.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    fn disjoint(a: StringPiece<'_>, b: StringPiece<'_>) -> bool {
        let (a0, a1) = (a.data() as usize, a.data() as usize + a.size());
        let (b0, b1) = (b.data() as usize, b.data() as usize + b.size());
        a1 <= b0 || b1 <= a0
    }

    #[test]
    fn copy_is_not_an_alias() {
        let pool = StringPool::new();
        let mut src = vec![b'a', b'b', b'c'];
        let saved = pool.add(&src);
        assert_ne!(saved.data(), src.as_ptr());

        src.copy_from_slice(b"XYZ");
        assert_eq!(saved, "abc");
        assert_eq!(src, b"XYZ");
    }

    #[test]
    fn duplicates_get_their_own_storage() {
        let pool = StringPool::new();
        let a = pool.add("dup");
        let b = pool.add("dup");
        assert_eq!(a, "dup");
        assert_eq!(b, "dup");
        assert_ne!(a.data(), b.data());
        assert!(disjoint(a, b));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.bytes_allocated(), 6);
    }

    #[test]
    fn empty_input() {
        let pool = StringPool::new();
        let e = pool.add("");
        assert_eq!(e.size(), 0);
        assert!(!e.data().is_null());
        assert_eq!(e.as_bytes(), b"");
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.bytes_allocated(), 0);
        drop(pool);
    }

    #[test]
    fn pieces_stay_valid_while_the_pool_grows() {
        let pool = StringPool::with_capacity(1);
        let first = pool.add("first");
        let mut others = vec![];
        for i in 0..1000 {
            let s = alloc::format!("entry-{i}");
            others.push(pool.add(&s));
        }
        assert_eq!(first, "first");
        for (i, p) in others.iter().enumerate() {
            assert_eq!(p.to_str().unwrap(), alloc::format!("entry-{i}"));
            assert!(disjoint(first, *p));
        }
        assert_eq!(pool.len(), 1001);
    }

    #[test]
    fn pieces_from_pieces() {
        let pool = StringPool::new();
        let owned = String::from("path/to/file.c");
        let dir = StringPiece::from(&owned).substr(0, 7);
        let saved = pool.add(dir);
        drop(owned);
        assert_eq!(saved, "path/to");
    }

    #[test]
    fn add_str_and_try_add() {
        let pool = StringPool::default();
        let s: &str = pool.add_str("héllo");
        assert_eq!(s, "héllo");
        let t = pool.try_add(b"bytes").unwrap();
        assert_eq!(t, "bytes");
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn iter_in_insertion_order() {
        let pool = StringPool::new();
        for w in ["a", "", "bc", "a"] {
            let _ = pool.add(w);
        }
        let seen: vec::Vec<_> = pool.iter().map(|p| p.as_bytes()).collect();
        assert_eq!(seen, [&b"a"[..], &b""[..], &b"bc"[..], &b"a"[..]]);
    }

    #[test]
    fn clear_frees_and_keeps_working() {
        let mut pool = StringPool::new();
        let _ = pool.add("one");
        let _ = pool.add("two");
        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.bytes_allocated(), 0);
        let p = pool.add("three");
        assert_eq!(p, "three");
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn moving_the_pool_moves_the_storage() {
        let pool = StringPool::new();
        let addr = pool.add("moved").data() as usize;
        let boxed = alloc::boxed::Box::new(pool);
        let again: vec::Vec<_> = boxed.iter().collect();
        assert_eq!(again.len(), 1);
        assert_eq!(again[0].data() as usize, addr);
        assert_eq!(again[0], "moved");
    }

    #[test]
    fn debug_reports_counts() {
        let pool = StringPool::new();
        let _ = pool.add("abcd");
        assert_eq!(alloc::format!("{pool:?}"), "StringPool { len: 1, bytes: 4 }");
    }
}
