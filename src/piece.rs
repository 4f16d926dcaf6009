use core::cmp::Ordering;
use core::fmt;
use core::hash::Hash;
use core::hash::Hasher;
use core::marker::PhantomData;
use core::ops::Deref;
use core::ptr::NonNull;
use core::slice;
use core::str::Utf8Error;

/// A non-owning `(pointer, length)` view over bytes that live for `'a`.
///
/// Copying a piece never copies the bytes and never extends their lifetime.
/// The pointer is never null, an empty piece points at a dangling but
/// well aligned address.
///
/// Equality, ordering and hashing look at the bytes, not the address.
/// Use [`StringPiece::data`] when identity matters.
///
/// ```rust
/// use piece_pool::piece::StringPiece;
///
/// let text = String::from("foo/bar.c");
/// let piece = StringPiece::from(text.as_str());
///
/// assert_eq!(piece.size(), 9);
/// assert_eq!(piece.find_byte(b'/', 0), Some(3));
/// assert_eq!(piece.substr(4, usize::MAX), "bar.c");
/// assert_eq!(piece.data(), text.as_ptr());
/// ```
#[derive(Clone, Copy)]
pub struct StringPiece<'a> {
    ptr: NonNull<u8>,
    len: usize,
    _ph: PhantomData<&'a [u8]>,
}

unsafe impl Send for StringPiece<'_> {}
unsafe impl Sync for StringPiece<'_> {}

impl<'a> StringPiece<'a> {
    /// The empty piece.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            _ph: PhantomData,
        }
    }

    #[inline]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self {
            // SAFETY: slice pointers are never null
            ptr: unsafe { NonNull::new_unchecked(bytes.as_ptr() as *mut u8) },
            len: bytes.len(),
            _ph: PhantomData,
        }
    }

    /// Builds a piece straight from a pointer and a length.
    ///
    /// # Safety
    /// `ptr` must be non-null and valid for reads of `len` bytes for all of `'a`,
    /// and nothing may mutate those bytes while the piece (or a copy) is alive.
    #[inline]
    pub const unsafe fn from_raw_parts(ptr: *const u8, len: usize) -> Self {
        Self {
            ptr: unsafe { NonNull::new_unchecked(ptr as *mut u8) },
            len,
            _ph: PhantomData,
        }
    }

    /// Start of the viewed bytes.
    #[inline(always)]
    pub const fn data(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Number of viewed bytes.
    #[inline(always)]
    pub const fn size(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The viewed bytes, borrowed for the full lifetime of the piece.
    #[inline]
    pub const fn as_bytes(&self) -> &'a [u8] {
        // SAFETY: the constructors guarantee `ptr` is readable for `len` bytes during 'a
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn to_str(&self) -> Result<&'a str, Utf8Error> {
        core::str::from_utf8(self.as_bytes())
    }

    /// At most `n` bytes starting at `pos`; out of range positions give an empty piece.
    pub fn substr(&self, pos: usize, n: usize) -> StringPiece<'a> {
        let bytes = self.as_bytes();
        if pos >= bytes.len() {
            return StringPiece::empty();
        }
        let rest = &bytes[pos..];
        StringPiece::new(&rest[..n.min(rest.len())])
    }

    #[inline]
    pub fn starts_with(&self, prefix: impl AsRef<[u8]>) -> bool {
        self.as_bytes().starts_with(prefix.as_ref())
    }

    #[inline]
    pub fn ends_with(&self, suffix: impl AsRef<[u8]>) -> bool {
        self.as_bytes().ends_with(suffix.as_ref())
    }

    /// First occurrence of `needle` at or after `pos`.
    pub fn find(&self, needle: impl AsRef<[u8]>, pos: usize) -> Option<usize> {
        let hay = self.as_bytes();
        let needle = needle.as_ref();
        if pos > hay.len() {
            return None;
        }
        if needle.is_empty() {
            return Some(pos);
        }
        hay[pos..]
            .windows(needle.len())
            .position(|w| w == needle)
            .map(|i| i + pos)
    }

    pub fn find_byte(&self, b: u8, pos: usize) -> Option<usize> {
        let hay = self.as_bytes();
        hay.get(pos..)?.iter().position(|&x| x == b).map(|i| i + pos)
    }

    /// Last occurrence of `needle` starting at or before `pos`.
    pub fn rfind(&self, needle: impl AsRef<[u8]>, pos: usize) -> Option<usize> {
        let hay = self.as_bytes();
        let needle = needle.as_ref();
        if hay.len() < needle.len() {
            return None;
        }
        let last = pos.min(hay.len() - needle.len());
        if needle.is_empty() {
            return Some(last);
        }
        hay[..last + needle.len()]
            .windows(needle.len())
            .rposition(|w| w == needle)
    }

    pub fn rfind_byte(&self, b: u8, pos: usize) -> Option<usize> {
        let hay = self.as_bytes();
        if hay.is_empty() {
            return None;
        }
        let last = pos.min(hay.len() - 1);
        hay[..=last].iter().rposition(|&x| x == b)
    }

    /// First byte at or after `pos` that is one of `set`.
    pub fn find_first_of(&self, set: impl AsRef<[u8]>, pos: usize) -> Option<usize> {
        let table = ByteSet::new(set.as_ref());
        let hay = self.as_bytes();
        hay.get(pos..)?
            .iter()
            .position(|&b| table.contains(b))
            .map(|i| i + pos)
    }

    /// First byte at or after `pos` that is not one of `set`.
    pub fn find_first_not_of(&self, set: impl AsRef<[u8]>, pos: usize) -> Option<usize> {
        let table = ByteSet::new(set.as_ref());
        let hay = self.as_bytes();
        hay.get(pos..)?
            .iter()
            .position(|&b| !table.contains(b))
            .map(|i| i + pos)
    }

    /// Last byte at or before `pos` that is one of `set`.
    pub fn find_last_of(&self, set: impl AsRef<[u8]>, pos: usize) -> Option<usize> {
        let table = ByteSet::new(set.as_ref());
        let hay = self.as_bytes();
        if hay.is_empty() {
            return None;
        }
        hay[..=pos.min(hay.len() - 1)]
            .iter()
            .rposition(|&b| table.contains(b))
    }

    /// Last byte at or before `pos` that is not one of `set`.
    pub fn find_last_not_of(&self, set: impl AsRef<[u8]>, pos: usize) -> Option<usize> {
        let table = ByteSet::new(set.as_ref());
        let hay = self.as_bytes();
        if hay.is_empty() {
            return None;
        }
        hay[..=pos.min(hay.len() - 1)]
            .iter()
            .rposition(|&b| !table.contains(b))
    }
}

/// 256 bit lookup table for the `find_*_of` family.
struct ByteSet([u64; 4]);

impl ByteSet {
    #[inline]
    fn new(set: &[u8]) -> Self {
        let mut bits = [0u64; 4];
        for &b in set {
            bits[(b >> 6) as usize] |= 1 << (b & 63);
        }
        Self(bits)
    }

    #[inline]
    fn contains(&self, b: u8) -> bool {
        self.0[(b >> 6) as usize] & (1 << (b & 63)) != 0
    }
}

impl Default for StringPiece<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for StringPiece<'_> {
    type Target = [u8];
    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for StringPiece<'_> {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<'a> From<&'a [u8]> for StringPiece<'a> {
    #[inline]
    fn from(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for StringPiece<'a> {
    #[inline]
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::new(bytes)
    }
}

impl<'a> From<&'a str> for StringPiece<'a> {
    #[inline]
    fn from(s: &'a str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl<'a> From<&'a alloc::string::String> for StringPiece<'a> {
    #[inline]
    fn from(s: &'a alloc::string::String) -> Self {
        Self::new(s.as_bytes())
    }
}

impl PartialEq for StringPiece<'_> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
impl Eq for StringPiece<'_> {}

impl PartialEq<[u8]> for StringPiece<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}
impl PartialEq<&[u8]> for StringPiece<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == *other
    }
}
impl<const N: usize> PartialEq<&[u8; N]> for StringPiece<'_> {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.as_bytes() == &other[..]
    }
}
impl PartialEq<str> for StringPiece<'_> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
impl PartialEq<&str> for StringPiece<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialOrd for StringPiece<'_> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for StringPiece<'_> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl Hash for StringPiece<'_> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state)
    }
}

impl fmt::Display for StringPiece<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.as_bytes().utf8_chunks() {
            f.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                f.write_str("\u{FFFD}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for StringPiece<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for &b in self.as_bytes() {
            for c in core::ascii::escape_default(b) {
                fmt::Write::write_char(f, c as char)?;
            }
        }
        f.write_str("\"")
    }
}
