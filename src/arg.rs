use crate::piece::StringPiece;

/// One element of a printf argument pack.
///
/// C varargs carry no type information; an `Arg` does, which is what lets a
/// mismatched directive be reported instead of reading garbage. Integer
/// variants are reinterpreted the way a C callee would read them: `%u` on an
/// `Int(-1)` prints `4294967295`, and the length modifier picks how many low
/// bits count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(&'a [u8]),
    Ptr(usize),
}

impl Arg<'_> {
    /// Human readable name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Arg::Int(_) => "an integer",
            Arg::Uint(_) => "an unsigned integer",
            Arg::Float(_) => "a float",
            Arg::Str(_) => "a string",
            Arg::Ptr(_) => "a pointer",
        }
    }

    /// The raw 64 bits of an integer argument.
    #[inline]
    pub(crate) fn int_bits(&self) -> Option<u64> {
        match *self {
            Arg::Int(v) => Some(v as u64),
            Arg::Uint(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for Arg<'_> {
            #[inline]
            fn from(v: $t) -> Self {
                Arg::Int(v as i64)
            }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for Arg<'_> {
            #[inline]
            fn from(v: $t) -> Self {
                Arg::Uint(v as u64)
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Arg<'_> {
    #[inline]
    fn from(v: f32) -> Self {
        Arg::Float(v as f64)
    }
}

impl From<f64> for Arg<'_> {
    #[inline]
    fn from(v: f64) -> Self {
        Arg::Float(v)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    #[inline]
    fn from(s: &'a str) -> Self {
        Arg::Str(s.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    #[inline]
    fn from(s: &'a [u8]) -> Self {
        Arg::Str(s)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Arg<'a> {
    #[inline]
    fn from(s: &'a [u8; N]) -> Self {
        Arg::Str(s)
    }
}

impl<'a> From<&'a alloc::string::String> for Arg<'a> {
    #[inline]
    fn from(s: &'a alloc::string::String) -> Self {
        Arg::Str(s.as_bytes())
    }
}

impl<'a> From<StringPiece<'a>> for Arg<'a> {
    #[inline]
    fn from(s: StringPiece<'a>) -> Self {
        Arg::Str(s.as_bytes())
    }
}

impl<T: ?Sized> From<*const T> for Arg<'_> {
    #[inline]
    fn from(p: *const T) -> Self {
        Arg::Ptr(p.addr())
    }
}

impl<T: ?Sized> From<*mut T> for Arg<'_> {
    #[inline]
    fn from(p: *mut T) -> Self {
        Arg::Ptr(p.addr())
    }
}
