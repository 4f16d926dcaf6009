//! A C `printf` template renderer with `vsnprintf` semantics.
//!
//! Directives follow `%[flags][width][.precision][length]conversion`. The
//! supported conversions are `d i u o x X c s p f F e E g G a A %`. Integer
//! arguments are narrowed by the length modifier exactly as a C callee would
//! read them out of a `va_list` (`hh` 8 bits, `h` 16, none 32, anything
//! longer 64).
//!
//! Templates and `%s` arguments are C strings: both end at their first NUL.

use core::mem::MaybeUninit;

use crate::arg::Arg;
use crate::error::FormatError;
use crate::float;
use crate::sink::BoundedWriter;

/// The longest output `vsnprintf` can report, its return type is `int`.
pub const MAX_OUTPUT_LEN: usize = i32::MAX as usize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Flags {
    pub left: bool,
    pub plus: bool,
    pub space: bool,
    pub alt: bool,
    pub zero: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Length {
    Char,
    Short,
    Int,
    Long,
    LongLong,
    LongDouble,
    IntMax,
    Size,
    PtrDiff,
}

/// One parsed `%` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Directive {
    pub flags: Flags,
    pub width: usize,
    pub precision: Option<usize>,
    pub length: Length,
    pub conversion: u8,
    /// byte offset of the `%`
    pub offset: usize,
}

/// Renders `format` into `buf` the way `vsnprintf(buf, buf.len(), ...)` does.
///
/// At most `buf.len() - 1` bytes of output are stored followed by a NUL
/// (nothing at all is written into an empty buffer). The return value is the
/// length the complete output needs, so `ret >= buf.len()` means it was
/// truncated.
///
/// ```rust
/// use piece_pool::arg::Arg;
/// use piece_pool::printf::vsnprintf;
///
/// let mut buf = [0u8; 8];
/// let n = vsnprintf(&mut buf, b"%s=%04x", &[Arg::from("id"), Arg::from(0xbeefu32)]).unwrap();
/// assert_eq!(n, 7);
/// assert_eq!(&buf, b"id=beef\0");
/// ```
pub fn vsnprintf(buf: &mut [u8], format: &[u8], args: &[Arg<'_>]) -> Result<usize, FormatError> {
    let mut out = BoundedWriter::from_bytes(buf);
    render(&mut out, format, args)?;
    Ok(out.finish())
}

/// Length of the rendered output without storing any of it, the
/// `snprintf(NULL, 0, ...)` idiom.
pub fn formatted_len(format: &[u8], args: &[Arg<'_>]) -> Result<usize, FormatError> {
    let mut nothing: [MaybeUninit<u8>; 0] = [];
    let mut out = BoundedWriter::from_slice(&mut nothing);
    render(&mut out, format, args)?;
    Ok(out.total())
}

/// `vsnprintf` over possibly uninitialized storage, used to fill spare
/// `Vec` capacity without zeroing it first.
pub(crate) fn render_uninit(
    buf: &mut [MaybeUninit<u8>],
    format: &[u8],
    args: &[Arg<'_>],
) -> Result<usize, FormatError> {
    let mut out = BoundedWriter::from_slice(buf);
    render(&mut out, format, args)?;
    Ok(out.finish())
}

pub(crate) fn render(
    out: &mut BoundedWriter<'_>,
    format: &[u8],
    args: &[Arg<'_>],
) -> Result<(), FormatError> {
    let format = until_nul(format);
    let mut args = ArgCursor { args, next: 0 };
    let mut pos = 0;
    while pos < format.len() {
        let Some(skip) = format[pos..].iter().position(|&b| b == b'%') else {
            out.push_slice(&format[pos..]);
            break;
        };
        out.push_slice(&format[pos..pos + skip]);
        let (directive, next) = parse_directive(format, pos + skip, &mut args)?;
        emit(out, &directive, &mut args)?;
        pos = next;
    }
    if out.total() > MAX_OUTPUT_LEN {
        return Err(FormatError::Overflow);
    }
    Ok(())
}

#[inline]
pub(crate) fn until_nul(s: &[u8]) -> &[u8] {
    match s.iter().position(|&b| b == 0) {
        Some(end) => &s[..end],
        None => s,
    }
}

/// Walks the argument pack in the order C reads a `va_list`.
pub(crate) struct ArgCursor<'s, 'a> {
    args: &'s [Arg<'a>],
    next: usize,
}

impl<'a> ArgCursor<'_, 'a> {
    fn take(&mut self, conversion: u8) -> Result<(usize, Arg<'a>), FormatError> {
        let index = self.next;
        let arg = *self
            .args
            .get(index)
            .ok_or(FormatError::MissingArgument {
                index,
                conversion: conversion as char,
            })?;
        self.next += 1;
        Ok((index, arg))
    }

    fn mismatch(index: usize, conversion: u8, arg: &Arg<'_>) -> FormatError {
        FormatError::ArgumentMismatch {
            index,
            conversion: conversion as char,
            found: arg.kind(),
        }
    }

    /// A `*` width or precision, read as a C `int`.
    fn star(&mut self) -> Result<i32, FormatError> {
        let (index, arg) = self.take(b'*')?;
        arg.int_bits()
            .map(|bits| bits as i32)
            .ok_or_else(|| Self::mismatch(index, b'*', &arg))
    }

    fn integer(&mut self, conversion: u8) -> Result<u64, FormatError> {
        let (index, arg) = self.take(conversion)?;
        arg.int_bits()
            .ok_or_else(|| Self::mismatch(index, conversion, &arg))
    }

    fn float(&mut self, conversion: u8) -> Result<f64, FormatError> {
        match self.take(conversion)? {
            (_, Arg::Float(v)) => Ok(v),
            (index, arg) => Err(Self::mismatch(index, conversion, &arg)),
        }
    }

    fn bytes(&mut self, conversion: u8) -> Result<&'a [u8], FormatError> {
        match self.take(conversion)? {
            (_, Arg::Str(s)) => Ok(s),
            (index, arg) => Err(Self::mismatch(index, conversion, &arg)),
        }
    }

    fn pointer(&mut self, conversion: u8) -> Result<usize, FormatError> {
        match self.take(conversion)? {
            (_, Arg::Ptr(p)) => Ok(p),
            (index, arg) => Err(Self::mismatch(index, conversion, &arg)),
        }
    }
}

/// Parses the directive whose `%` sits at `offset`, consuming `*` arguments.
/// Returns the directive and the index just past its conversion byte.
fn parse_directive(
    format: &[u8],
    offset: usize,
    args: &mut ArgCursor<'_, '_>,
) -> Result<(Directive, usize), FormatError> {
    let mut i = offset + 1;

    let mut flags = Flags::default();
    while let Some(&b) = format.get(i) {
        match b {
            b'-' => flags.left = true,
            b'+' => flags.plus = true,
            b' ' => flags.space = true,
            b'#' => flags.alt = true,
            b'0' => flags.zero = true,
            // thousands grouping, nothing to group in the C locale
            b'\'' => {}
            _ => break,
        }
        i += 1;
    }

    let width = if format.get(i) == Some(&b'*') {
        i += 1;
        let w = args.star()?;
        if w < 0 {
            flags.left = true;
        }
        let w = w.unsigned_abs() as usize;
        if w > MAX_OUTPUT_LEN {
            return Err(FormatError::Overflow);
        }
        w
    } else {
        let (w, used) = parse_decimal(&format[i..])?;
        i += used;
        w
    };

    let mut precision = None;
    if format.get(i) == Some(&b'.') {
        i += 1;
        if format.get(i) == Some(&b'*') {
            i += 1;
            let p = args.star()?;
            // a negative precision reads as if none was given
            precision = usize::try_from(p).ok();
        } else {
            let (p, used) = parse_decimal(&format[i..])?;
            i += used;
            precision = Some(p);
        }
    }

    let (length, used) = parse_length(&format[i..]);
    i += used;

    let conversion = *format
        .get(i)
        .ok_or(FormatError::IncompleteDirective { offset })?;

    let directive = Directive {
        flags,
        width,
        precision,
        length,
        conversion,
        offset,
    };
    Ok((directive, i + 1))
}

/// Leading decimal digits of `s`; values past `int` range overflow like
/// glibc's `EOVERFLOW`.
fn parse_decimal(s: &[u8]) -> Result<(usize, usize), FormatError> {
    let mut value: usize = 0;
    let mut used = 0;
    for &b in s.iter().take_while(|b| b.is_ascii_digit()) {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add((b - b'0') as usize))
            .filter(|&v| v <= MAX_OUTPUT_LEN)
            .ok_or(FormatError::Overflow)?;
        used += 1;
    }
    Ok((value, used))
}

fn parse_length(s: &[u8]) -> (Length, usize) {
    match s {
        [b'h', b'h', ..] => (Length::Char, 2),
        [b'h', ..] => (Length::Short, 1),
        [b'l', b'l', ..] => (Length::LongLong, 2),
        [b'l', ..] => (Length::Long, 1),
        [b'q', ..] => (Length::LongLong, 1),
        [b'L', ..] => (Length::LongDouble, 1),
        [b'j', ..] => (Length::IntMax, 1),
        [b'z' | b'Z', ..] => (Length::Size, 1),
        [b't', ..] => (Length::PtrDiff, 1),
        _ => (Length::Int, 0),
    }
}

fn emit(
    out: &mut BoundedWriter<'_>,
    d: &Directive,
    args: &mut ArgCursor<'_, '_>,
) -> Result<(), FormatError> {
    match d.conversion {
        b'%' => out.push(b'%'),
        b'd' | b'i' => {
            let v = narrow_signed(args.integer(d.conversion)?, d.length);
            emit_integer(out, d, v < 0, v.unsigned_abs(), 10);
        }
        b'u' => {
            let v = narrow_unsigned(args.integer(d.conversion)?, d.length);
            emit_integer(out, d, false, v, 10);
        }
        b'o' => {
            let v = narrow_unsigned(args.integer(d.conversion)?, d.length);
            emit_integer(out, d, false, v, 8);
        }
        b'x' | b'X' => {
            let v = narrow_unsigned(args.integer(d.conversion)?, d.length);
            emit_integer(out, d, false, v, 16);
        }
        b'c' if d.length == Length::Long => return Err(unsupported(d)),
        b'c' => {
            let c = args.integer(d.conversion)? as u8;
            emit_padded(out, d.flags, d.width, Pieces::body(&[c]));
        }
        b's' if d.length == Length::Long => return Err(unsupported(d)),
        b's' => {
            let mut s = until_nul(args.bytes(d.conversion)?);
            if let Some(p) = d.precision {
                s = &s[..p.min(s.len())];
            }
            emit_padded(out, d.flags, d.width, Pieces::body(s));
        }
        b'p' => {
            let p = args.pointer(d.conversion)?;
            if p == 0 {
                emit_padded(out, d.flags, d.width, Pieces::body(b"(nil)"));
            } else {
                // `%#x` that keeps the `+` and ` ` flags
                let hex = Directive {
                    flags: Flags {
                        alt: true,
                        ..d.flags
                    },
                    ..*d
                };
                emit_integer(out, &hex, false, p as u64, 16);
            }
        }
        b'f' | b'F' | b'e' | b'E' | b'g' | b'G' | b'a' | b'A' => {
            let v = args.float(d.conversion)?;
            float::emit_float(out, d, v);
        }
        b'n' | b'C' | b'S' | b'm' => return Err(unsupported(d)),
        other => {
            return Err(FormatError::UnknownConversion {
                conversion: other as char,
                offset: d.offset,
            });
        }
    }
    Ok(())
}

fn unsupported(d: &Directive) -> FormatError {
    FormatError::UnsupportedConversion {
        conversion: d.conversion as char,
        offset: d.offset,
    }
}

fn narrow_signed(bits: u64, length: Length) -> i64 {
    match length {
        Length::Char => bits as i8 as i64,
        Length::Short => bits as i16 as i64,
        Length::Int => bits as i32 as i64,
        _ => bits as i64,
    }
}

fn narrow_unsigned(bits: u64, length: Length) -> u64 {
    match length {
        Length::Char => bits as u8 as u64,
        Length::Short => bits as u16 as u64,
        Length::Int => bits as u32 as u64,
        _ => bits,
    }
}

fn emit_integer(out: &mut BoundedWriter<'_>, d: &Directive, negative: bool, magnitude: u64, base: u64) {
    let upper = d.conversion == b'X';
    let signed = matches!(d.conversion, b'd' | b'i' | b'p');

    let mut digit_buf = [0u8; 24];
    let digits: &[u8] = if magnitude == 0 && d.precision == Some(0) {
        &[]
    } else {
        to_digits(magnitude, base, upper, &mut digit_buf)
    };

    let mut prefix = Prefix::default();
    if negative {
        prefix.push(b'-');
    } else if signed && d.flags.plus {
        prefix.push(b'+');
    } else if signed && d.flags.space {
        prefix.push(b' ');
    }
    if base == 16 && d.flags.alt && magnitude != 0 {
        prefix.push(b'0');
        prefix.push(if upper { b'X' } else { b'x' });
    }

    let mut zeros = d.precision.map_or(0, |p| p.saturating_sub(digits.len()));
    if base == 8 && d.flags.alt && zeros == 0 && digits.first() != Some(&b'0') {
        zeros = 1;
    }
    if d.flags.zero && !d.flags.left && d.precision.is_none() {
        let natural = prefix.len() + digits.len();
        zeros = zeros.max(d.width.saturating_sub(natural));
    }

    let pieces = Pieces {
        prefix: prefix.as_bytes(),
        zeros,
        body: digits,
        ..Pieces::default()
    };
    emit_padded(out, d.flags, d.width, pieces);
}

/// Writes `v` in `base` at the end of `buf`, returning the digits.
fn to_digits(mut v: u64, base: u64, upper: bool, buf: &mut [u8; 24]) -> &[u8] {
    let table: &[u8; 16] = if upper {
        b"0123456789ABCDEF"
    } else {
        b"0123456789abcdef"
    };
    let mut at = buf.len();
    loop {
        at -= 1;
        buf[at] = table[(v % base) as usize];
        v /= base;
        if v == 0 {
            break;
        }
    }
    &buf[at..]
}

/// Sign and radix marker placed before zero padding.
#[derive(Default)]
pub(crate) struct Prefix {
    buf: [u8; 3],
    len: usize,
}

impl Prefix {
    #[inline]
    pub fn push(&mut self, b: u8) {
        self.buf[self.len] = b;
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// A converted value in the order it is written:
/// `prefix`, `zeros`, `body`, `trailing_zeros`, `suffix`.
#[derive(Default, Clone, Copy)]
pub(crate) struct Pieces<'a> {
    pub prefix: &'a [u8],
    pub zeros: usize,
    pub body: &'a [u8],
    pub trailing_zeros: usize,
    pub suffix: &'a [u8],
}

impl<'a> Pieces<'a> {
    #[inline]
    pub fn body(body: &'a [u8]) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.prefix
            .len()
            .saturating_add(self.zeros)
            .saturating_add(self.body.len())
            .saturating_add(self.trailing_zeros)
            .saturating_add(self.suffix.len())
    }
}

/// Writes `pieces` padded with spaces to `width`, on the right when `-` was given.
pub(crate) fn emit_padded(out: &mut BoundedWriter<'_>, flags: Flags, width: usize, pieces: Pieces<'_>) {
    let fill = width.saturating_sub(pieces.len());
    if !flags.left {
        out.push_repeat(b' ', fill);
    }
    out.push_slice(pieces.prefix);
    out.push_repeat(b'0', pieces.zeros);
    out.push_slice(pieces.body);
    out.push_repeat(b'0', pieces.trailing_zeros);
    out.push_slice(pieces.suffix);
    if flags.left {
        out.push_repeat(b' ', fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn render_vec(format: &str, args: &[Arg<'_>]) -> Vec<u8> {
        let n = formatted_len(format.as_bytes(), args).unwrap();
        let mut buf = vec![0u8; n + 1];
        assert_eq!(vsnprintf(&mut buf, format.as_bytes(), args).unwrap(), n);
        buf.truncate(n);
        buf
    }

    fn check(format: &str, args: &[Arg<'_>], expected: &str) {
        let got = render_vec(format, args);
        assert_eq!(
            core::str::from_utf8(&got).unwrap(),
            expected,
            "format {format:?}"
        );
    }

    #[test]
    fn plain_text_and_percent() {
        check("hello", &[], "hello");
        check("100%%", &[], "100%");
        check("", &[], "");
        check("a%%b%%", &[], "a%b%");
    }

    #[test]
    fn signed_integers() {
        check("%d", &[Arg::Int(42)], "42");
        check("%i", &[Arg::Int(-42)], "-42");
        check("%5d|%-5d|", &[Arg::Int(7), Arg::Int(7)], "    7|7    |");
        check("%05d", &[Arg::Int(-7)], "-0007");
        check("%+d % d", &[Arg::Int(3), Arg::Int(3)], "+3  3");
        check("%+d", &[Arg::Int(0)], "+0");
        check("%.3d", &[Arg::Int(5)], "005");
        check("%8.3d", &[Arg::Int(-5)], "    -005");
        check("%08.3d", &[Arg::Int(5)], "     005");
        check("%-05d|", &[Arg::Int(5)], "5    |");
        check("%.0d|%+.0d", &[Arg::Int(0), Arg::Int(0)], "|+");
        check("%d", &[Arg::Int(i32::MIN as i64)], "-2147483648");
        check("%lld", &[Arg::Int(i64::MIN)], "-9223372036854775808");
    }

    #[test]
    fn length_modifiers_narrow_like_varargs() {
        check("%d", &[Arg::Int(5_000_000_000)], "705032704");
        check("%ld", &[Arg::Int(5_000_000_000)], "5000000000");
        check("%hhd", &[Arg::Int(300)], "44");
        check("%hd", &[Arg::Int(70000)], "4464");
        check("%hhu", &[Arg::Int(-1)], "255");
        check("%u", &[Arg::Int(-1)], "4294967295");
        check("%zu", &[Arg::Uint(u64::MAX)], "18446744073709551615");
        check("%jd %td", &[Arg::Int(-1), Arg::Int(2)], "-1 2");
    }

    #[test]
    fn unsigned_radixes() {
        check("%x %X", &[Arg::Uint(255), Arg::Uint(255)], "ff FF");
        check("%#x %#X", &[Arg::Uint(255), Arg::Uint(255)], "0xff 0XFF");
        check("%#x", &[Arg::Uint(0)], "0");
        check("%#08x", &[Arg::Uint(255)], "0x0000ff");
        check("%o %#o", &[Arg::Uint(8), Arg::Uint(8)], "10 010");
        check("%#o|%#.0o", &[Arg::Uint(0), Arg::Uint(0)], "0|0");
        check("%#.3o", &[Arg::Uint(8)], "010");
        check("%+u % u", &[Arg::Uint(1), Arg::Uint(1)], "1 1");
        check("%lx", &[Arg::Int(-1)], "ffffffffffffffff");
    }

    #[test]
    fn star_width_and_precision() {
        check("%*d", &[Arg::Int(4), Arg::Int(1)], "   1");
        check("%*d|", &[Arg::Int(-4), Arg::Int(1)], "1   |");
        check("%.*d", &[Arg::Int(3), Arg::Int(1)], "001");
        check("%.*d", &[Arg::Int(-3), Arg::Int(1)], "1");
        check("%*.*s|", &[Arg::Int(6), Arg::Int(2), Arg::from("abc")], "    ab|");
    }

    #[test]
    fn chars_and_strings() {
        check("%c%c%c", &[Arg::Int(b'a' as i64), Arg::Uint(b'b' as u64), Arg::Int(0x163)], "abc");
        check("%3c|%-3c|", &[Arg::Int(b'x' as i64), Arg::Int(b'y' as i64)], "  x|y  |");
        check("%s", &[Arg::from("hi")], "hi");
        check("%5s|%-5s|", &[Arg::from("hi"), Arg::from("hi")], "   hi|hi   |");
        check("%.2s", &[Arg::from("hello")], "he");
        check("%.0s|", &[Arg::from("hello")], "|");
        check("%.10s", &[Arg::from("hi")], "hi");
        check("[%s]", &[Arg::Str(b"ab\0cd")], "[ab]");
    }

    #[test]
    fn nul_char_is_written_and_counted() {
        let out = render_vec("a%cb", &[Arg::Int(0)]);
        assert_eq!(out, b"a\0b");
    }

    #[test]
    fn template_ends_at_nul() {
        check("abc\0%d", &[], "abc");
    }

    #[test]
    fn pointers() {
        check("%p", &[Arg::Ptr(0)], "(nil)");
        check("%8p|", &[Arg::Ptr(0)], "   (nil)|");
        check("%p", &[Arg::Ptr(0xdead_beef)], "0xdeadbeef");
        check("%-12p|", &[Arg::Ptr(0x1f)], "0x1f        |");
    }

    #[test]
    fn pointer_sign_flags() {
        check("% p", &[Arg::Ptr(0x1f)], " 0x1f");
        check("%+p", &[Arg::Ptr(0x1f)], "+0x1f");
        check("%+ p", &[Arg::Ptr(0x1f)], "+0x1f");
        check("% .10p", &[Arg::Ptr(0x1f)], " 0x000000001f");
        check("%.3p", &[Arg::Ptr(0x1f)], "0x01f");
        check("%+020p", &[Arg::Ptr(0x1f)], "+0x0000000000000001f");
        check("%-+10p|", &[Arg::Ptr(0x1f)], "+0x1f     |");
        // null ignores everything but the width
        check("% p", &[Arg::Ptr(0)], "(nil)");
        check("%+020p", &[Arg::Ptr(0)], "               (nil)");
        check("%.3p", &[Arg::Ptr(0)], "(nil)");
    }

    #[test]
    fn vsnprintf_truncates_and_terminates() {
        let mut buf = [0xAAu8; 5];
        let n = vsnprintf(&mut buf, b"%d apples", &[Arg::Int(12)]).unwrap();
        assert_eq!(n, 9);
        assert_eq!(&buf, b"12 a\0");

        let mut empty: [u8; 0] = [];
        assert_eq!(vsnprintf(&mut empty, b"xyz", &[]).unwrap(), 3);
    }

    #[test]
    fn extra_arguments_are_ignored() {
        check("%d", &[Arg::Int(1), Arg::Int(2)], "1");
    }

    #[test]
    fn argument_errors() {
        assert_eq!(
            formatted_len(b"%d %d", &[Arg::Int(1)]),
            Err(FormatError::MissingArgument {
                index: 1,
                conversion: 'd'
            })
        );
        assert_eq!(
            formatted_len(b"%s", &[Arg::Int(1)]),
            Err(FormatError::ArgumentMismatch {
                index: 0,
                conversion: 's',
                found: "an integer"
            })
        );
        assert_eq!(
            formatted_len(b"%*d", &[Arg::from("x"), Arg::Int(1)]),
            Err(FormatError::ArgumentMismatch {
                index: 0,
                conversion: '*',
                found: "a string"
            })
        );
        assert_eq!(
            formatted_len(b"%f", &[Arg::Int(1)]),
            Err(FormatError::ArgumentMismatch {
                index: 0,
                conversion: 'f',
                found: "an integer"
            })
        );
    }

    #[test]
    fn template_errors() {
        assert_eq!(
            formatted_len(b"ab%", &[]),
            Err(FormatError::IncompleteDirective { offset: 2 })
        );
        assert_eq!(
            formatted_len(b"%-5", &[]),
            Err(FormatError::IncompleteDirective { offset: 0 })
        );
        assert_eq!(
            formatted_len(b"x%y", &[]),
            Err(FormatError::UnknownConversion {
                conversion: 'y',
                offset: 1
            })
        );
        assert_eq!(
            formatted_len(b"%n", &[Arg::Ptr(8)]),
            Err(FormatError::UnsupportedConversion {
                conversion: 'n',
                offset: 0
            })
        );
        assert_eq!(
            formatted_len(b"%ls", &[Arg::from("w")]),
            Err(FormatError::UnsupportedConversion {
                conversion: 's',
                offset: 0
            })
        );
    }

    #[test]
    fn oversized_output_overflows() {
        assert_eq!(formatted_len(b"%2147483648d", &[Arg::Int(1)]), Err(FormatError::Overflow));
        assert_eq!(
            formatted_len(b"%2147483647d%d", &[Arg::Int(1), Arg::Int(1)]),
            Err(FormatError::Overflow)
        );
        assert_eq!(
            formatted_len(b"%*d", &[Arg::Int(i32::MIN as i64), Arg::Int(1)]),
            Err(FormatError::Overflow)
        );
        assert_eq!(formatted_len(b"%2147483647d", &[Arg::Int(1)]), Ok(MAX_OUTPUT_LEN));
    }

    #[test]
    fn grouping_flag_is_a_no_op() {
        check("%'d", &[Arg::Int(1234567)], "1234567");
    }

    #[test]
    fn parse_directive_fields() {
        let mut cursor = ArgCursor {
            args: &[Arg::Int(9)],
            next: 0,
        };
        let (d, next) = parse_directive(b"%-+#0*.12llx!", 0, &mut cursor).unwrap();
        assert_eq!(next, 12);
        assert_eq!(d.width, 9);
        assert_eq!(d.precision, Some(12));
        assert_eq!(d.length, Length::LongLong);
        assert_eq!(d.conversion, b'x');
        assert!(d.flags.left && d.flags.plus && d.flags.alt && d.flags.zero);
        assert!(!d.flags.space);
    }
}
