// Floating point conversions: %f %F %e %E %g %G %a %A.
//
// Decimal digits come from core's exact float formatting, which rounds the
// exact binary value half to even just like glibc. Hex digits are cut
// straight out of the IEEE bits.

use alloc::format;
use alloc::string::String;

use crate::printf::{Directive, Pieces, Prefix, emit_padded};
use crate::sink::BoundedWriter;

/// Every finite f64 has at most 1074 fractional decimal digits, anything
/// requested past this is a zero and gets written as padding.
const MAX_FIXED_PRECISION: usize = 1100;
/// Same bound for significant digits after the point in `%e` (at most 767).
const MAX_EXP_PRECISION: usize = 800;
/// Hex digits after the point in a double's mantissa.
const HEX_DIGITS: usize = 13;

#[derive(Default)]
struct Rendered {
    body: String,
    trailing_zeros: usize,
    suffix: String,
}

pub(crate) fn emit_float(out: &mut BoundedWriter<'_>, d: &Directive, v: f64) {
    let upper = d.conversion.is_ascii_uppercase();

    let mut prefix = Prefix::default();
    if v.is_sign_negative() {
        prefix.push(b'-');
    } else if d.flags.plus {
        prefix.push(b'+');
    } else if d.flags.space {
        prefix.push(b' ');
    }

    if !v.is_finite() {
        let body: &[u8] = match (v.is_nan(), upper) {
            (true, false) => b"nan",
            (true, true) => b"NAN",
            (false, false) => b"inf",
            (false, true) => b"INF",
        };
        let pieces = Pieces {
            prefix: prefix.as_bytes(),
            body,
            ..Pieces::default()
        };
        emit_padded(out, d.flags, d.width, pieces);
        return;
    }

    let v = if v.is_sign_negative() { -v } else { v };
    let alt = d.flags.alt;
    let text = match d.conversion {
        b'f' | b'F' => fixed(v, d.precision.unwrap_or(6), alt),
        b'e' | b'E' => exponential(v, d.precision.unwrap_or(6), alt, upper),
        b'g' | b'G' => general(v, d.precision.unwrap_or(6), alt, upper),
        _ => {
            prefix.push(b'0');
            prefix.push(if upper { b'X' } else { b'x' });
            hex(v, d.precision, alt, upper)
        }
    };

    let mut pieces = Pieces {
        prefix: prefix.as_bytes(),
        zeros: 0,
        body: text.body.as_bytes(),
        trailing_zeros: text.trailing_zeros,
        suffix: text.suffix.as_bytes(),
    };
    if d.flags.zero && !d.flags.left {
        pieces.zeros = d.width.saturating_sub(pieces.len());
    }
    emit_padded(out, d.flags, d.width, pieces);
}

fn fixed(v: f64, precision: usize, alt: bool) -> Rendered {
    let shown = precision.min(MAX_FIXED_PRECISION);
    let mut body = format!("{:.*}", shown, v);
    if precision == 0 && alt {
        body.push('.');
    }
    Rendered {
        body,
        trailing_zeros: precision - shown,
        suffix: String::new(),
    }
}

fn exponential(v: f64, precision: usize, alt: bool, upper: bool) -> Rendered {
    let shown = precision.min(MAX_EXP_PRECISION);
    let sci = format!("{:.*e}", shown, v);
    let (mantissa, exp) = split_exponent(&sci);
    let mut body = String::from(mantissa);
    if precision == 0 && alt {
        body.push('.');
    }
    Rendered {
        body,
        trailing_zeros: precision - shown,
        suffix: exponent_suffix(if upper { 'E' } else { 'e' }, exp),
    }
}

fn general(v: f64, precision: usize, alt: bool, upper: bool) -> Rendered {
    let p = precision.max(1);
    let shown = p.min(MAX_EXP_PRECISION);
    // the exponent after rounding to `p` significant digits picks the style
    let sci = format!("{:.*e}", shown - 1, v);
    let (mantissa, x) = split_exponent(&sci);

    let mut text = if x >= -4 && (x as i64) < p as i64 {
        fixed(v, (p as i64 - 1 - x as i64) as usize, alt)
    } else {
        let mut body = String::from(mantissa);
        if p == 1 && alt {
            body.push('.');
        }
        Rendered {
            body,
            trailing_zeros: p - shown,
            suffix: exponent_suffix(if upper { 'E' } else { 'e' }, x),
        }
    };

    if !alt {
        strip_fraction_zeros(&mut text.body);
        text.trailing_zeros = 0;
    }
    text
}

/// Splits core's `1.25e-3` form into mantissa and exponent.
fn split_exponent(sci: &str) -> (&str, i32) {
    sci.split_once('e')
        .and_then(|(m, e)| Some((m, e.parse().ok()?)))
        .unwrap_or((sci, 0))
}

/// C exponents carry a sign and at least two digits.
fn exponent_suffix(marker: char, exp: i32) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{marker}{sign}{:02}", exp.unsigned_abs())
}

fn strip_fraction_zeros(body: &mut String) {
    if !body.contains('.') {
        return;
    }
    let kept = body.trim_end_matches('0').trim_end_matches('.').len();
    body.truncate(kept);
}

fn hex(v: f64, precision: Option<usize>, alt: bool, upper: bool) -> Rendered {
    let bits = v.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (lead, exp) = match (biased, fraction) {
        (0, 0) => (0u64, 0),
        // subnormals keep a zero lead digit and the minimum exponent
        (0, _) => (0, -1022),
        _ => (1, biased - 1023),
    };

    let (lead, frac, digits) = match precision {
        Some(p) if p < HEX_DIGITS => round_hex(lead, fraction, p),
        Some(_) => (lead, fraction, HEX_DIGITS),
        None => {
            let keep = if fraction == 0 {
                0
            } else {
                HEX_DIGITS - (fraction.trailing_zeros() / 4) as usize
            };
            (lead, fraction >> ((HEX_DIGITS - keep) * 4), keep)
        }
    };

    let table: &[u8; 16] = if upper {
        b"0123456789ABCDEF"
    } else {
        b"0123456789abcdef"
    };
    let mut body = String::with_capacity(digits + 2);
    body.push(table[lead as usize] as char);
    if digits > 0 || alt {
        body.push('.');
    }
    for i in 0..digits {
        let nibble = (frac >> (4 * (digits - 1 - i))) & 0xf;
        body.push(table[nibble as usize] as char);
    }

    let marker = if upper { 'P' } else { 'p' };
    let sign = if exp < 0 { '-' } else { '+' };
    Rendered {
        body,
        trailing_zeros: precision.map_or(0, |p| p.saturating_sub(HEX_DIGITS)),
        suffix: format!("{marker}{sign}{}", exp.unsigned_abs()),
    }
}

/// Rounds `lead.fraction` to `p` hex digits, half to even.
/// The lead digit may carry into 2, which is what glibc prints.
fn round_hex(lead: u64, fraction: u64, p: usize) -> (u64, u64, usize) {
    let shift = (HEX_DIGITS - p) * 4;
    let full = (lead << 52) | fraction;
    let rem = full & ((1u64 << shift) - 1);
    let half = 1u64 << (shift - 1);
    let mut kept = full >> shift;
    if rem > half || (rem == half && kept & 1 == 1) {
        kept += 1;
    }
    let frac_bits = p * 4;
    (kept >> frac_bits, kept & ((1u64 << frac_bits) - 1), p)
}
