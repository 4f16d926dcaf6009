use alloc::string::String;
use alloc::vec::Vec;
use tracing::trace;

use crate::arg::Arg;
use crate::error::FormatError;
use crate::printf;

/// Capacity of the first rendering attempt.
pub const INITIAL_CAPACITY: usize = 128;
/// The first attempt reports the exact size, so the second always fits.
pub const MAX_ATTEMPTS: usize = 2;

/// Renders a printf template into a freshly allocated, right-sized byte string.
///
/// The bytes are exactly what C's `vsnprintf` would write for the same
/// template and arguments, minus the terminating NUL. Output that fits in
/// [`INITIAL_CAPACITY`] is rendered once; anything longer is rendered a second
/// time into a buffer of the size the first attempt reported.
///
/// Where C would return a negative length, this returns the error: output
/// past [`printf::MAX_OUTPUT_LEN`] is [`FormatError::Overflow`]. Callers that
/// want the process to stop on a bad render use
/// [`stringprintf!`](crate::stringprintf), which panics instead.
///
/// ```rust
/// use piece_pool::arg::Arg;
/// use piece_pool::format::format_into_owned_string;
///
/// let s = format_into_owned_string("%d-%s", &[Arg::from(42), Arg::from("x")]).unwrap();
/// assert_eq!(s, b"42-x");
///
/// let wide = format_into_owned_string("%0500d", &[Arg::from(7)]).unwrap();
/// assert_eq!(wide.len(), 500);
/// assert!(wide.ends_with(b"0007"));
/// ```
pub fn format_into_owned_string(
    format: impl AsRef<[u8]>,
    args: &[Arg<'_>],
) -> Result<Vec<u8>, FormatError> {
    let format = format.as_ref();
    let mut buf: Vec<u8> = Vec::new();
    let mut capacity = INITIAL_CAPACITY;

    for attempt in 1..=MAX_ATTEMPTS {
        buf.try_reserve_exact(capacity)?;
        let needed = printf::render_uninit(&mut buf.spare_capacity_mut()[..capacity], format, args)?;
        if needed < capacity {
            // SAFETY: render_uninit initialized `needed` bytes (plus a NUL) from the start
            unsafe { buf.set_len(needed) };
            buf.shrink_to_fit();
            return Ok(buf);
        }
        trace!(attempt, needed, capacity, "formatted output did not fit, resizing");
        capacity = needed + 1;
    }

    unreachable!("rendering reported a different length on the retry")
}

/// [`format_into_owned_string`] for templates whose output must be UTF-8.
pub fn format_to_string(format: impl AsRef<[u8]>, args: &[Arg<'_>]) -> Result<String, FormatError> {
    let bytes = format_into_owned_string(format, args)?;
    Ok(String::from_utf8(bytes)?)
}
