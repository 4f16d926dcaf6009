#![no_std]
/*!
This crate provides two small string helpers for tools that juggle a lot of short-lived text:
a pool that keeps copies of byte strings alive and hands out cheap borrowed views into them,
and a printf style formatter that returns an owned, right-sized string.

Both work on bytes rather than `str`, since the text they are meant for (makefiles, paths,
command lines) is not guaranteed to be UTF-8. Only `alloc` is needed.

# Examples

## Using `StringPool`

`StringPool::add` copies its input and returns a `StringPiece`, a `(pointer, length)` view
that borrows the pool. The pool frees everything at once when it is dropped.

```rust
use piece_pool::pool::StringPool;
use piece_pool::piece::StringPiece;

let pool = StringPool::new();

// 1. Copy some transient text into the pool.
let mut scratch = String::from("CFLAGS := -O2");
let line = pool.add(&scratch);
scratch.clear();

// 2. The piece does not care what happened to the original.
assert_eq!(line, "CFLAGS := -O2");

// 3. Pieces are Copy, so slicing them is free.
let name = line.substr(0, line.find_byte(b' ', 0).unwrap());
assert_eq!(name, "CFLAGS");

// 4. Every add is a fresh copy, even for equal contents.
let a = pool.add("dup");
let b = pool.add("dup");
assert_eq!(a, b);
assert_ne!(a.data(), b.data());
assert_eq!(pool.len(), 3);

// 5. Empty input is fine, the piece is empty but never null.
let empty: StringPiece<'_> = pool.add("");
assert_eq!(empty.size(), 0);
```

## Using `stringprintf!`

`stringprintf!` takes a C template and converts each argument with `Arg::from`.
The output is byte for byte what `vsnprintf` would produce.

```rust
use piece_pool::stringprintf;

assert_eq!(stringprintf!("hello"), b"hello");
assert_eq!(stringprintf!("%d-%s", 42, "x"), b"42-x");
assert_eq!(stringprintf!("%-6s|%5.2f|%#x", "ab", 3.14159, 255u32), b"ab    | 3.14|0xff");

let long = stringprintf!("%0500d", 7);
assert_eq!(long.len(), 500);
assert!(long.ends_with(b"0007"));
```

A template the arguments do not satisfy is a programming error and panics; use
`try_stringprintf!` to get the `FormatError` instead.

```rust
use piece_pool::error::FormatError;
use piece_pool::try_stringprintf;

let err = try_stringprintf!("%s", 5).unwrap_err();
assert!(matches!(err, FormatError::ArgumentMismatch { index: 0, .. }));
```

## Using `BoundedWriter`

The sink underneath the formatter is usable on its own, for example to render into a stack buffer.

```rust
use piece_pool::arg::Arg;
use piece_pool::printf::vsnprintf;

let mut buf = [0u8; 6];
let needed = vsnprintf(&mut buf, b"%s!", &[Arg::from("truncated")]).unwrap();
assert_eq!(needed, 10);
assert_eq!(&buf, b"trunc\0");
```
*/
extern crate alloc;

pub mod arg;
pub mod error;
mod float;
pub mod format;
pub mod piece;
pub mod pool;
pub mod printf;
pub mod sink;

pub use arg::Arg;
pub use error::{FormatError, PoolError};
pub use format::format_into_owned_string;
pub use piece::StringPiece;
pub use pool::StringPool;

/// Renders a printf template into an owned `Vec<u8>`, panicking if the
/// arguments do not fit the template.
#[macro_export]
macro_rules! stringprintf {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        match $crate::try_stringprintf!($fmt $(, $arg)*) {
            ::core::result::Result::Ok(s) => s,
            ::core::result::Result::Err(e) => ::core::panic!("stringprintf: {}", e),
        }
    };
}

/// Like [`stringprintf!`] but returns `Result<Vec<u8>, FormatError>`.
#[macro_export]
macro_rules! try_stringprintf {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        $crate::format::format_into_owned_string($fmt, &[$($crate::arg::Arg::from($arg)),*])
    };
}

#[cfg(test)]
mod tests {
    use crate::pool::StringPool;

    #[test]
    fn macros_build_the_argument_pack() {
        assert_eq!(stringprintf!(""), b"");
        assert_eq!(stringprintf!("%s=%u", "n", 3u8,), b"n=3");
        let pool = StringPool::new();
        let name = pool.add("obj");
        assert_eq!(stringprintf!("%s/%s.o", name, "x"), b"obj/x.o");
        assert!(try_stringprintf!("%d %d", 1).is_err());
    }

    #[test]
    #[should_panic(expected = "stringprintf: missing argument 0 for %d")]
    fn stringprintf_panics_on_bad_arguments() {
        let _ = stringprintf!("%d");
    }
}
