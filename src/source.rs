use core::convert::From;

use crate::dyn_str::DynStr;

/// A borrowed byte sequence accepted by the splicing operations of
/// [`DynStr`].
///
/// `Source` closes over the argument shapes that can be appended,
/// prepended, or inserted into a [`DynStr`]: a raw byte slice, a string
/// slice, or the live contents of another buffer. The splicing methods
/// take `impl Into<Source<'_>>`, so the dispatch between these shapes is
/// resolved at compile time rather than inspected at runtime.
///
/// The source length is always taken from the slice or buffer itself,
/// never from a terminator scan.
///
/// # Variants
///
/// 1. [`Bytes`](Source::Bytes): A raw byte slice.
/// 2. [`Str`](Source::Str): A string slice, contributing its UTF-8 bytes.
/// 3. [`Buf`](Source::Buf): A shared borrow of another [`DynStr`],
///    contributing its live bytes (terminator excluded).
///
/// # Examples
///
/// ```rust
/// use dynstr::DynStr;
/// use dynstr::Source;
///
/// let buf = DynStr::from("abc");
/// assert_eq!(Source::from("abc").as_bytes(), b"abc");
/// assert_eq!(Source::from(b"abc").as_bytes(), b"abc");
/// assert_eq!(Source::from(&buf).as_bytes(), b"abc");
/// ```
///
/// Splicing a buffer into itself is rejected by the borrow checker, since
/// the destination is borrowed mutably while the source is borrowed
/// shared:
///
/// ```compile_fail
/// use dynstr::DynStr;
///
/// let mut s = DynStr::from("abc");
/// s.append(&s);
/// ```
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "is_variant", derive(derive_more::IsVariant))]
pub enum Source<'s> {
  /// A raw byte slice.
  Bytes(&'s [u8]),
  /// A string slice, contributing its UTF-8 bytes.
  Str(&'s str),
  /// The live contents of another [`DynStr`].
  Buf(&'s DynStr),
}

impl<'s> Source<'s> {
  /// Returns the bytes this source contributes.
  #[inline]
  pub fn as_bytes(&self) -> &'s [u8] {
    match *self {
      Source::Bytes(b) => b,
      Source::Str(s) => s.as_bytes(),
      Source::Buf(b) => b.as_bytes(),
    }
  }

  /// Returns the number of bytes this source contributes.
  #[inline]
  pub fn len(&self) -> usize {
    self.as_bytes().len()
  }

  /// Returns `true` if this source contributes no bytes.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.as_bytes().is_empty()
  }
}

impl<'s> From<&'s [u8]> for Source<'s> {
  #[inline(always)]
  fn from(bytes: &'s [u8]) -> Self {
    Source::Bytes(bytes)
  }
}

impl<'s, const N: usize> From<&'s [u8; N]> for Source<'s> {
  #[inline(always)]
  fn from(bytes: &'s [u8; N]) -> Self {
    Source::Bytes(bytes)
  }
}

impl<'s> From<&'s str> for Source<'s> {
  #[inline(always)]
  fn from(s: &'s str) -> Self {
    Source::Str(s)
  }
}

impl<'s> From<&'s DynStr> for Source<'s> {
  #[inline(always)]
  fn from(buf: &'s DynStr) -> Self {
    Source::Buf(buf)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn source_from_str() {
    let src = Source::from("abc");
    assert!(matches!(src, Source::Str(..)));
    assert_eq!(src.as_bytes(), b"abc");
    assert_eq!(src.len(), 3);
    assert!(!src.is_empty());
  }

  #[test]
  fn source_from_byte_slice_and_array() {
    let slice: &[u8] = b"xy";
    let src = Source::from(slice);
    assert!(matches!(src, Source::Bytes(..)));
    assert_eq!(src.as_bytes(), b"xy");

    // array references dispatch to the Bytes variant as well
    let src = Source::from(b"xy");
    assert!(matches!(src, Source::Bytes(..)));
    assert_eq!(src.as_bytes(), b"xy");
  }

  #[test]
  fn source_from_buffer_borrows_live_bytes() {
    let buf = DynStr::from("live");
    let src = Source::from(&buf);
    assert!(matches!(src, Source::Buf(..)));
    assert_eq!(src.as_bytes(), b"live");
    assert_eq!(src.len(), buf.len());
  }

  #[test]
  fn empty_sources() {
    assert!(Source::from("").is_empty());
    let empty = DynStr::default();
    assert!(Source::from(&empty).is_empty());
    assert_eq!(Source::from(&empty).len(), 0);
  }

  #[cfg(feature = "is_variant")]
  #[test]
  fn source_variant_predicates() {
    let buf = DynStr::from("b");
    assert!(Source::from("s").is_str());
    assert!(Source::from(b"b".as_slice()).is_bytes());
    assert!(Source::from(&buf).is_buf());
  }
}
