use alloc::borrow::Borrow;
use alloc::borrow::BorrowMut;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::convert::AsMut;
use core::convert::AsRef;
use core::convert::From;
use core::convert::Infallible;
use core::fmt;
use core::fmt::Display;
use core::fmt::Formatter;
use core::hash::Hash;
use core::hash::Hasher;
use core::ops::Deref;
use core::ops::DerefMut;
use core::str;
use core::str::FromStr;
use core::str::Utf8Error;

use crate::source::Source;

/// Allocation granularity in bytes. Storage is always a whole number of
/// blocks, so repeated small mutations amortize their reallocation cost
/// over a block's worth of content.
pub const BLOCK: usize = 32;

/// Minimum spare capacity kept beyond the live bytes and their terminator
/// slot. Growth triggers before the headroom falls below this margin, so a
/// burst of small appends does not reallocate on every call.
pub const EXTRA: usize = 8;

/// A growable, heap-allocated byte string that is always followed by a
/// null terminator.
///
/// `DynStr` owns its storage exclusively and tracks an explicit length and
/// capacity. After every public operation the byte at index `len` is `0`,
/// so the contents remain readable as a bounded, terminated byte run even
/// by consumers that expect C-style termination. The terminator is never
/// part of the content: it is not reported by [`len`](Self::len) and not
/// visible through [`as_bytes`](Self::as_bytes).
///
/// Content is spliced in from any [`Source`] shape (byte slice, string
/// slice, or another `DynStr`) at the end, the front, or an arbitrary
/// position. Positions may be negative, counting back from the end as in
/// Python. Trimming, ASCII case mapping, and ASCII classification
/// predicates round out the operation set.
///
/// The type is byte-oriented: UTF-8 validity is not an invariant, and the
/// classification predicates use ASCII rules only.
///
/// # Example
///
/// ```rust
/// use dynstr::DynStr;
///
/// let mut s = DynStr::from("Hello");
/// s.append(" world!");
/// assert_eq!(s, "Hello world!");
/// assert_eq!(s.len(), 12);
///
/// s.prepend(">> ");
/// assert_eq!(s, ">> Hello world!");
/// ```
///
/// # Capacity
///
/// Storage is allocated in multiples of [`BLOCK`] bytes and a reallocation
/// always leaves more than [`EXTRA`] bytes spare, in addition to the
/// terminator slot. Capacity only grows; [`clear`](Self::clear) and the
/// trim operations shrink the length but keep the allocation.
pub struct DynStr {
  /// Allocated storage. Its length is the capacity; the bytes at
  /// `[len, capacity)` are the terminator followed by unused headroom.
  buf: Box<[u8]>,
  /// Number of live content bytes. Always strictly less than the
  /// capacity, leaving room for the terminator.
  len: usize,
}

/// Smallest block-rounded capacity that can hold `required` content bytes
/// plus a terminator, with more than `EXTRA` bytes left spare. The second
/// rounding step keeps a buffer that lands exactly on a block boundary
/// from re-growing on the very next one-byte append.
fn rounded_capacity(required: usize) -> usize {
  let with_terminator = required.checked_add(1).expect("capacity overflow");
  let capacity = with_terminator
    .div_ceil(BLOCK)
    .checked_mul(BLOCK)
    .expect("capacity overflow");
  if capacity - required <= EXTRA {
    capacity.checked_add(BLOCK).expect("capacity overflow")
  } else {
    capacity
  }
}

fn zeroed(capacity: usize) -> Box<[u8]> {
  vec![0u8; capacity].into_boxed_slice()
}

impl DynStr {
  /// Creates an empty `DynStr` able to hold at least `capacity` content
  /// bytes before its first reallocation. The actual capacity is rounded
  /// up by the block policy.
  ///
  /// # Example
  ///
  /// ```rust
  /// use dynstr::{BLOCK, DynStr};
  ///
  /// let s = DynStr::with_capacity(10);
  /// assert!(s.is_empty());
  /// assert!(s.capacity() > 10);
  /// assert_eq!(s.capacity() % BLOCK, 0);
  /// ```
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      buf: zeroed(rounded_capacity(capacity)),
      len: 0,
    }
  }

  /// Creates a `DynStr` holding a copy of the source bytes. The source
  /// may be a byte slice, a string slice, or another buffer; copying from
  /// a buffer takes its live bytes only.
  ///
  /// # Example
  ///
  /// ```rust
  /// use dynstr::DynStr;
  ///
  /// let a = DynStr::from_source("abc");
  /// let b = DynStr::from_source(&a);
  /// assert_eq!(a, b);
  /// ```
  pub fn from_source<'a>(src: impl Into<Source<'a>>) -> Self {
    let bytes = src.into().as_bytes();
    let mut buf = Self::with_capacity(bytes.len());
    buf.buf[..bytes.len()].copy_from_slice(bytes);
    buf.len = bytes.len();
    buf
  }

  /// Returns the number of live content bytes, excluding the terminator.
  #[inline]
  pub const fn len(&self) -> usize {
    self.len
  }

  /// Returns `true` if the buffer holds no content.
  #[inline]
  pub const fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Returns the total allocated byte count. Always strictly greater than
  /// [`len`](Self::len) and always a multiple of [`BLOCK`].
  #[inline]
  pub fn capacity(&self) -> usize {
    self.buf.len()
  }

  /// Returns the live content bytes, terminator excluded.
  #[inline]
  pub fn as_bytes(&self) -> &[u8] {
    &self.buf[..self.len]
  }

  /// Returns the live content bytes mutably. The slice covers exactly
  /// `[0, len)`, so writes through it cannot disturb the terminator.
  #[inline]
  pub fn as_bytes_mut(&mut self) -> &mut [u8] {
    &mut self.buf[..self.len]
  }

  /// Returns the contents as a string slice, if they are valid UTF-8.
  #[inline]
  pub fn as_str(&self) -> Result<&str, Utf8Error> {
    str::from_utf8(self.as_bytes())
  }

  /// Empties the buffer. The length drops to zero and the storage is
  /// retained at its current capacity.
  pub fn clear(&mut self) {
    self.len = 0;
    self.buf[0] = 0;
  }

  /// Grows the storage if holding `required` content bytes would leave
  /// the headroom thinner than [`EXTRA`]. Only the live bytes migrate to
  /// the new storage; stale bytes past the terminator never do.
  fn ensure_capacity(&mut self, required: usize) {
    let wanted = required.checked_add(EXTRA).expect("capacity overflow");
    if self.capacity() >= wanted {
      return;
    }
    let mut buf = zeroed(rounded_capacity(required));
    buf[..self.len].copy_from_slice(&self.buf[..self.len]);
    self.buf = buf;
  }

  /// Moves the byte run `[pos, len)` right by `gap` bytes, extends the
  /// length, and re-terminates. The caller must have ensured capacity.
  fn open_gap(&mut self, pos: usize, gap: usize) {
    debug_assert!(self.len + gap < self.capacity());
    self.buf.copy_within(pos..self.len, pos + gap);
    self.len += gap;
    self.buf[self.len] = 0;
  }

  /// Splices `bytes` in so that they begin at `pos`. Every mutating
  /// operation that adds content funnels through here: grow if needed,
  /// open the gap, copy the source in.
  fn splice_at(&mut self, pos: usize, bytes: &[u8]) {
    let required = self.len.checked_add(bytes.len()).expect("capacity overflow");
    self.ensure_capacity(required);
    self.open_gap(pos, bytes.len());
    self.buf[pos..pos + bytes.len()].copy_from_slice(bytes);
  }

  /// Resolves a possibly negative, end-relative position against the
  /// current length. Resolution happens exactly once, on entry to the
  /// public operation that received the position.
  ///
  /// # Panics
  ///
  /// Panics if the resolved position falls outside `[0, len]`.
  fn resolve_pos(&self, pos: isize) -> usize {
    let resolved = if pos >= 0 {
      Some(pos as usize)
    } else {
      self.len.checked_sub(pos.unsigned_abs())
    };
    match resolved {
      Some(p) if p <= self.len => p,
      _ => panic!("position {pos} out of bounds (len {len})", len = self.len),
    }
  }

  /// Appends the source bytes after the current content.
  ///
  /// # Example
  ///
  /// ```rust
  /// use dynstr::DynStr;
  ///
  /// let mut s = DynStr::from("Hello");
  /// s.append(" world!");
  /// assert_eq!(s, "Hello world!");
  /// ```
  pub fn append<'a>(&mut self, src: impl Into<Source<'a>>) {
    let bytes = src.into().as_bytes();
    self.splice_at(self.len, bytes);
  }

  /// Inserts the source bytes before the current content.
  ///
  /// # Example
  ///
  /// ```rust
  /// use dynstr::DynStr;
  ///
  /// let mut s = DynStr::from("world!");
  /// s.prepend("Hello ");
  /// assert_eq!(s, "Hello world!");
  /// ```
  pub fn prepend<'a>(&mut self, src: impl Into<Source<'a>>) {
    let bytes = src.into().as_bytes();
    self.splice_at(0, bytes);
  }

  /// Inserts the source bytes so that they begin at `pos`. A negative
  /// `pos` counts back from the end: `-1` inserts immediately before the
  /// final content byte, and `-len` is equivalent to `0`.
  ///
  /// # Panics
  ///
  /// Panics if `pos` resolves outside `[0, len]`.
  ///
  /// # Example
  ///
  /// ```rust
  /// use dynstr::DynStr;
  ///
  /// let mut s = DynStr::from("This incomplete!");
  /// s.insert("text ", 5);
  /// assert_eq!(s, "This text incomplete!");
  ///
  /// s.insert("was ", 10);
  /// assert_eq!(s, "This text was incomplete!");
  /// ```
  pub fn insert<'a>(&mut self, src: impl Into<Source<'a>>, pos: isize) {
    let bytes = src.into().as_bytes();
    let pos = self.resolve_pos(pos);
    self.splice_at(pos, bytes);
  }

  /// Removes the run of bytes at the **front** of the buffer that are
  /// members of `charset`. The remaining content shifts down and the
  /// length shrinks by the run length.
  ///
  /// Membership is a set test over the bytes of `charset`; their order
  /// and any duplicates are irrelevant.
  ///
  /// # Example
  ///
  /// ```rust
  /// use dynstr::DynStr;
  ///
  /// let mut s = DynStr::from("  indented");
  /// s.trim_leading(" ");
  /// assert_eq!(s, "indented");
  /// ```
  pub fn trim_leading<'a>(&mut self, charset: impl Into<Source<'a>>) {
    let set = charset.into().as_bytes();
    let run = self.as_bytes().iter().take_while(|b| set.contains(b)).count();
    if run > 0 {
      self.buf.copy_within(run..self.len, 0);
      self.len -= run;
      self.buf[self.len] = 0;
    }
  }

  /// Removes the run of bytes at the **back** of the buffer that are
  /// members of `charset`, shrinking the length and re-terminating.
  ///
  /// # Example
  ///
  /// ```rust
  /// use dynstr::DynStr;
  ///
  /// let mut s = DynStr::from("trailing   ");
  /// s.trim_trailing(" ");
  /// assert_eq!(s, "trailing");
  /// ```
  pub fn trim_trailing<'a>(&mut self, charset: impl Into<Source<'a>>) {
    let set = charset.into().as_bytes();
    while self.len > 0 && set.contains(&self.buf[self.len - 1]) {
      self.len -= 1;
    }
    self.buf[self.len] = 0;
  }

  /// Historical alias for [`trim_leading`](Self::trim_leading).
  ///
  /// **Despite the name, this trims the front of the buffer.** The
  /// directionality is an inherited contract: existing callers rely on
  /// `rstrip` removing the leading run, so the behavior is kept verbatim.
  /// New code should call `trim_leading` directly.
  #[inline]
  pub fn rstrip<'a>(&mut self, charset: impl Into<Source<'a>>) {
    self.trim_leading(charset);
  }

  /// Historical alias for [`trim_trailing`](Self::trim_trailing).
  ///
  /// **Despite the name, this trims the back of the buffer.** See
  /// [`rstrip`](Self::rstrip) for why the inverted naming is kept.
  #[inline]
  pub fn lstrip<'a>(&mut self, charset: impl Into<Source<'a>>) {
    self.trim_trailing(charset);
  }

  /// Removes `charset` runs from both ends of the buffer. Applying this
  /// twice with the same charset gives the same result as applying it
  /// once.
  ///
  /// # Example
  ///
  /// ```rust
  /// use dynstr::DynStr;
  ///
  /// let mut s = DynStr::from("   pad   ");
  /// s.strip(" ");
  /// assert_eq!(s, "pad");
  /// ```
  pub fn strip<'a>(&mut self, charset: impl Into<Source<'a>>) {
    let charset = charset.into();
    self.trim_leading(charset);
    self.trim_trailing(charset);
  }

  /// Uppercases every ASCII letter in place. Non-ASCII bytes and
  /// non-letters are left as they are; length and capacity do not change.
  pub fn make_ascii_uppercase(&mut self) {
    self.buf[..self.len].make_ascii_uppercase();
  }

  /// Lowercases every ASCII letter in place. Non-ASCII bytes and
  /// non-letters are left as they are; length and capacity do not change.
  pub fn make_ascii_lowercase(&mut self) {
    self.buf[..self.len].make_ascii_lowercase();
  }

  /// Returns `true` if the content is non-empty and every byte is an
  /// ASCII letter. The empty buffer satisfies none of the classification
  /// predicates.
  pub fn is_alpha(&self) -> bool {
    !self.is_empty() && self.as_bytes().iter().all(u8::is_ascii_alphabetic)
  }

  /// Returns `true` if the content is non-empty and every byte is an
  /// ASCII digit.
  pub fn is_numeric(&self) -> bool {
    !self.is_empty() && self.as_bytes().iter().all(u8::is_ascii_digit)
  }

  /// Returns `true` if the content is non-empty and every byte is an
  /// ASCII letter or digit.
  pub fn is_alnum(&self) -> bool {
    !self.is_empty() && self.as_bytes().iter().all(u8::is_ascii_alphanumeric)
  }

  /// Returns `true` if the content is non-empty and every byte is ASCII
  /// whitespace.
  pub fn is_space(&self) -> bool {
    !self.is_empty() && self.as_bytes().iter().all(u8::is_ascii_whitespace)
  }

  /// Returns `true` if the content begins with the given prefix bytes.
  ///
  /// # Example
  ///
  /// ```rust
  /// use dynstr::DynStr;
  ///
  /// let s = DynStr::from("hello world");
  /// assert!(s.starts_with("hello"));
  /// assert!(!s.starts_with("XXXhello"));
  /// ```
  pub fn starts_with<'a>(&self, prefix: impl Into<Source<'a>>) -> bool {
    self.as_bytes().starts_with(prefix.into().as_bytes())
  }
}

impl Default for DynStr {
  #[inline]
  fn default() -> Self {
    Self::with_capacity(0)
  }
}

impl Clone for DynStr {
  /// Copies the live bytes into freshly block-rounded storage. The
  /// clone's capacity is sized for its content, not inherited.
  #[inline]
  fn clone(&self) -> Self {
    Self::from_source(self)
  }
}

impl Display for DynStr {
  #[inline]
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
  }
}

impl fmt::Debug for DynStr {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "DynStr {s:?}", s = String::from_utf8_lossy(self.as_bytes()))
  }
}

impl Deref for DynStr {
  type Target = [u8];

  #[inline(always)]
  fn deref(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl DerefMut for DynStr {
  #[inline(always)]
  fn deref_mut(&mut self) -> &mut [u8] {
    self.as_bytes_mut()
  }
}

impl AsRef<[u8]> for DynStr {
  #[inline(always)]
  fn as_ref(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl AsMut<[u8]> for DynStr {
  #[inline(always)]
  fn as_mut(&mut self) -> &mut [u8] {
    self.as_bytes_mut()
  }
}

impl Borrow<[u8]> for DynStr {
  #[inline(always)]
  fn borrow(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl BorrowMut<[u8]> for DynStr {
  #[inline(always)]
  fn borrow_mut(&mut self) -> &mut [u8] {
    self.as_bytes_mut()
  }
}

impl From<&str> for DynStr {
  #[inline(always)]
  fn from(s: &str) -> Self {
    Self::from_source(s)
  }
}

impl From<&[u8]> for DynStr {
  #[inline(always)]
  fn from(bytes: &[u8]) -> Self {
    Self::from_source(bytes)
  }
}

impl<const N: usize> From<&[u8; N]> for DynStr {
  #[inline(always)]
  fn from(bytes: &[u8; N]) -> Self {
    Self::from_source(bytes)
  }
}

impl From<&DynStr> for DynStr {
  #[inline(always)]
  fn from(buf: &DynStr) -> Self {
    Self::from_source(buf)
  }
}

impl From<String> for DynStr {
  #[inline(always)]
  fn from(s: String) -> Self {
    Self::from_source(s.as_str())
  }
}

impl From<Vec<u8>> for DynStr {
  #[inline(always)]
  fn from(bytes: Vec<u8>) -> Self {
    Self::from_source(bytes.as_slice())
  }
}

impl From<char> for DynStr {
  #[inline(always)]
  fn from(c: char) -> Self {
    let mut utf8 = [0u8; 4];
    Self::from_source(c.encode_utf8(&mut utf8).as_bytes())
  }
}

impl From<DynStr> for Vec<u8> {
  #[inline(always)]
  fn from(buf: DynStr) -> Self {
    buf.as_bytes().to_vec()
  }
}

impl From<DynStr> for String {
  #[inline(always)]
  fn from(buf: DynStr) -> Self {
    String::from_utf8_lossy(buf.as_bytes()).into_owned()
  }
}

impl FromStr for DynStr {
  type Err = Infallible;

  #[inline(always)]
  fn from_str(s: &str) -> Result<Self, Infallible> {
    Ok(Self::from_source(s))
  }
}

impl PartialEq for DynStr {
  #[inline(always)]
  fn eq(&self, other: &Self) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl Eq for DynStr {}

impl PartialEq<[u8]> for DynStr {
  #[inline(always)]
  fn eq(&self, other: &[u8]) -> bool {
    self.as_bytes() == other
  }
}

impl PartialEq<&[u8]> for DynStr {
  #[inline(always)]
  fn eq(&self, other: &&[u8]) -> bool {
    self.as_bytes() == *other
  }
}

impl<const N: usize> PartialEq<&[u8; N]> for DynStr {
  #[inline(always)]
  fn eq(&self, other: &&[u8; N]) -> bool {
    self.as_bytes() == *other
  }
}

impl PartialEq<str> for DynStr {
  #[inline(always)]
  fn eq(&self, other: &str) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<&str> for DynStr {
  #[inline(always)]
  fn eq(&self, other: &&str) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<String> for DynStr {
  #[inline(always)]
  fn eq(&self, other: &String) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<DynStr> for str {
  #[inline(always)]
  fn eq(&self, other: &DynStr) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<DynStr> for &str {
  #[inline(always)]
  fn eq(&self, other: &DynStr) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialEq<DynStr> for [u8] {
  #[inline(always)]
  fn eq(&self, other: &DynStr) -> bool {
    self == other.as_bytes()
  }
}

impl PartialEq<DynStr> for String {
  #[inline(always)]
  fn eq(&self, other: &DynStr) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl PartialOrd for DynStr {
  #[inline(always)]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for DynStr {
  #[inline(always)]
  fn cmp(&self, other: &Self) -> Ordering {
    self.as_bytes().cmp(other.as_bytes())
  }
}

impl Hash for DynStr {
  #[inline(always)]
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.as_bytes().hash(state);
  }
}

#[cfg(feature = "serde")]
mod serde_impl {
  use core::fmt;

  use serde::Deserialize;
  use serde::Deserializer;
  use serde::Serialize;
  use serde::Serializer;
  use serde::de;

  use super::*;

  impl Serialize for DynStr {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
      S: Serializer,
    {
      match self.as_str() {
        Ok(s) => serializer.serialize_str(s),
        Err(_) => serializer.serialize_bytes(self.as_bytes()),
      }
    }
  }

  struct DynStrVisitor;

  impl<'de> de::Visitor<'de> for DynStrVisitor {
    type Value = DynStr;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
      formatter.write_str("a string or byte sequence")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
      E: de::Error,
    {
      Ok(DynStr::from(v))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
      E: de::Error,
    {
      Ok(DynStr::from(v))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
    where
      E: de::Error,
    {
      Ok(DynStr::from(v))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Self::Value, E>
    where
      E: de::Error,
    {
      Ok(DynStr::from(v))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
      A: de::SeqAccess<'de>,
    {
      let mut buf = DynStr::with_capacity(seq.size_hint().unwrap_or(0));
      while let Some(byte) = seq.next_element::<u8>()? {
        buf.append(&[byte]);
      }
      Ok(buf)
    }
  }

  impl<'de> Deserialize<'de> for DynStr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
      D: Deserializer<'de>,
    {
      deserializer.deserialize_byte_buf(DynStrVisitor)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// The terminator and capacity invariants must hold after every public
  /// operation.
  fn assert_terminated(s: &DynStr) {
    assert!(s.len < s.buf.len(), "no terminator slot reserved");
    assert_eq!(s.buf[s.len], 0, "content is not null-terminated");
  }

  #[test]
  fn from_bytes_round_trips() {
    let s = DynStr::from("Hello");
    assert_eq!(s.len(), 5);
    assert_eq!(s.as_bytes(), b"Hello");
    assert_eq!(s.as_str().unwrap(), "Hello");
    assert_terminated(&s);
  }

  #[test]
  fn append_and_prepend_scenario() {
    let mut s = DynStr::from("Hello");
    s.append(" world!");
    assert_eq!(s, "Hello world!");
    assert_eq!(s.len(), 12);
    assert_terminated(&s);

    s.prepend(">> ");
    assert_eq!(s, ">> Hello world!");
    assert_eq!(s.len(), 15);
    assert_terminated(&s);
  }

  #[test]
  fn append_length_arithmetic() {
    let mut s = DynStr::from("abc");
    let before = s.len();
    s.append("defgh");
    assert_eq!(s.len(), before + 5);
  }

  #[test]
  fn splicing_from_every_source_shape() {
    let other = DynStr::from("67");
    let mut s = DynStr::from("12");
    s.append("345");
    s.append(&other);
    s.append(b"89");
    assert_eq!(s, "123456789");
    assert_terminated(&s);
  }

  #[test]
  fn insert_at_zero_twice_orders_like_prepend() {
    let mut s = DynStr::from("tail");
    s.insert("x", 0);
    s.insert("y", 0);
    assert_eq!(s, "yxtail");
  }

  #[test]
  fn insert_positions_build_digit_run() {
    let mut s = DynStr::from("235679");
    s.insert("1", 0);
    assert_eq!(s, "1235679");
    s.insert("4", 3);
    assert_eq!(s, "12345679");
    s.insert("8", -1);
    assert_eq!(s, "123456789");
    assert_terminated(&s);
  }

  #[test]
  fn insert_negative_one_lands_before_last_byte() {
    let mut s = DynStr::from("ab");
    s.insert("Z", -1);
    assert_eq!(s, "aZb");
  }

  #[test]
  fn insert_at_negative_length_is_prepend() {
    let mut s = DynStr::from("abc");
    s.insert("x", -3);
    assert_eq!(s, "xabc");
  }

  #[test]
  #[should_panic(expected = "out of bounds")]
  fn insert_past_end_panics() {
    let mut s = DynStr::from("abc");
    s.insert("x", 4);
  }

  #[test]
  #[should_panic(expected = "out of bounds")]
  fn insert_before_start_panics() {
    let mut s = DynStr::from("abc");
    s.insert("x", -4);
  }

  #[test]
  fn growth_is_block_rounded_and_amortized() {
    let mut s = DynStr::with_capacity(0);
    let mut capacity = s.capacity();
    let mut reallocs = 0;
    for _ in 0..BLOCK * 3 {
      s.append("x");
      if s.capacity() != capacity {
        reallocs += 1;
        capacity = s.capacity();
      }
    }
    assert_eq!(s.len(), BLOCK * 3);
    assert_eq!(s.capacity() % BLOCK, 0);
    assert!(reallocs <= 3, "one-byte appends reallocated {reallocs} times");
    assert_terminated(&s);
  }

  #[test]
  fn growth_leaves_headroom_past_terminator() {
    let mut s = DynStr::with_capacity(0);
    s.append("0123456789abcdef0123456789abcdef");
    assert!(s.capacity() >= s.len() + EXTRA + 1);
  }

  #[test]
  fn with_capacity_holds_small_appends_without_realloc() {
    let mut s = DynStr::with_capacity(10);
    let capacity = s.capacity();
    s.append("0123456789");
    assert_eq!(s.capacity(), capacity);
    assert_eq!(s, "0123456789");
  }

  #[test]
  fn strip_pads_to_bare_word() {
    let mut s = DynStr::from("   pad   ");
    s.strip(" ");
    assert_eq!(s, "pad");
    assert_terminated(&s);
  }

  #[test]
  fn strip_is_idempotent() {
    let mut once = DynStr::from("  abc  ");
    once.strip(" ");
    let mut twice = once.clone();
    twice.strip(" ");
    assert_eq!(once, twice);
  }

  #[test]
  fn rstrip_trims_the_front() {
    let mut s = DynStr::from("   Some other striping    ");
    s.rstrip(" ");
    assert_eq!(s, "Some other striping    ");
  }

  #[test]
  fn lstrip_trims_the_back() {
    let mut s = DynStr::from("   Some other striping    ");
    s.lstrip(" ");
    assert_eq!(s, "   Some other striping");
    assert_terminated(&s);
  }

  #[test]
  fn trim_names_match_their_direction() {
    let mut leading = DynStr::from("  x  ");
    leading.trim_leading(" ");
    assert_eq!(leading, "x  ");

    let mut trailing = DynStr::from("  x  ");
    trailing.trim_trailing(" ");
    assert_eq!(trailing, "  x");
  }

  #[test]
  fn strip_with_multi_byte_charset() {
    let mut s =
      DynStr::from("  ,!! ..   A more...advanced,,, stripping..  ..,,,     ");
    s.strip(" ,.!");
    assert_eq!(s, "A more...advanced,,, stripping");
  }

  #[test]
  fn trim_trailing_strips_to_empty() {
    let mut s = DynStr::from("    ");
    s.trim_trailing(" ");
    assert!(s.is_empty());
    assert_terminated(&s);
  }

  #[test]
  fn trim_leading_strips_to_empty() {
    let mut s = DynStr::from("    ");
    s.trim_leading(" ");
    assert!(s.is_empty());
    assert_terminated(&s);
  }

  #[test]
  fn case_mapping_is_in_place() {
    let mut s = DynStr::from("HeLlo WoRlD");
    let capacity = s.capacity();
    s.make_ascii_uppercase();
    assert_eq!(s, "HELLO WORLD");
    s.make_ascii_lowercase();
    assert_eq!(s, "hello world");
    assert_eq!(s.len(), 11);
    assert_eq!(s.capacity(), capacity);
  }

  #[test]
  fn case_mapping_skips_non_letters() {
    let mut s = DynStr::from("abc1!");
    s.make_ascii_uppercase();
    assert_eq!(s, "ABC1!");
  }

  #[test]
  fn classification_predicates() {
    assert!(DynStr::from("abc").is_alpha());
    assert!(!DynStr::from("").is_alpha());
    assert!(!DynStr::from("abc1").is_alpha());

    assert!(DynStr::from("1234567890").is_numeric());
    assert!(!DynStr::from("12a").is_numeric());

    assert!(DynStr::from("abc123").is_alnum());
    assert!(!DynStr::from("abc 123").is_alnum());

    assert!(DynStr::from(" \t\r\n").is_space());
    assert!(!DynStr::from(" x ").is_space());
  }

  #[test]
  fn empty_satisfies_no_classification() {
    let s = DynStr::default();
    assert!(s.is_empty());
    assert!(!s.is_alpha());
    assert!(!s.is_numeric());
    assert!(!s.is_alnum());
    assert!(!s.is_space());
  }

  #[test]
  fn clear_keeps_capacity() {
    let mut s = DynStr::from("some content that outgrows one block eventually");
    let capacity = s.capacity();
    s.clear();
    assert!(s.is_empty());
    assert_eq!(s.capacity(), capacity);
    assert_terminated(&s);
  }

  #[test]
  fn clone_copies_content_not_capacity() {
    let mut original = DynStr::with_capacity(BLOCK * 4);
    original.append("abc");
    let copy = original.clone();
    assert_eq!(copy, original);
    assert!(copy.capacity() < original.capacity());
    assert_terminated(&copy);

    original.append("def");
    assert_eq!(copy, "abc");
  }

  #[test]
  fn starts_with_prefix() {
    let s = DynStr::from("hello world");
    assert!(s.starts_with("hello"));
    assert!(s.starts_with(b"hello"));
    assert!(!s.starts_with("XXXhello"));
    assert!(s.starts_with(""));
  }

  #[test]
  fn non_utf8_content_is_allowed() {
    let s = DynStr::from(b"\xff\xfe");
    assert_eq!(s.len(), 2);
    assert!(s.as_str().is_err());
    assert_terminated(&s);
  }

  #[test]
  fn deref_exposes_live_bytes_only() {
    let mut s = DynStr::with_capacity(64);
    s.append("abc");
    assert_eq!(s.iter().count(), 3);
    assert_eq!(s[0], b'a');
    assert!(s.contains(&b'c'));
  }

  #[test]
  fn mutating_through_deref_cannot_break_termination() {
    let mut s = DynStr::from("abc");
    s.as_bytes_mut()[0] = b'x';
    assert_eq!(s, "xbc");
    assert_terminated(&s);
  }

  #[test]
  fn conversions() {
    assert_eq!(DynStr::from('A'), "A");
    assert_eq!(DynStr::from('藏'), "藏".as_bytes());
    assert_eq!(DynStr::from(String::from("owned")), "owned");
    assert_eq!(DynStr::from(vec![1u8, 2, 3]), [1u8, 2, 3].as_slice());

    let parsed: DynStr = "parsed".parse().unwrap();
    assert_eq!(parsed, "parsed");

    let s = DynStr::from("back");
    assert_eq!(String::from(s.clone()), "back");
    assert_eq!(Vec::from(s), b"back".to_vec());
  }

  #[test]
  fn equality_and_ordering() {
    let a = DynStr::from("abc");
    let b = DynStr::from("abc");
    let c = DynStr::from("abd");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a < c);
    assert_eq!(a, "abc");
    assert_eq!("abc", a);
    assert_eq!(a, b"abc");
    assert_eq!(a, String::from("abc"));
  }

  #[test]
  fn hashes_agree_with_content() {
    use std::collections::hash_map::DefaultHasher;

    let a = DynStr::from("abc");
    let b = a.clone();
    let mut h1 = DefaultHasher::new();
    a.hash(&mut h1);
    let mut h2 = DefaultHasher::new();
    b.hash(&mut h2);
    assert_eq!(h1.finish(), h2.finish());
  }

  #[test]
  fn display_and_debug() {
    let s = DynStr::from("Hello");
    assert_eq!(format!("{s}"), "Hello");
    assert_eq!(format!("{s:?}"), "DynStr \"Hello\"");
  }

  #[cfg(feature = "serde")]
  mod serde_tests {
    use super::*;

    #[test]
    fn serializes_utf8_as_a_string() {
      let s = DynStr::from("hi");
      let json = serde_json::to_string(&s).unwrap();
      assert_eq!(json, "\"hi\"");
      let de: DynStr = serde_json::from_str(&json).unwrap();
      assert_eq!(de, s);
    }

    #[test]
    fn serializes_raw_bytes_as_a_sequence() {
      let s = DynStr::from(b"\xff\x00\x10");
      let json = serde_json::to_string(&s).unwrap();
      assert_eq!(json, "[255,0,16]");
      let de: DynStr = serde_json::from_str(&json).unwrap();
      assert_eq!(de, s);
    }
  }
}
