//! # dynstr
//!
//! ### Dynamic, null-terminated byte strings (_"dyn-ster"_)
//!
//! This crate provides [`DynStr`], a growable, heap-allocated byte string
//! that keeps a null terminator after its contents at all times and grows
//! its storage in fixed-size blocks with reserved headroom, so that bursts
//! of small mutations do not each pay for a reallocation. It is aimed at
//! constrained/embedded environments where text is built up piecewise from
//! byte fragments and handed to terminator-expecting consumers.
//!
//! ---
//!
//! ## [`DynStr`]
//!
//! An owned byte string with explicit length and capacity bookkeeping.
//! Content can be appended, prepended, or inserted at any position
//! (including Python-style negative, end-relative positions), trimmed
//! against a byte set from either end, case-mapped in place, and classified
//! with ASCII predicates.
//!
//! ### Example
//!
//! ```rust
//! use dynstr::DynStr;
//!
//! let mut s = DynStr::from("Hello");
//! s.append(" world!");
//! s.prepend(">> ");
//! assert_eq!(s, ">> Hello world!");
//! assert_eq!(s.len(), 15);
//! ```
//!
//! ## [`Source`]
//!
//! The [`Source`] enum is the closed set of argument shapes accepted by the
//! splicing operations: a raw byte slice, a string slice, or another
//! [`DynStr`]. Anything convertible into a `Source` can be appended,
//! prepended, or inserted, with the dispatch resolved at compile time.
//!
//! ### Example
//!
//! ```rust
//! use dynstr::DynStr;
//!
//! let tail = DynStr::from("67");
//! let mut s = DynStr::from("12");
//! s.append("345");
//! s.append(&tail);
//! s.append(b"89");
//! assert_eq!(s, "123456789");
//! ```
//!
//! ---
//!
//! ## Capacity policy
//!
//! Storage is always a multiple of [`BLOCK`] bytes, and every reallocation
//! leaves at least [`EXTRA`] bytes of headroom beyond the terminator slot.
//! Appending one byte at a time therefore reallocates once per block's
//! worth of content rather than once per byte.
//!
//! ---
//!
//! ## `no_std` Support
//!
//! The crate is `no_std` by default and only requires the `alloc` crate,
//! making it suitable for embedded systems and other resource-constrained
//! applications.
//!
//! ---
//!
//! ## Features
//!
//! - `std`: Enables integration with the Rust standard library. When
//!   disabled, which is the default, the crate operates in `no_std` mode.
//! - `serde`†: Enables serialization and deserialization support via Serde.
//! - `is_variant`†: Derives variant predicates (`is_bytes()`, `is_str()`,
//!   `is_buf()`) on [`Source`].
//!
//! > † enabled by default

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;
extern crate core;

pub mod dyn_str;
pub mod source;

pub use dyn_str::*;
pub use source::*;
