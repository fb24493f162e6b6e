//! Encode and decode fixed-width byte telegrams with declarative field
//! layouts.
//!
//! # Overview
//!
//! Many legacy interchange formats are flat byte records: every field owns a
//! fixed number of bytes, or a number of bytes announced by an earlier field,
//! with nested sub-records and repeating groups laid out inline. This crate
//! converts such telegrams to and from plain Rust structs, driven by a
//! per-type [`Layout`] registered once and consulted on every call:
//!
//! - Decode walks the layout in declared field order over a forward-only
//!   [`Source`] cursor, building a fresh instance. Input that runs short is
//!   tolerated: remaining fields keep their defaults.
//! - Encode mirrors the walk, padding every field to its width with the
//!   selected [`Alignment`] and filling short lists with default elements, so
//!   the output reproduces the original byte boundaries exactly.
//!
//! # Supported Field Types
//!
//! Elementary fields hold `String`, `bool`, fixed-size integers, floats,
//! chrono calendar/time values (with a required format pattern),
//! `chrono::Month` (as its ordinal), or raw bytes; see [`FieldValue`] for
//! custom value types. Structural fields embed another [`Telegram`] type in
//! place or repeat one as a list with a literal or field-referenced count.
//!
//! # Example
//!
//! ```
//! use flatwire::{Alignment, Codec, Field, Layout, Source, Telegram, Width};
//! use std::sync::LazyLock;
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct Greeting {
//!     tag: String,
//!     count: u32,
//! }
//!
//! static GREETING: LazyLock<Layout<Greeting>> = LazyLock::new(|| {
//!     Layout::builder()
//!         .field(Field::scalar(
//!             "tag",
//!             Width::Fixed(4),
//!             |g: &Greeting| g.tag.clone(),
//!             |g, v| g.tag = v,
//!         ))
//!         .field(Field::scalar(
//!             "count",
//!             Width::Fixed(3),
//!             |g: &Greeting| g.count,
//!             |g, v| g.count = v,
//!         ))
//!         .build()
//! });
//!
//! impl Telegram for Greeting {
//!     fn layout() -> &'static Layout<Self> {
//!         &GREETING
//!     }
//! }
//!
//! let codec = Codec::new();
//! let mut source = Source::new(&b"HI  42 "[..]);
//! let greeting: Greeting = codec.decode(&mut source).unwrap();
//! assert_eq!(greeting.tag, "HI");
//! assert_eq!(greeting.count, 42);
//!
//! let encoded = codec.encode(&greeting, Alignment::Left).unwrap();
//! assert_eq!(&encoded[..], b"HI  42 ");
//! ```
//!
//! # Example (Dynamic Counts)
//!
//! Widths and repeat counts may reference an earlier integer field of the
//! same record; the reference is validated when the layout is built.
//!
//! ```
//! use flatwire::{Codec, Count, Field, Layout, Source, Telegram, Width};
//! use std::sync::LazyLock;
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct Line {
//!     text: String,
//! }
//!
//! static LINE: LazyLock<Layout<Line>> = LazyLock::new(|| {
//!     Layout::builder()
//!         .field(Field::scalar(
//!             "text",
//!             Width::Fixed(5),
//!             |l: &Line| l.text.clone(),
//!             |l, v| l.text = v,
//!         ))
//!         .build()
//! });
//!
//! impl Telegram for Line {
//!     fn layout() -> &'static Layout<Self> {
//!         &LINE
//!     }
//! }
//!
//! #[derive(Debug, Default, Clone, PartialEq)]
//! struct Batch {
//!     count: u16,
//!     lines: Vec<Line>,
//! }
//!
//! static BATCH: LazyLock<Layout<Batch>> = LazyLock::new(|| {
//!     Layout::builder()
//!         .field(Field::scalar(
//!             "count",
//!             Width::Fixed(2),
//!             |b: &Batch| b.count,
//!             |b, v| b.count = v,
//!         ))
//!         .field(Field::list(
//!             "lines",
//!             Count::ByField("count"),
//!             |b: &Batch| b.lines.as_slice(),
//!             |b, v| b.lines = v,
//!         ))
//!         .build()
//! });
//!
//! impl Telegram for Batch {
//!     fn layout() -> &'static Layout<Self> {
//!         &BATCH
//!     }
//! }
//!
//! let codec = Codec::new();
//! let mut source = Source::new(&b"2 ab   cd   "[..]);
//! let batch: Batch = codec.decode(&mut source).unwrap();
//! assert_eq!(batch.count, 2);
//! assert_eq!(batch.lines.len(), 2);
//! assert_eq!(batch.lines[0].text, "ab");
//! assert_eq!(batch.lines[1].text, "cd");
//! ```

pub mod align;
pub mod charset;
pub mod codec;
pub mod error;
pub mod schema;
pub mod source;
pub mod value;

// Re-export main types and traits
pub use align::Alignment;
pub use charset::Charset;
pub use codec::{Codec, Extension, DEFAULT_MAX_DEPTH};
pub use error::{Error, ValueError};
pub use schema::{Count, Field, Layout, LayoutBuilder, Telegram, Width};
pub use source::Source;
pub use value::FieldValue;
