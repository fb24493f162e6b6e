//! The conversion engine.
//!
//! [`Codec`] owns the call-independent configuration (charset, extension
//! hooks, recursion limit) and drives the two traversals: decode walks a
//! [`Layout`] in declared field order against a forward-only [`Source`],
//! encode mirrors the walk into a [`BytesMut`]. Both share width/count
//! resolution with the layout itself.

use crate::align::Alignment;
use crate::charset::Charset;
use crate::error::{Error, ValueError};
use crate::schema::{Access, Field, Layout, Telegram, Width};
use crate::source::Source;
use crate::value::FieldValue;
use bytes::{Bytes, BytesMut};
use core::fmt;
use std::any::{type_name, Any, TypeId};
use tracing::trace;

/// Default bound on embedded/list recursion depth.
///
/// The layout graph must be acyclic; the guard turns a cyclic or degenerate
/// configuration into [`Error::DepthExceeded`] instead of stack exhaustion.
pub const DEFAULT_MAX_DEPTH: usize = 64;

type AppliesFn = Box<dyn Fn(TypeId) -> bool + Send + Sync>;
type ParseFn = Box<dyn Fn(TypeId, &str) -> Result<Box<dyn Any>, String> + Send + Sync>;
type RenderFn = Box<dyn Fn(&dyn Any) -> Result<String, String> + Send + Sync>;

/// Injected custom value handling.
///
/// The predicate and the parse/render pair are consulted by value coercion
/// before built-in dispatch, so an extension can take over any scalar field
/// type, including ones that already have a built-in implementation. Hook
/// failures surface as [`ValueError::Custom`] wrapped in the uniform error.
pub struct Extension {
    applies: AppliesFn,
    parse: ParseFn,
    render: RenderFn,
}

impl Extension {
    /// Builds an extension from a type predicate and a parse/render pair.
    ///
    /// `parse` receives the trimmed field text and must return a boxed value
    /// of the exact field type it was asked for; `render` receives the field
    /// value and produces its text form.
    pub fn new(
        applies: impl Fn(TypeId) -> bool + Send + Sync + 'static,
        parse: impl Fn(TypeId, &str) -> Result<Box<dyn Any>, String> + Send + Sync + 'static,
        render: impl Fn(&dyn Any) -> Result<String, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            applies: Box::new(applies),
            parse: Box::new(parse),
            render: Box::new(render),
        }
    }
}

/// Bidirectional converter between flat byte telegrams and typed records.
///
/// A codec is immutable and shareable; decode and encode calls are
/// synchronous and run to completion. Each decode call consumes bytes from
/// its own [`Source`] cursor.
pub struct Codec {
    charset: Charset,
    extension: Option<Extension>,
    max_depth: usize,
}

impl Codec {
    /// A codec using [`Charset::UTF_8`].
    pub fn new() -> Self {
        Self::with_charset(Charset::UTF_8)
    }

    /// A codec using the given charset.
    pub fn with_charset(charset: Charset) -> Self {
        Self {
            charset,
            extension: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Installs custom value handling.
    pub fn extension(mut self, extension: Extension) -> Self {
        self.extension = Some(extension);
        self
    }

    /// Overrides the recursion depth limit.
    pub fn max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }

    /// The configured charset.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Decodes one telegram from the source.
    ///
    /// Fields are consumed in declared order. A source that runs short is
    /// not an error: remaining elementary and embedded fields keep their
    /// defaults and remaining list fields become empty.
    pub fn decode<T: Telegram>(&self, source: &mut Source) -> Result<T, Error> {
        self.decode_at(source, 0)
    }

    /// Encodes one telegram, padding each field per `alignment`.
    ///
    /// Total for any well-formed record graph: absent optional values encode
    /// as empty padded segments (or nothing, when ignorable), absent embedded
    /// records as fresh defaults, and short lists are filled with defaults up
    /// to the configured count.
    pub fn encode<T: Telegram>(
        &self,
        instance: &T,
        alignment: Alignment,
    ) -> Result<BytesMut, Error> {
        let mut out = BytesMut::new();
        self.encode_at(instance, &mut out, alignment, 0)?;
        Ok(out)
    }

    /// Reads `len` bytes (fewer if the source runs short) and decodes them
    /// to trimmed text, for ad hoc fields outside the structured model.
    pub fn read_text(&self, source: &mut Source, len: usize) -> String {
        let raw = source.take(len);
        self.charset.decode(&raw).trim().to_owned()
    }

    pub(crate) fn decode_at<T: Telegram>(
        &self,
        source: &mut Source,
        depth: usize,
    ) -> Result<T, Error> {
        if depth >= self.max_depth {
            return Err(Error::DepthExceeded(self.max_depth));
        }
        let layout = T::layout();
        trace!(
            telegram = type_name::<T>(),
            remaining = source.remaining(),
            "decoding telegram"
        );
        let mut instance = T::default();
        for field in layout.fields() {
            match &field.access {
                Access::List { count, decode, .. } => {
                    let n = if source.is_empty() {
                        0
                    } else {
                        layout.resolve_count(&instance, field.name, count)?
                    };
                    decode(self, &mut instance, source, n, depth + 1)?;
                }
                _ if source.is_empty() => continue,
                Access::Record { decode, .. } => decode(self, &mut instance, source, depth + 1)?,
                Access::Bytes { set, .. } => {
                    let raw = self.take_field(layout, &instance, field, source)?;
                    set(&mut instance, raw.to_vec());
                }
                Access::Scalar { read, .. } => {
                    let raw = self.take_field(layout, &instance, field, source)?;
                    let text = self.charset.decode(&raw);
                    let text = text.trim();
                    if !text.is_empty() {
                        read(&mut instance, text, field.format, self)?;
                    }
                }
            }
        }
        Ok(instance)
    }

    pub(crate) fn encode_at<T: Telegram>(
        &self,
        instance: &T,
        out: &mut BytesMut,
        alignment: Alignment,
        depth: usize,
    ) -> Result<(), Error> {
        if depth >= self.max_depth {
            return Err(Error::DepthExceeded(self.max_depth));
        }
        let layout = T::layout();
        trace!(telegram = type_name::<T>(), "encoding telegram");
        for field in layout.fields() {
            if field.ignorable && !field.is_present(instance) {
                continue;
            }
            match &field.access {
                Access::List { count, encode, .. } => {
                    let n = layout.resolve_count(instance, field.name, count)?;
                    encode(self, instance, out, alignment, n, depth + 1)?;
                }
                Access::Record { encode, .. } => {
                    encode(self, instance, out, alignment, depth + 1)?
                }
                Access::Bytes { get, .. } => {
                    let width = self.pad_width(layout, instance, field)?;
                    alignment.write_padded(&get(instance), width, self.charset.space(), out);
                }
                Access::Scalar { write, .. } => {
                    let text = write(instance, field.format, self)?.unwrap_or_default();
                    let width = self.pad_width(layout, instance, field)?;
                    alignment.write_padded(
                        &self.charset.encode(&text),
                        width,
                        self.charset.space(),
                        out,
                    );
                }
            }
        }
        Ok(())
    }

    /// Coerces trimmed field text to a typed value, extension hook first.
    pub(crate) fn coerce<V: FieldValue>(
        &self,
        field: &'static str,
        text: &str,
        format: Option<&str>,
    ) -> Result<V, Error> {
        if let Some(extension) = &self.extension {
            let id = TypeId::of::<V>();
            if (extension.applies)(id) {
                let value = (extension.parse)(id, text).map_err(|message| Error::Value {
                    field,
                    source: ValueError::Custom(message),
                })?;
                return value.downcast::<V>().map(|boxed| *boxed).map_err(|_| {
                    Error::Value {
                        field,
                        source: ValueError::Custom(
                            "parse hook returned an unexpected type".to_owned(),
                        ),
                    }
                });
            }
        }
        V::parse(text, format).map_err(|source| Error::Value { field, source })
    }

    /// Renders a typed value back to field text, extension hook first.
    pub(crate) fn render<V: FieldValue>(
        &self,
        field: &'static str,
        value: &V,
        format: Option<&str>,
    ) -> Result<String, Error> {
        if let Some(extension) = &self.extension {
            if (extension.applies)(TypeId::of::<V>()) {
                return (extension.render)(value as &dyn Any).map_err(|message| Error::Value {
                    field,
                    source: ValueError::Custom(message),
                });
            }
        }
        value
            .render(format)
            .map_err(|source| Error::Value { field, source })
    }

    /// Consumes an elementary field's bytes from the source.
    fn take_field<T: 'static>(
        &self,
        layout: &Layout<T>,
        instance: &T,
        field: &Field<T>,
        source: &mut Source,
    ) -> Result<Bytes, Error> {
        match field.width {
            Some(Width::Fixed(n)) => Ok(source.take(n)),
            Some(Width::Remainder) => Ok(source.take_all()),
            Some(Width::ByField(referent)) => {
                let n = layout.resolve_reference(instance, field.name, referent)?;
                Ok(source.take(n))
            }
            None => Ok(Bytes::new()),
        }
    }

    /// Resolves the padded width of an elementary field on encode.
    /// `None` means natural length.
    fn pad_width<T: 'static>(
        &self,
        layout: &Layout<T>,
        instance: &T,
        field: &Field<T>,
    ) -> Result<Option<usize>, Error> {
        match field.width {
            Some(Width::Fixed(n)) => Ok(Some(n)),
            Some(Width::ByField(referent)) => Ok(Some(layout.resolve_reference(
                instance,
                field.name,
                referent,
            )?)),
            Some(Width::Remainder) | None => Ok(None),
        }
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("charset", &self.charset)
            .field("extension", &self.extension.is_some())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
