//! Per-type layout tables: field descriptors, registration-time validation,
//! and width/count reference resolution.
//!
//! A [`Layout`] is the schema of one telegram type: an ordered table of
//! [`Field`] descriptors with compiled accessors. Layouts are built once,
//! validated once, and stored in a `static`; decode and encode walk the
//! table in declared order, which is what fixes every field's stream
//! position.

use crate::align::Alignment;
use crate::codec::Codec;
use crate::error::Error;
use crate::source::Source;
use crate::value::FieldValue;
use bytes::BytesMut;
use core::fmt;

/// A struct decodable from and encodable to a flat telegram.
///
/// `Default` supplies the fresh zero-valued instance built before any field
/// is known; one is created per decode call and per list element.
pub trait Telegram: Default + Sized + 'static {
    /// The registered layout for this type.
    fn layout() -> &'static Layout<Self>;
}

/// Field width in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Width {
    /// Literal width. Must be nonzero.
    Fixed(usize),
    /// Consume the stream remainder on decode; natural length (no padding)
    /// on encode.
    Remainder,
    /// Width read from an earlier sibling integer field.
    ByField(&'static str),
}

/// Repeat count for list fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Count {
    /// Literal element count.
    Fixed(usize),
    /// Count read from an earlier sibling integer field.
    ByField(&'static str),
}

type ScalarReader<T> =
    Box<dyn Fn(&mut T, &str, Option<&str>, &Codec) -> Result<(), Error> + Send + Sync>;
type ScalarWriter<T> =
    Box<dyn Fn(&T, Option<&str>, &Codec) -> Result<Option<String>, Error> + Send + Sync>;
type CountFn<T> = Box<dyn Fn(&T) -> Option<i128> + Send + Sync>;
type PresenceFn<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type RecordDecoder<T> =
    Box<dyn Fn(&Codec, &mut T, &mut Source, usize) -> Result<(), Error> + Send + Sync>;
type RecordEncoder<T> =
    Box<dyn Fn(&Codec, &T, &mut BytesMut, Alignment, usize) -> Result<(), Error> + Send + Sync>;
type ListDecoder<T> =
    Box<dyn Fn(&Codec, &mut T, &mut Source, usize, usize) -> Result<(), Error> + Send + Sync>;
type ListEncoder<T> = Box<
    dyn Fn(&Codec, &T, &mut BytesMut, Alignment, usize, usize) -> Result<(), Error> + Send + Sync,
>;

// Layout kind of one field, fixed at construction.
pub(crate) enum Access<T> {
    /// Raw byte field: the slice passes through untouched in both
    /// directions, bypassing text conversion.
    Bytes {
        get: fn(&T) -> Vec<u8>,
        set: fn(&mut T, Vec<u8>),
    },
    /// Elementary field coerced through [`FieldValue`].
    Scalar {
        read: ScalarReader<T>,
        write: ScalarWriter<T>,
        count: CountFn<T>,
        countable: bool,
    },
    /// Embedded record, recursed in place with no width of its own.
    Record {
        decode: RecordDecoder<T>,
        encode: RecordEncoder<T>,
    },
    /// Repeating list of embedded records.
    List {
        count: Count,
        decode: ListDecoder<T>,
        encode: ListEncoder<T>,
    },
}

/// One field descriptor: name, layout kind, and compiled accessors.
///
/// Constructed with [`Field::bytes`], [`Field::scalar`], [`Field::optional`],
/// [`Field::embedded`], [`Field::embedded_opt`], or [`Field::list`], then
/// refined with [`Field::format`] and [`Field::ignorable`].
pub struct Field<T> {
    pub(crate) name: &'static str,
    pub(crate) width: Option<Width>,
    pub(crate) format: Option<&'static str>,
    pub(crate) ignorable: bool,
    pub(crate) present: Option<PresenceFn<T>>,
    pub(crate) access: Access<T>,
}

impl<T: 'static> Field<T> {
    /// A raw byte field. The slice is stored and emitted unchanged; on
    /// encode it is padded to the configured width like any other field.
    pub fn bytes(
        name: &'static str,
        width: Width,
        get: fn(&T) -> Vec<u8>,
        set: fn(&mut T, Vec<u8>),
    ) -> Self {
        Self {
            name,
            width: Some(width),
            format: None,
            ignorable: false,
            present: None,
            access: Access::Bytes { get, set },
        }
    }

    /// An elementary field with plain storage.
    ///
    /// On decode, an all-whitespace payload leaves the field at its default;
    /// on encode the value is always rendered.
    pub fn scalar<V: FieldValue>(
        name: &'static str,
        width: Width,
        get: fn(&T) -> V,
        set: fn(&mut T, V),
    ) -> Self {
        let read: ScalarReader<T> = Box::new(move |target, text, format, codec| {
            let value = codec.coerce::<V>(name, text, format)?;
            set(target, value);
            Ok(())
        });
        let write: ScalarWriter<T> = Box::new(move |target, format, codec| {
            Ok(Some(codec.render(name, &get(target), format)?))
        });
        let count: CountFn<T> = Box::new(move |target| get(target).as_count());
        Self {
            name,
            width: Some(width),
            format: None,
            ignorable: false,
            present: None,
            access: Access::Scalar {
                read,
                write,
                count,
                countable: V::COUNTABLE,
            },
        }
    }

    /// An elementary field with `Option` storage.
    ///
    /// An all-whitespace payload decodes to `None`; a `None` value encodes
    /// as an empty (fully padded) segment, or as nothing at all when the
    /// field is also [`ignorable`](Field::ignorable).
    pub fn optional<V: FieldValue>(
        name: &'static str,
        width: Width,
        get: fn(&T) -> Option<V>,
        set: fn(&mut T, Option<V>),
    ) -> Self {
        let read: ScalarReader<T> = Box::new(move |target, text, format, codec| {
            let value = codec.coerce::<V>(name, text, format)?;
            set(target, Some(value));
            Ok(())
        });
        let write: ScalarWriter<T> = Box::new(move |target, format, codec| match get(target) {
            Some(value) => Ok(Some(codec.render(name, &value, format)?)),
            None => Ok(None),
        });
        let count: CountFn<T> = Box::new(move |target| get(target).and_then(|v| v.as_count()));
        Self {
            name,
            width: Some(width),
            format: None,
            ignorable: false,
            present: Some(Box::new(move |target| get(target).is_some())),
            access: Access::Scalar {
                read,
                write,
                count,
                countable: V::COUNTABLE,
            },
        }
    }

    /// An embedded record field. The nested layout decodes and encodes in
    /// place, consuming exactly its own fields' bytes.
    pub fn embedded<U: Telegram>(name: &'static str, get: fn(&T) -> &U, set: fn(&mut T, U)) -> Self {
        let decode: RecordDecoder<T> = Box::new(move |codec, target, source, depth| {
            let record = codec.decode_at::<U>(source, depth)?;
            set(target, record);
            Ok(())
        });
        let encode: RecordEncoder<T> = Box::new(move |codec, target, out, alignment, depth| {
            codec.encode_at::<U>(get(target), out, alignment, depth)
        });
        Self {
            name,
            width: None,
            format: None,
            ignorable: false,
            present: None,
            access: Access::Record { decode, encode },
        }
    }

    /// An embedded record field with `Option` storage. An absent record
    /// encodes as a fresh default-constructed instance.
    pub fn embedded_opt<U: Telegram>(
        name: &'static str,
        get: fn(&T) -> Option<&U>,
        set: fn(&mut T, U),
    ) -> Self {
        let decode: RecordDecoder<T> = Box::new(move |codec, target, source, depth| {
            let record = codec.decode_at::<U>(source, depth)?;
            set(target, record);
            Ok(())
        });
        let encode: RecordEncoder<T> =
            Box::new(move |codec, target, out, alignment, depth| match get(target) {
                Some(record) => codec.encode_at::<U>(record, out, alignment, depth),
                None => codec.encode_at::<U>(&U::default(), out, alignment, depth),
            });
        Self {
            name,
            width: None,
            format: None,
            ignorable: false,
            present: Some(Box::new(move |target| get(target).is_some())),
            access: Access::Record { decode, encode },
        }
    }

    /// A repeating list field.
    ///
    /// Decode reads exactly `count` elements from the cursor; encode emits
    /// exactly `count` elements, filling past the end of a short list with
    /// default-constructed elements and ignoring any extras.
    pub fn list<U: Telegram>(
        name: &'static str,
        count: Count,
        get: fn(&T) -> &[U],
        set: fn(&mut T, Vec<U>),
    ) -> Self {
        let decode: ListDecoder<T> = Box::new(move |codec, target, source, n, depth| {
            let mut elements = Vec::with_capacity(n.min(1024));
            for _ in 0..n {
                elements.push(codec.decode_at::<U>(source, depth)?);
            }
            set(target, elements);
            Ok(())
        });
        let encode: ListEncoder<T> =
            Box::new(move |codec, target, out, alignment, n, depth| {
                let elements = get(target);
                let filler = U::default();
                for index in 0..n {
                    let element = elements.get(index).unwrap_or(&filler);
                    codec.encode_at::<U>(element, out, alignment, depth)?;
                }
                Ok(())
            });
        Self {
            name,
            width: None,
            format: None,
            ignorable: false,
            present: None,
            access: Access::List {
                count,
                decode,
                encode,
            },
        }
    }

    /// Sets the value format pattern (chrono syntax). Required for
    /// calendar/time fields; ignored by every other value type.
    pub fn format(mut self, pattern: &'static str) -> Self {
        self.format = Some(pattern);
        self
    }

    /// Marks the field ignorable on encode: when its value is absent it
    /// contributes zero bytes, even with a configured width.
    pub fn ignorable(mut self) -> Self {
        self.ignorable = true;
        self
    }

    pub(crate) fn is_present(&self, instance: &T) -> bool {
        self.present.as_ref().map_or(true, |check| check(instance))
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.access {
            Access::Bytes { .. } => "bytes",
            Access::Scalar { .. } => "scalar",
            Access::Record { .. } => "record",
            Access::List { .. } => "list",
        };
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

/// Ordered field table for one telegram type.
pub struct Layout<T> {
    fields: Vec<Field<T>>,
}

impl<T: 'static> Layout<T> {
    /// Starts a new layout.
    pub fn builder() -> LayoutBuilder<T> {
        LayoutBuilder { fields: Vec::new() }
    }

    pub(crate) fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    /// Resolves a list count against the current instance state.
    pub(crate) fn resolve_count(
        &self,
        instance: &T,
        field: &'static str,
        count: &Count,
    ) -> Result<usize, Error> {
        match count {
            Count::Fixed(n) => Ok(*n),
            Count::ByField(referent) => self.resolve_reference(instance, field, referent),
        }
    }

    /// Reads a width/count from the named sibling field.
    ///
    /// The referent must already hold an integer value; anything else is
    /// [`Error::InvalidReference`]. Correctness rests on the field-order
    /// invariant: the referent was decoded (or populated by the caller)
    /// before this resolution runs.
    pub(crate) fn resolve_reference(
        &self,
        instance: &T,
        field: &'static str,
        referent: &'static str,
    ) -> Result<usize, Error> {
        let missing = || Error::InvalidReference { field, referent };
        let holder = self
            .fields
            .iter()
            .find(|f| f.name == referent)
            .ok_or_else(missing)?;
        let Access::Scalar { count, .. } = &holder.access else {
            return Err(missing());
        };
        let value = count(instance).ok_or_else(missing)?;
        usize::try_from(value).map_err(|_| missing())
    }
}

impl<T> fmt::Debug for Layout<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.fields.iter().map(|field| field.name))
            .finish()
    }
}

/// Builder for [`Layout`]. Fields are appended in stream order.
pub struct LayoutBuilder<T> {
    fields: Vec<Field<T>>,
}

impl<T: 'static> LayoutBuilder<T> {
    /// Appends the next field.
    pub fn field(mut self, field: Field<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates the table and produces the layout.
    ///
    /// # Panics
    ///
    /// Panics on malformed configuration: duplicate field names, zero
    /// literal widths, or width/count references that name an unknown
    /// field, a field declared later (references must be backward), or a
    /// non-integer field.
    pub fn build(self) -> Layout<T> {
        for (index, field) in self.fields.iter().enumerate() {
            assert!(
                !self.fields[..index].iter().any(|f| f.name == field.name),
                "duplicate field \"{}\"",
                field.name
            );
            if let Some(Width::Fixed(0)) = field.width {
                panic!("field \"{}\" declares a zero width", field.name);
            }
            let check_reference = |referent: &'static str| {
                let Some(position) = self.fields.iter().position(|f| f.name == referent) else {
                    panic!(
                        "field \"{}\" references unknown field \"{}\"",
                        field.name, referent
                    );
                };
                assert!(
                    position < index,
                    "field \"{}\" references \"{}\" before it is decoded; references must be backward",
                    field.name,
                    referent
                );
                let countable = matches!(
                    self.fields[position].access,
                    Access::Scalar {
                        countable: true,
                        ..
                    }
                );
                assert!(
                    countable,
                    "field \"{}\" references \"{}\", which is not an integer field",
                    field.name, referent
                );
            };
            if let Some(Width::ByField(referent)) = field.width {
                check_reference(referent);
            }
            if let Access::List {
                count: Count::ByField(referent),
                ..
            } = &field.access
            {
                check_reference(referent);
            }
        }
        Layout {
            fields: self.fields,
        }
    }
}
