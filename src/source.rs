//! Forward-only byte cursor over an input telegram.

use bytes::Bytes;

/// A forward-only cursor over the bytes of one or more telegrams.
///
/// A `Source` is consumed exclusively by one in-flight decode call.
/// Sequential calls against the same source are fine and pick up where the
/// previous call stopped; concurrent calls are not supported.
///
/// Short reads are tolerated by design: asking for more bytes than remain
/// yields what is left. This is what makes partial records decodable.
#[derive(Clone, Debug)]
pub struct Source {
    buf: Bytes,
}

impl Source {
    /// Creates a source over the given bytes.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { buf: data.into() }
    }

    /// Number of unconsumed bytes.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Whether the source is exhausted.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes and returns up to `len` bytes.
    pub(crate) fn take(&mut self, len: usize) -> Bytes {
        let n = len.min(self.buf.len());
        self.buf.split_to(n)
    }

    /// Consumes and returns everything that remains.
    pub(crate) fn take_all(&mut self) -> Bytes {
        self.buf.split_to(self.buf.len())
    }
}

impl From<Vec<u8>> for Source {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<Bytes> for Source {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_advances() {
        let mut source = Source::new(&b"abcdef"[..]);
        assert_eq!(source.take(2), Bytes::from_static(b"ab"));
        assert_eq!(source.take(3), Bytes::from_static(b"cde"));
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn test_take_tolerates_short_reads() {
        let mut source = Source::new(&b"abc"[..]);
        assert_eq!(source.take(10), Bytes::from_static(b"abc"));
        assert!(source.is_empty());
        assert_eq!(source.take(10), Bytes::new());
    }

    #[test]
    fn test_take_all() {
        let mut source = Source::new(&b"abcdef"[..]);
        source.take(1);
        assert_eq!(source.take_all(), Bytes::from_static(b"bcdef"));
        assert!(source.is_empty());
    }
}
