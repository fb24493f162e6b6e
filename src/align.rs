//! Padding policy for fixed-width fields.

use bytes::{BufMut, BytesMut};

/// Placement of data versus filler within a fixed-width field.
///
/// Selected per encode call, not fixed at codec construction. The fill byte
/// is the charset's space. Values longer than the configured width are
/// written unchanged, never truncated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    /// Data at the start of the field, fill after: `"AB   "`.
    Left,
    /// Data at the end of the field, fill before: `"   AB"`.
    Right,
}

impl Alignment {
    /// Writes `data` into `out`, padded with `fill` to `width` bytes.
    ///
    /// A `width` of `None` means natural length (the remainder marker): no
    /// padding is applied.
    pub(crate) fn write_padded(
        &self,
        data: &[u8],
        width: Option<usize>,
        fill: u8,
        out: &mut BytesMut,
    ) {
        let pad = width.map_or(0, |w| w.saturating_sub(data.len()));
        match self {
            Alignment::Left => {
                out.put_slice(data);
                out.put_bytes(fill, pad);
            }
            Alignment::Right => {
                out.put_bytes(fill, pad);
                out.put_slice(data);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(alignment: Alignment, data: &[u8], width: Option<usize>) -> BytesMut {
        let mut out = BytesMut::new();
        alignment.write_padded(data, width, b' ', &mut out);
        out
    }

    #[test]
    fn test_pad_left_alignment() {
        assert_eq!(&padded(Alignment::Left, b"AB", Some(5))[..], b"AB   ");
    }

    #[test]
    fn test_pad_right_alignment() {
        assert_eq!(&padded(Alignment::Right, b"AB", Some(5))[..], b"   AB");
    }

    #[test]
    fn test_overlong_data_is_not_truncated() {
        assert_eq!(&padded(Alignment::Left, b"ABCDEF", Some(3))[..], b"ABCDEF");
        assert_eq!(&padded(Alignment::Right, b"ABCDEF", Some(3))[..], b"ABCDEF");
    }

    #[test]
    fn test_natural_length_skips_padding() {
        assert_eq!(&padded(Alignment::Left, b"AB", None)[..], b"AB");
        assert_eq!(&padded(Alignment::Right, b"AB", None)[..], b"AB");
    }

    #[test]
    fn test_empty_data_fills_whole_width() {
        assert_eq!(&padded(Alignment::Left, b"", Some(4))[..], b"    ");
    }
}
