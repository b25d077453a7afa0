use std::fmt::Write;

/// Writes a value as a single line of text, without the trailing newline.
pub trait Serialize {
    fn serialize(&self, buf: &mut String);

    /// Convenience wrapper returning a fresh line.
    fn to_line(&self) -> String {
        let mut buf = String::new();
        self.serialize(&mut buf);
        buf
    }
}

/// Appends `values` separated by single spaces, each preceded by a space.
///
/// `f32`'s `Display` is the shortest representation that parses back to the
/// same bits, so values cross stage boundaries unchanged.
pub(crate) fn push_floats(buf: &mut String, values: &[f32]) {
    for value in values {
        let _ = write!(buf, " {value}");
    }
}
