//! XML report serialization.
//!
//! The placement report is a two-level document: a `<memory>` root wrapping
//! a single `<memory_allocation>` group, with one self-closing `<object>`
//! element per classified allocation. Downstream consumers of the report are
//! whitespace-sensitive, so the writer reproduces the historical layout
//! exactly: one space of indentation per nesting level, one element per
//! line.
use std::{borrow::Cow, io};

use crate::binding::AllocationRecord;

/// Streaming XML writer owning its output sink and nesting depth.
///
/// Depth is writer state, scoped to one document: `open` and `close` must
/// pair up, and `write_allocation_report` is the one place that drives the
/// pairing for the placement report.
pub struct XmlWriter<W: io::Write> {
    out: W,
    depth: usize,
}

impl<W: io::Write> XmlWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, depth: 0 }
    }

    /// Write the XML declaration. Must come first.
    pub fn declaration(&mut self) -> io::Result<()> {
        writeln!(self.out, "<?xml version=\"1.0\"?>")
    }

    fn indent(&mut self) -> io::Result<()> {
        for _ in 0..self.depth {
            write!(self.out, " ")?;
        }
        Ok(())
    }

    /// Open a container element and deepen the nesting by one level.
    pub fn open(&mut self, tag: &str) -> io::Result<()> {
        self.indent()?;
        writeln!(self.out, "<{}>", tag)?;
        self.depth += 1;
        Ok(())
    }

    /// Close the innermost container element.
    pub fn close(&mut self, tag: &str) -> io::Result<()> {
        self.depth -= 1;
        self.indent()?;
        writeln!(self.out, "</{}>", tag)
    }

    /// Write a self-closing element with its attributes in the given order.
    /// Attribute values are escaped; names may legally contain markup
    /// characters.
    pub fn empty(&mut self, tag: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        self.indent()?;
        write!(self.out, "<{}", tag)?;
        for (key, value) in attrs {
            write!(self.out, " {}=\"{}\"", key, escape_attr(value))?;
        }
        writeln!(self.out, "/>")
    }

    /// Release the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Escape the characters XML reserves inside attribute values.
fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Serialize the full placement report.
///
/// Both wrappers are always written, so an empty record stream still yields
/// a well-formed document.
pub fn write_allocation_report<W: io::Write>(
    records: impl IntoIterator<Item = AllocationRecord>,
    out: W,
) -> io::Result<()> {
    let mut xml = XmlWriter::new(out);
    xml.declaration()?;
    xml.open("memory")?;
    xml.open("memory_allocation")?;
    for record in records {
        let flag = record.placement.flag().to_string();
        xml.empty(
            "object",
            &[
                ("scope", record.scope.as_str()),
                ("name", record.name.as_str()),
                ("is_internal", flag.as_str()),
            ],
        )?;
    }
    xml.close("memory_allocation")?;
    xml.close("memory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Placement;

    fn record(scope: &str, name: &str, placement: Placement) -> AllocationRecord {
        AllocationRecord {
            scope: scope.to_string(),
            name: name.to_string(),
            placement,
        }
    }

    #[test]
    fn empty_reports_keep_both_wrappers() {
        let mut out = Vec::new();
        write_allocation_report([], &mut out).expect("in-memory write");
        assert_eq!(
            String::from_utf8(out).expect("utf-8"),
            "<?xml version=\"1.0\"?>\n\
             <memory>\n\
             \x20<memory_allocation>\n\
             \x20</memory_allocation>\n\
             </memory>\n"
        );
    }

    #[test]
    fn records_are_indented_two_levels_deep() {
        let mut out = Vec::new();
        write_allocation_report(
            [record("f", "buf", Placement::Internal)],
            &mut out,
        )
        .expect("in-memory write");
        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.contains("\n  <object scope=\"f\" name=\"buf\" is_internal=\"T\"/>\n"));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut out = Vec::new();
        write_allocation_report(
            [record("operator<<", "a\"b&c", Placement::External)],
            &mut out,
        )
        .expect("in-memory write");
        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.contains(
            "<object scope=\"operator&lt;&lt;\" name=\"a&quot;b&amp;c\" is_internal=\"F\"/>"
        ));
    }

    #[test]
    fn escaping_leaves_clean_names_borrowed() {
        assert!(matches!(escape_attr("window"), Cow::Borrowed(_)));
        assert_eq!(escape_attr("a<b"), "a&lt;b");
    }
}
