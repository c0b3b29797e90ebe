//! Minimal deterministic PDF 1.7 writer.
//!
//! Serializes objects into an in-memory byte buffer while tracking offsets
//! for the xref table. Dictionaries keep insertion order and nothing here
//! consults clocks or randomness, so identical object sequences produce
//! identical bytes. Content streams are Flate-compressed; a compression
//! failure falls back to the raw stream rather than failing the render.

use std::io::Write as _;

use flate2::write::ZlibEncoder;
use flate2::Compression;

/// Object identifier. Generation numbers are always 0 for new documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjId(pub u32);

/// PDF object values, per PDF 32000-1:2008 §7.3, reduced to what the
/// renderer emits.
#[derive(Debug, Clone)]
pub enum Obj {
    Int(i64),
    Real(f32),
    Name(String),
    Text(String),
    Array(Vec<Obj>),
    /// Key-value pairs; `Vec` keeps output order deterministic.
    Dict(Vec<(String, Obj)>),
    Stream {
        dict: Vec<(String, Obj)>,
        data: Vec<u8>,
    },
    Ref(ObjId),
}

impl Obj {
    pub fn name(s: &str) -> Obj {
        Obj::Name(s.to_string())
    }

    pub fn text(s: &str) -> Obj {
        Obj::Text(s.to_string())
    }

    pub fn dict(entries: Vec<(&str, Obj)>) -> Obj {
        Obj::Dict(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    /// A stream compressed with FlateDecode; raw on encoder failure.
    pub fn flate_stream(entries: Vec<(&str, Obj)>, data: Vec<u8>) -> Obj {
        let mut dict: Vec<(String, Obj)> = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        match deflate(&data) {
            Some(compressed) => {
                dict.push(("Filter".to_string(), Obj::name("FlateDecode")));
                Obj::Stream {
                    dict,
                    data: compressed,
                }
            }
            None => Obj::Stream { dict, data },
        }
    }
}

fn deflate(data: &[u8]) -> Option<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::new(6));
    encoder.write_all(data).ok()?;
    encoder.finish().ok()
}

/// Writes objects and bookkeeping into a byte buffer.
pub struct PdfWriter {
    buf: Vec<u8>,
    xref: Vec<(u32, usize)>,
}

impl PdfWriter {
    /// Start a document: writes the version header and the binary-detect
    /// comment line.
    pub fn new() -> Self {
        let mut writer = PdfWriter {
            buf: Vec::with_capacity(4096),
            xref: Vec::new(),
        };
        writer.push_str("%PDF-1.7\n");
        writer.buf.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");
        writer
    }

    fn push_str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Write one indirect object, recording its offset for the xref table.
    pub fn add_object(&mut self, id: ObjId, obj: &Obj) {
        self.xref.push((id.0, self.buf.len()));
        self.push_str(&format!("{} 0 obj\n", id.0));
        self.write_value(obj);
        self.push_str("\nendobj\n");
    }

    fn write_value(&mut self, obj: &Obj) {
        match obj {
            Obj::Int(n) => self.push_str(&n.to_string()),
            Obj::Real(v) => {
                let s = fmt_num(*v);
                self.push_str(&s);
            }
            Obj::Name(name) => {
                self.push_str("/");
                self.push_str(name);
            }
            Obj::Text(s) => {
                self.push_str("(");
                let escaped = escape_text(s);
                self.push_str(&escaped);
                self.push_str(")");
            }
            Obj::Array(items) => {
                self.push_str("[");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.push_str(" ");
                    }
                    self.write_value(item);
                }
                self.push_str("]");
            }
            Obj::Dict(entries) => {
                self.push_str("<<");
                for (key, value) in entries {
                    self.push_str(" /");
                    self.push_str(key);
                    self.push_str(" ");
                    self.write_value(value);
                }
                self.push_str(" >>");
            }
            Obj::Stream { dict, data } => {
                self.push_str("<<");
                for (key, value) in dict {
                    self.push_str(" /");
                    self.push_str(key);
                    self.push_str(" ");
                    self.write_value(value);
                }
                self.push_str(&format!(" /Length {} >>\nstream\n", data.len()));
                self.buf.extend_from_slice(data);
                self.push_str("\nendstream");
            }
            Obj::Ref(id) => self.push_str(&format!("{} 0 R", id.0)),
        }
    }

    /// Write the xref table, trailer and EOF marker; returns the bytes.
    pub fn finish(mut self, root: ObjId, info: Option<ObjId>) -> Vec<u8> {
        let xref_offset = self.buf.len();
        self.xref.sort_by_key(|&(num, _)| num);

        let max_obj = self.xref.last().map(|&(num, _)| num).unwrap_or(0);
        let size = max_obj + 1;

        self.push_str("xref\n");
        self.push_str(&format!("0 {size}\n"));
        // Object 0 is the free-list head; every entry is exactly 20 bytes.
        self.buf.extend_from_slice(b"0000000000 65535 f\r\n");
        let entries = std::mem::take(&mut self.xref);
        let mut cursor = entries.iter().peekable();
        for obj_num in 1..size {
            match cursor.peek() {
                Some(&&(num, offset)) if num == obj_num => {
                    self.push_str(&format!("{offset:010} 00000 n\r\n"));
                    cursor.next();
                }
                _ => {
                    self.buf.extend_from_slice(b"0000000000 00000 f\r\n");
                }
            }
        }

        self.push_str("trailer\n");
        self.push_str(&format!("<< /Size {size} /Root {} 0 R", root.0));
        if let Some(info) = info {
            self.push_str(&format!(" /Info {} 0 R", info.0));
        }
        self.push_str(" >>\n");
        self.push_str(&format!("startxref\n{xref_offset}\n%%EOF\n"));
        self.buf
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape a PDF literal string.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            _ => out.push(c),
        }
    }
    out
}

/// Format a number for content streams and object values: no trailing
/// zeros, no scientific notation.
pub fn fmt_num(v: f32) -> String {
    if v == v.floor() && v.abs() < 1e9 {
        format!("{}", v as i64)
    } else {
        let s = format!("{v:.3}");
        let s = s.trim_end_matches('0').trim_end_matches('.');
        s.to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_binary_comment() {
        let writer = PdfWriter::new();
        let bytes = writer.finish(ObjId(1), None);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("%PDF-1.7\n"));
        assert!(bytes[9] == b'%');
        assert!(bytes[10] >= 128 && bytes[11] >= 128);
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_dict_serialization() {
        let mut writer = PdfWriter::new();
        writer.add_object(
            ObjId(1),
            &Obj::dict(vec![
                ("Type", Obj::name("Catalog")),
                ("Pages", Obj::Ref(ObjId(2))),
            ]),
        );
        let bytes = writer.finish(ObjId(1), None);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("<< /Type /Catalog /Pages 2 0 R >>"));
    }

    #[test]
    fn test_stream_has_length_and_markers() {
        let mut writer = PdfWriter::new();
        let obj = Obj::Stream {
            dict: vec![],
            data: b"BT ET".to_vec(),
        };
        writer.add_object(ObjId(1), &obj);
        let bytes = writer.finish(ObjId(1), None);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Length 5 >>"));
        assert!(text.contains("stream\nBT ET\nendstream"));
    }

    #[test]
    fn test_flate_stream_marks_filter() {
        let data = vec![b'a'; 4096];
        let obj = Obj::flate_stream(vec![], data.clone());
        match obj {
            Obj::Stream { dict, data: compressed } => {
                assert!(dict
                    .iter()
                    .any(|(k, v)| k == "Filter" && matches!(v, Obj::Name(n) if n == "FlateDecode")));
                assert!(compressed.len() < data.len(), "4k of 'a' must compress");
            }
            other => panic!("expected Stream, got {other:?}"),
        }
    }

    #[test]
    fn test_deflate_is_deterministic() {
        let data = b"deterministic output matters more than ratio".repeat(20);
        assert_eq!(deflate(&data), deflate(&data));
    }

    #[test]
    fn test_xref_entries_are_20_bytes() {
        let mut writer = PdfWriter::new();
        writer.add_object(ObjId(1), &Obj::name("Catalog"));
        let bytes = writer.finish(ObjId(1), None);

        let marker = b"xref\n";
        let pos = bytes
            .windows(marker.len())
            .position(|w| w == marker)
            .expect("xref present");
        let entries = &bytes[pos + b"xref\n0 2\n".len()..];
        assert_eq!(&entries[18..20], b"\r\n");
        assert_eq!(&entries[38..40], b"\r\n");
    }

    #[test]
    fn test_trailer_references_root_and_info() {
        let mut writer = PdfWriter::new();
        writer.add_object(ObjId(1), &Obj::name("Catalog"));
        writer.add_object(ObjId(2), &Obj::dict(vec![("Producer", Obj::text("x"))]));
        let bytes = writer.finish(ObjId(1), Some(ObjId(2)));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Size 3"));
        assert!(text.contains("/Root 1 0 R"));
        assert!(text.contains("/Info 2 0 R"));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("plain"), "plain");
        assert_eq!(escape_text("a(b)c"), "a\\(b\\)c");
        assert_eq!(escape_text("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(612.0), "612");
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(12.5), "12.5");
        assert_eq!(fmt_num(13.333), "13.333");
    }
}
