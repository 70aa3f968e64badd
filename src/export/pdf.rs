//! Minimal single-page PDF writer.
//!
//! Documents are PDF 1.4 with one A4 page, the built-in Helvetica font and
//! an uncompressed content stream. Text is placed at a fixed origin; each
//! `\n` starts a new line and nothing wraps or paginates.

use std::fmt::Write as _;

/// A4 width in points.
pub const PAGE_WIDTH: f32 = 595.28;
/// A4 height in points.
pub const PAGE_HEIGHT: f32 = 841.89;
/// Font size in points.
pub const FONT_SIZE: f32 = 16.0;
/// Distance of the text origin from the left and top edges, in points (10 mm).
pub const MARGIN: f32 = 28.35;

const LINE_HEIGHT_FACTOR: f32 = 1.15;

/// WinAnsi code points in 0x80..=0x9F, where the encoding departs from Latin-1.
const WIN_ANSI_HIGH: [(u8, char); 27] = [
    (0x80, '\u{20ac}'),
    (0x82, '\u{201a}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201e}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02c6}'),
    (0x89, '\u{2030}'),
    (0x8a, '\u{0160}'),
    (0x8b, '\u{2039}'),
    (0x8c, '\u{0152}'),
    (0x8e, '\u{017d}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201c}'),
    (0x94, '\u{201d}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02dc}'),
    (0x99, '\u{2122}'),
    (0x9a, '\u{0161}'),
    (0x9b, '\u{203a}'),
    (0x9c, '\u{0153}'),
    (0x9e, '\u{017e}'),
    (0x9f, '\u{0178}'),
];

/// Renders `text` as a complete single-page PDF file.
pub fn render(text: &str) -> Vec<u8> {
    let content = content_stream(text);
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ),
        "<< /Producer (amadeus) >>".to_string(),
    ];

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (idx, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", idx + 1, body).as_bytes());
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(xref, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R /Info 6 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

fn content_stream(text: &str) -> String {
    let leading = FONT_SIZE * LINE_HEIGHT_FACTOR;
    let mut content = String::new();
    let _ = writeln!(content, "BT");
    let _ = writeln!(content, "/F1 {FONT_SIZE} Tf");
    let _ = writeln!(content, "{leading:.2} TL");
    let _ = writeln!(content, "{MARGIN:.2} {:.2} Td", PAGE_HEIGHT - MARGIN);
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            content.push_str("T* ");
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        let _ = writeln!(content, "({}) Tj", escape(line));
    }
    content.push_str("ET");
    content
}

/// Maps `c` to its single-byte WinAnsi code, if it has one.
fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        '\u{00}'..='\u{7f}' | '\u{a0}'..='\u{ff}' => Some(c as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(_, high)| *high == c)
            .map(|(byte, _)| *byte),
    }
}

fn win_ansi_char(byte: u8) -> Option<char> {
    match byte {
        0x80..=0x9f => WIN_ANSI_HIGH
            .iter()
            .find(|(code, _)| *code == byte)
            .map(|(_, c)| *c),
        _ => Some(char::from(byte)),
    }
}

/// Escapes `line` as the body of a PDF literal string in WinAnsi encoding.
///
/// Everything outside printable ASCII is written as an octal escape of its
/// WinAnsi byte; characters WinAnsi cannot represent become `?`.
fn escape(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => match win_ansi_byte(c) {
                Some(byte) => {
                    let _ = write!(out, "\\{byte:03o}");
                }
                None => out.push('?'),
            },
        }
    }
    out
}

/// Recovers the text of a document produced by [`render`].
///
/// Returns `None` if `bytes` has no content stream in the expected layout.
pub fn extract_text(bytes: &[u8]) -> Option<String> {
    let haystack = String::from_utf8_lossy(bytes);
    let start = haystack.find("\nBT\n")? + 1;
    let end = start + haystack[start..].find("\nET")?;
    let content = haystack[start..end].as_bytes();

    let mut text = String::new();
    let mut i = 0;
    while i < content.len() {
        match content[i] {
            b'(' => {
                let (literal, next) = read_literal(content, i + 1)?;
                text.push_str(&literal);
                i = next;
            }
            b'T' if content.get(i + 1) == Some(&b'*') => {
                text.push('\n');
                i += 2;
            }
            _ => i += 1,
        }
    }
    Some(text)
}

fn read_literal(content: &[u8], mut i: usize) -> Option<(String, usize)> {
    let mut out = String::new();
    loop {
        let b = *content.get(i)?;
        i += 1;
        match b {
            b')' => return Some((out, i)),
            b'\\' => {
                let e = *content.get(i)?;
                if (b'0'..=b'7').contains(&e) {
                    let mut value: u32 = 0;
                    let mut digits = 0;
                    while digits < 3 && i < content.len() && (b'0'..=b'7').contains(&content[i]) {
                        value = value * 8 + u32::from(content[i] - b'0');
                        i += 1;
                        digits += 1;
                    }
                    out.push(win_ansi_char(u8::try_from(value).ok()?)?);
                } else {
                    i += 1;
                    out.push(match e {
                        b'n' => '\n',
                        b'r' => '\r',
                        b't' => '\t',
                        other => other as char,
                    });
                }
            }
            other => out.push(other as char),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn single_page_structure() {
        let bytes = render("hello");
        let text = as_text(&bytes);
        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/Type /Pages /Kids [3 0 R] /Count 1"));
        assert_eq!(text.matches("/Type /Page ").count(), 1);
        assert!(text.contains("(hello) Tj"));
        assert!(text.contains("28.35 813.54 Td"));
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let bytes = render("offsets");
        let tail_at = find(&bytes, b"startxref\n").unwrap() + "startxref\n".len();
        let tail = as_text(&bytes[tail_at..]);
        let xref_at: usize = tail.lines().next().unwrap().parse().unwrap();
        assert!(bytes[xref_at..].starts_with(b"xref\n0 7\n"));

        let xref = as_text(&bytes[xref_at..]);
        let entries: Vec<&str> = xref.lines().skip(3).take(6).collect();
        for (idx, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            let expected = format!("{} 0 obj", idx + 1);
            assert!(
                bytes[offset..].starts_with(expected.as_bytes()),
                "object {} not at {}",
                idx + 1,
                offset
            );
        }
    }

    #[test]
    fn stream_length_matches() {
        let bytes = render("length check");
        let text = as_text(&bytes);
        let length_at = text.find("/Length ").unwrap() + "/Length ".len();
        let length: usize = text[length_at..]
            .split_whitespace()
            .next()
            .unwrap()
            .parse()
            .unwrap();
        let stream_at = text.find("stream\n").unwrap() + "stream\n".len();
        assert_eq!(&text[stream_at + length..stream_at + length + 10], "\nendstream");
    }

    #[test]
    fn escaping_and_extraction() {
        for sample in [
            "",
            "Why did the chicken cross the road?",
            "paren (nested) and back\\slash",
            "line one\nline two\n\nline four",
            "café naïve",
        ] {
            assert_eq!(extract_text(&render(sample)).as_deref(), Some(sample));
        }
    }

    #[test]
    fn typographic_punctuation_survives() {
        let sample = "It\u{2019}s \u{201c}fine\u{201d} \u{2014} really\u{2026} \u{20ac}5 \u{2022} \u{2013} \u{2122}";
        assert_eq!(extract_text(&render(sample)).as_deref(), Some(sample));

        let text = as_text(&render("\u{2019}\u{20ac}"));
        assert!(text.contains("(\\222\\200) Tj"));
    }

    #[test]
    fn unrepresentable_characters_become_question_marks() {
        assert_eq!(extract_text(&render("日本 ok")).as_deref(), Some("?? ok"));
        assert_eq!(extract_text(&render("\u{81}\u{2190}")).as_deref(), Some("??"));
        assert_eq!(extract_text(&render("crlf\r\nnext")).as_deref(), Some("crlf\nnext"));
    }
}
