//! Plain-text extraction from uploaded regulation documents.
//!
//! * `.txt`: UTF-8, invalid sequences replaced.
//! * `.docx`: the `word/document.xml` part of the ZIP container; text runs
//!   are concatenated and each paragraph becomes one line.
//! * `.pdf`: best effort. Content streams (raw or FlateDecode) are scanned
//!   for the string operands of the `Tj`, `TJ`, `'` and `"` text operators.

use std::io::{Cursor, Read};

use flate2::read::ZlibDecoder;
use log::debug;
use zip::ZipArchive;

use crate::error::{AnalysisError, AnalysisResult};
use crate::models::DocumentFormat;

/// Extract text from an uploaded file, dispatching on its extension.
pub fn extract_text(filename: &str, bytes: &[u8]) -> AnalysisResult<String> {
    let format = DocumentFormat::from_filename(filename).map_err(AnalysisError::unsupported_format)?;
    match format {
        DocumentFormat::Txt => Ok(String::from_utf8_lossy(bytes).into_owned()),
        DocumentFormat::Docx => docx_text(bytes),
        DocumentFormat::Pdf => pdf_text(bytes),
    }
}

fn docx_text(bytes: &[u8]) -> AnalysisResult<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AnalysisError::TextExtraction(format!("not a DOCX container: {}", e)))?;
    let mut part = archive
        .by_name("word/document.xml")
        .map_err(|e| AnalysisError::TextExtraction(format!("missing document part: {}", e)))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| AnalysisError::TextExtraction(format!("unreadable document part: {}", e)))?;
    Ok(wordprocessing_text(&xml))
}

/// Text of a WordprocessingML body: `<w:t>` runs, one line per `<w:p>`.
fn wordprocessing_text(xml: &str) -> String {
    let mut text = String::new();
    let mut in_run = false;

    for segment in xml.split('<').skip(1) {
        let (tag, content) = segment.split_once('>').unwrap_or((segment, ""));
        let name = tag.split_whitespace().next().unwrap_or("");
        match name {
            "w:t" => in_run = !tag.ends_with('/'),
            "/w:t" => in_run = false,
            "/w:p" | "w:p/" => text.push('\n'),
            "w:br/" | "w:cr/" => text.push('\n'),
            "w:tab/" => text.push('\t'),
            _ => {}
        }
        if in_run && name == "w:t" {
            text.push_str(&unescape_xml(content));
        }
    }

    text
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn pdf_text(bytes: &[u8]) -> AnalysisResult<String> {
    if !bytes.starts_with(b"%PDF") {
        return Err(AnalysisError::TextExtraction(
            "missing %PDF header".to_string(),
        ));
    }

    let mut text = String::new();
    let mut cursor = 0;
    while let Some(kw) = find(bytes, b"stream", cursor) {
        if kw >= 3 && &bytes[kw - 3..kw] == b"end" {
            cursor = kw + 6;
            continue;
        }

        let mut start = kw + 6;
        if bytes.get(start) == Some(&b'\r') {
            start += 1;
        }
        if bytes.get(start) == Some(&b'\n') {
            start += 1;
        }
        let Some(end) = find(bytes, b"endstream", start) else {
            break;
        };

        let dict = &bytes[cursor..kw];
        let raw = &bytes[start..end];
        let content = if find(dict, b"/FlateDecode", 0).is_some() {
            let mut inflated = Vec::new();
            match ZlibDecoder::new(raw).read_to_end(&mut inflated) {
                Ok(_) => Some(inflated),
                Err(e) => {
                    debug!("Skipping undecodable PDF stream: {}", e);
                    None
                }
            }
        } else if find(dict, b"/Filter", 0).is_some() {
            None
        } else {
            Some(raw.to_vec())
        };

        if let Some(content) = content {
            text.push_str(&content_stream_text(&content));
        }
        cursor = end + 9;
    }

    Ok(text)
}

/// Decode a PDF literal string starting just after its opening `(`.
/// Returns the bytes and the index just past the closing `)`.
fn literal_string(data: &[u8], mut i: usize) -> (Vec<u8>, usize) {
    let mut out = Vec::new();
    let mut depth = 1;
    while i < data.len() {
        let b = data[i];
        i += 1;
        match b {
            b'\\' => {
                let Some(&esc) = data.get(i) else { break };
                i += 1;
                match esc {
                    b'n' => out.push(b'\n'),
                    b'r' => out.push(b'\r'),
                    b't' => out.push(b'\t'),
                    b'b' | b'f' => {}
                    b'0'..=b'7' => {
                        let mut value = u32::from(esc - b'0');
                        for _ in 0..2 {
                            match data.get(i) {
                                Some(d @ b'0'..=b'7') => {
                                    value = value * 8 + u32::from(d - b'0');
                                    i += 1;
                                }
                                _ => break,
                            }
                        }
                        out.push((value & 0xFF) as u8);
                    }
                    b'\r' | b'\n' => {}
                    other => out.push(other),
                }
            }
            b'(' => {
                depth += 1;
                out.push(b);
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
                out.push(b);
            }
            _ => out.push(b),
        }
    }
    (out, i)
}

fn hex_string(data: &[u8], mut i: usize) -> (Vec<u8>, usize) {
    let mut digits = Vec::new();
    while i < data.len() && data[i] != b'>' {
        if data[i].is_ascii_hexdigit() {
            digits.push(data[i]);
        }
        i += 1;
    }
    if digits.len() % 2 == 1 {
        digits.push(b'0');
    }
    let out = digits
        .chunks(2)
        .filter_map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
        })
        .collect();
    (out, i + 1)
}

/// Collect text shown by the text operators of one content stream.
fn content_stream_text(data: &[u8]) -> String {
    let mut out = String::new();
    let mut pending: Vec<Vec<u8>> = Vec::new();
    let mut i = 0;

    while i < data.len() {
        let b = data[i];
        match b {
            b'(' => {
                let (s, next) = literal_string(data, i + 1);
                pending.push(s);
                i = next;
            }
            b'<' if data.get(i + 1) == Some(&b'<') => i += 2,
            b'<' => {
                let (s, next) = hex_string(data, i + 1);
                pending.push(s);
                i = next;
            }
            b'%' => {
                while i < data.len() && data[i] != b'\n' && data[i] != b'\r' {
                    i += 1;
                }
            }
            b if b.is_ascii_alphabetic() || b == b'\'' || b == b'"' || b == b'*' => {
                let start = i;
                while i < data.len()
                    && (data[i].is_ascii_alphabetic() || matches!(data[i], b'*' | b'\'' | b'"'))
                {
                    i += 1;
                }
                match &data[start..i] {
                    b"Tj" | b"TJ" => {}
                    b"'" | b"\"" | b"T*" | b"Td" | b"TD" => {
                        if !out.is_empty() && !out.ends_with('\n') {
                            out.push('\n');
                        }
                    }
                    b"ET" => {
                        if !out.is_empty() && !out.ends_with('\n') {
                            out.push('\n');
                        }
                        pending.clear();
                        continue;
                    }
                    _ => {
                        pending.clear();
                        continue;
                    }
                }
                for s in pending.drain(..) {
                    out.extend(s.iter().map(|&c| c as char));
                }
            }
            _ => i += 1,
        }
    }

    out
}
