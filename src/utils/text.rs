//! Bounded text excerpts for summarization prompts.
//!
//! Only the head of a file is read. Decoding order: BOM, strict UTF-8
//! (tolerating a sequence cut at the excerpt boundary), then chardetng.

use crate::error::{IoResultExt, Result};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextExcerpt {
    pub text: String,
    pub encoding: String,
    pub truncated: bool,
}

/// Read at most `max_bytes` from `path` and decode them.
///
/// Returns `None` when the sample looks binary.
pub fn read_text_excerpt(path: &Path, max_bytes: usize) -> Result<Option<TextExcerpt>> {
    let file = File::open(path).at(path)?;
    let mut sample = Vec::with_capacity(max_bytes.min(64 * 1024));
    // One extra byte tells us whether the file continues past the excerpt.
    file.take(max_bytes as u64 + 1).read_to_end(&mut sample).at(path)?;
    let truncated = sample.len() > max_bytes;
    sample.truncate(max_bytes);

    if looks_binary(&sample) {
        return Ok(None);
    }

    let (text, encoding) = decode(&sample, truncated);
    Ok(Some(TextExcerpt { text, encoding, truncated }))
}

fn decode(sample: &[u8], truncated: bool) -> (String, String) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(sample) {
        let (text, _) = encoding.decode_without_bom_handling(&sample[bom_len..]);
        return (text.into_owned(), encoding.name().to_lowercase());
    }

    match std::str::from_utf8(sample) {
        Ok(text) => return (text.to_string(), "utf-8".to_string()),
        // A multi-byte character split by the excerpt limit is still UTF-8.
        Err(err) if truncated && err.error_len().is_none() => {
            let text = String::from_utf8_lossy(&sample[..err.valid_up_to()]).into_owned();
            return (text, "utf-8".to_string());
        }
        Err(_) => {}
    }

    let mut detector = EncodingDetector::new();
    detector.feed(sample, !truncated);
    let encoding = detector.guess(None, true);
    if encoding == UTF_8 {
        return (String::from_utf8_lossy(sample).into_owned(), "utf-8".to_string());
    }
    let (text, _) = encoding.decode_without_bom_handling(sample);
    (text.into_owned(), encoding.name().to_lowercase())
}

/// Null bytes are a strong binary signal. Otherwise anything that is not
/// UTF-8 and is mostly non-printable ASCII counts as binary.
fn looks_binary(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }
    if Encoding::for_bom(sample).is_some() {
        return false;
    }
    match std::str::from_utf8(sample) {
        Ok(_) => return false,
        Err(err) if err.error_len().is_none() => return false,
        Err(_) => {}
    }

    let printable = sample
        .iter()
        .filter(|&&b| (32..=126).contains(&b) || b == b'\t' || b == b'\n' || b == b'\r')
        .count();
    (printable as f64 / sample.len() as f64) < 0.70
}
