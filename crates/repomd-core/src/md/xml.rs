//! Helpers shared by the streaming document parsers.

use std::{fs::File, io::BufReader, path::Path};

use quick_xml::{
    events::{BytesCData, BytesStart, BytesText},
    Reader,
};

use crate::error::{ErrorContext, Result};

/// Opens `path` for event-driven parsing, keeping text untrimmed.
pub(crate) fn open(path: &Path) -> Result<Reader<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(from_reader(BufReader::new(file)))
}

pub(crate) fn from_reader<R: std::io::BufRead>(reader: R) -> Reader<R> {
    let mut reader = Reader::from_reader(reader);
    reader.config_mut().trim_text(false);
    reader
}

/// Value of attribute `name`, if present.
pub(crate) fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes().with_checks(false) {
        let attr = attr?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Unescaped text, or `None` when it starts with whitespace.
///
/// Text between elements is indentation, and every value we keep starts
/// with a printable character.
pub(crate) fn text(event: &BytesText<'_>) -> Result<Option<String>> {
    let text = event.unescape()?;
    Ok(keep(&text).then(|| text.into_owned()))
}

pub(crate) fn cdata(event: &BytesCData<'_>) -> Option<String> {
    let text = String::from_utf8_lossy(event.as_ref());
    keep(&text).then(|| text.into_owned())
}

fn keep(text: &str) -> bool {
    !matches!(text.chars().next(), None | Some(' ' | '\t' | '\n'))
}

/// Parses a numeric attribute, falling back to 0.
pub(crate) fn number<T: std::str::FromStr + Default>(value: Option<&str>) -> T {
    value
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or_default()
}
