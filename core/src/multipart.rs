//! `multipart/form-data` encoding for file uploads.
//!
//! REDCap only accepts file imports as multipart. The body is produced by
//! ureq's multipart `Form` and read into memory, so building a request still
//! does no network I/O. ureq copies part names and file names into the
//! `Content-Disposition` line as given; caller-supplied file names go through
//! `disposition_value` first.

use std::borrow::Cow;
use std::io::{self, Read};

use ureq::unversioned::multipart::{Form, Part};

use crate::error::RedcapError;
use crate::request::EncodedBody;

const FILE_MIME: &str = "application/octet-stream";

/// Encode `fields` as text parts, in order, followed by one file part.
pub fn encode(
    fields: &[(&str, &str)],
    file_field: &str,
    filename: &str,
    contents: &[u8],
) -> Result<EncodedBody, RedcapError> {
    let filename = disposition_value(filename);
    let file = Part::bytes(contents)
        .file_name(&filename)
        .mime_str(FILE_MIME)
        .map_err(|e| RedcapError::Multipart(io::Error::other(e.to_string())))?;

    let mut form = fields
        .iter()
        .fold(Form::new(), |form, &(name, value)| form.text(name, value))
        .part(file_field, file);

    let content_type = format!("multipart/form-data; boundary={}", form.boundary());
    let mut bytes = Vec::new();
    form.read_to_end(&mut bytes).map_err(RedcapError::Multipart)?;

    Ok(EncodedBody {
        content_type,
        bytes,
    })
}

/// Percent-encode `"`, CR and LF so the value stays inside its quoted
/// parameter (RFC 7578 section 2).
pub fn disposition_value(value: &str) -> Cow<'_, str> {
    if !value.contains(['"', '\r', '\n']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '"' => out.push_str("%22"),
            '\r' => out.push_str("%0D"),
            '\n' => out.push_str("%0A"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
