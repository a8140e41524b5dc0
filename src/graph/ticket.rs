//! Ticket codec: VName <-> opaque string handle
//!
//! A ticket has the canonical form
//!
//! ```text
//! kythe:[//corpus][?lang=L][?path=P][?root=R][#signature]
//! ```
//!
//! Components are written only when non-empty and always in that order.
//! Bytes outside the plain set (alphanumerics and `-._~/:@!$&'()*+,;`) are
//! percent-escaped with upper-case hex, and nothing else is. Decoding
//! accepts only this canonical form, so the codec is a bijection between
//! VNames and valid tickets.

use super::vname::VName;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

const SCHEME: &str = "kythe:";

/// A string that is not a valid ticket
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct TicketError {
    pub reason: &'static str,
}

impl TicketError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Parameter names in canonical order
const PARAMS: [&str; 3] = ["lang", "path", "root"];

/// Bytes that get escaped: everything except alphanumerics and
/// `-._~/:@!$&'()*+,;`. Separators (`?`, `#`, `=`) and `%` stay escaped.
const TICKET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/')
    .remove(b':')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';');

fn escape_into(out: &mut String, text: &str) {
    out.extend(utf8_percent_encode(text, TICKET));
}

/// Decode one component, accepting only its canonical escaping
///
/// Anything that does not re-encode to `text` (lower-case hex, escapes of
/// plain bytes, raw reserved bytes, stray `%`) is rejected.
fn unescape(text: &str) -> Result<String, TicketError> {
    let decoded = percent_decode_str(text)
        .decode_utf8()
        .map_err(|_| TicketError::new("escaped bytes are not UTF-8"))?;
    if utf8_percent_encode(&decoded, TICKET).to_string() != text {
        return Err(TicketError::new("component is not canonically escaped"));
    }
    Ok(decoded.into_owned())
}

/// Encode a VName as its ticket
pub fn encode(vname: &VName) -> String {
    let mut out = String::from(SCHEME);
    if !vname.corpus.is_empty() {
        out.push_str("//");
        escape_into(&mut out, &vname.corpus);
    }
    let values = [&vname.language, &vname.path, &vname.root];
    for (name, value) in PARAMS.iter().zip(values) {
        if !value.is_empty() {
            out.push('?');
            out.push_str(name);
            out.push('=');
            escape_into(&mut out, value);
        }
    }
    if !vname.signature.is_empty() {
        out.push('#');
        escape_into(&mut out, &vname.signature);
    }
    out
}

/// Decode a ticket back into the VName it encodes
pub fn decode(ticket: &str) -> Result<VName, TicketError> {
    let rest = ticket
        .strip_prefix(SCHEME)
        .ok_or(TicketError::new("missing kythe: scheme"))?;

    let mut vname = VName::new();

    let head = match rest.split_once('#') {
        Some((head, signature)) => {
            if signature.is_empty() {
                return Err(TicketError::new("empty signature"));
            }
            vname.signature = unescape(signature)?;
            head
        }
        None => rest,
    };

    let mut parts = head.split('?');
    let authority = parts.next().unwrap_or_default();
    if !authority.is_empty() {
        let corpus = authority
            .strip_prefix("//")
            .ok_or(TicketError::new("unexpected text before parameters"))?;
        if corpus.is_empty() {
            return Err(TicketError::new("empty corpus"));
        }
        vname.corpus = unescape(corpus)?;
    }

    let mut next_rank = 0;
    for part in parts {
        let (name, value) = part
            .split_once('=')
            .ok_or(TicketError::new("parameter without value"))?;
        let rank = PARAMS
            .iter()
            .position(|p| *p == name)
            .ok_or(TicketError::new("unknown parameter"))?;
        if rank < next_rank {
            return Err(TicketError::new("repeated or out-of-order parameter"));
        }
        if value.is_empty() {
            return Err(TicketError::new("empty parameter value"));
        }
        let value = unescape(value)?;
        match rank {
            0 => vname.language = value,
            1 => vname.path = value,
            _ => vname.root = value,
        }
        next_rank = rank + 1;
    }

    Ok(vname)
}
