//! Minimal, non-validating XML tag scanning.
//!
//! Only what the spreadsheet parts need: locating start tags by name,
//! reading double- or single-quoted attributes, and finding the matching
//! close tag. Namespaces, entities and nesting rules are not interpreted.
//! All offsets are byte offsets; every delimiter searched for is ASCII, so
//! slicing at them stays on character boundaries.

/// A start tag (or self-closing tag) found in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tag<'x> {
    /// Element name as written, prefix included
    pub name: &'x str,
    /// Raw attribute text between the name and `>` (or `/>`)
    pub attrs: &'x str,
    /// Offset of the opening `<`
    pub start: usize,
    /// Offset just past the closing `>`
    pub end: usize,
    /// Whether the tag ends with `/>`
    pub self_closing: bool,
}

impl<'x> Tag<'x> {
    /// Value of attribute `key`, if present.
    pub fn attr(&self, key: &str) -> Option<&'x str> {
        attr(self.attrs, key)
    }
}

fn is_name_end(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'>' || b == b'/'
}

/// Next start tag at or after `from`.
///
/// Closing tags, comments, processing instructions and declarations are
/// stepped over. Returns `None` at the end of input or when a tag is never
/// closed with `>`.
pub(crate) fn next_start_tag(xml: &str, from: usize) -> Option<Tag<'_>> {
    let bytes = xml.as_bytes();
    let mut pos = from;

    loop {
        let lt = pos + xml.get(pos..)?.find('<')?;
        let name_start = lt + 1;

        match bytes.get(name_start) {
            Some(b'/') | Some(b'?') | Some(b'!') => {
                pos = name_start;
                continue;
            }
            None => return None,
            _ => {}
        }

        let name_end = bytes[name_start..]
            .iter()
            .position(|&b| is_name_end(b))
            .map(|i| name_start + i)?;
        if name_end == name_start {
            pos = name_start;
            continue;
        }

        let gt = name_end + xml[name_end..].find('>')?;
        let self_closing = gt > name_end && bytes[gt - 1] == b'/';
        let attrs_end = if self_closing { gt - 1 } else { gt };

        return Some(Tag {
            name: &xml[name_start..name_end],
            attrs: &xml[name_end..attrs_end],
            start: lt,
            end: gt + 1,
            self_closing,
        });
    }
}

/// Next start tag named `name` at or after `from`.
pub(crate) fn find_start_tag<'x>(xml: &'x str, from: usize, name: &str) -> Option<Tag<'x>> {
    let mut pos = from;
    while let Some(tag) = next_start_tag(xml, pos) {
        if tag.name == name {
            return Some(tag);
        }
        pos = tag.end;
    }
    None
}

/// Locate `</name>` at or after `from`.
///
/// Returns the offset of the close tag and the offset just past it.
pub(crate) fn find_close_tag(xml: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let needle = format!("</{}", name);
    let mut pos = from;

    loop {
        let start = pos + xml.get(pos..)?.find(&needle)?;
        let after_name = start + needle.len();
        match xml.as_bytes().get(after_name) {
            Some(b'>') => return Some((start, after_name + 1)),
            Some(b) if b.is_ascii_whitespace() => {
                let gt = after_name + xml[after_name..].find('>')?;
                return Some((start, gt + 1));
            }
            // `</tx>` when looking for `</t>`
            _ => pos = after_name,
        }
    }
}

/// Text content of the element opened by `tag`.
///
/// A self-closing tag has empty content; `None` if the element is never
/// closed.
pub(crate) fn element_text<'x>(xml: &'x str, tag: &Tag<'_>) -> Option<&'x str> {
    if tag.self_closing {
        return Some("");
    }
    let (close, _) = find_close_tag(xml, tag.end, tag.name)?;
    Some(&xml[tag.end..close])
}

/// Value of attribute `key` in raw attribute text.
///
/// The key must be preceded by whitespace so that `t` does not match the
/// tail of another attribute such as `fmt`.
pub(crate) fn attr<'x>(attrs: &'x str, key: &str) -> Option<&'x str> {
    let bytes = attrs.as_bytes();
    let mut pos = 0;

    while let Some(offset) = attrs[pos..].find(key) {
        let key_start = pos + offset;
        let key_end = key_start + key.len();
        pos = key_end;

        let preceded_ok = key_start == 0 || bytes[key_start - 1].is_ascii_whitespace();
        if !preceded_ok {
            continue;
        }

        let rest = attrs[key_end..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let quote = match rest.chars().next() {
            Some(q @ ('"' | '\'')) => q,
            _ => continue,
        };
        let value = &rest[1..];
        let close = value.find(quote)?;
        return Some(&value[..close]);
    }
    None
}
