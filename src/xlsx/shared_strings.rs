//! XLSX shared strings parsing.

use super::scan::{element_text, find_close_tag, find_start_tag, next_start_tag};

/// Shared strings table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    /// All strings in order
    strings: Vec<String>,
}

impl SharedStrings {
    /// Parse shared strings from XML content.
    ///
    /// Each `<si>` item becomes one entry, its `<t>` runs concatenated and
    /// phonetic `<rPh>` runs left out. A table without `<si>` items yields
    /// one entry per `<t>` span. Text is kept as written; entities are not
    /// expanded.
    pub fn parse(xml: &str) -> Self {
        let strings = if find_start_tag(xml, 0, "si").is_some() {
            items(xml)
        } else {
            spans(xml)
        };
        Self { strings }
    }

    /// Get a string by index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    /// Get the count of shared strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

fn items(xml: &str) -> Vec<String> {
    let mut strings = Vec::new();
    let mut pos = 0;

    while let Some(si) = find_start_tag(xml, pos, "si") {
        if si.self_closing {
            strings.push(String::new());
            pos = si.end;
            continue;
        }
        let (body_end, after) =
            find_close_tag(xml, si.end, "si").unwrap_or((xml.len(), xml.len()));
        strings.push(text_runs(&xml[si.end..body_end]));
        pos = after;
    }
    strings
}

fn spans(xml: &str) -> Vec<String> {
    let mut strings = Vec::new();
    let mut pos = 0;

    while let Some(t) = find_start_tag(xml, pos, "t") {
        match element_text(xml, &t) {
            Some(text) => strings.push(text.to_string()),
            None => break,
        }
        pos = t.end;
    }
    strings
}

/// Concatenate the `<t>` runs of a fragment, skipping `<rPh>` subtrees.
pub(crate) fn text_runs(fragment: &str) -> String {
    let mut out = String::new();
    let mut pos = 0;

    while let Some(tag) = next_start_tag(fragment, pos) {
        pos = tag.end;
        match tag.name {
            "rPh" if !tag.self_closing => {
                pos = find_close_tag(fragment, tag.end, "rPh")
                    .map_or(fragment.len(), |(_, after)| after);
            }
            "t" => match element_text(fragment, &tag) {
                Some(text) => out.push_str(text),
                None => break,
            },
            _ => {}
        }
    }
    out
}
