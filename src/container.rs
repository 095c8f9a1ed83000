//! ZIP container access for OOXML spreadsheets.
//!
//! Entries are found by walking the local file headers from the start of
//! the buffer. The central directory is never read: scanning stops at the
//! first offset that does not carry a local header signature, which in a
//! well-formed archive is where the central directory begins.

use crate::error::{Error, Result};
use crate::inflate::inflate_with_hint;
use byteorder::{ByteOrder, LittleEndian};
use log::debug;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Local file header signature: PK\x03\x04
pub const LFH_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Size of the fixed part of a local file header.
pub const LFH_SIZE: usize = 30;

/// Optional signature in front of a data descriptor: PK\x07\x08
const DATA_DESCRIPTOR_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x07, 0x08];

/// Compression method: no compression.
pub const METHOD_STORED: u16 = 0;

/// Compression method: DEFLATE.
pub const METHOD_DEFLATE: u16 = 8;

const FLAG_ENCRYPTED: u16 = 0x0001;
const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;

/// One entry found by scanning local file headers.
///
/// The payload borrows from the buffer the archive was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipEntry<'a> {
    /// Entry name as stored in the header (lossy UTF-8)
    pub name: String,
    /// Compression method (0 = stored, 8 = deflate)
    pub compression_method: u16,
    /// General purpose bit flags
    pub flags: u16,
    /// Size of `payload` in bytes
    pub compressed_size: u32,
    /// Uncompressed size claimed by the header; advisory only
    pub declared_uncompressed_size: u32,
    /// Compressed bytes
    pub payload: &'a [u8],
}

impl<'a> ZipEntry<'a> {
    /// Whether the entry names a directory.
    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/')
    }

    /// Whether the entry is flagged as encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    /// Uncompressed contents of the entry.
    ///
    /// Stored entries are returned as a borrowed view; deflated entries are
    /// inflated into a new buffer.
    pub fn contents(&self) -> Result<Cow<'a, [u8]>> {
        if self.is_encrypted() {
            return Err(Error::Encrypted(self.name.clone()));
        }

        match self.compression_method {
            METHOD_STORED => Ok(Cow::Borrowed(self.payload)),
            METHOD_DEFLATE => {
                let inflated =
                    inflate_with_hint(self.payload, self.declared_uncompressed_size as usize)?;
                Ok(Cow::Owned(inflated.data))
            }
            method => Err(Error::UnsupportedCompression {
                name: self.name.clone(),
                method,
            }),
        }
    }
}

/// Scan `data` for local file headers and index the entries by name.
///
/// # Errors
///
/// - [`Error::NotAZipContainer`] if the buffer does not start with a local
///   file header signature
/// - [`Error::CorruptZipHeader`] if a header, name or payload runs past the
///   end of the buffer
/// - [`Error::EmptyArchive`] if not even one complete local header fits
pub fn read_local_entries(data: &[u8]) -> Result<BTreeMap<String, ZipEntry<'_>>> {
    if !is_zip_file(data) {
        return Err(Error::NotAZipContainer);
    }
    if data.len() < LFH_SIZE {
        return Err(Error::EmptyArchive);
    }

    let mut entries = BTreeMap::new();
    let mut pos = 0usize;

    while data.get(pos..pos + 4) == Some(&LFH_SIGNATURE[..]) {
        let (entry, next) = read_local_header(data, pos)?;
        debug!(
            "zip entry '{}' at offset {}: method {}, {} -> {} bytes",
            entry.name,
            pos,
            entry.compression_method,
            entry.compressed_size,
            entry.declared_uncompressed_size
        );
        entries.insert(entry.name.clone(), entry);
        pos = next;
    }

    Ok(entries)
}

/// Parse the local header at `pos`; returns the entry and the offset after it.
fn read_local_header(data: &[u8], pos: usize) -> Result<(ZipEntry<'_>, usize)> {
    let header = data.get(pos..pos + LFH_SIZE).ok_or_else(|| {
        Error::CorruptZipHeader(format!("local header at offset {} is truncated", pos))
    })?;

    let flags = LittleEndian::read_u16(&header[6..8]);
    let compression_method = LittleEndian::read_u16(&header[8..10]);
    let compressed_size = LittleEndian::read_u32(&header[18..22]);
    let declared_uncompressed_size = LittleEndian::read_u32(&header[22..26]);
    let name_len = LittleEndian::read_u16(&header[26..28]) as usize;
    let extra_len = LittleEndian::read_u16(&header[28..30]) as usize;

    let name_start = pos + LFH_SIZE;
    let name_bytes = data.get(name_start..name_start + name_len).ok_or_else(|| {
        Error::CorruptZipHeader(format!(
            "file name at offset {} runs past the end of the archive",
            name_start
        ))
    })?;
    let name = String::from_utf8_lossy(name_bytes).into_owned();

    let data_start = name_start + name_len + extra_len;
    if data_start > data.len() {
        return Err(Error::CorruptZipHeader(format!(
            "extra field of '{}' runs past the end of the archive",
            name
        )));
    }

    let streamed = flags & FLAG_DATA_DESCRIPTOR != 0;
    let payload = if streamed && compressed_size == 0 && compression_method == METHOD_DEFLATE {
        // Sizes live in a descriptor after the data; the DEFLATE stream
        // delimits itself.
        let inflated = inflate_with_hint(&data[data_start..], 0)?;
        &data[data_start..data_start + inflated.consumed]
    } else {
        data.get(data_start..data_start + compressed_size as usize)
            .ok_or_else(|| {
                Error::CorruptZipHeader(format!(
                    "compressed data of '{}' runs past the end of the archive",
                    name
                ))
            })?
    };

    let mut next = data_start + payload.len();
    if streamed {
        next = skip_data_descriptor(data, next);
    }

    let entry = ZipEntry {
        name,
        compression_method,
        flags,
        compressed_size: payload.len() as u32,
        declared_uncompressed_size,
        payload,
    };
    Ok((entry, next))
}

/// Offset after the data descriptor that starts at `pos`.
fn skip_data_descriptor(data: &[u8], pos: usize) -> usize {
    let len = if data.get(pos..pos + 4) == Some(&DATA_DESCRIPTOR_SIGNATURE[..]) {
        16
    } else {
        12
    };
    (pos + len).min(data.len())
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == LFH_SIGNATURE
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
///
/// OOXML parts are normally UTF-8, but some producers write UTF-16. Invalid
/// sequences are replaced rather than rejected.
pub fn decode_xml_bytes(bytes: &[u8]) -> String {
    // UTF-8 BOM: EF BB BF
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(rest).into_owned();
    }

    // UTF-16 LE BOM: FF FE
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes);
    }

    // UTF-16 BE BOM: FE FF
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            // UTF-16 without BOM has null bytes next to ASCII characters
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16(bytes, u16::from_le_bytes)
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16(bytes, u16::from_be_bytes)
            } else {
                String::from_utf8_lossy(bytes).into_owned()
            }
        }
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]));

    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// OOXML container view over a ZIP buffer.
///
/// Provides methods to read XML parts and binary data by entry name.
#[derive(Debug, Clone)]
pub struct OoxmlContainer<'a> {
    entries: BTreeMap<String, ZipEntry<'a>>,
}

impl<'a> OoxmlContainer<'a> {
    /// Index the entries of a ZIP buffer.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rawsheet::container::OoxmlContainer;
    ///
    /// let data = std::fs::read("book.xlsx")?;
    /// let container = OoxmlContainer::from_bytes(&data)?;
    /// for name in container.list_files() {
    ///     println!("{}", name);
    /// }
    /// # Ok::<(), rawsheet::Error>(())
    /// ```
    pub fn from_bytes(data: &'a [u8]) -> Result<Self> {
        let entries = read_local_entries(data)?;
        Ok(Self { entries })
    }

    /// Look up an entry by name.
    pub fn entry(&self, path: &str) -> Option<&ZipEntry<'a>> {
        self.entries.get(path)
    }

    /// All entries, ordered by name.
    pub fn entries(&self) -> impl Iterator<Item = &ZipEntry<'a>> {
        self.entries.values()
    }

    /// Read an XML part as text.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        Ok(decode_xml_bytes(&bytes))
    }

    /// Read the uncompressed bytes of an entry.
    pub fn read_binary(&self, path: &str) -> Result<Cow<'a, [u8]>> {
        self.entries
            .get(path)
            .ok_or_else(|| Error::MissingRequiredEntry(path.to_string()))?
            .contents()
    }

    /// Check if an entry exists.
    pub fn exists(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// List all entry names.
    pub fn list_files(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// List entry names matching a prefix.
    pub fn list_files_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .keys()
            .filter(|n| n.starts_with(prefix))
            .cloned()
            .collect()
    }
}
