use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::constants::{VERSION_MADE_BY, VERSION_NEEDED_EMPTY_ENTRY, VERSION_NEEDED_TO_EXTRACT};
use crate::extra_field::ExtraFields;

/// The modification instant recorded for an entry.
///
/// Use [`FileDateTime::Now`] (the default) to stamp the entry with the time it
/// is written, or [`FileDateTime::Unix`] for an explicit timestamp in seconds
/// since the epoch.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FileDateTime {
    Now,
    Unix(i64),
}

impl FileDateTime {
    pub fn timestamp(&self) -> i64 {
        match self {
            FileDateTime::Now => Utc::now().timestamp(),
            FileDateTime::Unix(seconds) => *seconds,
        }
    }
}

impl Default for FileDateTime {
    fn default() -> Self {
        FileDateTime::Now
    }
}

/// Convert Unix seconds to the packed MS-DOS (date, time) pair of the headers.
///
/// The DOS format starts at 1980; earlier timestamps degrade to the all-zero
/// pair. Conversion is done in UTC.
pub fn dos_date_time(timestamp: i64) -> (u16, u16) {
    let date_time = match DateTime::from_timestamp(timestamp, 0) {
        Some(date_time) => date_time,
        None => return (0, 0),
    };

    if date_time.year() < 1980 {
        return (0, 0);
    }

    let date = date_time.day() as u16
        | (date_time.month() as u16) << 5
        | ((date_time.year() - 1980) as u16) << 9;
    let time = (date_time.second() as u16) / 2
        | (date_time.minute() as u16) << 5
        | (date_time.hour() as u16) << 11;

    (date, time)
}

/// Build an external-attributes value from Unix permission digits, for the
/// `external_attributes` entry option.
///
/// `owner`, `group` and `other` are octal permission digits (0 to 7). The
/// value combines the file-type and permission bits in the upper half with
/// the matching DOS flag (archive for files, directory for directories).
pub fn unix_attributes(owner: u32, group: u32, other: u32, is_file: bool) -> u32 {
    let file_type = if is_file { 0o100000 } else { 0o040000 };
    let mode = file_type | ((owner & 0o7) << 6) | ((group & 0o7) << 3) | (other & 0o7);

    (mode << 16) | if is_file { 0o040 } else { 0o020 }
}

/// Everything the central directory remembers about one written entry.
///
/// Records accumulate in write order and are serialized once, at finalize;
/// they are never mutated after the entry's payload went out.
#[derive(Debug)]
pub struct ArchiveFileEntry {
    pub file_name_as_bytes: Vec<u8>,
    pub general_purpose_flags: u16,
    pub compression_method: u16,
    pub last_mod_file_time: u16,
    pub last_mod_file_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub offset: u32,
    pub external_file_attributes: u32,
    pub file_comment: Option<Vec<u8>>,
    pub extra_fields: Vec<Box<dyn ExtraFields>>,
}

impl ArchiveFileEntry {
    pub fn version_made_by(&self) -> u16 {
        VERSION_MADE_BY
    }

    /// Zero-length entries advertise the lower 1.0 extraction version, the
    /// rest need 2.0.
    pub fn version_needed(&self) -> u16 {
        if self.uncompressed_size == 0 {
            VERSION_NEEDED_EMPTY_ENTRY
        } else {
            VERSION_NEEDED_TO_EXTRACT
        }
    }

    pub fn file_name_len(&self) -> u16 {
        self.file_name_as_bytes.len() as u16
    }

    pub fn file_comment_len(&self) -> u16 {
        match &self.file_comment {
            Some(comment) => comment.len() as u16,
            None => 0,
        }
    }

    pub fn local_extra_field_size(&self) -> u16 {
        self.extra_fields
            .iter()
            .map(|field| field.file_header_extra_field_size())
            .sum()
    }

    pub fn central_extra_field_size(&self) -> u16 {
        self.extra_fields
            .iter()
            .map(|field| field.central_header_extra_field_size())
            .sum()
    }
}
