use std::mem::size_of;

pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x04034b50;
pub const CENTRAL_DIRECTORY_ENTRY_SIGNATURE: u32 = 0x02014b50;
pub const CENTRAL_DIRECTORY_END_SIGNATURE: u32 = 0x06054b50;

/// Version made by: host system 3 (Unix) in the upper byte, PKZIP 3.0 below.
pub const VERSION_MADE_BY: u16 = 0x031E;

/// Minimum version needed to extract a stored or deflated entry.
pub const VERSION_NEEDED_TO_EXTRACT: u16 = 20;

/// Version advertised in the central directory for zero-length entries.
pub const VERSION_NEEDED_EMPTY_ENTRY: u16 = 10;

/// General purpose bit 11: file name and comment are encoded in UTF-8.
pub const UTF8_NAME_FLAG: u16 = 1 << 11;

/// Extra field header id for the extended (Unix) timestamp subfield.
pub const X5455_EXTENDED_TIMESTAMP: u16 = 0x5455;

/// Extra field header id for the Unix uid/gid subfield.
pub const X7875_UNIX_UID_GID: u16 = 0x7875;

pub const FILE_HEADER_BASE_SIZE: usize = 7 * size_of::<u16>() + 4 * size_of::<u32>();
pub const CENTRAL_DIRECTORY_ENTRY_BASE_SIZE: usize = 11 * size_of::<u16>() + 6 * size_of::<u32>();
pub const END_OF_CENTRAL_DIRECTORY_SIZE: usize = 5 * size_of::<u16>() + 3 * size_of::<u32>();

/// Archive bytes are buffered in memory up to this size, then spooled to a
/// temporary file.
pub const SPOOL_MEMORY_THRESHOLD: usize = 1_048_576;

/// Chunk size for stream and file copies.
pub const COPY_CHUNK_SIZE: usize = 65_536;

/// External attributes for a regular file: `-rw-r--r--` plus the DOS archive flag.
pub const DEFAULT_FILE_ATTRIBUTES: u32 = (0o100644 << 16) | 0o040;

/// External attributes for a directory: `drwxr-xr-x` plus the DOS directory flag.
pub const DEFAULT_DIRECTORY_ATTRIBUTES: u32 = (0o040755 << 16) | 0o020;
