use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::{debug, trace};

use crate::compress::EntryEncoder;
use crate::compression::CompressionMethod;
use crate::constants::{
    CENTRAL_DIRECTORY_ENTRY_BASE_SIZE, COPY_CHUNK_SIZE, DEFAULT_DIRECTORY_ATTRIBUTES,
    DEFAULT_FILE_ATTRIBUTES, UTF8_NAME_FLAG,
};
use crate::descriptor::ArchiveDescriptor;
use crate::error::ArchiveError;
use crate::extra_field::{ExtraFieldExtendedTimestamp, ExtraFieldUnixUidGid, ExtraFields};
use crate::header::{
    build_central_directory_end, build_central_directory_file_header, build_local_file_header,
};
use crate::path;
use crate::sink::ArchiveSink;
use crate::types::{dos_date_time, ArchiveFileEntry, FileDateTime};

/// Metadata for an entry to be archived.
#[derive(Clone)]
pub struct EntryOptions<'a> {
    /// The entry modification time, stamped into the DOS field and the
    /// extended-timestamp extra field.
    pub last_modified_time: FileDateTime,

    /// Entry comment, stored in the central directory record only.
    pub comment: Option<&'a str>,

    /// Whether to attempt deflate. Stored is used whenever deflate does not
    /// win, and always for directories.
    pub compress: bool,

    /// External file attributes; picked per entry kind when unset.
    pub external_attributes: Option<u32>,
}

impl<'a> EntryOptions<'a> {
    /// Set the entry modification time.
    ///
    /// The default stamps entries with the time they are written.
    pub fn last_modified_time(mut self, time: FileDateTime) -> EntryOptions<'a> {
        self.last_modified_time = time;
        self
    }

    /// Set the entry comment.
    pub fn comment(mut self, comment: &'a str) -> EntryOptions<'a> {
        self.comment = Some(comment);
        self
    }

    /// Enable or disable deflate for the entry. The default is enabled.
    pub fn compress(mut self, compress: bool) -> EntryOptions<'a> {
        self.compress = compress;
        self
    }

    /// Set the external file attributes, overriding the per-kind default.
    /// Use [`crate::types::unix_attributes`] to build the value from
    /// permission digits.
    pub fn external_attributes(mut self, attributes: u32) -> EntryOptions<'a> {
        self.external_attributes = Some(attributes);
        self
    }
}

impl<'a> Default for EntryOptions<'a> {
    fn default() -> Self {
        Self {
            last_modified_time: FileDateTime::Now,
            comment: None,
            compress: true,
            external_attributes: None,
        }
    }
}

/// State of one in-progress streamed entry. The payload accumulates in an
/// unnamed temporary file until the stream is closed.
struct OpenStream {
    file_path: String,
    timestamp: i64,
    comment: Option<Vec<u8>>,
    compress: bool,
    external_attributes: u32,
    buffer: File,
    length: u64,
}

/// A zip archive writer.
///
/// Entries are appended one by one with [`add_file`](Self::add_file),
/// [`add_directory`](Self::add_directory) or the
/// [`open_stream`](Self::open_stream) protocol, in the exact order they should
/// appear in the container. [`finalize`](Self::finalize) writes the central
/// directory and seals the archive; afterwards the content is read out with
/// [`get_bytes`](Self::get_bytes), [`into_file`](Self::into_file) or
/// [`write_to`](Self::write_to) (each finalizes implicitly).
///
/// The writer is synchronous and single-threaded; every call runs to
/// completion. A failed write leaves the archive unusable and the whole
/// container must be rebuilt — the central-directory-at-the-end layout makes
/// partial output worthless anyway.
pub struct ZipArchive {
    sink: ArchiveSink,
    central_directory: Vec<ArchiveFileEntry>,
    archive_comment: Option<Vec<u8>>,
    add_extra_fields: bool,
    finalized: bool,
    stream: Option<OpenStream>,
}

impl ZipArchive {
    /// Create a new archive buffered in memory. The buffer spools itself to a
    /// temporary file when the archive outgrows the memory threshold.
    pub fn new() -> Self {
        ZipArchive {
            sink: ArchiveSink::new(),
            central_directory: Vec::new(),
            archive_comment: None,
            add_extra_fields: true,
            finalized: false,
            stream: None,
        }
    }

    /// Create a new archive writing to a temporary file from the first byte.
    pub fn new_file_backed() -> Result<Self, ArchiveError> {
        Ok(ZipArchive {
            sink: ArchiveSink::new_file_backed()?,
            ..ZipArchive::new()
        })
    }

    /// Enable or disable the timestamp and uid/gid extra fields.
    ///
    /// Enabled by default; they add 28 bytes per local header and cost
    /// nothing to readers that ignore them. Disable for archives with
    /// byte-exact zero-extra headers.
    pub fn set_extra_fields(&mut self, add_extra_fields: bool) {
        self.add_extra_fields = add_extra_fields;
    }

    /// Set the archive comment written into the end record.
    pub fn set_archive_comment(&mut self, comment: &str) -> Result<(), ArchiveError> {
        if self.finalized {
            return Err(ArchiveError::ArchiveFinalized);
        }
        if comment.len() > u16::MAX as usize {
            return Err(ArchiveError::CommentTooLong(comment.len()));
        }
        self.archive_comment = Some(comment.as_bytes().to_vec());
        Ok(())
    }

    /// Append a file entry with an in-memory payload.
    pub fn add_file(
        &mut self,
        file_path: &str,
        data: &[u8],
        options: &EntryOptions,
    ) -> Result<(), ArchiveError> {
        if self.finalized {
            return Err(ArchiveError::ArchiveFinalized);
        }

        let file_path = path::normalize(file_path);
        let timestamp = options.last_modified_time.timestamp();

        let mut encoder = EntryEncoder::new(options.compress);
        encoder.update(data)?;
        let payload = encoder.finish()?;
        let method = payload.method();

        let compressed: &[u8] = match method {
            CompressionMethod::Deflate => payload.deflated.as_deref().unwrap_or(data),
            CompressionMethod::Store => data,
        };

        self.build_zip_entry(
            &file_path,
            options.comment.map(|c| c.as_bytes().to_vec()),
            method,
            timestamp,
            payload.crc32,
            compressed.len() as u64,
            payload.uncompressed_size,
            options
                .external_attributes
                .unwrap_or(DEFAULT_FILE_ATTRIBUTES),
        )?;
        self.sink.write(compressed)?;

        Ok(())
    }

    /// Append a file entry reading the payload from `source`. The payload is
    /// buffered through the streamed-entry path, so arbitrarily large sources
    /// never sit in memory whole.
    pub fn add_file_from_reader<R: Read>(
        &mut self,
        file_path: &str,
        source: &mut R,
        options: &EntryOptions,
    ) -> Result<(), ArchiveError> {
        self.open_stream(file_path, options)?;

        let mut chunk = vec![0u8; COPY_CHUNK_SIZE];
        loop {
            let read = source.read(&mut chunk)?;
            if read == 0 {
                break;
            }
            self.append_stream_data(&chunk[..read])?;
        }

        self.close_stream()
    }

    /// Append a file entry with the payload read from the file system.
    pub fn add_file_from_path(
        &mut self,
        file_path: &str,
        source: &Path,
        options: &EntryOptions,
    ) -> Result<(), ArchiveError> {
        let mut file = File::open(source)?;
        self.add_file_from_reader(file_path, &mut file, options)
    }

    /// Append an empty directory entry. Returns `Ok(false)`, adding nothing,
    /// when the normalized path is empty (the archive root).
    pub fn add_directory(
        &mut self,
        directory_path: &str,
        options: &EntryOptions,
    ) -> Result<bool, ArchiveError> {
        if self.finalized {
            return Err(ArchiveError::ArchiveFinalized);
        }

        let normalized = path::normalize(directory_path);
        let trimmed = normalized.trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut directory_path = trimmed.to_owned();
        directory_path.push('/');

        self.build_zip_entry(
            &directory_path,
            options.comment.map(|c| c.as_bytes().to_vec()),
            CompressionMethod::Store,
            options.last_modified_time.timestamp(),
            0,
            0,
            0,
            options
                .external_attributes
                .unwrap_or(DEFAULT_DIRECTORY_ATTRIBUTES),
        )?;

        Ok(true)
    }

    /// Open a streamed entry for a payload whose size is not known up front.
    ///
    /// At most one stream is open at a time; opening another implicitly
    /// closes the current one.
    pub fn open_stream(
        &mut self,
        file_path: &str,
        options: &EntryOptions,
    ) -> Result<(), ArchiveError> {
        if self.finalized {
            return Err(ArchiveError::ArchiveFinalized);
        }
        if let Some(comment) = options.comment {
            if comment.len() > u16::MAX as usize {
                return Err(ArchiveError::CommentTooLong(comment.len()));
            }
        }
        if self.stream.is_some() {
            self.close_stream()?;
        }

        // A large payload is coming; stop growing the in-memory buffer now.
        self.sink.spool_to_temp_file()?;

        let file_path = path::normalize(file_path);
        debug!("opening streamed entry {:?}", file_path);

        self.stream = Some(OpenStream {
            file_path,
            timestamp: options.last_modified_time.timestamp(),
            comment: options.comment.map(|c| c.as_bytes().to_vec()),
            compress: options.compress,
            external_attributes: options
                .external_attributes
                .unwrap_or(DEFAULT_FILE_ATTRIBUTES),
            buffer: tempfile::tempfile()?,
            length: 0,
        });

        Ok(())
    }

    /// Append payload bytes to the open streamed entry.
    pub fn append_stream_data(&mut self, data: &[u8]) -> Result<(), ArchiveError> {
        if self.finalized {
            return Err(ArchiveError::ArchiveFinalized);
        }
        let stream = self.stream.as_mut().ok_or(ArchiveError::NoOpenStream)?;

        stream.buffer.write_all(data)?;
        stream.length += data.len() as u64;

        Ok(())
    }

    /// Close the open streamed entry: encode the buffered payload, write the
    /// entry through the regular path and drop the stream buffer.
    pub fn close_stream(&mut self) -> Result<(), ArchiveError> {
        if self.finalized {
            return Err(ArchiveError::ArchiveFinalized);
        }
        let mut stream = self.stream.take().ok_or(ArchiveError::NoOpenStream)?;
        debug!(
            "closing streamed entry {:?} after {} bytes",
            stream.file_path, stream.length
        );

        stream.buffer.flush()?;
        stream.buffer.seek(SeekFrom::Start(0))?;

        let mut encoder = EntryEncoder::new(stream.compress);
        let mut chunk = vec![0u8; COPY_CHUNK_SIZE];
        loop {
            let read = stream.buffer.read(&mut chunk)?;
            if read == 0 {
                break;
            }
            encoder.update(&chunk[..read])?;
        }
        let payload = encoder.finish()?;
        let method = payload.method();

        let compressed_size = match (&method, &payload.deflated) {
            (CompressionMethod::Deflate, Some(deflated)) => deflated.len() as u64,
            _ => payload.uncompressed_size,
        };

        self.build_zip_entry(
            &stream.file_path,
            stream.comment.take(),
            method,
            stream.timestamp,
            payload.crc32,
            compressed_size,
            payload.uncompressed_size,
            stream.external_attributes,
        )?;

        match (method, payload.deflated) {
            (CompressionMethod::Deflate, Some(deflated)) => self.sink.write(&deflated)?,
            _ => {
                // stored: replay the raw payload from the stream buffer
                stream.buffer.seek(SeekFrom::Start(0))?;
                loop {
                    let read = stream.buffer.read(&mut chunk)?;
                    if read == 0 {
                        break;
                    }
                    self.sink.write(&chunk[..read])?;
                }
            }
        }

        Ok(())
    }

    /// Close the archive: write the central directory and the end record.
    /// An open streamed entry is closed first. A second call is a no-op.
    pub fn finalize(&mut self) -> Result<(), ArchiveError> {
        if self.finalized {
            return Ok(());
        }
        if self.stream.is_some() {
            self.close_stream()?;
        }

        let central_directory_offset = self.sink.offset();
        let mut record = ArchiveDescriptor::new(CENTRAL_DIRECTORY_ENTRY_BASE_SIZE + 64);

        for entry in &self.central_directory {
            build_central_directory_file_header(&mut record, entry);
            self.sink.write(record.buffer())?;
            record.clear();
        }

        let central_directory_size = self.sink.offset() - central_directory_offset;

        let end_record = build_central_directory_end(
            self.central_directory.len() as u16,
            central_directory_size.min(u32::MAX as u64) as u32,
            central_directory_offset.min(u32::MAX as u64) as u32,
            self.archive_comment.as_deref(),
        )
        .finish();
        self.sink.write(&end_record)?;

        self.finalized = true;
        debug!(
            "archive finalized: {} entries, {} bytes",
            self.central_directory.len(),
            self.sink.offset()
        );

        Ok(())
    }

    /// The archive contents as a byte vector, finalizing first if needed.
    pub fn get_bytes(&mut self) -> Result<Vec<u8>, ArchiveError> {
        self.finalize()?;
        self.sink.read_all()
    }

    /// Stream the archive contents into `destination`, finalizing first if
    /// needed. Returns the archive size.
    pub fn write_to<W: Write>(&mut self, destination: &mut W) -> Result<u64, ArchiveError> {
        self.finalize()?;
        self.sink.write_to(destination)
    }

    /// Hand the archive over as a rewound temporary file, finalizing first if
    /// needed.
    pub fn into_file(mut self) -> Result<File, ArchiveError> {
        self.finalize()?;
        self.sink.into_file()
    }

    /// Write all present and future archive bytes to the named file,
    /// releasing any previous backing. Usable before or after finalize; an
    /// existing file is overwritten.
    pub fn set_output_file(&mut self, destination: &Path) -> Result<(), ArchiveError> {
        self.sink.redirect_to_path(destination)
    }

    /// Current size of the archive in bytes.
    pub fn archive_size(&self) -> u64 {
        self.sink.offset()
    }

    /// Number of entries added so far.
    pub fn entry_count(&self) -> usize {
        self.central_directory.len()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Write the local header for one entry and remember its central
    /// directory record. The caller appends the payload right after.
    #[allow(clippy::too_many_arguments)]
    fn build_zip_entry(
        &mut self,
        file_path: &str,
        file_comment: Option<Vec<u8>>,
        method: CompressionMethod,
        timestamp: i64,
        crc32: u32,
        compressed_size: u64,
        uncompressed_size: u64,
        external_file_attributes: u32,
    ) -> Result<(), ArchiveError> {
        if let Some(comment) = &file_comment {
            if comment.len() > u16::MAX as usize {
                return Err(ArchiveError::CommentTooLong(comment.len()));
            }
        }
        if self.central_directory.len() >= u16::MAX as usize {
            return Err(ArchiveError::TooManyEntries);
        }

        let mut general_purpose_flags = 0u16;
        let comment_is_ascii = file_comment.as_ref().map_or(true, |c| c.is_ascii());
        if !file_path.is_ascii() || !comment_is_ascii {
            general_purpose_flags |= UTF8_NAME_FLAG;
        }

        let (last_mod_file_date, last_mod_file_time) = dos_date_time(timestamp);

        let entry = ArchiveFileEntry {
            file_name_as_bytes: file_path.as_bytes().to_vec(),
            general_purpose_flags,
            compression_method: method.zip_code(),
            last_mod_file_time,
            last_mod_file_date,
            crc32,
            compressed_size: compressed_size.min(u32::MAX as u64) as u32,
            uncompressed_size: uncompressed_size.min(u32::MAX as u64) as u32,
            offset: self.sink.offset().min(u32::MAX as u64) as u32,
            external_file_attributes,
            file_comment,
            extra_fields: self.make_extra_fields(timestamp),
        };
        trace!(
            "appending entry {:?}: {} -> {} bytes, {}",
            file_path,
            uncompressed_size,
            compressed_size,
            method
        );

        let local_header = build_local_file_header(&entry);
        self.sink.write(local_header.buffer())?;
        self.central_directory.push(entry);

        Ok(())
    }

    fn make_extra_fields(&self, timestamp: i64) -> Vec<Box<dyn ExtraFields>> {
        if !self.add_extra_fields {
            return Vec::new();
        }

        let seconds = timestamp as i32;
        vec![
            Box::new(ExtraFieldExtendedTimestamp::new(
                Some(seconds),
                Some(seconds),
            )),
            Box::new(ExtraFieldUnixUidGid::default()),
        ]
    }
}

impl Default for ZipArchive {
    fn default() -> Self {
        ZipArchive::new()
    }
}
