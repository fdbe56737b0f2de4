//! Builders for the three record kinds of the container format.

use crate::constants::{
    CENTRAL_DIRECTORY_END_SIGNATURE, CENTRAL_DIRECTORY_ENTRY_SIGNATURE,
    END_OF_CENTRAL_DIRECTORY_SIZE, FILE_HEADER_BASE_SIZE, LOCAL_FILE_HEADER_SIGNATURE,
    VERSION_NEEDED_TO_EXTRACT,
};
use crate::descriptor::ArchiveDescriptor;
use crate::types::ArchiveFileEntry;

/// The local file header written immediately before an entry's payload. It
/// already carries the final CRC and lengths.
pub fn build_local_file_header(entry: &ArchiveFileEntry) -> ArchiveDescriptor {
    let extra_field_size = entry.local_extra_field_size();

    let mut header = ArchiveDescriptor::new(
        FILE_HEADER_BASE_SIZE + entry.file_name_as_bytes.len() + extra_field_size as usize,
    );
    header.write_u32(LOCAL_FILE_HEADER_SIGNATURE);
    header.write_u16(VERSION_NEEDED_TO_EXTRACT);
    header.write_u16(entry.general_purpose_flags);
    header.write_u16(entry.compression_method);
    header.write_u16(entry.last_mod_file_time);
    header.write_u16(entry.last_mod_file_date);
    header.write_u32(entry.crc32);
    header.write_u32(entry.compressed_size);
    header.write_u32(entry.uncompressed_size);
    header.write_u16(entry.file_name_len());
    header.write_u16(extra_field_size);
    header.write_bytes(&entry.file_name_as_bytes);

    for field in &entry.extra_fields {
        field.file_header_write_data(&mut header);
    }

    header
}

/// One central directory record, appended to `central_directory`.
pub fn build_central_directory_file_header(
    central_directory: &mut ArchiveDescriptor,
    entry: &ArchiveFileEntry,
) {
    central_directory.write_u32(CENTRAL_DIRECTORY_ENTRY_SIGNATURE);
    central_directory.write_u16(entry.version_made_by());
    central_directory.write_u16(entry.version_needed());
    central_directory.write_u16(entry.general_purpose_flags);
    central_directory.write_u16(entry.compression_method);
    central_directory.write_u16(entry.last_mod_file_time);
    central_directory.write_u16(entry.last_mod_file_date);
    central_directory.write_u32(entry.crc32);
    central_directory.write_u32(entry.compressed_size);
    central_directory.write_u32(entry.uncompressed_size);
    central_directory.write_u16(entry.file_name_len());
    central_directory.write_u16(entry.central_extra_field_size());
    central_directory.write_u16(entry.file_comment_len());
    central_directory.write_u16(0); // disk number start
    central_directory.write_u16(0); // internal file attributes
    central_directory.write_u32(entry.external_file_attributes);
    central_directory.write_u32(entry.offset);
    central_directory.write_bytes(&entry.file_name_as_bytes);

    for field in &entry.extra_fields {
        field.central_header_write_data(central_directory);
    }

    if let Some(comment) = &entry.file_comment {
        central_directory.write_bytes(comment);
    }
}

/// The end-of-central-directory record. Multi-disk archives are unsupported,
/// so both entry counts are equal and the disk numbers stay zero.
pub fn build_central_directory_end(
    entry_count: u16,
    central_directory_size: u32,
    central_directory_offset: u32,
    archive_comment: Option<&[u8]>,
) -> ArchiveDescriptor {
    let comment_len = archive_comment.map_or(0, <[u8]>::len);

    let mut end_record = ArchiveDescriptor::new(END_OF_CENTRAL_DIRECTORY_SIZE + comment_len);
    end_record.write_u32(CENTRAL_DIRECTORY_END_SIGNATURE);
    end_record.write_u16(0); // number of this disk
    end_record.write_u16(0); // disk with the central directory
    end_record.write_u16(entry_count);
    end_record.write_u16(entry_count);
    end_record.write_u32(central_directory_size);
    end_record.write_u32(central_directory_offset);

    match archive_comment {
        Some(comment) => {
            end_record.write_u16(comment.len() as u16);
            end_record.write_bytes(comment);
        }
        None => end_record.write_u16(0),
    }

    end_record
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::constants::CENTRAL_DIRECTORY_ENTRY_BASE_SIZE;
    use crate::extra_field::{ExtraFieldExtendedTimestamp, ExtraFieldUnixUidGid};

    fn sample_entry() -> ArchiveFileEntry {
        ArchiveFileEntry {
            file_name_as_bytes: b"file1.txt".to_vec(),
            general_purpose_flags: 0,
            compression_method: 8,
            last_mod_file_time: 0x6C30,
            last_mod_file_date: 0x5662,
            crc32: 0xB3B7851D,
            compressed_size: 14_022,
            uncompressed_size: 4_120_799,
            offset: 0,
            external_file_attributes: 0x81A4_0020,
            file_comment: None,
            extra_fields: vec![
                Box::new(ExtraFieldExtendedTimestamp::new(Some(1234), Some(1234))),
                Box::new(ExtraFieldUnixUidGid::default()),
            ],
        }
    }

    #[test]
    fn local_header_size_and_signature() {
        let entry = sample_entry();
        let header = build_local_file_header(&entry);

        assert_eq!(header.len(), FILE_HEADER_BASE_SIZE + 9 + 28);
        assert_eq!(&header.buffer()[..4], b"PK\x03\x04");
        // extra field length at offset 28
        assert_eq!(&header.buffer()[28..30], [28u8, 0u8]);
    }

    #[test]
    fn central_record_size_and_versions() {
        let entry = sample_entry();
        let mut central_directory = ArchiveDescriptor::new(100);
        build_central_directory_file_header(&mut central_directory, &entry);

        assert_eq!(
            central_directory.len(),
            CENTRAL_DIRECTORY_ENTRY_BASE_SIZE + 9 + 24
        );
        assert_eq!(&central_directory.buffer()[..4], b"PK\x01\x02");
        // version made by, then version needed
        assert_eq!(&central_directory.buffer()[4..8], [0x1E, 0x03, 0x14, 0x00]);
    }

    #[test]
    fn end_record_layout() {
        let end_record = build_central_directory_end(3, 150, 1024, Some(b"done"));
        let bytes = end_record.finish();

        assert_eq!(&bytes[..4], b"PK\x05\x06");
        assert_eq!(&bytes[8..12], [3, 0, 3, 0]);
        assert_eq!(&bytes[12..16], 150u32.to_le_bytes());
        assert_eq!(&bytes[16..20], 1024u32.to_le_bytes());
        assert_eq!(&bytes[20..22], [4, 0]);
        assert_eq!(&bytes[22..], b"done");
    }
}
