//! Extra fields attached to the local and central headers.
//!
//! Two subfields are written for every entry unless the writer is told not to:
//!
//! - id `0x5455` (extended timestamp): UTC modification/access times in Unix
//!   seconds. The central copy carries the modification time only.
//! - id `0x7875` (Unix uid/gid): fixed ownership, uid 1000 and gid 0.
//!
//! Together they add 28 bytes to each local header and 24 bytes to each
//! central directory record; they mainly keep the default Mac archive tool
//! happy and do no harm elsewhere.

use std::fmt::Debug;

use crate::constants::{X5455_EXTENDED_TIMESTAMP, X7875_UNIX_UID_GID};
use crate::descriptor::ArchiveDescriptor;

pub trait ExtraFields: Debug {
    fn file_header_extra_field_size(&self) -> u16;
    fn central_header_extra_field_size(&self) -> u16;
    fn file_header_write_data(&self, archive_descriptor: &mut ArchiveDescriptor);
    fn central_header_write_data(&self, archive_descriptor: &mut ArchiveDescriptor);
}

/// The time values are in standard Unix signed-long format, indicating the
/// number of seconds since 1 January 1970 00:00:00, relative to UTC.
#[derive(Debug, Default)]
pub struct ExtraFieldExtendedTimestamp {
    flags: u8,
    modify_time: Option<i32>,
    access_time: Option<i32>,
}

impl ExtraFieldExtendedTimestamp {
    pub const HEADER_ID: u16 = X5455_EXTENDED_TIMESTAMP;

    /// The bit set inside the flags when the modification time is present.
    const MODIFY_TIME_BIT: u8 = 1;

    /// The bit set inside the flags when the access time is present.
    const ACCESS_TIME_BIT: u8 = 2;

    pub fn new(modify_time: Option<i32>, access_time: Option<i32>) -> Self {
        let mut default = Self::default();

        default.set_modify_time(modify_time);
        default.set_access_time(access_time);

        default
    }

    fn set_modify_time(&mut self, modify_time: Option<i32>) {
        self.modify_time = modify_time;

        if modify_time.is_some() {
            self.flags |= ExtraFieldExtendedTimestamp::MODIFY_TIME_BIT;
        } else {
            self.flags &= !ExtraFieldExtendedTimestamp::MODIFY_TIME_BIT;
        }
    }

    fn set_access_time(&mut self, access_time: Option<i32>) {
        self.access_time = access_time;

        if access_time.is_some() {
            self.flags |= ExtraFieldExtendedTimestamp::ACCESS_TIME_BIT;
        } else {
            self.flags &= !ExtraFieldExtendedTimestamp::ACCESS_TIME_BIT;
        }
    }

    fn file_header_extra_field_data_size(&self) -> u16 {
        1 + (self.flags.count_ones() * 4) as u16
    }

    fn central_header_extra_field_data_size(&self) -> u16 {
        1 + ((self.flags & ExtraFieldExtendedTimestamp::MODIFY_TIME_BIT).count_ones() * 4) as u16
    }
}

impl ExtraFields for ExtraFieldExtendedTimestamp {
    fn file_header_extra_field_size(&self) -> u16 {
        4 + self.file_header_extra_field_data_size()
    }

    fn central_header_extra_field_size(&self) -> u16 {
        4 + self.central_header_extra_field_data_size()
    }

    fn file_header_write_data(&self, archive_descriptor: &mut ArchiveDescriptor) {
        archive_descriptor.write_u16(ExtraFieldExtendedTimestamp::HEADER_ID);
        archive_descriptor.write_u16(self.file_header_extra_field_data_size());
        archive_descriptor.write_u8(self.flags);

        if let Some(modify_time) = self.modify_time {
            archive_descriptor.write_i32(modify_time);
        }

        if let Some(access_time) = self.access_time {
            archive_descriptor.write_i32(access_time);
        }
    }

    fn central_header_write_data(&self, archive_descriptor: &mut ArchiveDescriptor) {
        archive_descriptor.write_u16(ExtraFieldExtendedTimestamp::HEADER_ID);
        archive_descriptor.write_u16(self.central_header_extra_field_data_size());
        archive_descriptor.write_u8(self.flags);

        if let Some(modify_time) = self.modify_time {
            archive_descriptor.write_i32(modify_time);
        }
    }
}

/// Unix ownership subfield, version 1, with 32-bit uid and gid.
///
/// Ownership is not tracked per entry; every entry carries the same fixed
/// uid/gid pair.
#[derive(Debug)]
pub struct ExtraFieldUnixUidGid {
    uid: u32,
    gid: u32,
}

impl ExtraFieldUnixUidGid {
    pub const HEADER_ID: u16 = X7875_UNIX_UID_GID;

    const VERSION: u8 = 1;

    /// id version (1) + uid size (1) + uid (4) + gid size (1) + gid (4).
    const DATA_SIZE: u16 = 11;
}

impl Default for ExtraFieldUnixUidGid {
    fn default() -> Self {
        Self { uid: 1000, gid: 0 }
    }
}

impl ExtraFields for ExtraFieldUnixUidGid {
    fn file_header_extra_field_size(&self) -> u16 {
        4 + ExtraFieldUnixUidGid::DATA_SIZE
    }

    fn central_header_extra_field_size(&self) -> u16 {
        self.file_header_extra_field_size()
    }

    fn file_header_write_data(&self, archive_descriptor: &mut ArchiveDescriptor) {
        archive_descriptor.write_u16(ExtraFieldUnixUidGid::HEADER_ID);
        archive_descriptor.write_u16(ExtraFieldUnixUidGid::DATA_SIZE);
        archive_descriptor.write_u8(ExtraFieldUnixUidGid::VERSION);
        archive_descriptor.write_u8(4);
        archive_descriptor.write_u32(self.uid);
        archive_descriptor.write_u8(4);
        archive_descriptor.write_u32(self.gid);
    }

    fn central_header_write_data(&self, archive_descriptor: &mut ArchiveDescriptor) {
        self.file_header_write_data(archive_descriptor);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extended_timestamp_local_layout() {
        let field = ExtraFieldExtendedTimestamp::new(Some(0x0403_0201), Some(0x0403_0201));
        assert_eq!(field.file_header_extra_field_size(), 13);

        let mut desc = ArchiveDescriptor::new(13);
        field.file_header_write_data(&mut desc);
        assert_eq!(
            desc.buffer(),
            [
                0x55, 0x54, 0x09, 0x00, 0x03, 0x01, 0x02, 0x03, 0x04, 0x01, 0x02, 0x03, 0x04
            ]
        );
    }

    #[test]
    fn extended_timestamp_central_keeps_modify_time_only() {
        let field = ExtraFieldExtendedTimestamp::new(Some(0x0403_0201), Some(0x0403_0201));
        assert_eq!(field.central_header_extra_field_size(), 9);

        let mut desc = ArchiveDescriptor::new(9);
        field.central_header_write_data(&mut desc);
        assert_eq!(
            desc.buffer(),
            [0x55, 0x54, 0x05, 0x00, 0x03, 0x01, 0x02, 0x03, 0x04]
        );
    }

    #[test]
    fn unix_uid_gid_layout() {
        let field = ExtraFieldUnixUidGid::default();
        assert_eq!(field.file_header_extra_field_size(), 15);

        let mut desc = ArchiveDescriptor::new(15);
        field.file_header_write_data(&mut desc);
        assert_eq!(
            desc.buffer(),
            [
                0x75, 0x78, 0x0B, 0x00, 0x01, 0x04, 0xE8, 0x03, 0x00, 0x00, 0x04, 0x00, 0x00,
                0x00, 0x00
            ]
        );
    }
}
