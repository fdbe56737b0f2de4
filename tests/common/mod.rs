#![allow(dead_code)]

use std::io::{Cursor, Read};

use zip::ZipArchive;

pub fn open(archive_bytes: &[u8]) -> ZipArchive<Cursor<Vec<u8>>> {
    ZipArchive::new(Cursor::new(archive_bytes.to_vec())).unwrap_or_else(|error| {
        panic!("reading the archive back failed, because {:?}", error);
    })
}

/// Entry names in central directory order.
pub fn entry_names(archive_bytes: &[u8]) -> Vec<String> {
    let mut archive = open(archive_bytes);
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_owned())
        .collect()
}

pub fn entry_data(archive_bytes: &[u8], name: &str) -> Vec<u8> {
    let mut archive = open(archive_bytes);
    let mut file = archive.by_name(name).unwrap();
    let mut data = Vec::new();
    file.read_to_end(&mut data).unwrap();
    data
}

pub fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes(bytes[at..at + 2].try_into().unwrap())
}

pub fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
}
