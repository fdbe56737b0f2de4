/// An append-only little-endian record buffer. Every multi-byte field of the
/// archive format is written through this type.
#[derive(Debug)]
pub struct ArchiveDescriptor {
    buffer: Vec<u8>,
}

impl ArchiveDescriptor {
    pub fn new(capacity: usize) -> ArchiveDescriptor {
        ArchiveDescriptor {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, val: u8) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u16(&mut self, val: u16) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u32(&mut self, val: u32) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_i32(&mut self, val: i32) {
        self.buffer.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_bytes(&mut self, val: &[u8]) {
        self.buffer.extend_from_slice(val);
    }

    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn little_endian_layout() {
        let mut desc = ArchiveDescriptor::new(16);
        desc.write_u32(0x04034b50);
        desc.write_u16(20);
        desc.write_u8(0xAB);
        desc.write_i32(-2);
        desc.write_bytes(b"ab");

        let vec = desc.finish();
        assert_eq!(
            vec,
            [
                0x50, 0x4B, 0x03, 0x04, 0x14, 0x00, 0xAB, 0xFE, 0xFF, 0xFF, 0xFF, b'a', b'b'
            ]
        );
    }

    #[test]
    fn clear_keeps_capacity_semantics() {
        let mut desc = ArchiveDescriptor::new(4);
        desc.write_u16(7);
        assert_eq!(desc.len(), 2);
        desc.clear();
        assert!(desc.is_empty());
        desc.write_u16(7);
        assert_eq!(desc.buffer(), &[7u8, 0u8]);
    }
}
