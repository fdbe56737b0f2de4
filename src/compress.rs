use std::io::Write;

use crc32fast::Hasher;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::compression::CompressionMethod;
use crate::error::ArchiveError;

/// One-pass CRC-32 and deflate accumulator for a single entry.
///
/// The local file header precedes the payload and must already carry the final
/// CRC and lengths, so the payload is fed through this encoder first and
/// written to the archive afterwards. Feed chunks with [`update`](Self::update)
/// and settle the result with [`finish`](Self::finish).
pub struct EntryEncoder {
    hasher: Hasher,
    uncompressed_size: u64,
    encoder: Option<DeflateEncoder<Vec<u8>>>,
}

/// The settled outcome of encoding one entry payload.
pub struct EncodedPayload {
    pub crc32: u32,
    pub uncompressed_size: u64,
    pub deflated: Option<Vec<u8>>,
}

impl EntryEncoder {
    pub fn new(compress: bool) -> EntryEncoder {
        let encoder = if compress {
            Some(DeflateEncoder::new(Vec::new(), Compression::default()))
        } else {
            None
        };

        EntryEncoder {
            hasher: Hasher::new(),
            uncompressed_size: 0,
            encoder,
        }
    }

    pub fn update(&mut self, data: &[u8]) -> Result<(), ArchiveError> {
        self.hasher.update(data);
        self.uncompressed_size += data.len() as u64;
        if let Some(encoder) = self.encoder.as_mut() {
            encoder.write_all(data)?;
        }
        Ok(())
    }

    pub fn finish(self) -> Result<EncodedPayload, ArchiveError> {
        let deflated = match self.encoder {
            Some(encoder) => Some(encoder.finish()?),
            None => None,
        };

        Ok(EncodedPayload {
            crc32: self.hasher.finalize(),
            uncompressed_size: self.uncompressed_size,
            deflated,
        })
    }
}

impl EncodedPayload {
    /// The method the entry is written with. Deflate is only kept when it
    /// actually beats the raw payload; a deflated form at least as large as
    /// the input falls back to store.
    pub fn method(&self) -> CompressionMethod {
        match &self.deflated {
            Some(deflated) if (deflated.len() as u64) < self.uncompressed_size => {
                CompressionMethod::Deflate
            }
            _ => CompressionMethod::Store,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use flate2::read::DeflateDecoder;
    use std::io::Read;

    fn encode(data: &[u8], compress: bool) -> EncodedPayload {
        let mut encoder = EntryEncoder::new(compress);
        encoder.update(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn crc_over_uncompressed_bytes() {
        let payload = encode(b"hello", true);
        assert_eq!(payload.crc32, 0x3610A686);
        assert_eq!(payload.uncompressed_size, 5);
    }

    #[test]
    fn compressible_input_deflates() {
        let data = vec![0u8; 100_000];
        let payload = encode(&data, true);

        assert_eq!(payload.method(), CompressionMethod::Deflate);
        let deflated = payload.deflated.unwrap();
        assert!(deflated.len() < 1_000);

        let mut decoder = DeflateDecoder::new(deflated.as_slice());
        let mut inflated = Vec::new();
        decoder.read_to_end(&mut inflated).unwrap();
        assert_eq!(inflated, data);
    }

    #[test]
    fn tiny_input_falls_back_to_store() {
        let payload = encode(b"hello", true);
        assert_eq!(payload.method(), CompressionMethod::Store);
    }

    #[test]
    fn empty_input_is_stored() {
        let payload = encode(b"", true);
        assert_eq!(payload.method(), CompressionMethod::Store);
        assert_eq!(payload.uncompressed_size, 0);
        assert_eq!(payload.crc32, 0);
    }

    #[test]
    fn compression_opt_out_keeps_raw() {
        let data = vec![7u8; 4096];
        let payload = encode(&data, false);
        assert_eq!(payload.method(), CompressionMethod::Store);
        assert!(payload.deflated.is_none());
    }

    #[test]
    fn chunked_updates_match_single_update() {
        let data: Vec<u8> = (0u8..=255).cycle().take(10_000).collect();

        let whole = encode(&data, true);

        let mut encoder = EntryEncoder::new(true);
        for chunk in data.chunks(313) {
            encoder.update(chunk).unwrap();
        }
        let chunked = encoder.finish().unwrap();

        assert_eq!(whole.crc32, chunked.crc32);
        assert_eq!(whole.uncompressed_size, chunked.uncompressed_size);
        assert_eq!(whole.deflated, chunked.deflated);
    }
}
