//! A library for building ZIP containers in one pass, sized for e-book and
//! document packaging.
//!
//! ZIP is an archive file format that supports lossless data compression. The
//! writer implemented here covers the subset of
//! [PKWARE's APPNOTE.TXT](https://pkware.cachefly.net/webdocs/casestudies/APPNOTE.TXT)
//! that document containers such as EPUB need: local file headers, a central
//! directory, store and deflate methods with automatic fallback to store, and
//! Unix extended-timestamp extra fields. Decompression, ZIP64, encryption and
//! multi-volume archives are out of scope.
//!
//! Archives are built strictly append-only. Small archives stay in memory;
//! once the buffered bytes pass 1 MiB the writer spools to a temporary file
//! on its own, and payloads of unknown size go through a streamed-entry
//! protocol that never holds the raw payload in memory whole.
//!
//! ## Example
//!
//! ```rust
//! use zipack::archive::{EntryOptions, ZipArchive};
//! use zipack::error::ArchiveError;
//!
//! fn main() -> Result<(), ArchiveError> {
//!     let mut archive = ZipArchive::new();
//!     let options = EntryOptions::default();
//!
//!     archive.add_directory("docs", &options)?;
//!     archive.add_file("docs/hello.txt", b"hello\n", &options)?;
//!     archive.add_file("docs/raw.bin", &[0u8; 64], &options.clone().compress(false))?;
//!
//!     archive.finalize()?;
//!
//!     let bytes = archive.get_bytes()?;
//!     assert_eq!(&bytes[..4], b"PK\x03\x04");
//!     Ok(())
//! }
//! ```
//!
//! Entries of unknown size are streamed:
//!
//! ```rust
//! use zipack::archive::{EntryOptions, ZipArchive};
//! use zipack::error::ArchiveError;
//!
//! fn main() -> Result<(), ArchiveError> {
//!     let mut archive = ZipArchive::new();
//!     let options = EntryOptions::default();
//!
//!     archive.open_stream("big.log", &options)?;
//!     for _ in 0..8 {
//!         archive.append_stream_data(&[b'x'; 1024])?;
//!     }
//!     archive.close_stream()?;
//!
//!     archive.finalize()?;
//!     Ok(())
//! }
//! ```

mod compress;
mod constants;
mod descriptor;
mod header;
mod sink;

pub mod archive;
pub mod compression;
pub mod error;
pub mod extra_field;
pub mod path;
pub mod types;
