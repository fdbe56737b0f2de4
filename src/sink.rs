use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;

use crate::constants::SPOOL_MEMORY_THRESHOLD;
use crate::error::ArchiveError;

/// Append-only destination for the archive bytes.
///
/// The sink starts as an in-memory buffer and spools to an unnamed temporary
/// file before any write would push the buffer past
/// [`SPOOL_MEMORY_THRESHOLD`]; the switch is invisible to callers. It can also
/// be redirected to a caller-named file, carrying over everything written so
/// far. A failed write leaves the archive unusable; there is no rollback.
#[derive(Debug)]
pub struct ArchiveSink {
    backing: Backing,
    offset: u64,
}

#[derive(Debug)]
enum Backing {
    Memory(Vec<u8>),
    File(File),
}

impl ArchiveSink {
    pub fn new() -> ArchiveSink {
        ArchiveSink {
            backing: Backing::Memory(Vec::new()),
            offset: 0,
        }
    }

    pub fn new_file_backed() -> Result<ArchiveSink, ArchiveError> {
        Ok(ArchiveSink {
            backing: Backing::File(tempfile::tempfile()?),
            offset: 0,
        })
    }

    /// Total bytes appended so far; entry header offsets are stamped from
    /// this counter.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn write(&mut self, data: &[u8]) -> Result<(), ArchiveError> {
        if let Backing::Memory(buffer) = &self.backing {
            if buffer.len() + data.len() > SPOOL_MEMORY_THRESHOLD {
                self.spool_to_temp_file()?;
            }
        }

        match &mut self.backing {
            Backing::Memory(buffer) => buffer.extend_from_slice(data),
            Backing::File(file) => file.write_all(data)?,
        }
        self.offset += data.len() as u64;

        Ok(())
    }

    /// Move the buffered bytes into an unnamed temporary file and keep
    /// appending there. A no-op when the sink is already file backed.
    pub fn spool_to_temp_file(&mut self) -> Result<(), ArchiveError> {
        if let Backing::Memory(buffer) = &self.backing {
            debug!(
                "archive buffer reached {} bytes, spooling to a temporary file",
                buffer.len()
            );
            let mut file = tempfile::tempfile()?;
            file.write_all(buffer)?;
            self.backing = Backing::File(file);
        }
        Ok(())
    }

    /// Copy everything written so far into `destination` (truncating it) and
    /// direct all future writes there. Any previous temporary file is
    /// released.
    pub fn redirect_to_path(&mut self, destination: &Path) -> Result<(), ArchiveError> {
        // read access is kept so the archive can still be read back out
        let mut dest = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(destination)?;

        match &mut self.backing {
            Backing::Memory(buffer) => dest.write_all(buffer)?,
            Backing::File(file) => {
                file.seek(SeekFrom::Start(0))?;
                io::copy(file, &mut dest)?;
            }
        }
        self.backing = Backing::File(dest);

        Ok(())
    }

    pub fn read_all(&mut self) -> Result<Vec<u8>, ArchiveError> {
        match &mut self.backing {
            Backing::Memory(buffer) => Ok(buffer.clone()),
            Backing::File(file) => {
                file.seek(SeekFrom::Start(0))?;
                let mut data = Vec::with_capacity(self.offset as usize);
                file.read_to_end(&mut data)?;
                Ok(data)
            }
        }
    }

    /// Stream the sink contents into `destination`, returning the byte count.
    pub fn write_to<W: Write>(&mut self, destination: &mut W) -> Result<u64, ArchiveError> {
        match &mut self.backing {
            Backing::Memory(buffer) => destination.write_all(buffer)?,
            Backing::File(file) => {
                file.seek(SeekFrom::Start(0))?;
                io::copy(file, destination)?;
            }
        }

        Ok(self.offset)
    }

    /// Hand the sink contents over as a rewound file, promoting a memory
    /// buffer to a temporary file if needed.
    pub fn into_file(self) -> Result<File, ArchiveError> {
        match self.backing {
            Backing::Memory(buffer) => {
                let mut file = tempfile::tempfile()?;
                file.write_all(&buffer)?;
                file.seek(SeekFrom::Start(0))?;
                Ok(file)
            }
            Backing::File(mut file) => {
                file.seek(SeekFrom::Start(0))?;
                Ok(file)
            }
        }
    }
}

impl Default for ArchiveSink {
    fn default() -> Self {
        ArchiveSink::new()
    }
}
