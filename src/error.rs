use std::fmt::{self, Debug, Display};

pub enum ArchiveError {
    IoError(std::io::Error),
    ArchiveFinalized,
    CommentTooLong(usize),
    NoOpenStream,
    TooManyEntries,
}

impl Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArchiveError::IoError(e) => {
                write!(f, "Archive error {:}", e)
            }
            ArchiveError::ArchiveFinalized => {
                write!(f, "The archive is finalized, no entry can be added")
            }
            ArchiveError::CommentTooLong(len) => {
                write!(
                    f,
                    "A comment of {:} bytes does not fit the 16-bit length field",
                    len
                )
            }
            ArchiveError::NoOpenStream => {
                write!(f, "No entry stream is open")
            }
            ArchiveError::TooManyEntries => {
                write!(f, "The 16-bit entry count of the archive format is exhausted")
            }
        }
    }
}

impl Debug for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArchiveError::IoError(e) => {
                write!(f, "Archive error {:?}", e)
            }
            _ => (self as &dyn Display).fmt(f),
        }
    }
}

impl std::error::Error for ArchiveError {}

impl From<std::io::Error> for ArchiveError {
    fn from(value: std::io::Error) -> Self {
        ArchiveError::IoError(value)
    }
}
