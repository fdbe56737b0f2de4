use core::fmt;

pub const STORE: u16 = 0;
pub const DEFLATE: u16 = 8;

/// The two compression methods this writer emits.
///
/// Entries are deflated when the caller asks for compression *and* the
/// deflated form is smaller than the raw payload; everything else is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Store,
    Deflate,
}

impl CompressionMethod {
    /// The method code written in the local and central headers.
    pub fn zip_code(&self) -> u16 {
        match self {
            CompressionMethod::Store => STORE,
            CompressionMethod::Deflate => DEFLATE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompressionMethod::Store => "store",
            CompressionMethod::Deflate => "deflate",
        }
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
