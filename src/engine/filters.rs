//! Compression filters for the tar stream.
//!
//! Decoding is multi-member aware: concatenated gzip members and bzip2
//! streams (as produced by `cat a.tar.gz b.tar.gz` or parallel compressors)
//! decode as one continuous tar stream.

use std::fmt;
use std::io::{self, Read, Write};

use crate::format::Filter;

/// Default gzip level, matching `gzip(1)`.
pub(crate) const GZIP_DEFAULT_LEVEL: u32 = 6;

/// Default bzip2 level, matching `bzip2(1)`.
pub(crate) const BZIP2_DEFAULT_LEVEL: u32 = 9;

fn unavailable(filter: Filter) -> String {
    match filter {
        Filter::Unsupported => "compression filter is not supported".to_string(),
        other => format!("{other} support is not compiled into this build"),
    }
}

/// Wraps `raw` in the decoder for `filter`.
///
/// [`Filter::None`] and [`Filter::Unsupported`] pass the bytes through
/// untouched.
pub(crate) fn decoder<R>(filter: Filter, raw: R) -> Result<Box<dyn Read + Send>, String>
where
    R: Read + Send + 'static,
{
    match filter {
        Filter::None | Filter::Unsupported => Ok(Box::new(raw)),
        #[cfg(feature = "gzip")]
        Filter::Gzip => Ok(Box::new(flate2::read::MultiGzDecoder::new(raw))),
        #[cfg(feature = "bzip2")]
        Filter::Bzip2 => Ok(Box::new(bzip2::read::MultiBzDecoder::new(raw))),
        #[allow(unreachable_patterns)]
        other => Err(unavailable(other)),
    }
}

/// The output side of a filter: a plain or compressing writer.
pub(crate) enum FilterSink<W: Write> {
    Plain(W),
    #[cfg(feature = "gzip")]
    Gzip(flate2::write::GzEncoder<W>),
    #[cfg(feature = "bzip2")]
    Bzip2(bzip2::write::BzEncoder<W>),
}

impl<W: Write> fmt::Debug for FilterSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FilterSink").field(&self.filter()).finish()
    }
}

impl<W: Write> FilterSink<W> {
    /// Creates a sink compressing with `filter` at `level`.
    ///
    /// The level must already be within the codec's range.
    pub fn new(inner: W, filter: Filter, level: u32) -> Result<Self, String> {
        match filter {
            Filter::None => Ok(FilterSink::Plain(inner)),
            #[cfg(feature = "gzip")]
            Filter::Gzip => Ok(FilterSink::Gzip(flate2::write::GzEncoder::new(
                inner,
                flate2::Compression::new(level),
            ))),
            #[cfg(feature = "bzip2")]
            Filter::Bzip2 => Ok(FilterSink::Bzip2(bzip2::write::BzEncoder::new(
                inner,
                bzip2::Compression::new(level),
            ))),
            #[allow(unreachable_patterns)]
            other => {
                let _ = level;
                Err(unavailable(other))
            }
        }
    }

    pub fn filter(&self) -> Filter {
        match self {
            FilterSink::Plain(_) => Filter::None,
            #[cfg(feature = "gzip")]
            FilterSink::Gzip(_) => Filter::Gzip,
            #[cfg(feature = "bzip2")]
            FilterSink::Bzip2(_) => Filter::Bzip2,
        }
    }

    /// Writes the compression trailer and returns the underlying writer.
    pub fn finish(self) -> io::Result<W> {
        match self {
            FilterSink::Plain(inner) => Ok(inner),
            #[cfg(feature = "gzip")]
            FilterSink::Gzip(encoder) => encoder.finish(),
            #[cfg(feature = "bzip2")]
            FilterSink::Bzip2(encoder) => encoder.finish(),
        }
    }
}

impl<W: Write> Write for FilterSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FilterSink::Plain(inner) => inner.write(buf),
            #[cfg(feature = "gzip")]
            FilterSink::Gzip(encoder) => encoder.write(buf),
            #[cfg(feature = "bzip2")]
            FilterSink::Bzip2(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FilterSink::Plain(inner) => inner.flush(),
            #[cfg(feature = "gzip")]
            FilterSink::Gzip(encoder) => encoder.flush(),
            #[cfg(feature = "bzip2")]
            FilterSink::Bzip2(encoder) => encoder.flush(),
        }
    }
}
