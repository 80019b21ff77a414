//! Filter and container detection.
//!
//! The filter is classified from the leading bytes of the raw file, the
//! container format from the first decompressed header block.

use super::{ContainerFormat, Filter};

/// Number of leading bytes [`detect_filter`] needs for a full verdict.
pub const FILTER_PROBE_LEN: usize = 10;

/// Compression signatures of formats this crate recognizes but cannot decode.
const UNSUPPORTED_SIGNATURES: &[&[u8]] = &[
    // xz: 0xFD '7' 'z' 'X' 'Z' 0x00
    &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00],
    // zstd frame: 0x28 0xB5 0x2F 0xFD
    &[0x28, 0xB5, 0x2F, 0xFD],
    // lz4 frame: 0x04 0x22 0x4D 0x18
    &[0x04, 0x22, 0x4D, 0x18],
    // lzip: 'L' 'Z' 'I' 'P'
    b"LZIP",
    // Unix compress (.Z): 0x1F 0x9D
    &[0x1F, 0x9D],
];

/// gzip: ID1 ID2 and the deflate compression method.
const GZIP_SIGNATURE: &[u8] = &[0x1F, 0x8B, 0x08];

/// bzip2 stream header: 'B' 'Z' 'h'.
const BZIP2_SIGNATURE: &[u8] = b"BZh";

/// bzip2 block magic (BCD pi).
const BZIP2_BLOCK_MAGIC: &[u8] = &[0x31, 0x41, 0x59, 0x26, 0x53, 0x59];

/// bzip2 end-of-stream magic (BCD sqrt(pi)), seen in streams with no blocks.
const BZIP2_EOS_MAGIC: &[u8] = &[0x17, 0x72, 0x45, 0x38, 0x50, 0x90];

/// Classifies the compression filter from the leading bytes of an archive.
///
/// Pass at least [`FILTER_PROBE_LEN`] bytes when available. Signatures are
/// matched strictly (bzip2 requires a valid level digit followed by a block
/// or end-of-stream magic) so a plain tar whose first entry name happens to
/// start with `"BZh"` is not misclassified.
///
/// # Example
///
/// ```rust
/// use tarkit::Filter;
/// use tarkit::format::detect_filter;
///
/// assert_eq!(detect_filter(&[0x1F, 0x8B, 0x08, 0x00]), Filter::Gzip);
/// assert_eq!(detect_filter(b"hello.txt\0"), Filter::None);
/// ```
pub fn detect_filter(magic: &[u8]) -> Filter {
    if magic.starts_with(GZIP_SIGNATURE) {
        return Filter::Gzip;
    }
    if is_bzip2(magic) {
        return Filter::Bzip2;
    }
    if UNSUPPORTED_SIGNATURES
        .iter()
        .any(|signature| magic.starts_with(signature))
    {
        return Filter::Unsupported;
    }
    Filter::None
}

fn is_bzip2(magic: &[u8]) -> bool {
    if !magic.starts_with(BZIP2_SIGNATURE) || magic.len() < FILTER_PROBE_LEN {
        return false;
    }
    let level = magic[3];
    let block = &magic[4..FILTER_PROBE_LEN];
    (b'1'..=b'9').contains(&level) && (block == BZIP2_BLOCK_MAGIC || block == BZIP2_EOS_MAGIC)
}

/// Classifies the container format from the first decompressed tar block.
///
/// Returns `Err` with a diagnostic when the block is shorter than 512 bytes
/// or is not a valid tar header. An all-zero block is an end-of-archive
/// marker and yields [`ContainerFormat::Empty`].
///
/// ```rust
/// use tarkit::ContainerFormat;
/// use tarkit::format::detect_container;
///
/// assert_eq!(detect_container(&[0u8; 512]), Ok(ContainerFormat::Empty));
/// assert!(detect_container(&[0u8; 100]).is_err());
/// ```
pub fn detect_container(block: &[u8]) -> std::result::Result<ContainerFormat, String> {
    if block.len() < super::BLOCK_SIZE as usize {
        return Err(format!(
            "truncated tar header: expected 512 bytes, found {}",
            block.len()
        ));
    }
    let block = &block[..super::BLOCK_SIZE as usize];

    if block.iter().all(|&b| b == 0) {
        return Ok(ContainerFormat::Empty);
    }

    let header = tar::Header::from_byte_slice(block);
    let stored = header
        .cksum()
        .map_err(|e| format!("invalid tar header: {e}"))?;
    let mut recomputed = header.clone();
    recomputed.set_cksum();
    let computed = recomputed
        .cksum()
        .map_err(|e| format!("invalid tar header: {e}"))?;
    if stored != computed {
        return Err(format!(
            "invalid tar header: checksum mismatch (stored {stored}, computed {computed})"
        ));
    }

    Ok(container_of(header))
}

/// Classifies a header already accepted by the tar parser.
pub(crate) fn container_of(header: &tar::Header) -> ContainerFormat {
    if header.as_gnu().is_some() {
        ContainerFormat::Gnu
    } else if header.as_ustar().is_some() {
        ContainerFormat::Ustar
    } else {
        ContainerFormat::V7
    }
}
