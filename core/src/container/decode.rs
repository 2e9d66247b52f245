//! container/decode.rs
//!
//! Container parsing.
//!
//! Notes:
//! - Every length read from the file is untrusted. Record bodies are read
//!   through `Read::take`, so a corrupt size cannot trigger a huge allocation.
//! - Short reads become `FormatError`s; genuine read failures stay I/O errors.

use std::io::{self, Read};

use byteorder::{ByteOrder, LittleEndian};

use crate::constants::MAGIC_MTC1;
use crate::container::types::{ChunkRecord, ContainerHeader, FormatError, RecordHeader};
use crate::types::MtcError;
use crate::utils::read_up_to;

/// Parse and validate a container header.
#[inline]
pub fn decode_container_header(buf: &[u8]) -> Result<ContainerHeader, FormatError> {
    // A wrong tag is reported as such even when the count is missing too.
    if buf.len() >= 4 && buf[0..4] != MAGIC_MTC1 {
        let mut found = [0u8; 4];
        found.copy_from_slice(&buf[0..4]);
        return Err(FormatError::BadMagic { found });
    }
    if buf.len() < ContainerHeader::LEN {
        return Err(FormatError::TruncatedHeader { have: buf.len(), need: ContainerHeader::LEN });
    }

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&buf[0..4]);
    let header = ContainerHeader {
        magic,
        chunk_count: LittleEndian::read_u32(&buf[4..8]),
    };
    header.validate()?;
    Ok(header)
}

#[inline]
pub fn decode_record_header(buf: &[u8; RecordHeader::LEN]) -> RecordHeader {
    RecordHeader {
        original_size: LittleEndian::read_u64(&buf[0..8]),
        compressed_size: LittleEndian::read_u64(&buf[8..16]),
    }
}

/// Pulls records out of a container stream in order.
pub struct ContainerReader<R: Read> {
    inner: R,
    header: ContainerHeader,
    next_index: u64,
    bytes_in: u64,
}

impl<R: Read> ContainerReader<R> {
    /// Consume and validate the header.
    pub fn open(mut inner: R) -> Result<Self, MtcError> {
        let mut buf = [0u8; ContainerHeader::LEN];
        let n = read_up_to(&mut inner, &mut buf)?;
        let header = decode_container_header(&buf[..n])?;
        Ok(Self {
            inner,
            header,
            next_index: 0,
            bytes_in: ContainerHeader::LEN as u64,
        })
    }

    pub fn chunk_count(&self) -> u32 {
        self.header.chunk_count
    }

    /// Bytes consumed so far, header included.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_in
    }

    /// Next record, or `None` once `chunk_count` records have been read.
    pub fn next_record(&mut self) -> Result<Option<ChunkRecord>, MtcError> {
        if self.next_index >= self.header.chunk_count as u64 {
            return Ok(None);
        }
        let index = self.next_index;

        let mut hdr_buf = [0u8; RecordHeader::LEN];
        let n = read_up_to(&mut self.inner, &mut hdr_buf)?;
        if n < RecordHeader::LEN {
            return Err(FormatError::TruncatedRecord {
                index,
                have: n as u64,
                need: RecordHeader::LEN as u64,
            }
            .into());
        }
        let record = decode_record_header(&hdr_buf);

        let mut payload = Vec::new();
        let got = (&mut self.inner)
            .take(record.compressed_size)
            .read_to_end(&mut payload)? as u64;
        if got < record.compressed_size {
            return Err(FormatError::TruncatedRecord {
                index,
                have: RecordHeader::LEN as u64 + got,
                need: RecordHeader::LEN as u64 + record.compressed_size,
            }
            .into());
        }

        self.next_index += 1;
        self.bytes_in += RecordHeader::LEN as u64 + got;

        Ok(Some(ChunkRecord {
            index,
            original_size: record.original_size,
            payload,
        }))
    }

    /// Count whatever follows the last record. Zero for a well-formed file.
    pub fn trailing_bytes(&mut self) -> Result<u64, MtcError> {
        Ok(io::copy(&mut self.inner, &mut io::sink())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_header_is_truncated() {
        let err = decode_container_header(b"MTC").unwrap_err();
        assert_eq!(err, FormatError::TruncatedHeader { have: 3, need: 8 });
    }

    #[test]
    fn wrong_magic_rejected() {
        let err = decode_container_header(b"MTC2\0\0\0\0").unwrap_err();
        assert_eq!(err, FormatError::BadMagic { found: *b"MTC2" });
    }
}
