//! container/encode.rs
//!
//! Container serialization.
//!
//! Notes:
//! - Header is written up front, so the chunk count must be known before the
//!   first record. The pipeline knows it from the chunk plan.
//! - `ContainerWriter::finish` refuses to complete a container whose record
//!   count disagrees with its header.

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian};

use crate::container::types::{ContainerHeader, FormatError, RecordHeader};
use crate::types::MtcError;

#[inline]
pub fn encode_container_header(h: &ContainerHeader) -> [u8; ContainerHeader::LEN] {
    let mut out = [0u8; ContainerHeader::LEN];
    out[0..4].copy_from_slice(&h.magic);                       // 0..4 magic
    LittleEndian::write_u32(&mut out[4..8], h.chunk_count);    // 4..8 chunk count
    out
}

#[inline]
pub fn encode_record_header(r: &RecordHeader) -> [u8; RecordHeader::LEN] {
    let mut out = [0u8; RecordHeader::LEN];
    LittleEndian::write_u64(&mut out[0..8], r.original_size);     // 0..8  original size
    LittleEndian::write_u64(&mut out[8..16], r.compressed_size);  // 8..16 compressed size
    out
}

/// Streams a container into `W`, one record at a time.
pub struct ContainerWriter<W: Write> {
    out: W,
    declared: u32,
    written: u64,
    bytes_out: u64,
}

impl<W: Write> ContainerWriter<W> {
    /// Write the container header and return a writer ready for records.
    pub fn new(mut out: W, chunk_count: u32) -> Result<Self, MtcError> {
        let header = ContainerHeader::new(chunk_count);
        out.write_all(&encode_container_header(&header))?;
        Ok(Self {
            out,
            declared: chunk_count,
            written: 0,
            bytes_out: ContainerHeader::LEN as u64,
        })
    }

    pub fn write_record(&mut self, original_size: u64, payload: &[u8]) -> Result<(), MtcError> {
        if self.written >= self.declared as u64 {
            return Err(FormatError::RecordCountMismatch {
                declared: self.declared,
                written: self.written + 1,
            }
            .into());
        }

        let header = RecordHeader {
            original_size,
            compressed_size: payload.len() as u64,
        };
        self.out.write_all(&encode_record_header(&header))?;
        self.out.write_all(payload)?;

        self.written += 1;
        self.bytes_out += (RecordHeader::LEN + payload.len()) as u64;
        Ok(())
    }

    pub fn records_written(&self) -> u64 {
        self.written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_out
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W, MtcError> {
        if self.written != self.declared as u64 {
            return Err(FormatError::RecordCountMismatch {
                declared: self.declared,
                written: self.written,
            }
            .into());
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout_is_little_endian() {
        let bytes = encode_container_header(&ContainerHeader::new(0x0102_0304));
        assert_eq!(&bytes, b"MTC1\x04\x03\x02\x01");
    }

    #[test]
    fn finish_rejects_missing_records() {
        let w = ContainerWriter::new(Vec::new(), 2).unwrap();
        assert!(w.finish().is_err());
    }

    #[test]
    fn extra_record_rejected() {
        let mut w = ContainerWriter::new(Vec::new(), 0).unwrap();
        assert!(w.write_record(1, &[0, 1]).is_err());
    }
}
