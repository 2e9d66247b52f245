#[cfg(test)]
mod tests {
    use mtc_core::container::{
        decode_container_header, ContainerHeader, ContainerReader, ContainerWriter, FormatError,
        RecordHeader,
    };
    use mtc_core::types::{ErrorKind, MtcError};

    fn two_record_container() -> Vec<u8> {
        let mut w = ContainerWriter::new(Vec::new(), 2).unwrap();
        w.write_record(5, &[0, b'h', 0, b'i']).unwrap();
        w.write_record(0, &[]).unwrap();
        w.finish().unwrap()
    }

    #[test]
    fn layout_is_little_endian() {
        let bytes = two_record_container();
        let mut expected = b"MTC1".to_vec();
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(&5u64.to_le_bytes());
        expected.extend_from_slice(&4u64.to_le_bytes());
        expected.extend_from_slice(&[0, b'h', 0, b'i']);
        expected.extend_from_slice(&0u64.to_le_bytes());
        expected.extend_from_slice(&0u64.to_le_bytes());
        assert_eq!(bytes, expected);
        assert_eq!(bytes.len(), ContainerHeader::LEN + 2 * RecordHeader::LEN + 4);
    }

    #[test]
    fn reader_yields_records_in_order() {
        let bytes = two_record_container();
        let mut r = ContainerReader::open(&bytes[..]).unwrap();
        assert_eq!(r.chunk_count(), 2);

        let first = r.next_record().unwrap().unwrap();
        assert_eq!((first.index, first.original_size), (0, 5));
        assert_eq!(first.payload, vec![0, b'h', 0, b'i']);

        let second = r.next_record().unwrap().unwrap();
        assert_eq!((second.index, second.original_size), (1, 0));
        assert!(second.payload.is_empty());

        assert!(r.next_record().unwrap().is_none());
        assert_eq!(r.trailing_bytes().unwrap(), 0);
        assert_eq!(r.bytes_read(), bytes.len() as u64);
    }

    #[test]
    fn empty_container_is_eight_bytes() {
        let bytes = ContainerWriter::new(Vec::new(), 0).unwrap().finish().unwrap();
        assert_eq!(bytes, b"MTC1\0\0\0\0");
        let mut r = ContainerReader::open(&bytes[..]).unwrap();
        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn bad_magic() {
        let err = ContainerReader::open(&b"MTC2\x01\0\0\0"[..]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(matches!(err, MtcError::Format(FormatError::BadMagic { found }) if &found == b"MTC2"));
    }

    #[test]
    fn missing_tag_is_truncated_header() {
        assert_eq!(
            decode_container_header(b"").unwrap_err(),
            FormatError::TruncatedHeader { have: 0, need: 8 }
        );
        let err = ContainerReader::open(&b"MTC1\x01\0"[..]).err().unwrap();
        assert!(matches!(err, MtcError::Format(FormatError::TruncatedHeader { have: 6, .. })));
    }

    #[test]
    fn truncated_payload_is_format_error() {
        let mut bytes = two_record_container();
        bytes.truncate(ContainerHeader::LEN + RecordHeader::LEN + 2);
        let mut r = ContainerReader::open(&bytes[..]).unwrap();
        let err = r.next_record().unwrap_err();
        assert!(matches!(
            err,
            MtcError::Format(FormatError::TruncatedRecord { index: 0, have: 18, need: 20 })
        ));
    }

    #[test]
    fn declared_count_exceeds_records() {
        let mut bytes = two_record_container();
        bytes[4] = 3;
        let mut r = ContainerReader::open(&bytes[..]).unwrap();
        r.next_record().unwrap();
        r.next_record().unwrap();
        let err = r.next_record().unwrap_err();
        assert!(matches!(err, MtcError::Format(FormatError::TruncatedRecord { index: 2, have: 0, .. })));
    }

    #[test]
    fn trailing_bytes_are_counted() {
        let mut bytes = two_record_container();
        bytes.extend_from_slice(b"junk");
        let mut r = ContainerReader::open(&bytes[..]).unwrap();
        while r.next_record().unwrap().is_some() {}
        assert_eq!(r.trailing_bytes().unwrap(), 4);
    }

    #[test]
    fn writer_enforces_declared_count() {
        let mut w = ContainerWriter::new(Vec::new(), 1).unwrap();
        w.write_record(1, &[0, 1]).unwrap();
        assert!(matches!(
            w.write_record(1, &[0, 1]),
            Err(MtcError::Format(FormatError::RecordCountMismatch { declared: 1, written: 2 }))
        ));

        let short = ContainerWriter::new(Vec::new(), 2).unwrap();
        assert!(matches!(
            short.finish(),
            Err(MtcError::Format(FormatError::RecordCountMismatch { declared: 2, written: 0 }))
        ));
    }
}
