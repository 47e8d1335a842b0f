use rand::prelude::*;

use zpak_format::{
    name_hash, Compression, ErrorKind, Mode, Zpak, ZpakConfig, ZpakError, DEFAULT_SLACK_MARGIN,
    ENTRY_HEADER_SIZE, HEADER_SIZE,
};

fn stored() -> Zpak<'static> {
    Zpak::new(ZpakConfig::stored())
}

fn names(zpak: &Zpak<'_>) -> Vec<String> {
    zpak.iter()
        .map(|entry| entry.unwrap().name().to_string())
        .collect()
}

#[test]
fn two_entry_layout() {
    let mut zpak = stored();
    assert_eq!(zpak.append("a", b"xx").unwrap(), 2);
    assert_eq!(zpak.append("b", b"yyyy").unwrap(), 4);

    let blob = zpak.finish().unwrap();
    assert_eq!(blob.len(), 64);
    assert_eq!(blob.len(), HEADER_SIZE + 2 * (ENTRY_HEADER_SIZE + 2) + 2 + 4);
    assert_eq!(&blob[..6], b"ZPAK\x01\x00");

    let zpak = Zpak::from_borrowed(&blob).unwrap();
    assert_eq!(names(&zpak), ["a", "b"]);
    let sizes: Vec<usize> = zpak.iter().map(|e| e.unwrap().size()).collect();
    assert_eq!(sizes, [2, 4]);
    assert_eq!(zpak.read("a").unwrap().unwrap(), b"xx");
    assert_eq!(zpak.read("b").unwrap().unwrap(), b"yyyy");
}

#[test]
fn round_trip_with_deflate() {
    let mut zpak = Zpak::default();
    let files: Vec<(String, Vec<u8>)> = (0..32)
        .map(|i| {
            let data = format!("contents {} ", i).repeat(i + 1);
            (format!("dir/file_{}.txt", i), data.into_bytes())
        })
        .collect();

    for (name, data) in &files {
        zpak.append(name, data).unwrap();
    }
    assert_eq!(zpak.entry_count(), files.len());

    let blob = zpak.finish().unwrap();
    let zpak = Zpak::from_borrowed(&blob).unwrap();
    assert_eq!(zpak.compression(), Compression::Deflate);

    for (name, data) in &files {
        assert_eq!(&zpak.read(name).unwrap().unwrap(), data);
    }
}

#[test]
fn grows_across_many_chunks() {
    let config = ZpakConfig::stored()
        .with_capacity(64, 128)
        .with_slack_margin(16);
    let mut zpak = Zpak::new(config);

    let payload = [7u8; 300];
    let mut last_capacity = 0;
    for i in 0..50 {
        zpak.append(&format!("entry{}", i), &payload).unwrap();
        assert!(zpak.capacity() >= zpak.len());
        assert!(zpak.capacity() >= last_capacity);
        last_capacity = zpak.capacity();
    }

    assert_eq!(zpak.entry_count(), 50);
    for i in 0..50 {
        assert_eq!(zpak.read(&format!("entry{}", i)).unwrap().unwrap(), payload);
    }

    let expected: usize = (0..50)
        .map(|i| ENTRY_HEADER_SIZE + format!("entry{}", i).len() + 1 + 300)
        .sum();
    assert_eq!(zpak.finish().unwrap().len(), HEADER_SIZE + expected);
}

#[test]
fn iteration_covers_the_whole_blob() {
    let mut zpak = stored();
    for (name, data) in [("one", &b"1"[..]), ("two", &b"22"[..]), ("three", &b"333"[..])] {
        zpak.append(name, data).unwrap();
    }

    let mut offset = HEADER_SIZE;
    for entry in &zpak {
        let entry = entry.unwrap();
        assert_eq!(entry.offset(), offset);
        assert_eq!(entry.flags(), 0);
        assert_eq!(entry.name_hash(), zpak_format::name_hash(entry.name()));
        offset += entry.record_len();
    }
    assert_eq!(offset, zpak.len());
}

#[test]
fn entries_can_be_revisited_by_offset() {
    let mut zpak = stored();
    zpak.append("a", b"first").unwrap();
    zpak.append("b", b"second").unwrap();

    let offsets: Vec<usize> = zpak.iter().map(|e| e.unwrap().offset()).collect();
    let entry = zpak.entry_at(offsets[1]).unwrap();
    assert_eq!(entry.name(), "b");
    assert_eq!(entry.read().unwrap(), b"second");
}

#[test]
fn missing_name_is_not_an_error() {
    let mut zpak = stored();
    zpak.append("present", b"x").unwrap();

    assert!(zpak.read("absent").unwrap().is_none());
    assert!(zpak.get("pres").unwrap().is_none());
    assert!(zpak.last_error().is_none());
}

#[test]
fn duplicate_names_resolve_to_the_first() {
    for index in [false, true] {
        let mut zpak = Zpak::new(ZpakConfig::stored().with_index(index));
        zpak.append("dup", b"old").unwrap();
        zpak.append("dup", b"new").unwrap();

        assert_eq!(zpak.read("dup").unwrap().unwrap(), b"old");
        assert_eq!(names(&zpak), ["dup", "dup"]);
    }
}

#[test]
fn index_agrees_with_scan() {
    let mut zpak = Zpak::default();
    for i in 0..200 {
        zpak.append(&format!("name/{}", i), format!("{}", i * i).as_bytes())
            .unwrap();
    }
    let blob = zpak.finish().unwrap();

    let scan = Zpak::from_borrowed(&blob).unwrap();
    let mut indexed = Zpak::new(ZpakConfig::read_only().with_index(true));
    indexed.load_borrowed(&blob).unwrap();

    for i in (0..220).step_by(7) {
        let name = format!("name/{}", i);
        assert_eq!(scan.read(&name).unwrap(), indexed.read(&name).unwrap());
    }
}

#[test]
fn borrowed_context_is_read_only() {
    let mut zpak = stored();
    zpak.append("a", b"xx").unwrap();
    let blob = zpak.finish().unwrap();
    let pristine = blob.clone();

    let mut zpak = Zpak::from_borrowed(&blob).unwrap();
    assert!(zpak.is_borrowed());
    assert_eq!(zpak.mode(), Mode::Read);
    assert_eq!(zpak.capacity(), blob.len());

    let err = zpak.append("b", b"yy").unwrap_err();
    assert!(matches!(err, ZpakError::Borrowed));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(zpak.last_error().is_some());
    assert_eq!(zpak.read("a").unwrap().unwrap(), b"xx");

    assert!(matches!(zpak.finish(), Err(ZpakError::Borrowed)));
    assert_eq!(blob, pristine);
}

#[test]
fn borrowed_load_forces_read_mode() {
    let mut zpak = stored();
    zpak.append("a", b"xx").unwrap();
    let blob = zpak.finish().unwrap();

    let mut zpak = Zpak::new(ZpakConfig::default());
    zpak.load_borrowed(&blob).unwrap();
    assert_eq!(zpak.mode(), Mode::Read);
    assert!(zpak.append("b", b"y").is_err());
}

#[test]
fn copied_load_can_keep_appending() {
    let mut zpak = stored();
    zpak.append("a", b"xx").unwrap();
    let blob = zpak.finish().unwrap();

    let mut zpak = Zpak::from_bytes(&blob).unwrap();
    assert!(!zpak.is_borrowed());
    zpak.append("b", b"yyyy").unwrap();
    let grown = zpak.finish().unwrap();

    let zpak = Zpak::from_borrowed(&grown).unwrap();
    assert_eq!(names(&zpak), ["a", "b"]);
    // the loaded header decides the codec
    assert_eq!(zpak.compression(), Compression::Stored);
}

#[test]
fn read_only_context_refuses_writes() {
    let mut zpak = Zpak::new(ZpakConfig::read_only());
    let err = zpak.append("a", b"x").unwrap_err();
    assert!(matches!(err, ZpakError::ReadOnly));
    assert!(!zpak.is_bound());
    assert_eq!(
        zpak.last_error().as_deref(),
        Some("cannot write entry in non-writable zpak")
    );
}

#[test]
fn second_load_is_rejected() {
    let mut zpak = stored();
    zpak.append("a", b"xx").unwrap();
    let blob = zpak.finish().unwrap();

    let mut zpak = Zpak::from_bytes(&blob).unwrap();
    assert!(matches!(zpak.load(&blob), Err(ZpakError::AlreadyBound)));
    assert!(matches!(zpak.load_borrowed(&blob), Err(ZpakError::AlreadyBound)));
}

#[test]
fn truncated_blob_is_a_format_error() {
    let mut zpak = stored();
    zpak.append("a", b"xx").unwrap();
    zpak.append("b", b"yyyy").unwrap();
    let blob = zpak.finish().unwrap();

    for cut in [blob.len() - 1, blob.len() - 5, HEADER_SIZE + 3] {
        let err = Zpak::from_borrowed(&blob[..cut]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format, "cut at {}", cut);
    }

    let mut zpak = Zpak::default();
    assert!(zpak.load(&blob[..blob.len() - 1]).is_err());
    assert!(zpak.last_error().is_some());
    assert!(!zpak.is_bound());
}

#[test]
fn bad_headers_are_rejected() {
    assert!(matches!(Zpak::from_bytes(b"ZPA"), Err(ZpakError::TooShort { .. })));
    assert!(matches!(Zpak::from_bytes(b"PKZP\x01\x00"), Err(ZpakError::InvalidMagic)));
    assert!(matches!(
        Zpak::from_bytes(b"ZPAK\x09\x00"),
        Err(ZpakError::UnsupportedVersion(9))
    ));
    assert!(matches!(
        Zpak::from_bytes(b"ZPAK\x01\x07"),
        Err(ZpakError::UnsupportedCompression(7))
    ));

    // a bare header is a valid, empty archive
    let zpak = Zpak::from_bytes(b"ZPAK\x01\x01").unwrap();
    assert!(zpak.is_empty());
    assert_eq!(zpak.entry_count(), 0);
}

#[test]
fn read_into_checks_the_buffer() {
    let mut zpak = Zpak::default();
    zpak.append("text", b"hello world").unwrap();

    let mut small = [0u8; 4];
    assert!(matches!(
        zpak.read_into("text", &mut small),
        Err(ZpakError::BufferTooSmall { needed: 11, got: 4 })
    ));

    let mut buf = [0u8; 32];
    let n = zpak.read_into("text", &mut buf).unwrap().unwrap();
    assert_eq!(&buf[..n], b"hello world");
    assert!(zpak.read_into("other", &mut buf).unwrap().is_none());
}

#[test]
fn compression_monotonicity() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut noise = vec![0u8; 64 * 1024];
    rng.fill_bytes(&mut noise);
    let repetitive = b"abcdefgh".repeat(8 * 1024);

    let mut zpak = Zpak::new(ZpakConfig::default().with_compression(Compression::Deflate));
    let repetitive_size = zpak.append("repetitive", &repetitive).unwrap();
    let noise_size = zpak.append("noise", &noise).unwrap();

    assert!(repetitive_size < repetitive.len());
    assert!(noise_size <= noise.len() + DEFAULT_SLACK_MARGIN);

    let entry = zpak.get("noise").unwrap().unwrap();
    assert_eq!(entry.size(), noise.len());
    assert_eq!(entry.compressed_size(), noise_size);
    assert_eq!(entry.read().unwrap(), noise);
}

#[test]
fn invalid_names_and_payloads() {
    let mut zpak = stored();
    assert_eq!(zpak.append("", b"x").unwrap_err().kind(), ErrorKind::Validation);
    assert_eq!(zpak.append("a\0b", b"x").unwrap_err().kind(), ErrorKind::Validation);
    assert_eq!(zpak.append("a", b"").unwrap_err().kind(), ErrorKind::Validation);
    assert!(!zpak.is_bound());

    zpak.append("a", b"x").unwrap();
    assert!(matches!(zpak.get(""), Err(ZpakError::EmptyName)));
}

#[test]
fn finish_requires_a_writable_context() {
    let mut zpak = stored();
    zpak.append("a", b"xx").unwrap();
    let blob = zpak.finish().unwrap();

    let mut zpak = Zpak::new(ZpakConfig::read_only());
    zpak.load(&blob).unwrap();
    assert!(matches!(zpak.finish(), Err(ZpakError::ReadOnly)));
}

#[test]
fn colliding_names_resolve_by_name() {
    // djb2 collides on these two
    assert_eq!(name_hash(b"Ab"), name_hash(b"BA"));

    let mut zpak = stored();
    zpak.append("Ab", b"one").unwrap();
    zpak.append("BA", b"two").unwrap();
    assert_eq!(zpak.read("Ab").unwrap().unwrap(), b"one");
    assert_eq!(zpak.read("BA").unwrap().unwrap(), b"two");
    let blob = zpak.finish().unwrap();

    for index in [false, true] {
        let mut copied = Zpak::new(ZpakConfig::stored().with_index(index));
        copied.load(&blob).unwrap();

        let mut borrowed = Zpak::new(ZpakConfig::read_only().with_index(index));
        borrowed.load_borrowed(&blob).unwrap();

        for zpak in [&copied, &borrowed] {
            assert_eq!(zpak.read("Ab").unwrap().unwrap(), b"one", "index: {}", index);
            assert_eq!(zpak.read("BA").unwrap().unwrap(), b"two", "index: {}", index);
            assert_eq!(zpak.get("Ab").unwrap().unwrap().name(), "Ab");
            assert!(zpak.read("AC").unwrap().is_none());
        }
    }
}

#[test]
fn failed_growth_commits_nothing() {
    let config = ZpakConfig::stored()
        .with_capacity(64, usize::MAX >> 1)
        .with_slack_margin(0);
    let mut zpak = Zpak::new(config);
    zpak.append("a", b"x").unwrap();

    let before = zpak.as_bytes().unwrap().to_vec();
    let len = zpak.len();
    let capacity = zpak.capacity();
    assert_eq!(capacity, 64);

    let err = zpak.append("big", &[1u8; 200]).unwrap_err();
    assert!(
        matches!(err.kind(), ErrorKind::Allocation | ErrorKind::Validation),
        "{:?}",
        err
    );

    assert_eq!(zpak.as_bytes().unwrap(), &before[..]);
    assert_eq!(zpak.len(), len);
    assert_eq!(zpak.capacity(), capacity);
    assert_eq!(zpak.entry_count(), 1);
    assert_eq!(zpak.last_error(), Some(err.to_string()));
    assert_eq!(zpak.read("a").unwrap().unwrap(), b"x");
    assert!(zpak.read("big").unwrap().is_none());

    // still usable for entries that fit
    zpak.append("b", b"y").unwrap();
    assert_eq!(names(&zpak), ["a", "b"]);
}

#[test]
fn inflated_size_is_bounded_by_the_stored_payload() {
    let mut zpak = Zpak::default();
    zpak.append("small", &[7u8; 64]).unwrap();
    let mut blob = zpak.finish().unwrap();

    // claim 200 MiB for a few dozen stored bytes
    blob[HEADER_SIZE..HEADER_SIZE + 4].copy_from_slice(&(200u32 << 20).to_le_bytes());

    let err = Zpak::from_bytes(&blob).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    let err = Zpak::from_borrowed(&blob).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}
