use lzwtst::{Decoder, Encoder, ResetPolicy};
use std::{env, fs};

/// Deterministic filler with little redundancy.
fn noise(len: usize, mut seed: u64) -> Vec<u8> {
    (0..len)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed >> 24) as u8
        })
        .collect()
}

#[test]
fn roundtrip_all() {
    let file = env::args().next().unwrap();
    let data = fs::read(file).unwrap();

    for &policy in &[ResetPolicy::Freeze, ResetPolicy::Reset] {
        assert_roundtrips(&data, policy);
    }
}

#[test]
fn empty() {
    for &policy in &[ResetPolicy::Freeze, ResetPolicy::Reset] {
        let compressed = assert_roundtrips(&[], policy);
        assert_eq!(compressed.len(), 2);
    }
}

#[test]
fn repeated_byte() {
    let data = vec![b'A'; 2000];
    for &policy in &[ResetPolicy::Freeze, ResetPolicy::Reset] {
        let compressed = assert_roundtrips(&data, policy);
        assert!(compressed.len() < 100, "{}", compressed.len());
    }
}

#[test]
fn all_bytes_once() {
    let data: Vec<u8> = (0..=255).collect();
    for &policy in &[ResetPolicy::Freeze, ResetPolicy::Reset] {
        assert_roundtrips(&data, policy);
    }
}

#[test]
fn text() {
    let data = b"TOBEORNOTTOBEORTOBEORNOT#".repeat(300);
    for &policy in &[ResetPolicy::Freeze, ResetPolicy::Reset] {
        let compressed = assert_roundtrips(&data, policy);
        assert!(compressed.len() < data.len() / 4);
    }
}

#[test]
fn code_size_grows() {
    let data = noise(2000, 0x9e37_79b9_7f4a_7c15);
    let mut encoder = Encoder::new();
    let compressed = encoder.encode(&data).unwrap();
    assert!(encoder.code_size() >= 10);

    let mut decoder = Decoder::new();
    assert_eq!(decoder.decode(&compressed).unwrap(), data);
    assert_eq!(decoder.code_size(), encoder.code_size());
}

/// Let the input end at every position around the first code size increases, including the one
/// where only the decoder's reservation after the last code reaches the next size.
#[test]
fn ends_around_size_switch() {
    let data = noise(1200, 7);
    let mut sizes = vec![];
    for len in 200..1200 {
        let mut encoder = Encoder::new();
        let compressed = encoder.encode(&data[..len]).unwrap();
        sizes.push(encoder.code_size());

        let mut decoder = Decoder::new();
        let decompressed = decoder.decode(&compressed).unwrap();
        assert_eq!(decompressed, &data[..len], "length {}", len);
        assert_eq!(decoder.code_size(), encoder.code_size(), "length {}", len);
    }
    assert!(sizes.contains(&9));
    assert!(sizes.contains(&10));
    assert!(sizes.contains(&11));
}

#[test]
fn stream_interface() {
    let data = noise(50_000, 3);
    let mut compressed = vec![];
    let result = Encoder::with_dictionary_reset()
        .into_stream(&mut compressed)
        .encode_all(&data[..]);
    assert!(result.status.is_ok());
    assert_eq!(result.bytes_read, data.len());
    assert_eq!(result.bytes_written, compressed.len());

    // Anything after the end code is left in the reader.
    let trailer = b"trailing";
    let mut stream = compressed.clone();
    stream.extend_from_slice(trailer);
    let mut input = &stream[..];

    let mut decompressed = vec![];
    let result = Decoder::new()
        .into_stream(&mut decompressed)
        .decode_all(&mut input);
    assert!(result.status.is_ok(), "{:?}", result.status);
    assert_eq!(result.bytes_read, compressed.len());
    assert_eq!(result.bytes_written, data.len());
    assert_eq!(decompressed, data);
    assert_eq!(input, trailer);
}

fn assert_roundtrips(data: &[u8], policy: ResetPolicy) -> Vec<u8> {
    let mut encoder = Encoder::with_policy(policy);
    let compressed = encoder.encode(data).unwrap();

    let mut decoder = Decoder::new();
    let decompressed = decoder.decode(&compressed).unwrap();
    assert_eq!(decoder.policy(), Some(policy));
    assert!(data == &*decompressed, "{:?}, {} bytes", policy, data.len());
    assert_eq!(decoder.dictionary_resets(), encoder.dictionary_resets());
    compressed
}
