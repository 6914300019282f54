//! Streams long enough to fill the dictionary at 16 bit codes.
use lzwtst::{Decoder, Encoder, ResetPolicy, MAX_CODESIZE, MIN_CODESIZE};

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

/// Random bytes with some repeated stretches, so the dictionary also learns longer sequences.
fn sample() -> Vec<u8> {
    let mut data = noise(1 << 18, 0x2545_f491_4f6c_dd1d);
    let copy = data[1000..9000].to_vec();
    data.extend_from_slice(&copy);
    data.extend(noise(1 << 16, 11));
    data
}

#[test]
fn reset_reseeds_dictionary() {
    let data = sample();
    let mut encoder = Encoder::with_dictionary_reset();
    let compressed = encoder.encode(&data).unwrap();
    assert!(encoder.dictionary_resets() >= 1);

    let mut decoder = Decoder::new();
    let decompressed = decoder.decode(&compressed).unwrap();
    assert_eq!(decoder.policy(), Some(ResetPolicy::Reset));
    assert_eq!(decoder.dictionary_resets(), encoder.dictionary_resets());
    assert!(decompressed == data);
}

#[test]
fn freeze_keeps_dictionary() {
    let data = sample();
    let mut encoder = Encoder::new();
    let compressed = encoder.encode(&data).unwrap();
    assert_eq!(encoder.dictionary_resets(), 0);
    assert_eq!(encoder.code_size(), MAX_CODESIZE);

    let mut decoder = Decoder::new();
    let decompressed = decoder.decode(&compressed).unwrap();
    assert_eq!(decoder.policy(), Some(ResetPolicy::Freeze));
    assert_eq!(decoder.dictionary_resets(), 0);
    assert_eq!(decoder.code_size(), MAX_CODESIZE);
    assert!(decompressed == data);
}

/// Both policies produce the same stream up to the point the dictionary is full.
#[test]
fn policies_agree_before_ceiling() {
    let data = noise(20_000, 5);
    let frozen = Encoder::new().encode(&data).unwrap();
    let reset = Encoder::with_dictionary_reset().encode(&data).unwrap();
    assert_eq!(frozen.len(), reset.len());
    assert_eq!(frozen[0] & 0x7f, reset[0] & 0x7f);
    assert_eq!(frozen[1..], reset[1..]);
}

/// Cut the input right at the first reset and a few bytes to either side of it.
#[test]
fn ends_around_reset() {
    let data = noise(1 << 18, 99);
    let resets = |len: usize| {
        let mut encoder = Encoder::with_dictionary_reset();
        let _ = encoder.encode(&data[..len]).unwrap();
        encoder.dictionary_resets()
    };
    assert!(resets(data.len()) >= 1);

    // The smallest length that resets the dictionary, only through the reservation that
    // follows the final code.
    let (mut low, mut high) = (0, data.len());
    while low + 1 < high {
        let mid = low + (high - low) / 2;
        if resets(mid) >= 1 {
            high = mid;
        } else {
            low = mid;
        }
    }

    for len in high.saturating_sub(4)..high + 4 {
        let mut encoder = Encoder::with_dictionary_reset();
        let compressed = encoder.encode(&data[..len]).unwrap();

        let mut decoder = Decoder::new();
        let decompressed = decoder.decode(&compressed).unwrap();
        assert!(decompressed == &data[..len], "length {}", len);
        assert_eq!(decoder.dictionary_resets(), encoder.dictionary_resets());
        if len >= high {
            assert_eq!(encoder.dictionary_resets(), 1);
            assert!(encoder.code_size() >= MIN_CODESIZE);
        }
    }
    let mut encoder = Encoder::with_dictionary_reset();
    let _ = encoder.encode(&data[..high]).unwrap();
    assert_eq!(encoder.code_size(), MIN_CODESIZE);
}
