use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use range_coder::{
    decode, encode, pack, unpack, AdaptiveCountModel, Error, ProbabilityModel, StaticModel,
    Target, UniformModel,
};

/// Favours the byte following the previous one, and only allows the
/// terminator once `length` symbols have been coded.
struct SuccessorModel {
    length: usize,
}

impl ProbabilityModel for SuccessorModel {
    type Symbol = u8;

    fn symbol_count(&self) -> usize {
        256
    }

    fn symbol_weight(&self, context: &[u8], index: usize) -> f64 {
        match context.last() {
            Some(&last) if usize::from(last.wrapping_add(1)) == index => 500.0,
            _ => 1.0,
        }
    }

    fn terminator_weight(&self, context: &[u8]) -> f64 {
        if context.len() < self.length {
            0.0
        } else {
            1.0
        }
    }

    fn to_index(&self, symbol: &u8) -> usize {
        usize::from(*symbol)
    }

    fn to_symbol(&self, index: usize) -> u8 {
        index as u8
    }
}

fn assert_round_trip<M>(input: &[M::Symbol], model: &M)
where
    M: ProbabilityModel,
    M::Symbol: PartialEq + std::fmt::Debug,
{
    let bits = encode(input, model).unwrap();
    let decoded = decode(&bits, model).unwrap();
    assert_eq!(decoded, input);
}

#[test]
fn test_static_scenario_round_trip() {
    let model = StaticModel::new([('A', 3.0), ('B', 1.0)], 1.0);
    let input = ['A', 'A', 'B'];
    let bits = encode(&input, &model).unwrap();
    assert!(!bits.is_empty());
    assert_eq!(decode(&bits, &model).unwrap(), input);
}

#[test]
fn test_adaptive_scenario_round_trip() {
    let model = AdaptiveCountModel::new(vec!['a', 'b', 'c', 'd'], 1.0);
    let input: Vec<char> = "abacabadabacabaddddddccccbbbbaaaa".chars().collect();
    assert_round_trip(&input, &model);
}

#[test]
fn test_empty_sequence_round_trip() {
    assert_round_trip(&[], &StaticModel::new([('A', 3.0), ('B', 1.0)], 1.0));
    assert_round_trip(&[], &AdaptiveCountModel::bytes(0.25));
    assert_round_trip(&[], &UniformModel::default());
}

#[test]
fn test_empty_alphabet_round_trip() {
    let model = StaticModel::<u8>::new([], 1.0);
    let bits = encode(&[], &model).unwrap();
    assert_eq!(bits.len(), 2);
    assert!(decode(&bits, &model).unwrap().is_empty());
}

#[test]
fn test_single_symbol_alphabet_round_trip() {
    let model = StaticModel::new([(7u32, 1.0)], 1.0);
    assert_round_trip(&[7; 200], &model);
}

#[test]
fn test_context_dependent_terminator_round_trip() {
    let input: Vec<u8> = (0..=255u8).chain(0..40).collect();
    let model = SuccessorModel {
        length: input.len(),
    };
    assert_round_trip(&input, &model);
}

#[test]
fn test_terminator_required_on_final_step() {
    let model = SuccessorModel { length: 10 };
    let err = encode(&[1, 2, 3], &model).unwrap_err();
    assert_eq!(
        err,
        Error::UndecodableSequence {
            position: 3,
            target: Target::Terminator,
        }
    );
}

#[test]
fn test_rare_terminator_with_balanced_symbols() {
    // Near-equal weights keep the interval close to the midpoint, exercising
    // long runs of pending straddle bits.
    let model = StaticModel::new([(0u8, 1.0), (1u8, 1.0)], 0.0001);
    let input: Vec<u8> = (0..2000).map(|i| ((i * 7) % 3 % 2) as u8).collect();
    assert_round_trip(&input, &model);
}

#[test]
fn test_round_trip_through_packed_bytes() {
    let text = b"the quick brown fox jumps over the lazy dog";
    let model = StaticModel::from_counts(&text[..], 1.0);
    let bits = encode(&text[..], &model).unwrap();
    let (bytes, bit_count) = pack(&bits);
    assert_eq!(bytes.len(), (bit_count + 7) / 8);

    let restored = unpack(&bytes, bit_count).unwrap();
    assert_eq!(decode(&restored, &model).unwrap(), &text[..]);
}

#[test]
fn test_truncated_stream_does_not_round_trip() {
    let model = AdaptiveCountModel::bytes(0.01);
    let text = b"a rather long message that will lose its tail when truncated";
    let bits = encode(&text[..], &model).unwrap();
    let truncated = &bits[..bits.len() / 2];
    match decode(truncated, &model) {
        Ok(decoded) => assert_ne!(decoded, &text[..]),
        Err(err) => assert!(matches!(err, Error::StreamCorruption { .. })),
    }
}

#[test]
fn test_skewed_model_beats_uniform() {
    let input: Vec<u8> = (0..4000)
        .map(|i| if i % 50 == 0 { b'b' } else { b'a' })
        .collect();
    let skewed = StaticModel::new([(b'a', 49.0), (b'b', 1.0)], 1.0);
    let uniform = UniformModel::default();

    let skewed_bits = encode(&input, &skewed).unwrap();
    let uniform_bits = encode(&input, &uniform).unwrap();
    assert!(skewed_bits.len() * 10 < uniform_bits.len());
    // A uniform byte model cannot do better than eight bits per symbol.
    assert!(uniform_bits.len() >= input.len() * 8);
    assert_eq!(decode(&skewed_bits, &skewed).unwrap(), input);
    assert_eq!(decode(&uniform_bits, &uniform).unwrap(), input);
}

#[test]
fn test_random_static_models_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for _ in 0..200 {
        let alphabet = rng.gen_range(1..=16usize);
        let weights: Vec<f64> = (0..alphabet)
            .map(|_| {
                if rng.gen_bool(0.2) {
                    0.0
                } else {
                    rng.gen_range(0.1..10.0)
                }
            })
            .collect();
        let usable: Vec<u16> = (0..alphabet as u16)
            .filter(|&s| weights[usize::from(s)] > 0.0)
            .collect();
        let terminator = rng.gen_range(0.01..10.0);
        let model = StaticModel::new(
            weights.iter().enumerate().map(|(s, &w)| (s as u16, w)),
            terminator,
        );

        let length = if usable.is_empty() {
            0
        } else {
            rng.gen_range(0..=500usize)
        };
        let input: Vec<u16> = (0..length)
            .map(|_| usable[rng.gen_range(0..usable.len())])
            .collect();
        assert_round_trip(&input, &model);
    }
}

proptest! {
    #[test]
    fn test_static_round_trip_prop(
        weights in proptest::collection::vec(0.5f64..1000.0, 1..=16),
        terminator in 0.01f64..100.0,
        picks in proptest::collection::vec(any::<prop::sample::Index>(), 0..300),
    ) {
        let model = StaticModel::new(
            weights.iter().enumerate().map(|(s, &w)| (s as u8, w)),
            terminator,
        );
        let input: Vec<u8> = picks.iter().map(|p| p.index(weights.len()) as u8).collect();

        let bits = encode(&input, &model).unwrap();
        prop_assert_eq!(decode(&bits, &model).unwrap(), input);
    }
}

proptest! {
    // The adaptive byte model rescans its context for each of 256 weights.
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_adaptive_round_trip_prop(input in proptest::collection::vec(any::<u8>(), 0..120)) {
        let model = AdaptiveCountModel::bytes(1.0);
        let bits = encode(&input, &model).unwrap();
        let again = encode(&input, &model).unwrap();
        prop_assert_eq!(&bits, &again);
        prop_assert_eq!(decode(&bits, &model).unwrap(), input);
    }
}
