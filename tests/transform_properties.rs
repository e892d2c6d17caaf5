use proptest::prelude::*;
use rand::{rngs::StdRng, RngCore, SeedableRng};
use sbzip::{
    then, Bwt, CanonicalHuffmanTree, Composition, Hfc, Id, Mtf, RlePackBits, RlePairs,
    RleStreams, RotationSort, Transform,
};

fn boxed<T: Transform + 'static>(transform: T) -> Box<dyn Transform> {
    Box::new(transform)
}

fn every_transform() -> Vec<(&'static str, Box<dyn Transform>)> {
    vec![
        ("packbits", boxed(RlePackBits)),
        ("pairs", boxed(RlePairs)),
        ("streams", boxed(RleStreams::new())),
        ("streams/3", boxed(RleStreams::with_flag_width(3))),
        ("bwt/simple", boxed(Bwt::new(RotationSort::Simple))),
        ("bwt/doubling", boxed(Bwt::new(RotationSort::Doubling))),
        ("mtf", boxed(Mtf)),
        ("hfc", boxed(Hfc)),
        ("id", boxed(Id)),
    ]
}

fn by_name(name: &str) -> Box<dyn Transform> {
    every_transform()
        .into_iter()
        .find(|(n, _)| *n == name)
        .map(|(_, t)| t)
        .unwrap()
}

/// Blocks with long runs and a small alphabet, which stress the RLEs and the BWT.
fn runny_block() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec((0_u8..4, 1_usize..40), 0..40).prop_map(|runs| {
        runs.into_iter()
            .flat_map(|(byte, len)| std::iter::repeat(byte).take(len))
            .collect()
    })
}

#[test]
fn empty_block_test() {
    for (name, transform) in every_transform() {
        let encoded = transform.encode(&[]);
        assert!(transform.decode(&encoded).unwrap().is_empty(), "{}", name);
    }
}

#[test]
fn self_composition_test() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut input = b"abracadabra, abracadabra! ".repeat(40);
    let mut noise = vec![0_u8; 500];
    rng.fill_bytes(&mut noise);
    input.extend(noise);

    for (name, _) in every_transform() {
        let thrice: Composition = (0..3).map(|_| by_name(name)).collect();
        assert_eq!(thrice.len(), 3);
        let encoded = thrice.encode(&input);
        assert_eq!(thrice.decode(&encoded).unwrap(), input, "{} x3", name);
    }
}

#[test]
fn abcabc_chain_test() {
    let chain = Composition::new()
        .then(Bwt::default())
        .then(Mtf)
        .then(RlePackBits)
        .then(Hfc);
    let encoded = chain.encode(b"abcabc");

    // Running every decode by hand in reverse gives the same result.
    let hfc = Hfc.decode(&encoded).unwrap();
    let rle = RlePackBits.decode(&hfc).unwrap();
    let mtf = Mtf.decode(&rle).unwrap();
    let bwt = Bwt::default().decode(&mtf).unwrap();
    assert_eq!(bwt, b"abcabc".to_vec());
    assert_eq!(chain.decode(&encoded).unwrap(), b"abcabc".to_vec());
}

#[test]
fn nested_composition_test() {
    let inner = then(Bwt::default(), Mtf);
    let outer = then(RlePackBits, inner).then(Hfc);
    let flat = Composition::new()
        .then(RlePackBits)
        .then(Bwt::default())
        .then(Mtf)
        .then(Hfc);
    let input = b"nested chains behave like flat chains".to_vec();
    assert_eq!(outer.encode(&input), flat.encode(&input));
    assert_eq!(outer.decode(&outer.encode(&input)).unwrap(), input);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_every_transform_round_trips(input in prop::collection::vec(any::<u8>(), 0..600)) {
        for (name, transform) in every_transform() {
            let encoded = transform.encode(&input);
            prop_assert_eq!(&transform.decode(&encoded).unwrap(), &input, "{}", name);
        }
    }

    #[test]
    fn prop_runny_blocks_round_trip(input in runny_block()) {
        for (name, transform) in every_transform() {
            let encoded = transform.encode(&input);
            prop_assert_eq!(&transform.decode(&encoded).unwrap(), &input, "{}", name);
        }
    }

    #[test]
    fn prop_standard_chain_round_trips(input in runny_block()) {
        let chain = sbzip::standard_pipeline(RotationSort::default());
        prop_assert_eq!(chain.decode(&chain.encode(&input)).unwrap(), input);
    }

    #[test]
    fn prop_bwt_keeps_the_bytes(input in prop::collection::vec(any::<u8>(), 1..300)) {
        let encoded = Bwt::default().encode(&input);
        let mut column = encoded[4..].to_vec();
        let mut sorted = input.clone();
        column.sort_unstable();
        sorted.sort_unstable();
        prop_assert_eq!(column, sorted);
    }

    #[test]
    fn prop_huffman_lengths_match_usage(input in prop::collection::vec(0_u8..32, 0..400)) {
        let tree = CanonicalHuffmanTree::from_block(&input);
        for byte in 0..=255_u8 {
            let used = input.contains(&byte);
            prop_assert_eq!(tree.lengths()[byte as usize] > 0, used);
        }
    }
}
