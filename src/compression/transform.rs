use log::debug;

use crate::error::Result;

/// A reversible block transformation.
///
/// `decode(encode(block))` must return `block` for every byte sequence, including the empty one.
/// Encoding is total; decoding fails with `CodecError::CorruptData` when its input could not have
/// been produced by `encode`.
pub trait Transform {
    fn encode(&self, block: &[u8]) -> Vec<u8>;
    fn decode(&self, block: &[u8]) -> Result<Vec<u8>>;
}

/// An ordered chain of transforms. Encoding runs the stages front to back, decoding runs each
/// stage's decode back to front. A Composition is itself a Transform, so chains nest.
#[derive(Default)]
pub struct Composition {
    stages: Vec<Box<dyn Transform>>,
}

impl Composition {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append one stage to the end of the chain.
    pub fn then<T: Transform + 'static>(mut self, stage: T) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Append every stage of `other`, keeping their order.
    pub fn chain(mut self, other: Composition) -> Self {
        self.stages.extend(other.stages);
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl FromIterator<Box<dyn Transform>> for Composition {
    fn from_iter<I: IntoIterator<Item = Box<dyn Transform>>>(iter: I) -> Self {
        Self {
            stages: iter.into_iter().collect(),
        }
    }
}

impl Transform for Composition {
    fn encode(&self, block: &[u8]) -> Vec<u8> {
        let mut data = block.to_vec();
        for (i, stage) in self.stages.iter().enumerate() {
            let next = stage.encode(&data);
            debug!("encode stage {}: {} -> {} bytes", i, data.len(), next.len());
            data = next;
        }
        data
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<u8>> {
        let mut data = block.to_vec();
        for (i, stage) in self.stages.iter().enumerate().rev() {
            let next = stage.decode(&data)?;
            debug!("decode stage {}: {} -> {} bytes", i, data.len(), next.len());
            data = next;
        }
        Ok(data)
    }
}

/// Chain two transforms: `first` encodes first and decodes last.
pub fn then<A, B>(first: A, second: B) -> Composition
where
    A: Transform + 'static,
    B: Transform + 'static,
{
    Composition::new().then(first).then(second)
}

/// The identity transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Id;

impl Transform for Id {
    fn encode(&self, block: &[u8]) -> Vec<u8> {
        block.to_vec()
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<u8>> {
        Ok(block.to_vec())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::CodecError;

    /// Adds a constant to every byte; lets the tests see stage order.
    struct AddN(u8);

    impl Transform for AddN {
        fn encode(&self, block: &[u8]) -> Vec<u8> {
            block.iter().map(|b| b.wrapping_add(self.0)).collect()
        }
        fn decode(&self, block: &[u8]) -> Result<Vec<u8>> {
            Ok(block.iter().map(|b| b.wrapping_sub(self.0)).collect())
        }
    }

    /// Appends a marker byte; decode checks and strips it.
    struct Tag(u8);

    impl Transform for Tag {
        fn encode(&self, block: &[u8]) -> Vec<u8> {
            let mut out = block.to_vec();
            out.push(self.0);
            out
        }
        fn decode(&self, block: &[u8]) -> Result<Vec<u8>> {
            match block.split_last() {
                Some((&last, rest)) if last == self.0 => Ok(rest.to_vec()),
                _ => Err(CodecError::corrupt("missing tag")),
            }
        }
    }

    #[test]
    fn stage_order_test() {
        let chain = Composition::new().then(Tag(1)).then(AddN(10)).then(Tag(2));
        assert_eq!(chain.len(), 3);
        let encoded = chain.encode(&[0, 5]);
        assert_eq!(encoded, vec![10, 15, 11, 2]);
        assert_eq!(chain.decode(&encoded).unwrap(), vec![0, 5]);
    }

    #[test]
    fn decode_runs_in_reverse_test() {
        // Decoding out of order would hit the wrong tag first.
        let chain = then(Tag(7), Tag(8));
        assert_eq!(chain.encode(b"x"), b"x\x07\x08".to_vec());
        assert!(chain.decode(b"x\x08\x07").is_err());
        assert_eq!(chain.decode(b"x\x07\x08").unwrap(), b"x".to_vec());
    }

    #[test]
    fn chain_concatenates_test() {
        let front = then(Tag(1), Tag(2));
        let back = then(Tag(3), AddN(1));
        let all = front.chain(back);
        assert_eq!(all.len(), 4);
        assert_eq!(all.encode(&[0]), vec![1, 2, 3, 4]);

        // Nesting a composition as a single stage gives the same result.
        let nested = Composition::new()
            .then(then(Tag(1), Tag(2)))
            .then(then(Tag(3), AddN(1)));
        assert_eq!(nested.len(), 2);
        assert_eq!(nested.encode(&[0]), all.encode(&[0]));
    }

    #[test]
    fn empty_composition_is_identity_test() {
        let chain = Composition::new();
        assert!(chain.is_empty());
        assert_eq!(chain.encode(b"abc"), b"abc".to_vec());
        assert_eq!(chain.decode(b"abc").unwrap(), b"abc".to_vec());
    }

    #[test]
    fn id_test() {
        assert_eq!(Id.encode(&[]), Vec::<u8>::new());
        assert_eq!(Id.decode(b"hello").unwrap(), b"hello".to_vec());
    }
}
