//! Helpers shared by the integration tests.

use std::path::Path;

use rand::rand_core::impls::{next_u32_via_fill, next_u64_via_fill};
use rand::rand_core::{CryptoRng, RngCore};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};

/// Load a vector file from `tests/vectors`.
pub fn read_test<T: DeserializeOwned>(file: &str) -> TestFile<T> {
    let path = Path::new("tests/vectors").join(file);
    let json = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("reading {}: {e}", path.display()));
    serde_json::from_str(&json).unwrap_or_else(|e| panic!("parsing {}: {e}", path.display()))
}

#[derive(Deserialize)]
pub struct TestFile<T> {
    pub name: String,
    pub tests: Vec<Test<T>>,
}

#[derive(Deserialize)]
pub struct Test<T> {
    pub name: String,
    #[serde(flatten)]
    pub test_data: T,
}

/// A boolean that only deserializes from `B`, to tell untagged variants apart.
#[derive(Debug)]
pub struct Bool<const B: bool>;

impl<'de, const B: bool> Deserialize<'de> for Bool<B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match bool::deserialize(deserializer)? {
            v if v == B => Ok(Bool),
            v => Err(D::Error::custom(format!("expected {B}, got {v}"))),
        }
    }
}

/// Replays a fixed byte string as randomness, so IVs and server ids are predictable.
///
/// Panics once the bytes run out.
#[derive(Clone, Debug)]
pub struct FakeRng<const N: usize> {
    bytes: [u8; N],
    start: usize,
}

impl<const N: usize> FakeRng<N> {
    pub fn new(bytes: [u8; N]) -> Self {
        Self { bytes, start: 0 }
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        N - self.start
    }
}

impl<const N: usize> RngCore for FakeRng<N> {
    fn next_u32(&mut self) -> u32 {
        next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let end = self.start + dest.len();
        let Some(src) = self.bytes.get(self.start..end) else {
            panic!("FakeRng exhausted after {} bytes", self.start);
        };
        dest.copy_from_slice(src);
        self.start = end;
    }
}

// not really
impl<const N: usize> CryptoRng for FakeRng<N> {}
