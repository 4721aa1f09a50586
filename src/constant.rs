//! The constant leaf and its process-wide flyweight cache.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// Interned constants, keyed by canonical value bits. Lives for the rest of
/// the process once touched; the mutex serializes first-time inserts so
/// exactly one canonical instance is ever published per value.
static CACHE: Lazy<Mutex<FxHashMap<u64, Arc<Constant>>>> =
    Lazy::new(|| Mutex::new(FxHashMap::default()));

/// Collapses every NaN payload onto the canonical NaN bit pattern; all
/// other values keep their exact bits, so `0.0` and `-0.0` stay distinct.
pub(crate) fn canonical_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else {
        value.to_bits()
    }
}

/// A fixed numeric leaf.
///
/// Obtained through [`Constant::for_value`], which hands out one shared
/// instance per distinct value, making identity checks (`Arc::ptr_eq`)
/// cheap. The sharing is an optimization only: equality and hashing compare
/// the wrapped value and hold with or without the cache.
#[derive(Debug)]
pub struct Constant {
    value: f64,
}

impl Constant {
    /// The shared instance wrapping `value`.
    pub fn for_value(value: f64) -> Arc<Self> {
        let mut cache = CACHE.lock();
        Arc::clone(
            cache
                .entry(canonical_bits(value))
                .or_insert_with(|| Arc::new(Self { value })),
        )
    }

    /// The wrapped value.
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Equality by wrapped value bits: NaN equals NaN, `0.0` differs from
/// `-0.0`. Required to stay consistent with `Hash`.
impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        canonical_bits(self.value) == canonical_bits(other.value)
    }
}

impl Eq for Constant {}

impl Hash for Constant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(canonical_bits(self.value));
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
