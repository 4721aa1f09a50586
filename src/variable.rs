//! Variables and the concrete value bindings they are evaluated against.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::constant::canonical_bits;
use crate::error::ConstructionError;

/// An immutable named identifier used inside expressions.
///
/// Identity is the name: two variables with equal names are the same
/// variable for equality, hashing, and binding lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    name: String,
}

impl Variable {
    /// Creates a variable, rejecting empty names.
    pub fn new(name: impl Into<String>) -> Result<Self, ConstructionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConstructionError::EmptyVariableName);
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A mutable partial mapping from [`Variable`] to a double value; the
/// context an expression tree is evaluated against.
///
/// Starts empty. Inserting a binding overwrites any previous one, absence
/// is distinguishable from presence, and NaN is a legal bound value. There
/// is no built-in synchronization: writes go through `&mut self`, which is
/// exactly the single-writer discipline evaluation assumes.
#[derive(Debug, Clone, Default)]
pub struct VariableAssignment {
    bindings: FxHashMap<Variable, f64>,
}

impl VariableAssignment {
    /// An assignment with no bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to `variable`, overwriting any previous binding.
    pub fn set_value_for(&mut self, variable: Variable, value: f64) {
        self.bindings.insert(variable, value);
    }

    /// The value bound to `variable`, or `None` if it is unbound.
    pub fn get_value_for(&self, variable: &Variable) -> Option<f64> {
        self.bindings.get(variable).copied()
    }

    /// Whether `variable` currently has a binding.
    pub fn is_value_assigned_for(&self, variable: &Variable) -> bool {
        self.bindings.contains_key(variable)
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterates over the bound variables in no particular order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.bindings.keys()
    }
}

/// Two assignments are equal iff they bind the same set of variables to the
/// same values. Values compare by canonical bit pattern, so a NaN binding
/// equals a NaN binding.
impl PartialEq for VariableAssignment {
    fn eq(&self, other: &Self) -> bool {
        self.bindings.len() == other.bindings.len()
            && self.bindings.iter().all(|(variable, value)| {
                other
                    .bindings
                    .get(variable)
                    .is_some_and(|bound| canonical_bits(*bound) == canonical_bits(*value))
            })
    }
}

impl Eq for VariableAssignment {}

impl FromIterator<(Variable, f64)> for VariableAssignment {
    fn from_iter<I: IntoIterator<Item = (Variable, f64)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

/// Renders bindings sorted by variable name so diagnostics are
/// deterministic despite the hash-map storage.
impl fmt::Display for VariableAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.bindings.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        f.write_str("{")?;
        for (i, (variable, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{variable} = {value}")?;
        }
        f.write_str("}")
    }
}
