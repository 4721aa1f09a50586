//! The closed set of expression node kinds.
//!
//! A tree is built bottom-up from leaves and is immutable once constructed:
//! composites take ownership of their operands and accessors hand out
//! borrows, so a finished tree can never be mutated out from under an
//! evaluation. Addition and multiplication are commutative and compare as
//! multisets; every other composite compares its operands in order.

use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::ops;
use std::sync::Arc;

use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::constant::Constant;
use crate::error::ConstructionError;
use crate::variable::Variable;

/// One node of the arithmetic syntax tree.
///
/// The variant set is closed. External collaborators that need
/// variant-specific behavior implement [`Visitor`](crate::Visitor) and
/// dispatch through [`receive`](ExpressionNode::receive) rather than
/// matching on this enum themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExpressionNode {
    /// A fixed numeric leaf, shared through the flyweight cache.
    Constant(Arc<Constant>),
    /// A reference to a named input variable.
    Variable(Variable),
    /// N-ary commutative sum.
    Addition(Addition),
    /// N-ary commutative product.
    Multiplication(Multiplication),
    /// Binary difference.
    Subtraction(Subtraction),
    /// Binary quotient.
    Division(Division),
    /// Binary power.
    Exponentiation(Exponentiation),
    /// Logarithm to an arbitrary base.
    Logarithm(Logarithm),
    /// Logarithm to base e.
    NaturalLogarithm(NaturalLogarithm),
    /// e raised to an exponent.
    ExponentialFunction(ExponentialFunction),
    /// Sine of an argument in radians.
    Sine(Sine),
    /// Strict less-than test yielding a nonzero sentinel or zero.
    Comparison(Comparison),
    /// Ternary branch on a numeric condition.
    IfThenElse(IfThenElse),
}

impl ExpressionNode {
    /// The shared constant node for `value`.
    pub fn constant(value: f64) -> Self {
        Self::Constant(Constant::for_value(value))
    }

    /// A node referencing `variable`.
    pub fn variable(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}

/// Sum of two or more summands.
///
/// Commutative: operand order is preserved for accessors and display but
/// ignored by equality and hashing, which use exact multiset semantics
/// (duplicates count).
#[derive(Debug, Clone)]
pub struct Addition {
    summands: Vec<ExpressionNode>,
}

impl Addition {
    /// Builds a sum from any collection of at least two summands.
    pub fn new<I>(summands: I) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = ExpressionNode>,
    {
        let summands: Vec<_> = summands.into_iter().collect();
        if summands.len() < 2 {
            return Err(ConstructionError::NotEnoughOperands {
                kind: "addition",
                got: summands.len(),
            });
        }
        Ok(Self { summands })
    }

    /// The two-operand sum, which is always a valid arity.
    pub fn pair(lhs: ExpressionNode, rhs: ExpressionNode) -> Self {
        Self {
            summands: vec![lhs, rhs],
        }
    }

    /// The summands in construction order.
    pub fn summands(&self) -> &[ExpressionNode] {
        &self.summands
    }
}

impl PartialEq for Addition {
    fn eq(&self, other: &Self) -> bool {
        multiset_eq(&self.summands, &other.summands)
    }
}

impl Eq for Addition {}

impl Hash for Addition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        multiset_hash(&self.summands, state);
    }
}

/// Product of two or more factors.
///
/// Commutative, with the same multiset equality/hash semantics as
/// [`Addition`].
#[derive(Debug, Clone)]
pub struct Multiplication {
    factors: Vec<ExpressionNode>,
}

impl Multiplication {
    /// Builds a product from any collection of at least two factors.
    pub fn new<I>(factors: I) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = ExpressionNode>,
    {
        let factors: Vec<_> = factors.into_iter().collect();
        if factors.len() < 2 {
            return Err(ConstructionError::NotEnoughOperands {
                kind: "multiplication",
                got: factors.len(),
            });
        }
        Ok(Self { factors })
    }

    /// The two-operand product, which is always a valid arity.
    pub fn pair(lhs: ExpressionNode, rhs: ExpressionNode) -> Self {
        Self {
            factors: vec![lhs, rhs],
        }
    }

    /// The factors in construction order.
    pub fn factors(&self) -> &[ExpressionNode] {
        &self.factors
    }
}

impl PartialEq for Multiplication {
    fn eq(&self, other: &Self) -> bool {
        multiset_eq(&self.factors, &other.factors)
    }
}

impl Eq for Multiplication {}

impl Hash for Multiplication {
    fn hash<H: Hasher>(&self, state: &mut H) {
        multiset_hash(&self.factors, state);
    }
}

/// Difference `minuend - subtrahend`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subtraction {
    minuend: Box<ExpressionNode>,
    subtrahend: Box<ExpressionNode>,
}

impl Subtraction {
    pub fn new(minuend: ExpressionNode, subtrahend: ExpressionNode) -> Self {
        Self {
            minuend: Box::new(minuend),
            subtrahend: Box::new(subtrahend),
        }
    }

    pub fn minuend(&self) -> &ExpressionNode {
        &self.minuend
    }

    pub fn subtrahend(&self) -> &ExpressionNode {
        &self.subtrahend
    }
}

/// Quotient `dividend / divisor`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Division {
    dividend: Box<ExpressionNode>,
    divisor: Box<ExpressionNode>,
}

impl Division {
    pub fn new(dividend: ExpressionNode, divisor: ExpressionNode) -> Self {
        Self {
            dividend: Box::new(dividend),
            divisor: Box::new(divisor),
        }
    }

    pub fn dividend(&self) -> &ExpressionNode {
        &self.dividend
    }

    pub fn divisor(&self) -> &ExpressionNode {
        &self.divisor
    }
}

/// Power `base ^ exponent`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Exponentiation {
    base: Box<ExpressionNode>,
    exponent: Box<ExpressionNode>,
}

impl Exponentiation {
    pub fn new(base: ExpressionNode, exponent: ExpressionNode) -> Self {
        Self {
            base: Box::new(base),
            exponent: Box::new(exponent),
        }
    }

    pub fn base(&self) -> &ExpressionNode {
        &self.base
    }

    pub fn exponent(&self) -> &ExpressionNode {
        &self.exponent
    }
}

/// Logarithm of `antilogarithm` to `base`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Logarithm {
    base: Box<ExpressionNode>,
    antilogarithm: Box<ExpressionNode>,
}

impl Logarithm {
    pub fn new(base: ExpressionNode, antilogarithm: ExpressionNode) -> Self {
        Self {
            base: Box::new(base),
            antilogarithm: Box::new(antilogarithm),
        }
    }

    pub fn base(&self) -> &ExpressionNode {
        &self.base
    }

    pub fn antilogarithm(&self) -> &ExpressionNode {
        &self.antilogarithm
    }
}

/// Logarithm of `antilogarithm` to base e.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalLogarithm {
    antilogarithm: Box<ExpressionNode>,
}

impl NaturalLogarithm {
    pub fn new(antilogarithm: ExpressionNode) -> Self {
        Self {
            antilogarithm: Box::new(antilogarithm),
        }
    }

    pub fn antilogarithm(&self) -> &ExpressionNode {
        &self.antilogarithm
    }
}

/// e raised to `exponent`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExponentialFunction {
    exponent: Box<ExpressionNode>,
}

impl ExponentialFunction {
    pub fn new(exponent: ExpressionNode) -> Self {
        Self {
            exponent: Box::new(exponent),
        }
    }

    pub fn exponent(&self) -> &ExpressionNode {
        &self.exponent
    }
}

/// Sine of `argument`, in radians.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sine {
    argument: Box<ExpressionNode>,
}

impl Sine {
    pub fn new(argument: ExpressionNode) -> Self {
        Self {
            argument: Box::new(argument),
        }
    }

    pub fn argument(&self) -> &ExpressionNode {
        &self.argument
    }
}

/// Strict ordering test: nonzero when `smaller < greater`, else zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comparison {
    smaller: Box<ExpressionNode>,
    greater: Box<ExpressionNode>,
}

impl Comparison {
    pub fn new(smaller: ExpressionNode, greater: ExpressionNode) -> Self {
        Self {
            smaller: Box::new(smaller),
            greater: Box::new(greater),
        }
    }

    pub fn smaller(&self) -> &ExpressionNode {
        &self.smaller
    }

    pub fn greater(&self) -> &ExpressionNode {
        &self.greater
    }
}

/// Branch on a numeric condition: the then-branch when the condition is
/// IEEE-754 unequal to zero, the else-branch otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IfThenElse {
    condition: Box<ExpressionNode>,
    then_branch: Box<ExpressionNode>,
    else_branch: Box<ExpressionNode>,
}

impl IfThenElse {
    pub fn new(
        condition: ExpressionNode,
        then_branch: ExpressionNode,
        else_branch: ExpressionNode,
    ) -> Self {
        Self {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn condition(&self) -> &ExpressionNode {
        &self.condition
    }

    pub fn then_branch(&self) -> &ExpressionNode {
        &self.then_branch
    }

    pub fn else_branch(&self) -> &ExpressionNode {
        &self.else_branch
    }
}

/// Order-independent equality with exact multiplicity: an operand appearing
/// twice on one side must appear twice on the other.
fn multiset_eq(lhs: &[ExpressionNode], rhs: &[ExpressionNode]) -> bool {
    if lhs.len() != rhs.len() {
        return false;
    }
    let mut counts: FxHashMap<&ExpressionNode, isize> = FxHashMap::default();
    for node in lhs {
        *counts.entry(node).or_insert(0) += 1;
    }
    for node in rhs {
        match counts.get_mut(node) {
            Some(count) => *count -= 1,
            None => return false,
        }
    }
    counts.values().all(|&count| count == 0)
}

/// Order-independent hash: per-operand hashes combine with a commutative
/// operation, so any permutation of the same multiset hashes identically.
/// Must stay consistent with [`multiset_eq`].
fn multiset_hash<H: Hasher>(operands: &[ExpressionNode], state: &mut H) {
    let combined = operands
        .iter()
        .map(|node| FxBuildHasher.hash_one(node))
        .fold(0u64, u64::wrapping_add);
    state.write_usize(operands.len());
    state.write_u64(combined);
}

impl From<f64> for ExpressionNode {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl From<Variable> for ExpressionNode {
    fn from(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}

impl From<Arc<Constant>> for ExpressionNode {
    fn from(constant: Arc<Constant>) -> Self {
        Self::Constant(constant)
    }
}

macro_rules! node_from {
    ($($kind:ident),* $(,)?) => {
        $(impl From<$kind> for ExpressionNode {
            fn from(node: $kind) -> Self {
                Self::$kind(node)
            }
        })*
    };
}

node_from!(
    Addition,
    Multiplication,
    Subtraction,
    Division,
    Exponentiation,
    Logarithm,
    NaturalLogarithm,
    ExponentialFunction,
    Sine,
    Comparison,
    IfThenElse,
);

impl ops::Add for ExpressionNode {
    type Output = ExpressionNode;

    fn add(self, rhs: Self) -> Self::Output {
        Addition::pair(self, rhs).into()
    }
}

impl ops::Sub for ExpressionNode {
    type Output = ExpressionNode;

    fn sub(self, rhs: Self) -> Self::Output {
        Subtraction::new(self, rhs).into()
    }
}

impl ops::Mul for ExpressionNode {
    type Output = ExpressionNode;

    fn mul(self, rhs: Self) -> Self::Output {
        Multiplication::pair(self, rhs).into()
    }
}

impl ops::Div for ExpressionNode {
    type Output = ExpressionNode;

    fn div(self, rhs: Self) -> Self::Output {
        Division::new(self, rhs).into()
    }
}

impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(node) => write!(f, "{node}"),
            Self::Variable(node) => write!(f, "{node}"),
            Self::Addition(node) => write!(f, "{node}"),
            Self::Multiplication(node) => write!(f, "{node}"),
            Self::Subtraction(node) => write!(f, "{node}"),
            Self::Division(node) => write!(f, "{node}"),
            Self::Exponentiation(node) => write!(f, "{node}"),
            Self::Logarithm(node) => write!(f, "{node}"),
            Self::NaturalLogarithm(node) => write!(f, "{node}"),
            Self::ExponentialFunction(node) => write!(f, "{node}"),
            Self::Sine(node) => write!(f, "{node}"),
            Self::Comparison(node) => write!(f, "{node}"),
            Self::IfThenElse(node) => write!(f, "{node}"),
        }
    }
}

fn write_joined(
    f: &mut fmt::Formatter<'_>,
    operands: &[ExpressionNode],
    separator: &str,
) -> fmt::Result {
    f.write_str("(")?;
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{operand}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Addition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.summands, " + ")
    }
}

impl fmt::Display for Multiplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.factors, " * ")
    }
}

impl fmt::Display for Subtraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} - {})", self.minuend, self.subtrahend)
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} / {})", self.dividend, self.divisor)
    }
}

impl fmt::Display for Exponentiation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} ^ {})", self.base, self.exponent)
    }
}

impl fmt::Display for Logarithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "log({}, {})", self.base, self.antilogarithm)
    }
}

impl fmt::Display for NaturalLogarithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ln({})", self.antilogarithm)
    }
}

impl fmt::Display for ExponentialFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exp({})", self.exponent)
    }
}

impl fmt::Display for Sine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sin({})", self.argument)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} < {})", self.smaller, self.greater)
    }
}

impl fmt::Display for IfThenElse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(if {} then {} else {})",
            self.condition, self.then_branch, self.else_branch
        )
    }
}
