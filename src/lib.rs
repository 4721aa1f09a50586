//! Arithmetic expression trees describing how a measured quantity depends
//! on input variables.
//!
//! # Why?
//!
//! Automated search over candidate formulas needs three things from its
//! expression representation: bit-for-bit reproducible IEEE-754 evaluation
//! against concrete variable values, structural equality that understands
//! commutativity (so equivalent candidates deduplicate in the knowledge
//! store), and a dispatch protocol external collaborators can extend
//! without touching the closed node set. Trees are immutable once built and
//! equal-valued constants share one flyweight instance, which keeps
//! identity checks cheap during repeated fitness evaluation.
//!
//! # Example
//!
//! ```rust
//! use scalar_expr::*;
//!
//! // (x + 3) ^ 2
//! let x = Variable::new("x").unwrap();
//! let formula: ExpressionNode = Exponentiation::new(
//!     ExpressionNode::variable(x.clone()) + ExpressionNode::constant(3.0),
//!     ExpressionNode::constant(2.0),
//! )
//! .into();
//!
//! let mut scenario = VariableAssignment::new();
//! scenario.set_value_for(x, 5.0);
//! assert_eq!(formula.evaluate(&scenario).unwrap(), 64.0);
//! assert_eq!(formula.to_string(), "((x + 3) ^ 2)");
//! ```

mod constant;
mod error;
mod evaluate;
mod expression;
mod variable;
mod visit;

#[cfg(test)]
mod proptests;

pub use constant::Constant;
pub use error::{ConstructionError, UndefinedVariableError};
pub use evaluate::COMPARISON_TRUE;
pub use expression::{
    Addition, Comparison, Division, Exponentiation, ExponentialFunction, ExpressionNode,
    IfThenElse, Logarithm, Multiplication, NaturalLogarithm, Sine, Subtraction,
};
pub use variable::{Variable, VariableAssignment};
pub use visit::{VariableCollector, Visitor};
