//! Recursive IEEE-754 evaluation of expression trees.

use crate::error::UndefinedVariableError;
use crate::expression::ExpressionNode;
use crate::variable::VariableAssignment;

#[cfg(feature = "rayon")]
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};

/// The nonzero sentinel a [`Comparison`](crate::Comparison) node yields
/// when its strict ordering holds. Callers must only rely on it being
/// nonzero, not on its magnitude.
pub const COMPARISON_TRUE: f64 = 1.0;

impl ExpressionNode {
    /// Evaluates the tree against `assignment`.
    ///
    /// Operands are always evaluated before their parent combines them,
    /// each with the same `assignment`, so every variable in the tree must
    /// be bound, including those in the untaken branch of an `IfThenElse`.
    /// Every arithmetic step delegates to the platform's IEEE-754 double
    /// operations, NaN and infinity cases included, which keeps results
    /// bit-for-bit reproducible for the fitness machinery built on top.
    pub fn evaluate(
        &self,
        assignment: &VariableAssignment,
    ) -> Result<f64, UndefinedVariableError> {
        match self {
            Self::Constant(node) => Ok(node.value()),
            Self::Variable(variable) => assignment.get_value_for(variable).ok_or_else(|| {
                UndefinedVariableError::new(variable.clone(), assignment.clone())
            }),
            Self::Addition(node) => {
                fold_operands(node.summands(), assignment, 0.0, |acc, x| acc + x)
            }
            Self::Multiplication(node) => {
                fold_operands(node.factors(), assignment, 1.0, |acc, x| acc * x)
            }
            Self::Subtraction(node) => {
                let minuend = node.minuend().evaluate(assignment)?;
                let subtrahend = node.subtrahend().evaluate(assignment)?;
                Ok(minuend - subtrahend)
            }
            Self::Division(node) => {
                let dividend = node.dividend().evaluate(assignment)?;
                let divisor = node.divisor().evaluate(assignment)?;
                Ok(dividend / divisor)
            }
            Self::Exponentiation(node) => {
                let base = node.base().evaluate(assignment)?;
                let exponent = node.exponent().evaluate(assignment)?;
                Ok(base.powf(exponent))
            }
            Self::Logarithm(node) => {
                let base = node.base().evaluate(assignment)?;
                let antilogarithm = node.antilogarithm().evaluate(assignment)?;
                Ok(antilogarithm.ln() / base.ln())
            }
            Self::NaturalLogarithm(node) => Ok(node.antilogarithm().evaluate(assignment)?.ln()),
            Self::ExponentialFunction(node) => Ok(node.exponent().evaluate(assignment)?.exp()),
            Self::Sine(node) => Ok(node.argument().evaluate(assignment)?.sin()),
            Self::Comparison(node) => {
                let smaller = node.smaller().evaluate(assignment)?;
                let greater = node.greater().evaluate(assignment)?;
                // Strict less-than; any NaN operand fails the test.
                Ok(if smaller < greater {
                    COMPARISON_TRUE
                } else {
                    0.0
                })
            }
            Self::IfThenElse(node) => {
                let condition = node.condition().evaluate(assignment)?;
                let then_value = node.then_branch().evaluate(assignment)?;
                let else_value = node.else_branch().evaluate(assignment)?;
                // IEEE-754 inequality: NaN != 0 holds, so NaN selects then.
                Ok(if condition != 0.0 { then_value } else { else_value })
            }
        }
    }

    /// Evaluates the same tree against many assignments, producing one
    /// result per scenario and stopping at the first undefined variable.
    ///
    /// With the `rayon` feature enabled the scenarios are evaluated in
    /// parallel; trees are immutable, so sharing them across worker threads
    /// needs no locking.
    pub fn evaluate_batch(
        &self,
        assignments: &[VariableAssignment],
    ) -> Result<Vec<f64>, UndefinedVariableError> {
        #[cfg(feature = "rayon")]
        {
            assignments
                .par_iter()
                .map(|assignment| self.evaluate(assignment))
                .collect()
        }
        #[cfg(not(feature = "rayon"))]
        {
            assignments
                .iter()
                .map(|assignment| self.evaluate(assignment))
                .collect()
        }
    }
}

fn fold_operands(
    operands: &[ExpressionNode],
    assignment: &VariableAssignment,
    identity: f64,
    combine: fn(f64, f64) -> f64,
) -> Result<f64, UndefinedVariableError> {
    operands.iter().try_fold(identity, |acc, operand| {
        Ok(combine(acc, operand.evaluate(assignment)?))
    })
}
