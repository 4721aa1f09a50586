//! Property-based tests for structural equality and IEEE-754 delegation.

#[cfg(test)]
mod tests {
    use std::hash::BuildHasher;
    use std::sync::Arc;

    use proptest::collection::vec;
    use proptest::prelude::*;
    use rustc_hash::FxBuildHasher;

    use crate::constant::canonical_bits;
    use crate::{
        Addition, Comparison, Constant, Division, Exponentiation, ExpressionNode, Logarithm,
        Multiplication, Sine, Subtraction, VariableAssignment, COMPARISON_TRUE,
    };

    fn fx_hash(node: &ExpressionNode) -> u64 {
        FxBuildHasher.hash_one(node)
    }

    fn constants(values: &[f64]) -> Vec<ExpressionNode> {
        values.iter().map(|v| ExpressionNode::constant(*v)).collect()
    }

    fn evaluated(node: impl Into<ExpressionNode>) -> f64 {
        node.into().evaluate(&VariableAssignment::new()).unwrap()
    }

    // Strategy for a small operand list and a shuffled copy of it.
    fn permuted_values() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        vec(any::<f64>(), 2..6)
            .prop_flat_map(|values| (Just(values.clone()), Just(values).prop_shuffle()))
    }

    // NaN payloads may differ between an interned constant and the raw
    // operand, so expected results compare through the same canonical bits
    // structural equality uses.
    fn assert_same_double(actual: f64, expected: f64) -> Result<(), TestCaseError> {
        prop_assert_eq!(canonical_bits(actual), canonical_bits(expected));
        Ok(())
    }

    proptest! {
        // Commutative equality and hashing

        #[test]
        fn addition_equality_ignores_operand_order(
            (original, shuffled) in permuted_values()
        ) {
            let lhs: ExpressionNode = Addition::new(constants(&original)).unwrap().into();
            let rhs: ExpressionNode = Addition::new(constants(&shuffled)).unwrap().into();
            prop_assert_eq!(&lhs, &rhs);
            prop_assert_eq!(fx_hash(&lhs), fx_hash(&rhs));
        }

        #[test]
        fn multiplication_equality_ignores_operand_order(
            (original, shuffled) in permuted_values()
        ) {
            let lhs: ExpressionNode = Multiplication::new(constants(&original)).unwrap().into();
            let rhs: ExpressionNode = Multiplication::new(constants(&shuffled)).unwrap().into();
            prop_assert_eq!(&lhs, &rhs);
            prop_assert_eq!(fx_hash(&lhs), fx_hash(&rhs));
        }

        // IEEE-754 delegation: each operator matches the platform double op

        #[test]
        fn subtraction_delegates_to_ieee(a in any::<f64>(), b in any::<f64>()) {
            assert_same_double(evaluated(Subtraction::new(a.into(), b.into())), a - b)?;
        }

        #[test]
        fn division_delegates_to_ieee(a in any::<f64>(), b in any::<f64>()) {
            assert_same_double(evaluated(Division::new(a.into(), b.into())), a / b)?;
        }

        #[test]
        fn exponentiation_delegates_to_ieee_pow(a in any::<f64>(), b in any::<f64>()) {
            assert_same_double(evaluated(Exponentiation::new(a.into(), b.into())), a.powf(b))?;
        }

        #[test]
        fn logarithm_is_the_ln_ratio(a in any::<f64>(), b in any::<f64>()) {
            assert_same_double(evaluated(Logarithm::new(a.into(), b.into())), b.ln() / a.ln())?;
        }

        #[test]
        fn sine_delegates_to_ieee(a in any::<f64>()) {
            assert_same_double(evaluated(Sine::new(a.into())), a.sin())?;
        }

        #[test]
        fn addition_evaluates_to_the_running_sum(values in vec(-1.0e6..1.0e6, 2..8)) {
            let total = evaluated(Addition::new(constants(&values)).unwrap());
            let expected = values.iter().fold(0.0, |acc, v| acc + v);
            prop_assert_eq!(total.to_bits(), expected.to_bits());
        }

        #[test]
        fn comparison_is_nonzero_iff_strictly_less(a in any::<f64>(), b in any::<f64>()) {
            let result = evaluated(Comparison::new(a.into(), b.into()));
            if a < b {
                prop_assert_eq!(result, COMPARISON_TRUE);
            } else {
                prop_assert_eq!(result, 0.0);
            }
        }

        // Flyweight cache

        #[test]
        fn constant_interning_returns_one_instance(value in any::<f64>()) {
            let first = Constant::for_value(value);
            let second = Constant::for_value(value);
            prop_assert!(Arc::ptr_eq(&first, &second));
            prop_assert_eq!(&first, &second);
        }
    }
}
