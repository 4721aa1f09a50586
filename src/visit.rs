//! Double-dispatch traversal over the closed node set.
//!
//! [`Visitor`] declares one hook per concrete node kind and
//! [`ExpressionNode::receive`] invokes the hook matching the node's own
//! kind, passing the concrete node. Default hook bodies walk into child
//! operands in construction order, so a visitor overrides only the kinds it
//! cares about. This is the supported way for external collaborators
//! (serializers, converters, fitness scorers) to attach variant-specific
//! logic without matching on the enum themselves.

use rustc_hash::FxHashSet;

use crate::constant::Constant;
use crate::expression::{
    Addition, Comparison, Division, Exponentiation, ExponentialFunction, ExpressionNode,
    IfThenElse, Logarithm, Multiplication, NaturalLogarithm, Sine, Subtraction,
};
use crate::variable::Variable;

/// One dispatch operation per concrete node kind.
pub trait Visitor {
    /// A constant leaf. No children; the default does nothing.
    fn visit_constant(&mut self, _constant: &Constant) {}

    /// A variable leaf. No children; the default does nothing.
    fn visit_variable(&mut self, _variable: &Variable) {}

    fn visit_addition(&mut self, addition: &Addition) {
        for summand in addition.summands() {
            summand.receive(self);
        }
    }

    fn visit_multiplication(&mut self, multiplication: &Multiplication) {
        for factor in multiplication.factors() {
            factor.receive(self);
        }
    }

    fn visit_subtraction(&mut self, subtraction: &Subtraction) {
        subtraction.minuend().receive(self);
        subtraction.subtrahend().receive(self);
    }

    fn visit_division(&mut self, division: &Division) {
        division.dividend().receive(self);
        division.divisor().receive(self);
    }

    fn visit_exponentiation(&mut self, exponentiation: &Exponentiation) {
        exponentiation.base().receive(self);
        exponentiation.exponent().receive(self);
    }

    fn visit_logarithm(&mut self, logarithm: &Logarithm) {
        logarithm.base().receive(self);
        logarithm.antilogarithm().receive(self);
    }

    fn visit_natural_logarithm(&mut self, natural_logarithm: &NaturalLogarithm) {
        natural_logarithm.antilogarithm().receive(self);
    }

    fn visit_exponential_function(&mut self, exponential_function: &ExponentialFunction) {
        exponential_function.exponent().receive(self);
    }

    fn visit_sine(&mut self, sine: &Sine) {
        sine.argument().receive(self);
    }

    fn visit_comparison(&mut self, comparison: &Comparison) {
        comparison.smaller().receive(self);
        comparison.greater().receive(self);
    }

    fn visit_if_then_else(&mut self, if_then_else: &IfThenElse) {
        if_then_else.condition().receive(self);
        if_then_else.then_branch().receive(self);
        if_then_else.else_branch().receive(self);
    }
}

impl ExpressionNode {
    /// Dispatches `visitor` to the operation matching this node's kind.
    pub fn receive<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Self::Constant(node) => visitor.visit_constant(node),
            Self::Variable(node) => visitor.visit_variable(node),
            Self::Addition(node) => visitor.visit_addition(node),
            Self::Multiplication(node) => visitor.visit_multiplication(node),
            Self::Subtraction(node) => visitor.visit_subtraction(node),
            Self::Division(node) => visitor.visit_division(node),
            Self::Exponentiation(node) => visitor.visit_exponentiation(node),
            Self::Logarithm(node) => visitor.visit_logarithm(node),
            Self::NaturalLogarithm(node) => visitor.visit_natural_logarithm(node),
            Self::ExponentialFunction(node) => visitor.visit_exponential_function(node),
            Self::Sine(node) => visitor.visit_sine(node),
            Self::Comparison(node) => visitor.visit_comparison(node),
            Self::IfThenElse(node) => visitor.visit_if_then_else(node),
        }
    }

    /// The set of distinct variables the tree references.
    pub fn variables(&self) -> FxHashSet<Variable> {
        let mut collector = VariableCollector::new();
        self.receive(&mut collector);
        collector.into_variables()
    }
}

/// Collects every distinct variable referenced anywhere in a tree, relying
/// on the default traversal to reach nested operands.
#[derive(Debug, Default)]
pub struct VariableCollector {
    variables: FxHashSet<Variable>,
}

impl VariableCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The distinct variables seen so far.
    pub fn into_variables(self) -> FxHashSet<Variable> {
        self.variables
    }
}

impl Visitor for VariableCollector {
    fn visit_variable(&mut self, variable: &Variable) {
        self.variables.insert(variable.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> ExpressionNode {
        ExpressionNode::variable(Variable::new(name).unwrap())
    }

    /// Records which hook fired, without walking children.
    #[derive(Default)]
    struct KindRecorder {
        seen: Vec<&'static str>,
    }

    impl Visitor for KindRecorder {
        fn visit_constant(&mut self, _: &Constant) {
            self.seen.push("constant");
        }
        fn visit_variable(&mut self, _: &Variable) {
            self.seen.push("variable");
        }
        fn visit_addition(&mut self, _: &Addition) {
            self.seen.push("addition");
        }
        fn visit_multiplication(&mut self, _: &Multiplication) {
            self.seen.push("multiplication");
        }
        fn visit_subtraction(&mut self, _: &Subtraction) {
            self.seen.push("subtraction");
        }
        fn visit_division(&mut self, _: &Division) {
            self.seen.push("division");
        }
        fn visit_exponentiation(&mut self, _: &Exponentiation) {
            self.seen.push("exponentiation");
        }
        fn visit_logarithm(&mut self, _: &Logarithm) {
            self.seen.push("logarithm");
        }
        fn visit_natural_logarithm(&mut self, _: &NaturalLogarithm) {
            self.seen.push("natural_logarithm");
        }
        fn visit_exponential_function(&mut self, _: &ExponentialFunction) {
            self.seen.push("exponential_function");
        }
        fn visit_sine(&mut self, _: &Sine) {
            self.seen.push("sine");
        }
        fn visit_comparison(&mut self, _: &Comparison) {
            self.seen.push("comparison");
        }
        fn visit_if_then_else(&mut self, _: &IfThenElse) {
            self.seen.push("if_then_else");
        }
    }

    #[test]
    fn receive_dispatches_to_the_matching_hook() {
        let nodes: Vec<(ExpressionNode, &str)> = vec![
            (4.0.into(), "constant"),
            (var("x"), "variable"),
            (Addition::pair(var("x"), var("y")).into(), "addition"),
            (
                Multiplication::pair(var("x"), var("y")).into(),
                "multiplication",
            ),
            (Subtraction::new(var("x"), var("y")).into(), "subtraction"),
            (Division::new(var("x"), var("y")).into(), "division"),
            (
                Exponentiation::new(var("x"), var("y")).into(),
                "exponentiation",
            ),
            (Logarithm::new(var("x"), var("y")).into(), "logarithm"),
            (
                NaturalLogarithm::new(var("x")).into(),
                "natural_logarithm",
            ),
            (
                ExponentialFunction::new(var("x")).into(),
                "exponential_function",
            ),
            (Sine::new(var("x")).into(), "sine"),
            (Comparison::new(var("x"), var("y")).into(), "comparison"),
            (
                IfThenElse::new(var("c"), var("t"), var("e")).into(),
                "if_then_else",
            ),
        ];

        for (node, expected) in nodes {
            let mut recorder = KindRecorder::default();
            node.receive(&mut recorder);
            assert_eq!(recorder.seen, vec![expected]);
        }
    }

    /// Counts leaves through the default traversal only.
    #[derive(Default)]
    struct LeafCounter {
        constants: usize,
        variables: usize,
    }

    impl Visitor for LeafCounter {
        fn visit_constant(&mut self, _: &Constant) {
            self.constants += 1;
        }
        fn visit_variable(&mut self, _: &Variable) {
            self.variables += 1;
        }
    }

    #[test]
    fn default_hooks_walk_every_descendant() {
        // (if (x < 2) then ln(x) else (x ^ y) + 1)
        let tree: ExpressionNode = IfThenElse::new(
            Comparison::new(var("x"), 2.0.into()).into(),
            NaturalLogarithm::new(var("x")).into(),
            ExpressionNode::from(Exponentiation::new(var("x"), var("y"))) + 1.0.into(),
        )
        .into();

        let mut counter = LeafCounter::default();
        tree.receive(&mut counter);
        assert_eq!(counter.constants, 2);
        assert_eq!(counter.variables, 4);
    }

    #[test]
    fn collector_gathers_nested_variables_once() {
        let tree = (var("x") + var("y")) * var("x") - 3.0.into();
        let variables = tree.variables();
        assert_eq!(variables.len(), 2);
        assert!(variables.contains(&Variable::new("x").unwrap()));
        assert!(variables.contains(&Variable::new("y").unwrap()));

        assert!(ExpressionNode::constant(1.0).variables().is_empty());
    }

    #[test]
    fn receive_works_through_a_trait_object() {
        let tree = var("x") + 1.0.into();
        let mut collector = VariableCollector::new();
        let dynamic: &mut dyn Visitor = &mut collector;
        tree.receive(dynamic);
        assert_eq!(collector.into_variables().len(), 1);
    }
}
