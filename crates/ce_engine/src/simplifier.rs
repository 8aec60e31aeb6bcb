//! The `simplify` tier: a bottom-up walk applying local rewrite rules.
//!
//! Rules are indexed by the built-in head they target; rules without
//! targets are tried on every node. Every rewrite is exact, so simplify
//! never loses information: when no rule applies the input is returned
//! unchanged.

use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::boxed::{BoxedExpr, ExprKind, Head};
use crate::builtin::Builtin;
use crate::eval::Evaluator;
use crate::rule::Rule;

/// Passes of the local rewrite loop before giving up on a fixpoint.
const MAX_LOCAL_PASSES: usize = 16;

pub struct Simplifier {
    rules: FxHashMap<Builtin, Vec<Rc<dyn Rule>>>,
    global_rules: Vec<Rc<dyn Rule>>,
    disabled_rules: FxHashSet<String>,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

impl Simplifier {
    /// A simplifier without any rule.
    pub fn new() -> Self {
        Self {
            rules: FxHashMap::default(),
            global_rules: Vec::new(),
            disabled_rules: FxHashSet::default(),
        }
    }

    pub fn with_default_rules() -> Self {
        let mut s = Self::new();
        s.register_default_rules();
        s
    }

    pub fn register_default_rules(&mut self) {
        use crate::rules::*;

        arithmetic::register(self);
        exponents::register(self);
        logarithms::register(self);
        trigonometry::register(self);
        logic::register(self);
    }

    pub fn add_rule(&mut self, rule: Box<dyn Rule>) {
        let rule_rc: Rc<dyn Rule> = rule.into();

        if let Some(targets) = rule_rc.targets() {
            for target in targets {
                self.rules.entry(*target).or_default().push(rule_rc.clone());
            }
        } else {
            self.global_rules.push(rule_rc);
        }
    }

    pub fn disable_rule(&mut self, rule_name: &str) {
        self.disabled_rules.insert(rule_name.to_string());
    }

    pub fn enable_rule(&mut self, rule_name: &str) {
        self.disabled_rules.remove(rule_name);
    }

    pub fn get_all_rule_names(&self) -> Vec<String> {
        let mut names: FxHashSet<&str> = self.global_rules.iter().map(|r| r.name()).collect();
        for rules in self.rules.values() {
            names.extend(rules.iter().map(|r| r.name()));
        }
        let mut sorted: Vec<String> = names.into_iter().map(str::to_string).collect();
        sorted.sort();
        sorted
    }

    fn candidates(&self, expr: &BoxedExpr) -> Vec<Rc<dyn Rule>> {
        let targeted = expr
            .builtin()
            .and_then(|b| self.rules.get(&b))
            .into_iter()
            .flatten();
        targeted
            .chain(self.global_rules.iter())
            .filter(|rule| !self.disabled_rules.contains(rule.name()))
            .cloned()
            .collect()
    }

    /// Rewrite a single node to a fixpoint; children are left alone.
    pub fn simplify_local(&self, ev: &mut Evaluator<'_>, expr: &BoxedExpr) -> BoxedExpr {
        let mut current = expr.clone();
        for _ in 0..MAX_LOCAL_PASSES {
            if matches!(current.kind(), ExprKind::Number(_) | ExprKind::String(_)) || current.is_error() {
                return current;
            }
            let rewrite = self
                .candidates(&current)
                .iter()
                .find_map(|rule| rule.apply(ev, &current).map(|r| (rule.name().to_string(), r)));
            match rewrite {
                Some((rule, rewrite)) if rewrite.new_expr != current => {
                    trace!(%rule, before = %current, after = %rewrite.new_expr, "{}", rewrite.description);
                    current = rewrite.new_expr;
                }
                _ => return current,
            }
        }
        debug!(expr = %current, "local simplification did not reach a fixpoint");
        current
    }

    /// Simplify operands first, then the node itself. `Hold` and error
    /// nodes are left as they are.
    pub fn simplify(&self, ev: &mut Evaluator<'_>, expr: &BoxedExpr) -> BoxedExpr {
        let ExprKind::Function(head, ops) = expr.kind() else {
            return self.simplify_local(ev, expr);
        };
        if matches!(head, Head::Builtin(Builtin::Hold | Builtin::Error | Builtin::ErrorCode)) {
            return expr.clone();
        }
        let simplified: Vec<BoxedExpr> = ops.iter().map(|op| self.simplify(ev, op)).collect();
        let rebuilt = if simplified.iter().zip(ops).all(|(new, old)| new.ptr_eq(old)) {
            expr.clone()
        } else {
            ev.boxer().apply_head(head.clone(), simplified)
        };
        self.simplify_local(ev, &rebuilt)
    }
}
