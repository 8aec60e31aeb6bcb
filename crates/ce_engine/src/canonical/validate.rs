use ce_ast::ErrorCode;

use crate::boxed::{BoxedExpr, SymbolRef};
use crate::definitions::FunctionDef;
use crate::domain::Domain;
use crate::scope::ScopeId;

fn domain_symbol(domain: Domain) -> BoxedExpr {
    BoxedExpr::symbol(SymbolRef::new(domain.name(), ScopeId::GLOBAL), None)
}

/// Check operands against the head's signature. Offending operands are
/// replaced in place by error nodes wrapping them; missing required
/// operands are appended as `Error(missing)`.
pub(super) fn check_signature(def: &FunctionDef, ops: Vec<BoxedExpr>) -> Vec<BoxedExpr> {
    let signature = &def.signature;
    let count = ops.len();
    let mut checked: Vec<BoxedExpr> = ops
        .into_iter()
        .enumerate()
        .map(|(position, op)| {
            if op.is_error() {
                return op;
            }
            match signature.expected(position) {
                None => BoxedExpr::error(ErrorCode::UnexpectedArgument, vec![], Some(op)),
                Some(expected) => {
                    let actual = op.domain();
                    let threaded = def.flags.threadable && actual.is_subdomain_of(Domain::Collection);
                    if threaded || actual.is_compatible(expected) {
                        op
                    } else {
                        BoxedExpr::error(
                            ErrorCode::IncompatibleDomain,
                            vec![domain_symbol(expected), domain_symbol(actual)],
                            Some(op),
                        )
                    }
                }
            }
        })
        .collect();
    for _ in count..signature.min_arity() {
        checked.push(BoxedExpr::error(ErrorCode::Missing, vec![], None));
    }
    checked
}
