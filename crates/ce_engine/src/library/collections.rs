//! Containers, structural heads, big operators and control heads.

use super::signatures::ANY2;
use crate::canonical::forms;
use crate::definitions::{Codomain, FunctionDef, Hold, Signature};
use crate::domain::Domain;
use crate::eval::{logic, sum};

pub(super) fn definitions() -> Vec<FunctionDef> {
    let any = Signature::ANY;
    vec![
        FunctionDef::new("Set", any, Codomain::Fixed(Domain::Set))
            .complexity(10_000)
            .canonical(forms::set),
        FunctionDef::new("List", any, Codomain::Fixed(Domain::List)).complexity(10_100),
        FunctionDef::new("Tuple", any, Codomain::Fixed(Domain::Tuple)).complexity(10_200),
        FunctionDef::new("Sequence", any, Codomain::Fixed(Domain::Anything))
            .complexity(10_300)
            .canonical(forms::sequence),
        FunctionDef::new("Delimiter", any, Codomain::Fixed(Domain::Anything))
            .complexity(10_400)
            .canonical(forms::delimiter),
        FunctionDef::new("Triple", any, Codomain::Fixed(Domain::Tuple)).complexity(10_500),
        FunctionDef::new("Subscript", Signature::fixed(ANY2), Codomain::Fixed(Domain::Anything))
            .complexity(1100)
            .canonical(forms::subscript),
        FunctionDef::new("Matrix", any, Codomain::Fixed(Domain::List)).complexity(10_600),
        FunctionDef::new("Piecewise", any, Codomain::Fixed(Domain::Anything))
            .hold(Hold::All)
            .complexity(10_700)
            .evaluate(logic::piecewise),
        FunctionDef::new("Sum", Signature::fixed(ANY2), Codomain::Fixed(Domain::Number))
            .hold(Hold::All)
            .complexity(6500)
            .evaluate(sum::sum),
        FunctionDef::new("Product", Signature::fixed(ANY2), Codomain::Fixed(Domain::Number))
            .hold(Hold::All)
            .complexity(6600)
            .evaluate(sum::product),
        FunctionDef::new("Hold", any, Codomain::Fixed(Domain::Anything))
            .hold(Hold::All)
            .complexity(20_000),
        FunctionDef::new("Error", any, Codomain::Fixed(Domain::Nothing))
            .hold(Hold::All)
            .complexity(30_000),
        FunctionDef::new("ErrorCode", any, Codomain::Fixed(Domain::Anything))
            .hold(Hold::All)
            .complexity(30_000),
    ]
}
