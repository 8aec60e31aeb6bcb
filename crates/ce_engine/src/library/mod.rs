//! The built-in catalog: one [`FunctionDef`] per [`Builtin`] head and the
//! library constants.
//!
//! The library is built once per process and shared read-only by every
//! engine.

mod arithmetic;
mod collections;
mod constants;
mod relational;
mod trigonometry;

use std::sync::{Arc, LazyLock};

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::builtin::Builtin;
use crate::definitions::{Codomain, ConstantDef, FunctionDef, Signature};
use crate::domain::Domain;

pub(crate) mod signatures {
    use crate::domain::Domain;

    pub const NUMBER: &[Domain] = &[Domain::Number];
    pub const NUMBER2: &[Domain] = &[Domain::Number, Domain::Number];
    pub const ANY2: &[Domain] = &[Domain::Anything, Domain::Anything];
    pub const BOOLEAN: &[Domain] = &[Domain::Boolean];
    pub const BOOLEAN2: &[Domain] = &[Domain::Boolean, Domain::Boolean];
}

static SHARED: LazyLock<Arc<Library>> = LazyLock::new(|| Arc::new(Library::build()));

#[derive(Debug)]
pub struct Library {
    /// Indexed by `Builtin as usize`.
    functions: Vec<FunctionDef>,
    constants: FxHashMap<&'static str, ConstantDef>,
}

impl Library {
    pub fn shared() -> &'static Library {
        &SHARED
    }

    pub fn shared_arc() -> Arc<Library> {
        Arc::clone(&SHARED)
    }

    fn build() -> Self {
        let mut by_head: FxHashMap<Builtin, FunctionDef> = FxHashMap::default();
        let defs = arithmetic::definitions()
            .into_iter()
            .chain(trigonometry::definitions())
            .chain(relational::definitions())
            .chain(collections::definitions());
        for def in defs {
            match Builtin::from_name(def.name) {
                Some(builtin) => {
                    by_head.insert(builtin, def);
                }
                None => warn!(name = def.name, "library definition for an unknown head"),
            }
        }
        let functions = Builtin::ALL
            .iter()
            .map(|builtin| {
                by_head.remove(builtin).unwrap_or_else(|| {
                    FunctionDef::new(builtin.name(), Signature::ANY, Codomain::Fixed(Domain::Anything))
                })
            })
            .collect();
        let constants = constants::definitions()
            .into_iter()
            .map(|def| (def.name, def))
            .collect();
        Self { functions, constants }
    }

    pub fn function(&self, builtin: Builtin) -> &FunctionDef {
        &self.functions[builtin as usize]
    }

    pub fn constant(&self, name: &str) -> Option<&ConstantDef> {
        self.constants.get(name)
    }

    pub fn constants(&self) -> impl Iterator<Item = &ConstantDef> {
        self.constants.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_has_a_definition() {
        let library = Library::shared();
        for builtin in Builtin::ALL {
            assert_eq!(library.function(*builtin).name, builtin.name());
        }
    }

    #[test]
    fn test_flags() {
        let library = Library::shared();
        let add = library.function(Builtin::Add);
        assert!(add.flags.associative && add.flags.commutative && add.flags.threadable);
        assert!(!library.function(Builtin::Subtract).flags.commutative);
        assert!(library.function(Builtin::Or).flags.idempotent);
        assert!(library.function(Builtin::Sum).hold.holds(0));
    }

    #[test]
    fn test_constants() {
        let library = Library::shared();
        assert_eq!(library.constant("Pi").map(|c| c.domain), Some(Domain::RealNumber));
        assert_eq!(library.constant("True").map(|c| c.domain), Some(Domain::Boolean));
        assert!(library.constant("x").is_none());
    }
}
