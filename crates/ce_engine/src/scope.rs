//! Lexical scopes.
//!
//! Scopes form a parent-owning tree: a child holds an `Rc` to its parent,
//! never the other way round. Expressions refer to the scope they were
//! boxed in by [`ScopeId`] only; the [`ScopeRegistry`] maps ids to weak
//! handles so a reference to a popped scope is detected instead of kept
//! alive.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::definitions::{SymbolDef, UserFunction};
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);

    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum Binding {
    Symbol(SymbolDef),
    Function(Rc<UserFunction>),
}

#[derive(Debug)]
pub struct Scope {
    id: ScopeId,
    parent: Option<Rc<Scope>>,
    bindings: RefCell<FxHashMap<String, Binding>>,
}

impl Scope {
    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn parent(&self) -> Option<&Rc<Scope>> {
        self.parent.as_ref()
    }

    pub fn declare(&self, name: &str, binding: Binding) {
        self.bindings.borrow_mut().insert(name.to_string(), binding);
    }

    /// Binding in this frame only.
    pub fn get(&self, name: &str) -> Option<Binding> {
        self.bindings.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    /// Update a symbol binding in place. Returns `false` when this frame
    /// has no symbol of that name.
    pub fn update_symbol(&self, name: &str, update: impl FnOnce(&mut SymbolDef)) -> bool {
        match self.bindings.borrow_mut().get_mut(name) {
            Some(Binding::Symbol(def)) => {
                update(def);
                true
            }
            _ => false,
        }
    }

    /// Walk innermost to outermost and return the first binding of `name`.
    pub fn lookup(self: &Rc<Self>, name: &str) -> Option<(ScopeId, Binding)> {
        let mut scope = Some(self);
        while let Some(frame) = scope {
            if let Some(binding) = frame.get(name) {
                return Some((frame.id, binding));
            }
            scope = frame.parent.as_ref();
        }
        None
    }

    /// Whether `ancestor` is this scope or one of its parents.
    pub fn descends_from(&self, ancestor: ScopeId) -> bool {
        let mut scope = Some(self);
        while let Some(frame) = scope {
            if frame.id == ancestor {
                return true;
            }
            scope = frame.parent.as_deref();
        }
        false
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.parent.as_deref();
        while let Some(frame) = scope {
            depth += 1;
            scope = frame.parent.as_deref();
        }
        depth
    }
}

/// Owns the global scope and the current scope chain of one engine.
#[derive(Debug)]
pub struct ScopeRegistry {
    global: Rc<Scope>,
    current: RefCell<Rc<Scope>>,
    live: RefCell<FxHashMap<ScopeId, Weak<Scope>>>,
    next_id: Cell<u32>,
}

impl Default for ScopeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeRegistry {
    pub fn new() -> Self {
        let global = Rc::new(Scope {
            id: ScopeId::GLOBAL,
            parent: None,
            bindings: RefCell::default(),
        });
        let mut live = FxHashMap::default();
        live.insert(ScopeId::GLOBAL, Rc::downgrade(&global));
        Self {
            current: RefCell::new(Rc::clone(&global)),
            global,
            live: RefCell::new(live),
            next_id: Cell::new(1),
        }
    }

    pub fn global(&self) -> &Rc<Scope> {
        &self.global
    }

    pub fn current(&self) -> Rc<Scope> {
        Rc::clone(&self.current.borrow())
    }

    pub fn current_id(&self) -> ScopeId {
        self.current.borrow().id
    }

    /// Enter a child of the current scope.
    pub fn push(&self) -> ScopeId {
        let id = ScopeId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let scope = Rc::new(Scope {
            id,
            parent: Some(self.current()),
            bindings: RefCell::default(),
        });
        self.live.borrow_mut().insert(id, Rc::downgrade(&scope));
        *self.current.borrow_mut() = scope;
        trace!(scope = %id, "push scope");
        id
    }

    /// Leave the current scope. Its bindings are dropped with it.
    pub fn pop(&self) -> Result<ScopeId, EngineError> {
        let current = self.current();
        let Some(parent) = current.parent.clone() else {
            return Err(EngineError::GlobalScopePop);
        };
        let id = current.id;
        *self.current.borrow_mut() = parent;
        self.live.borrow_mut().remove(&id);
        trace!(scope = %id, "pop scope");
        Ok(id)
    }

    /// The scope with `id`, if it is still alive.
    pub fn get(&self, id: ScopeId) -> Result<Rc<Scope>, EngineError> {
        self.live
            .borrow()
            .get(&id)
            .and_then(Weak::upgrade)
            .ok_or(EngineError::ScopeDestroyed(id))
    }

    pub fn is_alive(&self, id: ScopeId) -> bool {
        self.get(id).is_ok()
    }
}
