//! Chained binding environments.
//!
//! A [`Scope`] is one node of a lexical scope chain: an ordered local map
//! from [`Name`] to some bound value `V`, plus an optional parent link. The
//! analyzer binds types, the evaluator binds runtime values; both share this
//! implementation through [`SharedScope`], a cheap `Rc<RefCell>` handle.
//!
//! Contract (identical for both engines):
//! - `define` never consults the parent; redefining a name in the *same*
//!   scope is an error, shadowing an ancestor's name is not.
//! - `resolve` searches the local map, then (unless `local_only`) the parent
//!   chain, innermost first.
//! - `assign` overwrites the nearest existing binding, climbing the chain.
//! - `flatten` merges ancestors first, local entries overriding, preserving
//!   first-definition order.
//!
//! A scope lives as long as its longest holder: closures keep their defining
//! scope alive by cloning the handle.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::map::Entry;
use indexmap::IndexMap;
use rill_ir::Name;
use rustc_hash::FxBuildHasher;

/// Ordered name -> value map with the scope's observable iteration order.
pub type Bindings<V> = IndexMap<Name, V, FxBuildHasher>;

/// Failure modes of scope mutation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeError {
    /// `define` on a name already present in this scope.
    AlreadyDefined(Name),
    /// `assign` on a name no scope in the chain binds.
    Unbound(Name),
}

/// One node of a scope chain.
pub struct Scope<V> {
    bindings: Bindings<V>,
    parent: Option<SharedScope<V>>,
}

/// Shared handle to a [`Scope`] node.
///
/// Cloning the handle shares the node; child scopes hold their parent through
/// this handle, and closures keep captured environments alive the same way.
#[repr(transparent)]
pub struct SharedScope<V>(Rc<RefCell<Scope<V>>>);

impl<V> Clone for SharedScope<V> {
    fn clone(&self) -> Self {
        SharedScope(Rc::clone(&self.0))
    }
}

impl<V> SharedScope<V> {
    /// Create a parentless root scope.
    pub fn root() -> Self {
        SharedScope(Rc::new(RefCell::new(Scope {
            bindings: Bindings::default(),
            parent: None,
        })))
    }

    /// Create a child scope whose lookups fall back to `parent`.
    pub fn child_of(parent: &SharedScope<V>) -> Self {
        SharedScope(Rc::new(RefCell::new(Scope {
            bindings: Bindings::default(),
            parent: Some(parent.clone()),
        })))
    }

    /// The parent link, if any.
    pub fn parent(&self) -> Option<SharedScope<V>> {
        self.0.borrow().parent.clone()
    }

    /// Whether two handles refer to the same scope node.
    pub fn ptr_eq(&self, other: &SharedScope<V>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Bind `name` locally. Never consults the parent.
    pub fn define(&self, name: Name, value: V) -> Result<(), ScopeError> {
        match self.0.borrow_mut().bindings.entry(name) {
            Entry::Occupied(_) => Err(ScopeError::AlreadyDefined(name)),
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Whether `name` is bound in this scope node itself.
    pub fn is_defined_local(&self, name: Name) -> bool {
        self.0.borrow().bindings.contains_key(&name)
    }

    /// Overwrite the nearest existing binding of `name`, climbing the chain.
    pub fn assign(&self, name: Name, value: V) -> Result<(), ScopeError> {
        let parent = {
            let mut scope = self.0.borrow_mut();
            if let Entry::Occupied(mut slot) = scope.bindings.entry(name) {
                slot.insert(value);
                return Ok(());
            }
            scope.parent.clone()
        };
        match parent {
            Some(parent) => parent.assign(name, value),
            None => Err(ScopeError::Unbound(name)),
        }
    }
}

impl<V: Clone> SharedScope<V> {
    /// Look up `name`, innermost scope first.
    pub fn resolve(&self, name: Name, local_only: bool) -> Option<V> {
        let scope = self.0.borrow();
        if let Some(value) = scope.bindings.get(&name) {
            return Some(value.clone());
        }
        if local_only {
            return None;
        }
        scope.parent.as_ref().and_then(|p| p.resolve(name, false))
    }

    /// Merge the chain into one map: ancestors first, local entries override.
    ///
    /// With `local_only`, only this node's bindings are returned. Order is
    /// first-definition order, which makes flattening deterministic for
    /// display and order-insensitive for equality (`IndexMap` equality
    /// ignores order).
    pub fn flatten(&self, local_only: bool) -> Bindings<V> {
        let scope = self.0.borrow();
        let mut merged = if local_only {
            Bindings::default()
        } else {
            scope
                .parent
                .as_ref()
                .map_or_else(Bindings::default, |p| p.flatten(false))
        };
        for (name, value) in &scope.bindings {
            merged.insert(*name, value.clone());
        }
        merged
    }
}

impl<V: fmt::Debug> fmt::Debug for SharedScope<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        f.debug_struct("Scope")
            .field("bindings", &scope.bindings)
            .field("has_parent", &scope.parent.is_some())
            .finish()
    }
}
