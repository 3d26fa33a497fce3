//! Evaluation contexts: chained scopes for variables and functions.
//!
//! A context is a shared handle to one scope in a parent chain. Lookups
//! walk the chain outward. Writes follow one rule: an existing binding is
//! overwritten wherever it lives, and a new binding registers in the
//! nearest scope that keeps definitions. Transient scopes are the frames
//! that skip that registration, so bindings overlaid for a single call
//! (function arguments, one-off variable bindings) never leak new names
//! into them; assignments made under a transient frame land in the calling
//! context instead.
//!
//! Function calls evaluate their body under a transient child of the
//! context the function captured. Blocks evaluate under a plain child, so
//! their new names stay local while writes to outer names reach through.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::cell::Cell;
use crate::ast::node::Node;
use crate::functions::{self, Function};

#[derive(Debug)]
struct Scope {
    variables: HashMap<String, Cell>,
    functions: HashMap<String, Rc<Function>>,
    parent: Option<Context>,
    transient: bool,
    allow_recursive: bool,
}

/// A shared handle to a scope chain.
#[derive(Debug, Clone)]
pub struct Context(Rc<RefCell<Scope>>);

impl Context {
    /// A root context seeded with the default variables and functions.
    pub fn new() -> Context {
        Context::new_with_recursion(false)
    }

    /// A root context that additionally permits recursive function
    /// definitions.
    pub fn new_with_recursion(allow_recursive: bool) -> Context {
        let context = Context(Rc::new(RefCell::new(Scope {
            variables: HashMap::new(),
            functions: HashMap::new(),
            parent: None,
            transient: false,
            allow_recursive,
        })));
        functions::register_defaults(&context);
        context
    }

    /// A child scope whose lookups fall through to this context.
    pub fn spawn_child(&self, transient: bool) -> Context {
        let allow_recursive = self.0.borrow().allow_recursive;
        Context(Rc::new(RefCell::new(Scope {
            variables: HashMap::new(),
            functions: HashMap::new(),
            parent: Some(self.clone()),
            transient,
            allow_recursive,
        })))
    }

    pub fn allow_recursive(&self) -> bool {
        self.0.borrow().allow_recursive
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.cell(name).is_some()
    }

    /// The value bound to `name`, cloned out of its storage cell. Container
    /// values share their element cells with the stored tree.
    pub fn variable(&self, name: &str) -> Option<Node> {
        self.cell(name).map(|cell| cell.get())
    }

    /// The storage cell bound to `name` anywhere in the chain.
    pub(crate) fn cell(&self, name: &str) -> Option<Cell> {
        let scope = self.0.borrow();
        if let Some(cell) = scope.variables.get(name) {
            return Some(cell.clone());
        }
        let parent = scope.parent.clone()?;
        drop(scope);
        parent.cell(name)
    }

    /// Assigns under the write rule: overwrite an existing binding wherever
    /// it lives, otherwise register a new one in the nearest scope that
    /// keeps definitions.
    pub fn assign(&self, name: &str, value: Node) {
        if !self.try_overwrite(name, &value) {
            self.register_variable(name, value);
        }
    }

    fn try_overwrite(&self, name: &str, value: &Node) -> bool {
        let mut scope = self.0.borrow_mut();
        if scope.variables.contains_key(name) {
            scope
                .variables
                .insert(name.to_string(), Cell::new(value.clone()));
            return true;
        }
        let Some(parent) = scope.parent.clone() else {
            return false;
        };
        drop(scope);
        parent.try_overwrite(name, value)
    }

    /// Registers a new binding, skipping transient frames.
    pub fn register_variable(&self, name: &str, value: Node) {
        let parent = {
            let scope = self.0.borrow();
            if scope.transient {
                scope.parent.clone()
            } else {
                None
            }
        };
        match parent {
            Some(parent) => parent.register_variable(name, value),
            None => {
                self.0
                    .borrow_mut()
                    .variables
                    .insert(name.to_string(), Cell::new(value));
            }
        }
    }

    /// Binds directly into this scope, transient or not. This is how call
    /// frames take their argument bindings.
    pub(crate) fn bind_variable(&self, name: &str, value: Node) {
        self.0
            .borrow_mut()
            .variables
            .insert(name.to_string(), Cell::new(value));
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.function(name).is_some()
    }

    pub fn function(&self, name: &str) -> Option<Rc<Function>> {
        let scope = self.0.borrow();
        if let Some(function) = scope.functions.get(name) {
            return Some(function.clone());
        }
        let parent = scope.parent.clone()?;
        drop(scope);
        parent.function(name)
    }

    /// Assigns a function under the same write rule as variables.
    pub fn assign_function(&self, function: Function) {
        let function = Rc::new(function);
        if !self.try_overwrite_function(&function) {
            self.register_rc_function(function);
        }
    }

    /// Registers a new function, skipping transient frames.
    pub fn register_function(&self, function: Function) {
        self.register_rc_function(Rc::new(function));
    }

    fn try_overwrite_function(&self, function: &Rc<Function>) -> bool {
        let mut scope = self.0.borrow_mut();
        if scope.functions.contains_key(function.name()) {
            scope
                .functions
                .insert(function.name().to_string(), function.clone());
            return true;
        }
        let Some(parent) = scope.parent.clone() else {
            return false;
        };
        drop(scope);
        parent.try_overwrite_function(function)
    }

    fn register_rc_function(&self, function: Rc<Function>) {
        let parent = {
            let scope = self.0.borrow();
            if scope.transient {
                scope.parent.clone()
            } else {
                None
            }
        };
        match parent {
            Some(parent) => parent.register_rc_function(function),
            None => {
                self.0
                    .borrow_mut()
                    .functions
                    .insert(function.name().to_string(), function);
            }
        }
    }

    /// Binds a function directly into this scope. Call frames for recursive
    /// functions use this to make the function's own name visible to its
    /// body.
    pub(crate) fn bind_function(&self, function: Function) {
        self.0
            .borrow_mut()
            .functions
            .insert(function.name().to_string(), Rc::new(function));
    }

    pub(crate) fn bind_rc_function(&self, function: Rc<Function>) {
        self.0
            .borrow_mut()
            .functions
            .insert(function.name().to_string(), function);
    }
}

impl Default for Context {
    fn default() -> Context {
        Context::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bindings_skip_transient_frames() {
        let root = Context::new();
        let frame = root.spawn_child(true);
        frame.bind_variable("n", Node::integer(5));
        frame.assign("x", Node::integer(10));

        assert_eq!(frame.variable("n"), Some(Node::integer(5)));
        assert!(!root.has_variable("n"));
        assert_eq!(root.variable("x"), Some(Node::integer(10)));
    }

    #[test]
    fn assignment_overwrites_through_child_scopes() {
        let root = Context::new();
        root.bind_variable("x", Node::integer(1));
        let child = root.spawn_child(false);
        child.assign("x", Node::integer(2));
        child.assign("y", Node::integer(3));

        assert_eq!(root.variable("x"), Some(Node::integer(2)));
        assert!(!root.has_variable("y"));
        assert_eq!(child.variable("y"), Some(Node::integer(3)));
    }

    #[test]
    fn default_registry_is_seeded() {
        let context = Context::new();
        assert!(context.has_variable("pi"));
        assert!(context.has_function("if"));
        assert!(context.has_function("sqrt"));
    }
}
