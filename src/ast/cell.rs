use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::ast::node::Node;

/// Shared mutable storage for a single AST node.
///
/// Lists and hashes hold their elements through cells rather than by value,
/// so an indexed assignment can mutate an element in place and every holder
/// of the same cell observes the new contents. Cloning a cell clones the
/// handle; [`Cell::deep_dup`] is the only way to get independent storage.
///
/// # Example
///
/// ```
/// use reckon::{Cell, Node};
///
/// let cell = Cell::new(Node::integer(1));
/// let alias = cell.clone();
/// alias.set(Node::integer(2));
/// assert_eq!(cell.get(), Node::integer(2));
/// assert!(cell.is_same(&alias));
/// assert!(!cell.is_same(&cell.deep_dup()));
/// ```
#[derive(Clone)]
pub struct Cell(Rc<RefCell<Node>>);

impl Cell {
    pub fn new(node: Node) -> Cell {
        Cell(Rc::new(RefCell::new(node)))
    }

    /// Immutable view of the stored node.
    pub fn borrow(&self) -> Ref<'_, Node> {
        self.0.borrow()
    }

    /// Mutable view of the stored node.
    pub(crate) fn borrow_mut(&self) -> RefMut<'_, Node> {
        self.0.borrow_mut()
    }

    /// Clone of the stored node.
    pub fn get(&self) -> Node {
        self.0.borrow().clone()
    }

    /// Replaces the stored node in place, visible to every alias.
    pub fn set(&self, node: Node) {
        *self.0.borrow_mut() = node;
    }

    /// Fresh cell holding a fully independent copy of the contents.
    pub fn deep_dup(&self) -> Cell {
        Cell::new(self.0.borrow().deep_dup())
    }

    /// Whether two handles point at the same storage (cell identity, not
    /// content equality).
    pub fn is_same(&self, other: &Cell) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Content equality; use [`Cell::is_same`] for identity.
impl PartialEq for Cell {
    fn eq(&self, other: &Cell) -> bool {
        if Rc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        *self.0.borrow() == *other.0.borrow()
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({:?})", self.0.borrow())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.borrow())
    }
}
