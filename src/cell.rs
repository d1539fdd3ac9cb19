use std::fmt;
use std::iter::{FusedIterator, Take};
use std::mem;

use tracing::{debug, trace};

use crate::errors::{Capability, CellError};
use crate::render::{render, CellDisplay, Rendered};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(pub usize);

impl CellId {
    /// The cell that owns the arena. Every cycle contains it.
    pub const HEAD: CellId = CellId(0);
}

#[derive(Debug, Clone)]
enum Slot<T> {
    Linked { value: T, next: CellId },
    // Released by `reset`; its outgoing link no longer exists.
    Severed,
}

/// A value-holding cell that is also the handle for the whole cycle rooted
/// at it.
///
/// The head's own value and link live directly on the handle. Every other
/// member of the cycle lives in an arena owned by the head and is addressed
/// by [`CellId`]; `CellId(i + 1)` names `arena[i]`.
///
/// New cells are linked directly after the head, so a forward walk yields
/// the head first and the remaining values newest-first.
///
/// # Layout
/// ```text
/// head(1) ──► 3 ──► 2 ──┐
///   ▲                   │
///   └───────────────────┘
/// ```
#[derive(Debug, Clone)]
pub struct CircularCell<T> {
    value: T,
    next: CellId,
    arena: Vec<Slot<T>>,
    free: Vec<usize>,
}

/// Single-cell capability: a value and the link to the next member.
pub trait Link<T> {
    fn value(&self) -> &T;
    fn link(&self) -> CellId;
}

/// Iterable collection capability presented by a cycle. `add`, `contains`
/// and `iter` are available; the remaining members report
/// [`CellError::NotSupported`] and leave the cycle untouched.
pub trait Collection<T> {
    fn add(&mut self, item: T) -> Result<(), CellError>;
    fn contains(&self, item: &T) -> bool;
    fn iter(&self) -> Iter<'_, T>;
    fn remove(&mut self, item: &T) -> Result<bool, CellError>;
    fn copy_to(&self, array: &mut [T], index: usize) -> Result<(), CellError>;
    fn count(&self) -> Result<usize, CellError>;
}

impl<T> CircularCell<T> {
    /// Creates a one-element cycle whose link points back at itself.
    pub fn new(value: T) -> Self {
        Self {
            value,
            next: CellId::HEAD,
            arena: vec![],
            free: vec![],
        }
    }

    pub fn head(&self) -> CellId {
        CellId::HEAD
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the successor of `id`, or `None` if `id` does not name a
    /// current member of the cycle.
    pub fn next_of(&self, id: CellId) -> Option<CellId> {
        if id == CellId::HEAD {
            return Some(self.next);
        }

        match self.slot(id) {
            Some(Slot::Linked { next, .. }) => Some(*next),
            _ => None,
        }
    }

    pub fn value_of(&self, id: CellId) -> Option<&T> {
        if id == CellId::HEAD {
            return Some(&self.value);
        }

        match self.slot(id) {
            Some(Slot::Linked { value, .. }) => Some(value),
            _ => None,
        }
    }

    /// View of the head as a member of its own cycle.
    pub fn as_cell_ref(&self) -> CellRef<'_, T> {
        CellRef {
            cell: self,
            id: CellId::HEAD,
            value: &self.value,
        }
    }

    /// The head's successor. For a fresh cell this is the head itself.
    pub fn next(&self) -> CellRef<'_, T> {
        self.member(self.next)
    }

    pub fn is_self_loop(&self) -> bool {
        self.next == CellId::HEAD
    }

    /// Fresh traversal: the head's value first, then every other member
    /// newest-first.
    pub fn iter(&self) -> Iter<'_, T> {
        trace!(slots = self.arena.len() + 1, "starting traversal");
        Iter {
            cell: self,
            cursor: Some(CellId::HEAD),
        }
    }

    /// Same order as [`iter`](Self::iter), stopping after at most `maximum`
    /// values. Nothing past the cut-off is visited.
    pub fn iter_bounded(&self, maximum: usize) -> Take<Iter<'_, T>> {
        self.iter().take(maximum)
    }

    /// Drops every member except the head and restores the self-loop.
    ///
    /// Each released cell has its link severed before the head's own link
    /// is pointed back at itself. Released slots are reused by later inserts.
    pub fn reset(&mut self) {
        let mut released = 0usize;
        let mut current = self.next;

        while current != CellId::HEAD {
            let index = current.0 - 1;
            let Slot::Linked { next, .. } = mem::replace(&mut self.arena[index], Slot::Severed)
            else {
                break;
            };
            self.free.push(index);
            released += 1;
            current = next;
        }

        self.next = CellId::HEAD;
        debug!(released, "reset cycle to a self-loop");
    }

    fn slot(&self, id: CellId) -> Option<&Slot<T>> {
        id.0.checked_sub(1).and_then(|index| self.arena.get(index))
    }

    fn member(&self, id: CellId) -> CellRef<'_, T> {
        let value = self
            .value_of(id)
            .expect("internal error: cycle link points at a released cell");

        CellRef {
            cell: self,
            id,
            value,
        }
    }

    fn allocate(&mut self, value: T, next: CellId) -> CellId {
        let slot = Slot::Linked { value, next };

        match self.free.pop() {
            Some(index) => {
                self.arena[index] = slot;
                CellId(index + 1)
            }
            None => {
                self.arena.push(slot);
                CellId(self.arena.len())
            }
        }
    }
}

impl<T: PartialEq> CircularCell<T> {
    /// Scans the whole cycle, head included. `None == None` holds when the
    /// cycle stores `Option` values.
    pub fn exists(&self, value: &T) -> bool {
        self.iter().any(|held| held == value)
    }
}

impl<T: PartialEq + fmt::Debug> CircularCell<T> {
    /// Links a new cell holding `value` into the cycle.
    ///
    /// Fails with [`CellError::DuplicateValue`] without touching the cycle if
    /// an equal value is already held.
    pub fn insert(&mut self, value: T) -> Result<CellId, CellError> {
        if self.exists(&value) {
            return Err(CellError::DuplicateValue {
                value: format!("{value:?}"),
            });
        }

        let id = self.allocate(value, self.next);
        self.next = id;
        debug!(id = id.0, "linked new cell after head");

        Ok(id)
    }

    /// Builds a cycle from a head value and the values to insert after it,
    /// in insertion order. Stops at the first duplicate.
    pub fn try_from_values<I>(head: T, rest: I) -> Result<Self, CellError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut cell = Self::new(head);
        for value in rest {
            cell.insert(value)?;
        }

        Ok(cell)
    }

    /// Swaps the head's value, returning the previous one. Fails with
    /// [`CellError::DuplicateValue`] if another member already holds `value`.
    pub fn replace_head(&mut self, value: T) -> Result<T, CellError> {
        if self.iter().skip(1).any(|held| *held == value) {
            return Err(CellError::DuplicateValue {
                value: format!("{value:?}"),
            });
        }

        Ok(mem::replace(&mut self.value, value))
    }
}

impl<T: CellDisplay> CircularCell<T> {
    /// Textual form of the head's value.
    pub fn display(&self) -> String {
        render(&self.value)
    }

    /// Every value in traversal order, e.g. `[1, 3, 2]`.
    pub fn render_listing(&self) -> String {
        let rendered: Vec<String> = self.iter().map(render).collect();

        format!("[{}]", rendered.join(", "))
    }
}

impl<T: CellDisplay> fmt::Display for CircularCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Rendered(&self.value))
    }
}

impl<T> Link<T> for CircularCell<T> {
    fn value(&self) -> &T {
        &self.value
    }

    fn link(&self) -> CellId {
        self.next
    }
}

impl<T: PartialEq + fmt::Debug> Collection<T> for CircularCell<T> {
    fn add(&mut self, item: T) -> Result<(), CellError> {
        self.insert(item).map(|_| ())
    }

    fn contains(&self, item: &T) -> bool {
        self.exists(item)
    }

    fn iter(&self) -> Iter<'_, T> {
        CircularCell::iter(self)
    }

    fn remove(&mut self, _item: &T) -> Result<bool, CellError> {
        Err(CellError::NotSupported(Capability::Remove))
    }

    fn copy_to(&self, _array: &mut [T], _index: usize) -> Result<(), CellError> {
        Err(CellError::NotSupported(Capability::CopyTo))
    }

    fn count(&self) -> Result<usize, CellError> {
        Err(CellError::NotSupported(Capability::Count))
    }
}

impl<'a, T> IntoIterator for &'a CircularCell<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowed view of one member of a cycle.
#[derive(Debug)]
pub struct CellRef<'a, T> {
    cell: &'a CircularCell<T>,
    id: CellId,
    value: &'a T,
}

impl<'a, T> CellRef<'a, T> {
    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn value(&self) -> &'a T {
        self.value
    }

    pub fn next(&self) -> CellRef<'a, T> {
        let next = self
            .cell
            .next_of(self.id)
            .expect("internal error: member cell without a link");

        self.cell.member(next)
    }

    pub fn is_head(&self) -> bool {
        self.id == CellId::HEAD
    }
}

impl<T> Clone for CellRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CellRef<'_, T> {}

impl<T> Link<T> for CellRef<'_, T> {
    fn value(&self) -> &T {
        self.value
    }

    fn link(&self) -> CellId {
        self.cell.next_of(self.id).unwrap_or(CellId::HEAD)
    }
}

/// Forward traversal of a cycle, ending when the head comes round again.
///
/// The iterator holds a shared borrow of the cycle, so `insert` and `reset`
/// cannot run while it is alive.
#[derive(Debug)]
pub struct Iter<'a, T> {
    cell: &'a CircularCell<T>,
    cursor: Option<CellId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor.take()?;
        let value = self.cell.value_of(current)?;
        let next = self.cell.next_of(current)?;

        if next != CellId::HEAD {
            self.cursor = Some(next);
        }

        Some(value)
    }
}

impl<T> FusedIterator for Iter<'_, T> {}
