use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::OnceCell;

/// Lazily constructed value shared by every thread that reaches it.
///
/// Reads after warm-up go through [`OnceCell::get`] without blocking. The
/// first callers race into [`OnceCell::get_or_init`], which parks all but one
/// of them, re-checks the slot and runs the initializer exactly once. The
/// release/acquire pair inside `OnceCell` orders construction before every
/// later read, so no caller can observe a half-built value.
pub struct InstanceCell<T> {
    cell: OnceCell<T>,
    constructions: AtomicUsize,
}

impl<T> InstanceCell<T> {
    pub const fn new() -> Self {
        Self { cell: OnceCell::new(), constructions: AtomicUsize::new(0) }
    }

    /// Returns the value if it has already been built.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Returns the value, building it with `init` on the first call.
    pub fn get_or_init<F>(&self, init: F) -> &T
    where
        F: FnOnce() -> T,
    {
        if let Some(value) = self.cell.get() {
            return value;
        }
        self.cell.get_or_init(|| {
            // counted only once `init` returns; a panicking init leaves the cell empty
            let value = init();
            self.constructions.fetch_add(1, Ordering::SeqCst);
            value
        })
    }

    /// Number of times an initializer has run. Never exceeds one.
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }
}

impl<T> Default for InstanceCell<T> {
    fn default() -> Self { Self::new() }
}
