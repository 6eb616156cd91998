#[cfg(feature = "std")]
use std::sync as impl_;

#[cfg(not(feature = "std"))]
use spin as impl_;

/// Process-wide slot for a small `Copy` value.
///
/// Reads hand out copies, so no guard ever outlives a single call.
#[repr(transparent)]
pub(crate) struct ConfigLock<T: Copy + Send + Sync + 'static>(impl_::RwLock<Option<T>>);

impl<T: Copy + Send + Sync + 'static> ConfigLock<T> {
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self(impl_::RwLock::new(None))
    }

    #[inline]
    fn read(&'static self) -> impl_::RwLockReadGuard<'static, Option<T>> {
        #[cfg(not(feature = "std"))]
        let guard = self.0.read();

        #[cfg(feature = "std")]
        let guard = self.0.read().expect("Unable to acquire config lock");

        guard
    }

    #[inline]
    fn write(&'static self) -> impl_::RwLockWriteGuard<'static, Option<T>> {
        #[cfg(not(feature = "std"))]
        let guard = self.0.write();

        #[cfg(feature = "std")]
        let guard = self.0.write().expect("Unable to acquire config lock");

        guard
    }

    /// Returns the stored value, if any.
    #[inline]
    pub(crate) fn load(&'static self) -> Option<T> {
        *self.read()
    }

    /// Stores `value` unless a value is already present, in which case
    /// `value` is handed back.
    pub(crate) fn try_init(&'static self, value: T) -> Result<(), T> {
        let mut guard = self.write();
        if guard.is_some() {
            return Err(value);
        }
        *guard = Some(value);
        Ok(())
    }

    /// Stores `value` and returns the previous value.
    pub(crate) fn swap(&'static self, value: T) -> Option<T> {
        self.write().replace(value)
    }

    /// Modifies the stored value in place, starting from `init()` when the
    /// slot is empty.
    pub(crate) fn update(&'static self, init: impl FnOnce() -> T, f: impl FnOnce(&mut T)) {
        let mut guard = self.write();
        f(guard.get_or_insert_with(init));
    }
}
