use std::sync::{Arc, PoisonError, RwLock};

/// Shared storage a flag's value is written into.
///
/// Registration stores the effective default, parsing the command line
/// stores whatever the user passed. Clones point at the same value.
#[derive(Debug, Default)]
pub struct Slot<T>(Arc<RwLock<T>>);

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Slot(Arc::clone(&self.0))
    }
}

impl<T> Slot<T> {
    pub fn new(value: T) -> Self {
        Slot(Arc::new(RwLock::new(value)))
    }

    pub fn set(&self, value: T) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = value;
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Borrows the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.read().unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_value() {
        let slot = Slot::new(1u64);
        let other = slot.clone();
        other.set(7);
        assert_eq!(slot.get(), 7);
    }

    #[test]
    fn test_with_borrows() {
        let slot: Slot<String> = Slot::default();
        assert!(slot.with(String::is_empty));
        slot.set("redis://localhost:6379".to_string());
        assert_eq!(slot.with(|s| s.len()), 22);
    }
}
