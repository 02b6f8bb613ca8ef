use std::fmt;
use std::sync::Arc;

/// Memo key that compares a shared value by address instead of contents.
///
/// The key holds its own `Arc`, so the address cannot be reused by another
/// allocation while the memo still remembers it.
pub struct ByAddress<T: ?Sized>(pub Arc<T>);

impl<T: ?Sized> ByAddress<T> {
    pub fn new(value: &Arc<T>) -> Self {
        Self(Arc::clone(value))
    }
}

impl<T: ?Sized> Clone for ByAddress<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> PartialEq for ByAddress<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> Eq for ByAddress<T> {}

impl<T: ?Sized> fmt::Debug for ByAddress<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByAddress({:p})", Arc::as_ptr(&self.0))
    }
}

/// Single-slot cache: remembers the last key and the value computed for it.
///
/// `get_or_compute` recomputes exactly when the key differs from the
/// remembered one.
#[derive(Debug)]
pub struct Memo<K, V> {
    slot: Option<(K, V)>,
    computations: u64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            slot: None,
            computations: 0,
        }
    }
}

impl<K: PartialEq, V: Clone> Memo<K, V> {
    pub fn get_or_compute<F>(&mut self, key: K, compute: F) -> V
    where
        F: FnOnce(&K) -> V,
    {
        if let Some((cached_key, value)) = &self.slot {
            if *cached_key == key {
                return value.clone();
            }
        }

        let value = compute(&key);
        self.computations += 1;
        self.slot = Some((key, value.clone()));
        value
    }

    /// How many times the value has been (re)computed.
    pub const fn computations(&self) -> u64 {
        self.computations
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recomputes_only_on_key_change() {
        let mut memo: Memo<u32, String> = Memo::default();

        assert_eq!(memo.get_or_compute(1, |k| format!("v{k}")), "v1");
        assert_eq!(memo.get_or_compute(1, |_| unreachable!()), "v1");
        assert_eq!(memo.computations(), 1);

        assert_eq!(memo.get_or_compute(2, |k| format!("v{k}")), "v2");
        assert_eq!(memo.computations(), 2);

        memo.clear();
        assert_eq!(memo.get_or_compute(2, |k| format!("w{k}")), "w2");
        assert_eq!(memo.computations(), 3);
    }

    #[test]
    fn address_keys_ignore_equal_contents() {
        let a: Arc<[u8]> = Arc::from(vec![1, 2, 3]);
        let b: Arc<[u8]> = Arc::from(vec![1, 2, 3]);

        assert_eq!(ByAddress::new(&a), ByAddress::new(&a));
        assert_ne!(ByAddress::new(&a), ByAddress::new(&b));
    }
}
