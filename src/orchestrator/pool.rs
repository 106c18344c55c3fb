//! Generic RAII resource pool: a bounded pool of idle instances plus an
//! in-use counter, checked out through a guard whose `Drop` returns the
//! instance rather than leaking it on an early return or panic unwind.
//! Generalized from pooling a browser handle to pooling any per-company
//! `PipelineInstance`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

pub struct InstancePool<T> {
    idle: Mutex<VecDeque<T>>,
    in_use: AtomicUsize,
    factory: Box<dyn Fn() -> T + Send + Sync>,
    max_size: usize,
}

impl<T: Send + 'static> InstancePool<T> {
    pub fn new(max_size: usize, factory: impl Fn() -> T + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            idle: Mutex::new(VecDeque::new()),
            in_use: AtomicUsize::new(0),
            factory: Box::new(factory),
            max_size: max_size.max(1),
        })
    }

    /// Checks out an idle instance if one exists, otherwise builds a fresh
    /// one via the factory. The pool bounds reuse, not concurrency — the
    /// caller's semaphore does that.
    pub fn acquire(self: &Arc<Self>) -> InstanceGuard<T> {
        let instance = self.idle.lock().pop_front().unwrap_or_else(|| (self.factory)());
        self.in_use.fetch_add(1, Ordering::SeqCst);
        InstanceGuard {
            instance: Some(instance),
            pool: Arc::clone(self),
        }
    }

    pub fn in_use_count(&self) -> usize {
        self.in_use.load(Ordering::SeqCst)
    }

    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    fn release(&self, instance: T) {
        self.in_use.fetch_sub(1, Ordering::SeqCst);
        let mut idle = self.idle.lock();
        if idle.len() < self.max_size {
            idle.push_back(instance);
        }
    }

    /// Drains and drops every idle instance, leaving in-flight guards to
    /// return normally (their `Drop` impls just won't find room and the
    /// instance is dropped instead).
    pub fn shutdown(&self) {
        self.idle.lock().clear();
    }
}

/// RAII checkout: returns the instance to the pool on drop.
pub struct InstanceGuard<T: Send + 'static> {
    instance: Option<T>,
    pool: Arc<InstancePool<T>>,
}

impl<T: Send + 'static> std::ops::Deref for InstanceGuard<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.instance.as_ref().expect("instance taken only by Drop")
    }
}

impl<T: Send + 'static> Drop for InstanceGuard<T> {
    fn drop(&mut self) {
        if let Some(instance) = self.instance.take() {
            self.pool.release(instance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn reuses_released_instance() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_for_factory = Arc::clone(&counter);
        let pool = InstancePool::new(2, move || {
            counter_for_factory.fetch_add(1, Ordering::SeqCst);
            counter_for_factory.load(Ordering::SeqCst)
        });

        {
            let guard = pool.acquire();
            assert_eq!(*guard, 1);
        }
        assert_eq!(pool.idle_count(), 1);

        let guard = pool.acquire();
        assert_eq!(*guard, 1);
        assert_eq!(pool.in_use_count(), 1);
    }

    #[test]
    fn shutdown_drains_idle_instances() {
        let pool = InstancePool::new(2, || 42);
        {
            let _guard = pool.acquire();
        }
        assert_eq!(pool.idle_count(), 1);
        pool.shutdown();
        assert_eq!(pool.idle_count(), 0);
    }
}
