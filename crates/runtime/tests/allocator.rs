//! Exercises the real C allocator through the FFI wrappers. `global_pool`
//! is one process-wide C global, so every test here serializes on
//! `POOL_LOCK` rather than relying on cargo's default test parallelism.

use rill_runtime::ScopePool;
use std::sync::Mutex;

static POOL_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn scopes_track_and_release_their_own_allocations() {
    let _guard = POOL_LOCK.lock().unwrap();
    unsafe {
        let mut pool = ScopePool::init(10, 16);
        assert_eq!(pool.current_scope(), 0);

        pool.enter_scope();
        assert_eq!(pool.current_scope(), 1);

        let p1 = pool.alloc(32);
        let p2 = pool.alloc(64);
        assert!(!p1.is_null());
        assert!(!p2.is_null());
        assert_ne!(p1, p2);

        assert!(pool.exit_scope());
        assert_eq!(pool.current_scope(), 0);
    }
}

#[test]
fn move_ptr_reassigns_an_allocation_to_an_outer_scope() {
    let _guard = POOL_LOCK.lock().unwrap();
    unsafe {
        let mut pool = ScopePool::init(10, 16);
        pool.enter_scope();
        pool.enter_scope();
        assert_eq!(pool.current_scope(), 2);

        let escaping = pool.alloc(16);
        assert!(!escaping.is_null());
        assert!(pool.move_ptr(escaping, 1));

        // Exiting scope 2 must not free `escaping`; it now belongs to scope 1.
        assert!(pool.exit_scope());
        assert_eq!(pool.current_scope(), 1);

        assert!(pool.exit_scope());
        assert_eq!(pool.current_scope(), 0);
    }
}

#[test]
fn exiting_scope_zero_is_rejected() {
    let _guard = POOL_LOCK.lock().unwrap();
    unsafe {
        let mut pool = ScopePool::init(10, 16);
        assert_eq!(pool.current_scope(), 0);
        assert!(!pool.exit_scope());
    }
}
