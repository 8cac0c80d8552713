//! Embeds the scope-tracking allocator that generated Rill programs link
//! against, and exposes thin FFI wrappers over its macro API for this
//! crate's own test suite.
//!
//! The C source is both embedded as text (so `rillc build` can drop it
//! next to generated output and hand it to the system `cc`) and compiled
//! natively by `build.rs` via the `cc` crate, so Rust tests can call the
//! real allocator directly instead of re-implementing its behavior.

use std::io;
use std::path::Path;

pub const RUNTIME_HEADER: &str = include_str!("../c/rill_runtime.h");
pub const RUNTIME_SOURCE: &str = include_str!("../c/rill_runtime.c");

/// Writes `rill_runtime.h`/`rill_runtime.c` into `dir`, alongside
/// generated output, so the system C compiler can link them in.
pub fn write_runtime_files(dir: &Path) -> io::Result<()> {
    std::fs::write(dir.join("rill_runtime.h"), RUNTIME_HEADER)?;
    std::fs::write(dir.join("rill_runtime.c"), RUNTIME_SOURCE)?;
    Ok(())
}

#[allow(non_snake_case)]
mod ffi {
    use std::os::raw::{c_int, c_void};

    unsafe extern "C" {
        pub fn rill_rt_alloc(size: u64) -> *mut c_void;
        pub fn rill_rt_init_global_pool(initial_max_int_value: c_int, hash_table_capacity: c_int);
        pub fn rill_rt_destroy_global_pool();
        pub fn rill_rt_enter_scope();
        pub fn rill_rt_register_ptr(ptr: *mut c_void) -> c_int;
        pub fn rill_rt_exit_scope() -> c_int;
        pub fn rill_rt_move_ptr(ptr: *mut c_void, new_scope_level: c_int) -> c_int;
        pub fn rill_rt_current_scope() -> c_int;
    }
}

/// Safe-ish wrapper over the global, process-wide allocator pool. Tests
/// must serialize access (see `tests/allocator.rs`) since the C side has
/// exactly one `global_pool`.
pub struct ScopePool;

impl ScopePool {
    /// # Safety
    /// Must not be called while another `ScopePool` is alive in the same
    /// process; the underlying allocator has one global instance.
    pub unsafe fn init(initial_max_int_value: i32, hash_table_capacity: i32) -> Self {
        unsafe { ffi::rill_rt_init_global_pool(initial_max_int_value, hash_table_capacity) };
        ScopePool
    }

    pub fn enter_scope(&mut self) {
        unsafe { ffi::rill_rt_enter_scope() };
    }

    pub fn exit_scope(&mut self) -> bool {
        unsafe { ffi::rill_rt_exit_scope() != 0 }
    }

    pub fn current_scope(&self) -> i32 {
        unsafe { ffi::rill_rt_current_scope() }
    }

    /// Allocates `size` bytes tracked at the current scope level. Returns
    /// null if the underlying `malloc` or pointer registration failed.
    pub fn alloc(&mut self, size: u64) -> *mut std::os::raw::c_void {
        unsafe { ffi::rill_rt_alloc(size) }
    }

    pub fn move_ptr(&mut self, ptr: *mut std::os::raw::c_void, new_scope_level: i32) -> bool {
        unsafe { ffi::rill_rt_move_ptr(ptr, new_scope_level) != 0 }
    }
}

impl Drop for ScopePool {
    fn drop(&mut self) {
        unsafe { ffi::rill_rt_destroy_global_pool() };
    }
}
