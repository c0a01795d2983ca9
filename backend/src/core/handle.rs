//! Exclusive ownership of one opaque native resource
//!
//! A [`ResourceHandle`] is the only thing in the crate that ever holds a raw
//! native reference. It is created by running the native constructor and
//! releases the reference through the native destructor when it is dropped,
//! whichever way the owning scope is left (normal return, `?`, unwind).
//!
//! # Ownership Rules
//!
//! - One handle per native resource; no `Clone`, no `Copy`
//! - Moving a handle moves ownership, the resource is not touched
//! - `const_access` for reads, `mutable_access` only right before a mutation
//!
//! The native layer is allowed to assume that the reference it receives
//! through `mutable_access` is not aliased.

use std::fmt;
use std::mem::ManuallyDrop;

use tracing::trace;

/// Constructor/destructor pair of one family of native resources
///
/// `Raw` is whatever the native layer hands back from its constructor. It is
/// consumed by [`NativeResource::destroy`], so a second release of the same
/// reference cannot be written.
pub trait NativeResource {
    /// Opaque reference produced by the constructor
    type Raw;

    /// Family name used in diagnostics (e.g. "aero_mode")
    const FAMILY: &'static str;

    /// Run the native constructor
    ///
    /// Only a misconfigured native layer may fail here, and it does so by
    /// panicking; every recoverable failure is caught before this is called.
    fn construct(&self) -> Self::Raw;

    /// Run the native destructor
    fn destroy(&self, raw: Self::Raw);
}

/// Scoped owner of exactly one native resource
///
/// # Example
/// ```
/// use aero_bridge_core_rs::core::handle::{NativeResource, ResourceHandle};
/// use std::cell::Cell;
///
/// #[derive(Default)]
/// struct Counter { destroyed: Cell<usize> }
///
/// impl NativeResource for Counter {
///     type Raw = Box<f64>;
///     const FAMILY: &'static str = "counter";
///     fn construct(&self) -> Box<f64> { Box::new(0.0) }
///     fn destroy(&self, _raw: Box<f64>) { self.destroyed.set(self.destroyed.get() + 1); }
/// }
///
/// let native = Counter::default();
/// {
///     let mut handle = ResourceHandle::construct(&native);
///     **handle.mutable_access() = 2.5;
///     assert_eq!(**handle.const_access(), 2.5);
/// }
/// assert_eq!(native.destroyed.get(), 1);
/// ```
pub struct ResourceHandle<'n, N: NativeResource> {
    native: &'n N,
    raw: ManuallyDrop<N::Raw>,
}

impl<'n, N: NativeResource> ResourceHandle<'n, N> {
    /// Construct a new native resource and take ownership of it
    pub fn construct(native: &'n N) -> Self {
        let raw = native.construct();
        trace!(family = N::FAMILY, "native resource constructed");
        Self {
            native,
            raw: ManuallyDrop::new(raw),
        }
    }

    /// Reference for native calls that only read state
    pub fn const_access(&self) -> &N::Raw {
        &self.raw
    }

    /// Reference for native calls that mutate state
    pub fn mutable_access(&mut self) -> &mut N::Raw {
        &mut self.raw
    }

    /// Native layer this handle was constructed by
    pub fn native(&self) -> &'n N {
        self.native
    }
}

impl<N: NativeResource> Drop for ResourceHandle<'_, N> {
    fn drop(&mut self) {
        // SAFETY: `raw` is initialised from construction until here and is
        // never read again after being taken.
        let raw = unsafe { ManuallyDrop::take(&mut self.raw) };
        self.native.destroy(raw);
        trace!(family = N::FAMILY, "native resource destroyed");
    }
}

impl<N: NativeResource> fmt::Debug for ResourceHandle<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("family", &N::FAMILY)
            .finish_non_exhaustive()
    }
}
