//! Engine-facing run delegate handle.
//!
//! A layout engine only sees two things: a fixed table of four callbacks and an
//! opaque `refcon` pointer that is passed back on every call. The handle owns
//! whatever the refcon stands for until `dealloc` runs, and `dealloc` runs
//! exactly once: either from `Drop`, or by whoever reclaims the pointer after
//! `into_raw`.

use std::ffi::c_void;
use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr::NonNull;

/// The only callback table layout the handle understands.
pub const RUN_DELEGATE_VERSION_1: i64 = 1;

/// Releases whatever `refcon` owns. Called once per handle.
pub type DeallocCallback = unsafe extern "C" fn(refcon: *mut c_void);
/// Returns one metric for the run that owns `refcon`.
pub type MetricCallback = unsafe extern "C" fn(refcon: *mut c_void) -> f64;

/// Fixed four-entry callback table handed to the layout engine.
#[repr(C)]
#[derive(Debug)]
pub struct RunDelegateCallbacks {
    pub version: i64,
    pub dealloc: DeallocCallback,
    pub get_ascent: MetricCallback,
    pub get_descent: MetricCallback,
    pub get_width: MetricCallback,
}

/// Owned handle over a callback table and its refcon.
///
/// Dropping the handle fires `dealloc(refcon)`. A handle is never `Clone`, so
/// the release path cannot run twice through safe code.
pub struct RunDelegateHandle {
    callbacks: &'static RunDelegateCallbacks,
    refcon: NonNull<c_void>,
}

// SAFETY: `create` requires the callbacks and refcon to be usable and
// releasable from any thread; the handle adds no thread-bound state.
unsafe impl Send for RunDelegateHandle {}

impl RunDelegateHandle {
    /// Binds `callbacks` to `refcon`.
    ///
    /// Returns `None` when the table version is unsupported or `refcon` is
    /// null. In that case nothing is called and the caller keeps ownership of
    /// whatever `refcon` points to.
    ///
    /// # Safety
    /// Every callback in the table must be sound to call with `refcon` until
    /// `dealloc` has run, and `dealloc` must release exactly what the handle
    /// was given. The handle is `Send`, so both must hold from any thread.
    pub unsafe fn create(
        callbacks: &'static RunDelegateCallbacks,
        refcon: *mut c_void,
    ) -> Option<Self> {
        if callbacks.version != RUN_DELEGATE_VERSION_1 {
            tracing::debug!(version = callbacks.version, "unsupported run delegate callback version");
            return None;
        }
        let refcon = NonNull::new(refcon)?;
        Some(Self { callbacks, refcon })
    }

    pub fn ascent(&self) -> f64 {
        // SAFETY: `create` contract; the refcon stays valid until drop.
        unsafe { (self.callbacks.get_ascent)(self.refcon.as_ptr()) }
    }

    pub fn descent(&self) -> f64 {
        // SAFETY: as above.
        unsafe { (self.callbacks.get_descent)(self.refcon.as_ptr()) }
    }

    pub fn width(&self) -> f64 {
        // SAFETY: as above.
        unsafe { (self.callbacks.get_width)(self.refcon.as_ptr()) }
    }

    /// Opaque back-reference passed to every callback.
    pub fn refcon(&self) -> *mut c_void {
        self.refcon.as_ptr()
    }

    pub fn callbacks(&self) -> &'static RunDelegateCallbacks {
        self.callbacks
    }

    /// Gives up the handle without running `dealloc`.
    ///
    /// The returned pair carries the release obligation: exactly one of
    /// [`RunDelegateHandle::from_raw`] or a direct `dealloc(refcon)` call must
    /// follow, otherwise the refcon leaks.
    pub fn into_raw(self) -> (&'static RunDelegateCallbacks, *mut c_void) {
        let this = ManuallyDrop::new(self);
        (this.callbacks, this.refcon.as_ptr())
    }

    /// Re-adopts a pair previously produced by [`RunDelegateHandle::into_raw`].
    ///
    /// # Safety
    /// The pair must come from `into_raw` and must not have been released or
    /// re-adopted already.
    pub unsafe fn from_raw(
        callbacks: &'static RunDelegateCallbacks,
        refcon: *mut c_void,
    ) -> Option<Self> {
        Self::create(callbacks, refcon)
    }
}

impl Drop for RunDelegateHandle {
    fn drop(&mut self) {
        tracing::trace!(refcon = ?self.refcon, "run delegate handle released");
        // SAFETY: single-owner handle; this is the only release path.
        unsafe { (self.callbacks.dealloc)(self.refcon.as_ptr()) }
    }
}

impl fmt::Debug for RunDelegateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunDelegateHandle")
            .field("refcon", &self.refcon)
            .field("ascent", &self.ascent())
            .field("descent", &self.descent())
            .field("width", &self.width())
            .finish()
    }
}
