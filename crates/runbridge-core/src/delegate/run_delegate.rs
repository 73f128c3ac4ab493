//! Text run delegate: custom metrics for a run, exported to a layout engine.

use std::ffi::c_void;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::handle::{RunDelegateCallbacks, RunDelegateHandle, RUN_DELEGATE_VERSION_1};
use crate::error::{Result, RunBridgeError};

/// Opaque metadata attached to a run delegate.
pub type UserInfo = Map<String, Value>;

/// Archive format version written by [`TextRunDelegate::encode`].
pub const ARCHIVE_VERSION: u32 = 1;

/// Plain snapshot of a delegate's metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RunMetrics {
    pub ascent: f64,
    pub descent: f64,
    pub width: f64,
}

/// `f64` stored as bits so it can change behind a shared reference.
struct Metric(AtomicU64);

impl Metric {
    fn new(v: f64) -> Self {
        Self(AtomicU64::new(v.to_bits()))
    }

    fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn set(&self, v: f64) {
        debug_assert!(v.is_finite(), "run metrics must be finite");
        self.0.store(v.to_bits(), Ordering::Relaxed);
    }
}

/// Supplies ascent, descent and width for a run of text whose size the layout
/// engine cannot compute itself (inline images, attachments, spacers).
///
/// Share it through `Arc` and call [`TextRunDelegate::export_handle`] to get a
/// handle the engine can hold. Handles read the metrics live: a change made
/// through any `Arc` is seen by the next callback.
pub struct TextRunDelegate {
    ascent: Metric,
    descent: Metric,
    width: Metric,
    user_info: RwLock<Option<UserInfo>>,
}

static CALLBACKS: RunDelegateCallbacks = RunDelegateCallbacks {
    version: RUN_DELEGATE_VERSION_1,
    dealloc: dealloc_callback,
    get_ascent: ascent_callback,
    get_descent: descent_callback,
    get_width: width_callback,
};

/// # Safety
/// `refcon` must be a live pointer obtained from `Arc::into_raw` in
/// [`TextRunDelegate::export_handle`].
unsafe fn delegate_ref<'a>(refcon: *mut c_void) -> &'a TextRunDelegate {
    &*(refcon as *const TextRunDelegate)
}

unsafe extern "C" fn dealloc_callback(refcon: *mut c_void) {
    drop(Arc::from_raw(refcon as *const TextRunDelegate));
}

unsafe extern "C" fn ascent_callback(refcon: *mut c_void) -> f64 {
    delegate_ref(refcon).ascent()
}

unsafe extern "C" fn descent_callback(refcon: *mut c_void) -> f64 {
    delegate_ref(refcon).descent()
}

unsafe extern "C" fn width_callback(refcon: *mut c_void) -> f64 {
    delegate_ref(refcon).width()
}

impl TextRunDelegate {
    pub fn new() -> Self {
        Self::with_metrics(0.0, 0.0, 0.0)
    }

    pub fn with_metrics(ascent: f64, descent: f64, width: f64) -> Self {
        debug_assert!(
            ascent.is_finite() && descent.is_finite() && width.is_finite(),
            "run metrics must be finite"
        );
        Self {
            ascent: Metric::new(ascent),
            descent: Metric::new(descent),
            width: Metric::new(width),
            user_info: RwLock::new(None),
        }
    }

    /// Typographic ascent of the run.
    pub fn ascent(&self) -> f64 {
        self.ascent.get()
    }

    pub fn set_ascent(&self, ascent: f64) {
        self.ascent.set(ascent);
    }

    /// Typographic descent of the run.
    pub fn descent(&self) -> f64 {
        self.descent.get()
    }

    pub fn set_descent(&self, descent: f64) {
        self.descent.set(descent);
    }

    /// Typographic width of the run.
    pub fn width(&self) -> f64 {
        self.width.get()
    }

    pub fn set_width(&self, width: f64) {
        self.width.set(width);
    }

    pub fn metrics(&self) -> RunMetrics {
        RunMetrics {
            ascent: self.ascent(),
            descent: self.descent(),
            width: self.width(),
        }
    }

    /// Returns a copy of the metadata.
    pub fn user_info(&self) -> Option<UserInfo> {
        self.user_info
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn set_user_info(&self, user_info: Option<UserInfo>) {
        *self.user_info.write().unwrap_or_else(|e| e.into_inner()) = user_info;
    }

    /// Exports a handle for the layout engine.
    ///
    /// The handle holds one extra strong reference to `self` until it is
    /// released, so the delegate outlives every handle even if all other
    /// `Arc`s are dropped. Returns `None` if the handle cannot be built; no
    /// reference is kept in that case.
    pub fn export_handle(self: &Arc<Self>) -> Option<RunDelegateHandle> {
        let refcon = Arc::into_raw(Arc::clone(self)) as *mut c_void;
        // SAFETY: CALLBACKS expects exactly an `Arc::into_raw` pointer to a
        // `TextRunDelegate`, and `dealloc_callback` gives that reference back.
        // The delegate is `Send + Sync`, so any thread may call or release.
        match unsafe { RunDelegateHandle::create(&CALLBACKS, refcon) } {
            Some(handle) => {
                tracing::debug!(
                    refcon = ?refcon,
                    strong = Arc::strong_count(self),
                    "run delegate exported"
                );
                Some(handle)
            }
            None => {
                // SAFETY: the handle was not created, so we still own `refcon`.
                drop(unsafe { Arc::from_raw(refcon as *const TextRunDelegate) });
                None
            }
        }
    }

    /// Recovers the delegate behind a handle produced by
    /// [`TextRunDelegate::export_handle`].
    ///
    /// Returns `None` for handles built on any other callback table.
    pub fn from_handle(handle: &RunDelegateHandle) -> Option<Arc<Self>> {
        if !std::ptr::eq(handle.callbacks(), &CALLBACKS) {
            return None;
        }
        let ptr = handle.refcon() as *const TextRunDelegate;
        // SAFETY: CALLBACKS refcons are `Arc::into_raw` pointers kept alive by
        // `handle`; bumping the count before `from_raw` leaves the handle's
        // own reference untouched.
        unsafe {
            Arc::increment_strong_count(ptr);
            Some(Arc::from_raw(ptr))
        }
    }

    /// Serializes the delegate to a JSON archive.
    ///
    /// Fails with `Codec` if a metric is not finite, since such an archive
    /// could not be restored.
    pub fn encode(&self) -> Result<String> {
        let archive = Archive::from(self);
        archive.validate()?;
        serde_json::to_string(&archive).map_err(|e| RunBridgeError::Codec(e.to_string()))
    }

    /// Restores a delegate from a JSON archive written by [`TextRunDelegate::encode`].
    pub fn decode(s: &str) -> Result<Self> {
        let archive: Archive =
            serde_json::from_str(s).map_err(|e| RunBridgeError::Codec(e.to_string()))?;
        archive.validate()?;
        Ok(archive.into())
    }
}

impl Default for TextRunDelegate {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies the metrics and deep-copies the metadata. Exported handles stay
/// with the original.
impl Clone for TextRunDelegate {
    fn clone(&self) -> Self {
        let RunMetrics { ascent, descent, width } = self.metrics();
        let copy = Self::with_metrics(ascent, descent, width);
        copy.set_user_info(self.user_info());
        copy
    }
}

impl fmt::Debug for TextRunDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRunDelegate")
            .field("ascent", &self.ascent())
            .field("descent", &self.descent())
            .field("width", &self.width())
            .field("user_info", &self.user_info())
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Archive {
    v: u32,
    ascent: f64,
    descent: f64,
    width: f64,
    #[serde(default)]
    user_info: Option<UserInfo>,
}

impl Archive {
    fn validate(&self) -> Result<()> {
        if self.v != ARCHIVE_VERSION {
            return Err(RunBridgeError::UnsupportedVersion);
        }
        if ![self.ascent, self.descent, self.width].iter().all(|m| m.is_finite()) {
            return Err(RunBridgeError::Codec("run metrics must be finite".into()));
        }
        Ok(())
    }
}

impl From<&TextRunDelegate> for Archive {
    fn from(d: &TextRunDelegate) -> Self {
        Self {
            v: ARCHIVE_VERSION,
            ascent: d.ascent(),
            descent: d.descent(),
            width: d.width(),
            user_info: d.user_info(),
        }
    }
}

impl From<Archive> for TextRunDelegate {
    fn from(a: Archive) -> Self {
        let d = Self::with_metrics(a.ascent, a.descent, a.width);
        d.set_user_info(a.user_info);
        d
    }
}

impl Serialize for TextRunDelegate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let archive = Archive::from(self);
        archive.validate().map_err(serde::ser::Error::custom)?;
        archive.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TextRunDelegate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let archive = Archive::deserialize(deserializer)?;
        archive.validate().map_err(serde::de::Error::custom)?;
        Ok(archive.into())
    }
}
