// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Platform boundary: typed native handles and the [`NativePlatform`] trait.
//!
//! Raw pointers enter this crate only through the `unsafe fn from_raw`
//! constructors here. Everything downstream works with the typed handles.

use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;
use std::sync::Arc;

use bitflags::bitflags;

use crate::format::NativePixelFormat;

/// Opaque client buffer handle as passed to `eglCreateImage`
/// (an `OHNativeWindowBuffer*` on OpenHarmony). May be null.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ClientBuffer(*mut c_void);

impl ClientBuffer {
    /// Wrap a raw client buffer pointer.
    ///
    /// # Safety
    /// `ptr` must be null or point to a window buffer that stays alive for
    /// as long as this handle is used.
    pub unsafe fn from_raw(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0
    }
}

impl fmt::Debug for ClientBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientBuffer({:p})", self.0)
    }
}

/// Resolved native buffer (`OH_NativeBuffer*`). Only a [`NativePlatform`]
/// produces these.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeBuffer(NonNull<c_void>);

impl NativeBuffer {
    /// # Safety
    /// `ptr` must point to a live native buffer owned by the window system.
    pub unsafe fn from_raw(ptr: NonNull<c_void>) -> Self {
        Self(ptr)
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

impl fmt::Debug for NativeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeBuffer({:p})", self.0)
    }
}

// SAFETY: the handle is an opaque token; all access goes through the
// platform's thread-safe reference-counted C API.
unsafe impl Send for NativeBuffer {}
unsafe impl Sync for NativeBuffer {}

/// Native window handle (`OHNativeWindow*`).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NativeWindow(NonNull<c_void>);

impl NativeWindow {
    /// # Safety
    /// `ptr` must point to a native window that outlives every surface
    /// created from it.
    pub unsafe fn from_raw(ptr: NonNull<c_void>) -> Self {
        Self(ptr)
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

impl fmt::Debug for NativeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeWindow({:p})", self.0)
    }
}

// SAFETY: see `NativeBuffer`.
unsafe impl Send for NativeWindow {}
unsafe impl Sync for NativeWindow {}

bitflags! {
    /// `OH_NativeBuffer_Usage` bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NativeBufferUsage: u64 {
        const CPU_READ = 1 << 0;
        const CPU_WRITE = 1 << 1;
        const MEM_DMA = 1 << 3;
        /// Buffer will be rendered to by the GPU.
        const HW_RENDER = 1 << 8;
        /// Buffer will be sampled by the GPU.
        const HW_TEXTURE = 1 << 9;
        const CPU_READ_OFTEN = 1 << 16;
        const ALIGNMENT_512 = 1 << 18;

        const _ = !0;
    }
}

/// `OH_NativeBuffer_Config` as seen by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeBufferConfig {
    pub width: u32,
    pub height: u32,
    pub format: NativePixelFormat,
    pub usage: NativeBufferUsage,
    pub stride: u32,
}

/// Window-system services consumed by the importer and surface negotiator.
pub trait NativePlatform: Send + Sync {
    /// Resolve a client buffer to its native buffer.
    fn resolve_buffer(&self, client: ClientBuffer) -> Option<NativeBuffer>;

    fn buffer_config(&self, buffer: NativeBuffer) -> NativeBufferConfig;

    /// Increment the buffer's reference count.
    fn acquire_buffer(&self, buffer: NativeBuffer);

    /// Decrement the buffer's reference count.
    fn release_buffer(&self, buffer: NativeBuffer);

    /// Surface id of the window, `None` when the handle is not a live window.
    fn window_surface_id(&self, window: NativeWindow) -> Option<u64>;
}

/// One strong reference on a native buffer, released on drop.
pub(crate) struct NativeBufferRef {
    platform: Arc<dyn NativePlatform>,
    buffer: NativeBuffer,
}

impl NativeBufferRef {
    pub(crate) fn acquire(platform: Arc<dyn NativePlatform>, buffer: NativeBuffer) -> Self {
        platform.acquire_buffer(buffer);
        Self { platform, buffer }
    }

    pub(crate) fn buffer(&self) -> NativeBuffer {
        self.buffer
    }
}

impl Drop for NativeBufferRef {
    fn drop(&mut self) {
        self.platform.release_buffer(self.buffer);
    }
}
