// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! OpenHarmony native buffer / native window bindings.

#![allow(non_snake_case, non_camel_case_types)]

use std::ffi::c_void;
use std::ptr::{self, NonNull};

use libc::c_int;

use crate::format::NativePixelFormat;
use crate::native::{
    ClientBuffer, NativeBuffer, NativeBufferConfig, NativeBufferUsage, NativePlatform,
    NativeWindow,
};

pub type OH_NativeBuffer = c_void;
pub type OHNativeWindowBuffer = c_void;
pub type OHNativeWindow = c_void;

#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
pub struct OH_NativeBuffer_Config {
    pub width: i32,
    pub height: i32,
    pub format: i32,
    pub usage: i32,
    pub stride: i32,
}

#[link(name = "native_buffer")]
unsafe extern "C" {
    fn OH_NativeBuffer_FromNativeWindowBuffer(
        windowBuffer: *mut OHNativeWindowBuffer,
        buffer: *mut *mut OH_NativeBuffer,
    ) -> i32;
    fn OH_NativeBuffer_GetConfig(buffer: *mut OH_NativeBuffer, config: *mut OH_NativeBuffer_Config);
    fn OH_NativeBuffer_Reference(buffer: *mut OH_NativeBuffer) -> c_int;
    fn OH_NativeBuffer_Unreference(buffer: *mut OH_NativeBuffer) -> c_int;
}

#[link(name = "native_window")]
unsafe extern "C" {
    fn OH_NativeWindow_GetSurfaceId(window: *mut OHNativeWindow, surfaceId: *mut u64)
    -> i32;
}

/// [`NativePlatform`] backed by the system `OH_NativeBuffer` API.
#[derive(Debug, Default, Clone, Copy)]
pub struct OhosPlatform;

impl NativePlatform for OhosPlatform {
    fn resolve_buffer(&self, client: ClientBuffer) -> Option<NativeBuffer> {
        let mut buffer: *mut OH_NativeBuffer = ptr::null_mut();
        // SAFETY: `client` wraps a window buffer pointer the caller vouched
        // for in `ClientBuffer::from_raw`; `buffer` is a valid out pointer.
        let status = unsafe { OH_NativeBuffer_FromNativeWindowBuffer(client.as_ptr(), &mut buffer) };
        if status != 0 {
            tracing::debug!(?client, status, "OH_NativeBuffer_FromNativeWindowBuffer failed");
            return None;
        }
        // SAFETY: a successful call yields a live native buffer.
        NonNull::new(buffer).map(|ptr| unsafe { NativeBuffer::from_raw(ptr) })
    }

    fn buffer_config(&self, buffer: NativeBuffer) -> NativeBufferConfig {
        let mut raw = OH_NativeBuffer_Config::default();
        // SAFETY: `buffer` is live by construction of `NativeBuffer`.
        unsafe { OH_NativeBuffer_GetConfig(buffer.as_ptr(), &mut raw) };
        NativeBufferConfig {
            width: raw.width.max(0) as u32,
            height: raw.height.max(0) as u32,
            format: NativePixelFormat(raw.format),
            usage: NativeBufferUsage::from_bits_retain(raw.usage as u32 as u64),
            stride: raw.stride.max(0) as u32,
        }
    }

    fn acquire_buffer(&self, buffer: NativeBuffer) {
        // SAFETY: see `buffer_config`.
        let status = unsafe { OH_NativeBuffer_Reference(buffer.as_ptr()) };
        if status != 0 {
            tracing::warn!(?buffer, status, "OH_NativeBuffer_Reference failed");
        }
    }

    fn release_buffer(&self, buffer: NativeBuffer) {
        // SAFETY: see `buffer_config`.
        let status = unsafe { OH_NativeBuffer_Unreference(buffer.as_ptr()) };
        if status != 0 {
            tracing::warn!(?buffer, status, "OH_NativeBuffer_Unreference failed");
        }
    }

    fn window_surface_id(&self, window: NativeWindow) -> Option<u64> {
        let mut surface_id: u64 = 0;
        // SAFETY: `window` wraps a live native window; `surface_id` is a
        // valid out pointer.
        let status = unsafe { OH_NativeWindow_GetSurfaceId(window.as_ptr(), &mut surface_id) };
        (status == 0).then_some(surface_id)
    }
}
