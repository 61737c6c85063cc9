// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

#![allow(clippy::missing_safety_doc)] // Safety documented on the `from_raw` constructors

//! Import window-system native buffers into Vulkan images.
//!
//! A compositor hands out buffers it owns (`OH_NativeBuffer` on OpenHarmony).
//! This crate decides whether such a buffer can be used as a texture or
//! render target, imports it as a `VkImage` with dedicated memory, and
//! negotiates YCbCr sampling for formats the GPU only knows as an opaque
//! external format. It also creates presentation surfaces for native windows.
//!
//! Device and window-system calls go through [`BufferDriver`],
//! [`SurfaceDriver`] and [`NativePlatform`], which the embedding renderer
//! implements on top of its own instance and device.

pub mod attributes;
pub mod config;
pub mod conversion;
pub mod display;
pub mod driver;
pub mod error;
pub mod format;
pub mod image;
pub mod import;
pub mod native;
#[cfg(target_env = "ohos")]
pub mod ohos;
pub mod surface;
pub mod validate;

pub use attributes::AttributeMap;
pub use config::BackendFeatures;
pub use conversion::{ConversionDescription, LinearFilterSupport};
pub use display::{
    config_depth_stencil_formats, is_valid_native_window, select_config_color_formats,
    ConfigBits, ConfigColorFormat, WSI_EXTENSION_NAME,
};
pub use driver::{
    find_memory_type_index, BufferDriver, ImageCreateDesc, MemoryImportDesc,
    NativeBufferProperties, SurfaceDriver,
};
pub use error::{NativeBufferError, Result};
pub use format::{classify, FormatClassification, NativePixelFormat};
pub use image::{ImportedImage, ImportedImageInfo, TextureType};
pub use import::{ImportPhase, NativeBufferImporter};
pub use native::{
    ClientBuffer, NativeBuffer, NativeBufferConfig, NativeBufferUsage, NativePlatform,
    NativeWindow,
};
#[cfg(target_env = "ohos")]
pub use ohos::OhosPlatform;
pub use surface::WindowSurface;
pub use validate::validate_native_buffer;
