// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Recording mock driver and platform shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use native_buffer_vulkan::{
    BufferDriver, ClientBuffer, ImageCreateDesc, MemoryImportDesc, NativeBuffer,
    NativeBufferConfig, NativeBufferProperties, NativeBufferUsage, NativePixelFormat,
    NativePlatform, NativeWindow, SurfaceDriver,
};
use parking_lot::Mutex;
use vulkanalia::vk::{self, Handle};

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fake, never dereferenced, non-null pointer.
fn fake_ptr(addr: usize) -> NonNull<c_void> {
    NonNull::new(addr as *mut c_void).unwrap()
}

// ============================================================================
// Platform
// ============================================================================

#[derive(Default)]
pub struct MockPlatform {
    next_addr: AtomicU64,
    buffers: Mutex<HashMap<usize, (NativeBuffer, NativeBufferConfig)>>,
    windows: Mutex<HashMap<usize, u64>>,
    ref_counts: Mutex<HashMap<NativeBuffer, i64>>,
}

impl MockPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_addr: AtomicU64::new(0x1000),
            ..Default::default()
        })
    }

    fn alloc_addr(&self) -> usize {
        self.next_addr.fetch_add(0x100, Ordering::Relaxed) as usize
    }

    /// Register a window buffer and return the client handle pointing at it.
    pub fn add_buffer(&self, config: NativeBufferConfig) -> ClientBuffer {
        let client_addr = self.alloc_addr();
        let buffer = unsafe { NativeBuffer::from_raw(fake_ptr(client_addr + 0x10)) };
        self.buffers.lock().insert(client_addr, (buffer, config));
        unsafe { ClientBuffer::from_raw(client_addr as *mut c_void) }
    }

    /// A client handle the platform cannot resolve.
    pub fn unknown_buffer(&self) -> ClientBuffer {
        unsafe { ClientBuffer::from_raw(self.alloc_addr() as *mut c_void) }
    }

    pub fn native_buffer(&self, client: ClientBuffer) -> NativeBuffer {
        self.buffers.lock()[&(client.as_ptr() as usize)].0
    }

    /// Net references this crate holds on `buffer`.
    pub fn ref_count(&self, buffer: NativeBuffer) -> i64 {
        self.ref_counts.lock().get(&buffer).copied().unwrap_or(0)
    }

    pub fn add_window(&self, surface_id: u64) -> NativeWindow {
        let addr = self.alloc_addr();
        self.windows.lock().insert(addr, surface_id);
        unsafe { NativeWindow::from_raw(fake_ptr(addr)) }
    }

    pub fn unknown_window(&self) -> NativeWindow {
        unsafe { NativeWindow::from_raw(fake_ptr(self.alloc_addr())) }
    }
}

impl NativePlatform for MockPlatform {
    fn resolve_buffer(&self, client: ClientBuffer) -> Option<NativeBuffer> {
        self.buffers
            .lock()
            .get(&(client.as_ptr() as usize))
            .map(|(buffer, _)| *buffer)
    }

    fn buffer_config(&self, buffer: NativeBuffer) -> NativeBufferConfig {
        self.buffers
            .lock()
            .values()
            .find(|(b, _)| *b == buffer)
            .map(|(_, config)| *config)
            .unwrap()
    }

    fn acquire_buffer(&self, buffer: NativeBuffer) {
        *self.ref_counts.lock().entry(buffer).or_insert(0) += 1;
    }

    fn release_buffer(&self, buffer: NativeBuffer) {
        *self.ref_counts.lock().entry(buffer).or_insert(0) -= 1;
    }

    fn window_surface_id(&self, window: NativeWindow) -> Option<u64> {
        self.windows.lock().get(&(window.as_ptr() as usize)).copied()
    }
}

pub fn config(format: NativePixelFormat, usage: NativeBufferUsage) -> NativeBufferConfig {
    NativeBufferConfig {
        width: 1920,
        height: 1080,
        format,
        usage,
        stride: 1920 * 4,
    }
}

// ============================================================================
// Buffer driver
// ============================================================================

#[derive(Debug, Clone)]
pub enum DriverCall {
    QueryProperties(NativeBuffer),
    CreateImage(ImageCreateDesc),
    DestroyImage(vk::Image),
    ImportMemory(MemoryImportDesc),
    FreeMemory(vk::DeviceMemory),
}

pub struct MockDriver {
    next_handle: AtomicU64,
    properties: Mutex<Result<NativeBufferProperties, vk::ErrorCode>>,
    format_features: Mutex<HashMap<i32, vk::FormatFeatureFlags>>,
    memory_properties: Mutex<vk::PhysicalDeviceMemoryProperties>,
    create_image_error: Mutex<Option<vk::ErrorCode>>,
    import_memory_error: Mutex<Option<vk::ErrorCode>>,
    calls: Mutex<Vec<DriverCall>>,
}

/// Features a device reports for a fully supported color format.
pub fn full_color_features() -> vk::FormatFeatureFlags {
    vk::FormatFeatureFlags::SAMPLED_IMAGE
        | vk::FormatFeatureFlags::SAMPLED_IMAGE_FILTER_LINEAR
        | vk::FormatFeatureFlags::COLOR_ATTACHMENT
        | vk::FormatFeatureFlags::COLOR_ATTACHMENT_BLEND
        | vk::FormatFeatureFlags::TRANSFER_SRC
        | vk::FormatFeatureFlags::TRANSFER_DST
}

pub fn concrete_properties(format: vk::Format) -> NativeBufferProperties {
    NativeBufferProperties {
        allocation_size: 1920 * 1080 * 4,
        memory_type_bits: 0b11,
        format,
        external_format: 0,
        format_features: full_color_features(),
        sampler_ycbcr_conversion_components: vk::ComponentMapping::default(),
        suggested_ycbcr_model: vk::SamplerYcbcrModelConversion::RGB_IDENTITY,
        suggested_ycbcr_range: vk::SamplerYcbcrRange::ITU_FULL,
        suggested_x_chroma_offset: vk::ChromaLocation::COSITED_EVEN,
        suggested_y_chroma_offset: vk::ChromaLocation::COSITED_EVEN,
    }
}

pub fn external_properties(external_format: u64) -> NativeBufferProperties {
    NativeBufferProperties {
        allocation_size: 1920 * 1080 * 3 / 2,
        memory_type_bits: 0b11,
        format: vk::Format::UNDEFINED,
        external_format,
        format_features: vk::FormatFeatureFlags::SAMPLED_IMAGE
            | vk::FormatFeatureFlags::SAMPLED_IMAGE_FILTER_LINEAR,
        sampler_ycbcr_conversion_components: vk::ComponentMapping::default(),
        suggested_ycbcr_model: vk::SamplerYcbcrModelConversion::YCBCR_709,
        suggested_ycbcr_range: vk::SamplerYcbcrRange::ITU_NARROW,
        suggested_x_chroma_offset: vk::ChromaLocation::MIDPOINT,
        suggested_y_chroma_offset: vk::ChromaLocation::MIDPOINT,
    }
}

impl MockDriver {
    pub fn new(properties: NativeBufferProperties) -> Arc<Self> {
        let mut memory = vk::PhysicalDeviceMemoryProperties::default();
        memory.memory_type_count = 2;
        memory.memory_types[0].property_flags = vk::MemoryPropertyFlags::HOST_VISIBLE;
        memory.memory_types[1].property_flags = vk::MemoryPropertyFlags::DEVICE_LOCAL;

        Arc::new(Self {
            next_handle: AtomicU64::new(1),
            properties: Mutex::new(Ok(properties)),
            format_features: Mutex::new(HashMap::new()),
            memory_properties: Mutex::new(memory),
            create_image_error: Mutex::new(None),
            import_memory_error: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn fail_query(&self, error: vk::ErrorCode) {
        *self.properties.lock() = Err(error);
    }

    pub fn set_format_features(&self, format: vk::Format, features: vk::FormatFeatureFlags) {
        self.format_features.lock().insert(format.as_raw(), features);
    }

    pub fn fail_create_image(&self, error: vk::ErrorCode) {
        *self.create_image_error.lock() = Some(error);
    }

    pub fn fail_import_memory(&self, error: vk::ErrorCode) {
        *self.import_memory_error.lock() = Some(error);
    }

    /// Remove every device-local memory type.
    pub fn host_visible_memory_only(&self) {
        let mut memory = self.memory_properties.lock();
        memory.memory_types[1].property_flags = vk::MemoryPropertyFlags::HOST_VISIBLE;
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().clone()
    }

    pub fn created_images(&self) -> Vec<ImageCreateDesc> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DriverCall::CreateImage(desc) => Some(desc),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&DriverCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    fn next(&self) -> u64 {
        self.next_handle.fetch_add(1, Ordering::Relaxed)
    }
}

impl BufferDriver for MockDriver {
    fn native_buffer_properties(
        &self,
        buffer: NativeBuffer,
    ) -> Result<NativeBufferProperties, vk::ErrorCode> {
        self.calls.lock().push(DriverCall::QueryProperties(buffer));
        *self.properties.lock()
    }

    fn format_features(&self, format: vk::Format) -> vk::FormatFeatureFlags {
        self.format_features
            .lock()
            .get(&format.as_raw())
            .copied()
            .unwrap_or_else(full_color_features)
    }

    fn memory_properties(&self) -> vk::PhysicalDeviceMemoryProperties {
        *self.memory_properties.lock()
    }

    fn create_image(&self, desc: &ImageCreateDesc) -> Result<vk::Image, vk::ErrorCode> {
        self.calls.lock().push(DriverCall::CreateImage(desc.clone()));
        match *self.create_image_error.lock() {
            Some(error) => Err(error),
            None => Ok(vk::Image::from_raw(self.next())),
        }
    }

    fn destroy_image(&self, image: vk::Image) {
        self.calls.lock().push(DriverCall::DestroyImage(image));
    }

    fn import_memory(&self, desc: &MemoryImportDesc) -> Result<vk::DeviceMemory, vk::ErrorCode> {
        self.calls.lock().push(DriverCall::ImportMemory(*desc));
        match *self.import_memory_error.lock() {
            Some(error) => Err(error),
            None => Ok(vk::DeviceMemory::from_raw(self.next())),
        }
    }

    fn free_memory(&self, memory: vk::DeviceMemory) {
        self.calls.lock().push(DriverCall::FreeMemory(memory));
    }
}

// ============================================================================
// Surface driver
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceCall {
    Create,
    Capabilities,
    Destroy,
}

pub struct MockSurfaceDriver {
    next_handle: AtomicU64,
    extent: Mutex<vk::Extent2D>,
    create_error: Mutex<Option<vk::ErrorCode>>,
    capabilities_error: Mutex<Option<vk::ErrorCode>>,
    calls: Mutex<Vec<SurfaceCall>>,
}

impl MockSurfaceDriver {
    pub fn new(width: u32, height: u32) -> Arc<Self> {
        Arc::new(Self {
            next_handle: AtomicU64::new(1),
            extent: Mutex::new(vk::Extent2D { width, height }),
            create_error: Mutex::new(None),
            capabilities_error: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn resize(&self, width: u32, height: u32) {
        *self.extent.lock() = vk::Extent2D { width, height };
    }

    pub fn fail_create(&self, error: vk::ErrorCode) {
        *self.create_error.lock() = Some(error);
    }

    pub fn fail_capabilities(&self, error: Option<vk::ErrorCode>) {
        *self.capabilities_error.lock() = error;
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().clone()
    }
}

impl SurfaceDriver for MockSurfaceDriver {
    fn create_surface(&self, _window: NativeWindow) -> Result<vk::SurfaceKHR, vk::ErrorCode> {
        self.calls.lock().push(SurfaceCall::Create);
        match *self.create_error.lock() {
            Some(error) => Err(error),
            None => Ok(vk::SurfaceKHR::from_raw(
                self.next_handle.fetch_add(1, Ordering::Relaxed),
            )),
        }
    }

    fn surface_capabilities(
        &self,
        _surface: vk::SurfaceKHR,
    ) -> Result<vk::SurfaceCapabilitiesKHR, vk::ErrorCode> {
        self.calls.lock().push(SurfaceCall::Capabilities);
        if let Some(error) = *self.capabilities_error.lock() {
            return Err(error);
        }
        Ok(vk::SurfaceCapabilitiesKHR {
            current_extent: *self.extent.lock(),
            ..Default::default()
        })
    }

    fn destroy_surface(&self, _surface: vk::SurfaceKHR) {
        self.calls.lock().push(SurfaceCall::Destroy);
    }
}
