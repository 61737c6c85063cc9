// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Driver boundary.
//!
//! The embedding renderer owns the `VkInstance`/`VkDevice` and implements
//! these traits on top of them (`vkGetNativeBufferPropertiesOHOS`,
//! `vkCreateImage` with `VkExternalMemoryImageCreateInfo` /
//! `VkExternalFormatOHOS`, `vkAllocateMemory` with
//! `VkImportNativeBufferInfoOHOS` + `VkMemoryDedicatedAllocateInfo`,
//! `vkCreateSurfaceOHOS`, `vkGetPhysicalDeviceSurfaceCapabilitiesKHR`).
//! Every call either completes or fails before returning.

use vulkanalia::vk;

use crate::conversion::ConversionDescription;
use crate::native::{NativeBuffer, NativeWindow};

/// `VkNativeBufferPropertiesOHOS` + chained `VkNativeBufferFormatPropertiesOHOS`.
#[derive(Debug, Clone, Copy)]
pub struct NativeBufferProperties {
    pub allocation_size: vk::DeviceSize,
    pub memory_type_bits: u32,
    /// `UNDEFINED` means the buffer has an opaque external format.
    pub format: vk::Format,
    /// Non-zero external format token when `format` is `UNDEFINED`.
    pub external_format: u64,
    pub format_features: vk::FormatFeatureFlags,
    pub sampler_ycbcr_conversion_components: vk::ComponentMapping,
    pub suggested_ycbcr_model: vk::SamplerYcbcrModelConversion,
    pub suggested_ycbcr_range: vk::SamplerYcbcrRange,
    pub suggested_x_chroma_offset: vk::ChromaLocation,
    pub suggested_y_chroma_offset: vk::ChromaLocation,
}

impl NativeBufferProperties {
    pub fn is_external(&self) -> bool {
        self.format == vk::Format::UNDEFINED
    }
}

/// Everything the driver needs to create the image that will receive the
/// imported memory.
#[derive(Debug, Clone)]
pub struct ImageCreateDesc {
    pub extent: vk::Extent3D,
    /// `UNDEFINED` together with a non-zero `external_format`.
    pub format: vk::Format,
    /// Token for `VkExternalFormatOHOS`, 0 when the format is concrete.
    pub external_format: u64,
    pub tiling: vk::ImageTiling,
    pub usage: vk::ImageUsageFlags,
    pub flags: vk::ImageCreateFlags,
    pub mip_levels: u32,
    pub array_layers: u32,
    pub initial_layout: vk::ImageLayout,
    /// Conversion the image will be sampled through, if any.
    pub conversion: Option<ConversionDescription>,
}

/// Dedicated-allocation import of a native buffer's memory into one image.
#[derive(Debug, Clone, Copy)]
pub struct MemoryImportDesc {
    pub buffer: NativeBuffer,
    /// `VkMemoryDedicatedAllocateInfo::image`; never null.
    pub dedicated_image: vk::Image,
    pub allocation_size: vk::DeviceSize,
    pub memory_type_index: u32,
}

/// Device-level operations used by validation and import.
pub trait BufferDriver: Send + Sync {
    fn native_buffer_properties(
        &self,
        buffer: NativeBuffer,
    ) -> Result<NativeBufferProperties, vk::ErrorCode>;

    /// Optimal-tiling features of a concrete format.
    fn format_features(&self, format: vk::Format) -> vk::FormatFeatureFlags;

    fn memory_properties(&self) -> vk::PhysicalDeviceMemoryProperties;

    fn create_image(&self, desc: &ImageCreateDesc) -> Result<vk::Image, vk::ErrorCode>;

    fn destroy_image(&self, image: vk::Image);

    /// Allocate memory importing the native buffer and bind it to
    /// `desc.dedicated_image`.
    fn import_memory(&self, desc: &MemoryImportDesc) -> Result<vk::DeviceMemory, vk::ErrorCode>;

    fn free_memory(&self, memory: vk::DeviceMemory);
}

/// Instance-level operations used by surface negotiation.
pub trait SurfaceDriver: Send + Sync {
    fn create_surface(&self, window: NativeWindow) -> Result<vk::SurfaceKHR, vk::ErrorCode>;

    fn surface_capabilities(
        &self,
        surface: vk::SurfaceKHR,
    ) -> Result<vk::SurfaceCapabilitiesKHR, vk::ErrorCode>;

    fn destroy_surface(&self, surface: vk::SurfaceKHR);
}

/// Pick the first memory type allowed by `type_bits` that has all of
/// `required` properties.
pub fn find_memory_type_index(
    properties: &vk::PhysicalDeviceMemoryProperties,
    type_bits: u32,
    required: vk::MemoryPropertyFlags,
) -> Option<u32> {
    let count = properties
        .memory_type_count
        .min(properties.memory_types.len() as u32);
    (0..count).find(|&index| {
        type_bits & (1 << index) != 0
            && properties.memory_types[index as usize]
                .property_flags
                .contains(required)
    })
}
