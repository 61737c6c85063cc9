// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Imported image: a VkImage plus the native buffer memory bound to it.

use std::sync::Arc;

use vulkanalia::vk;

use crate::attributes::keys;
use crate::conversion::ConversionDescription;
use crate::driver::BufferDriver;
use crate::error::{NativeBufferError, Result};
use crate::format::NativePixelFormat;
use crate::import::ImportPhase;
use crate::native::{NativeBuffer, NativeBufferRef};

/// Texture binding type of the imported image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureType {
    TwoD,
    TwoDArray,
}

impl TextureType {
    pub fn for_layer_count(layer_count: u32) -> Self {
        if layer_count > 1 {
            Self::TwoDArray
        } else {
            Self::TwoD
        }
    }

    pub fn view_type(&self) -> vk::ImageViewType {
        match self {
            Self::TwoD => vk::ImageViewType::_2D,
            Self::TwoDArray => vk::ImageViewType::_2D_ARRAY,
        }
    }
}

/// Derived description of an imported image.
#[derive(Debug, Clone)]
pub struct ImportedImageInfo {
    pub extent: vk::Extent3D,
    pub native_format: NativePixelFormat,
    /// Derived format: the driver's concrete format, or the translator's
    /// placeholder for external formats.
    pub format: vk::Format,
    pub is_external: bool,
    pub level_count: u32,
    pub layer_count: u32,
    pub tiling: vk::ImageTiling,
    pub usage: vk::ImageUsageFlags,
    pub create_flags: vk::ImageCreateFlags,
    pub texture_type: TextureType,
    pub renderable: bool,
    pub sampleable: bool,
    pub conversion: Option<ConversionDescription>,
    /// Requested `EGL_GL_COLORSPACE_KHR` value.
    pub color_space: i64,
}

/// GPU image backed by an imported native buffer.
///
/// Owns the image, its dedicated memory and one reference on the native
/// buffer. [`ImportedImage::release`] tears all three down exactly once;
/// dropping a still-ready image does the same.
pub struct ImportedImage {
    driver: Arc<dyn BufferDriver>,
    image: Option<vk::Image>,
    memory: Option<vk::DeviceMemory>,
    buffer_ref: Option<NativeBufferRef>,
    info: ImportedImageInfo,
}

impl ImportedImage {
    pub(crate) fn new(
        driver: Arc<dyn BufferDriver>,
        image: vk::Image,
        memory: vk::DeviceMemory,
        buffer_ref: NativeBufferRef,
        info: ImportedImageInfo,
    ) -> Self {
        Self {
            driver,
            image: Some(image),
            memory: Some(memory),
            buffer_ref: Some(buffer_ref),
            info,
        }
    }

    pub fn state(&self) -> ImportPhase {
        if self.image.is_some() {
            ImportPhase::Ready
        } else {
            ImportPhase::Released
        }
    }

    /// The image handle, `None` after release.
    pub fn image(&self) -> Option<vk::Image> {
        self.image
    }

    pub fn memory(&self) -> Option<vk::DeviceMemory> {
        self.memory
    }

    /// Native buffer this image imports, `None` after release.
    pub fn native_buffer(&self) -> Option<NativeBuffer> {
        self.buffer_ref.as_ref().map(NativeBufferRef::buffer)
    }

    pub fn info(&self) -> &ImportedImageInfo {
        &self.info
    }

    pub fn format(&self) -> vk::Format {
        self.info.format
    }

    pub fn extent(&self) -> vk::Extent3D {
        self.info.extent
    }

    pub fn level_count(&self) -> u32 {
        self.info.level_count
    }

    pub fn layer_count(&self) -> u32 {
        self.info.layer_count
    }

    pub fn is_renderable(&self) -> bool {
        self.info.renderable
    }

    pub fn is_sampleable(&self) -> bool {
        self.info.sampleable
    }

    /// True whenever the image must be sampled through a YCbCr conversion,
    /// even if the underlying data is not strictly YUV.
    pub fn is_yuv(&self) -> bool {
        self.info.conversion.is_some()
    }

    pub fn is_external(&self) -> bool {
        self.info.is_external
    }

    pub fn conversion(&self) -> Option<&ConversionDescription> {
        self.info.conversion.as_ref()
    }

    pub fn is_cube_map(&self) -> bool {
        false
    }

    pub fn has_protected_content(&self) -> bool {
        false
    }

    pub fn has_front_buffer_usage(&self) -> bool {
        false
    }

    /// Multisample count; native buffers are never multisampled.
    pub fn samples(&self) -> u32 {
        0
    }

    /// Attributes to replay when the image is re-created from this sibling.
    pub fn creation_attributes(&self) -> Vec<i64> {
        if self.info.color_space != keys::GL_COLORSPACE_LINEAR_KHR {
            vec![keys::GL_COLORSPACE_KHR, self.info.color_space]
        } else {
            Vec::new()
        }
    }

    /// Free the memory, destroy the image and drop the native buffer
    /// reference.
    ///
    /// Releasing twice is a caller bug; the second call touches nothing and
    /// returns [`NativeBufferError::AlreadyReleased`].
    pub fn release(&mut self) -> Result<()> {
        let Some(image) = self.image.take() else {
            tracing::warn!(format = ?self.info.format, "Imported image released twice");
            return Err(NativeBufferError::AlreadyReleased);
        };
        if let Some(memory) = self.memory.take() {
            self.driver.free_memory(memory);
        }
        self.driver.destroy_image(image);
        // Last: the native buffer must outlive the image that aliases it.
        self.buffer_ref = None;

        tracing::debug!(?image, "Released imported image");
        Ok(())
    }
}

impl std::fmt::Debug for ImportedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportedImage")
            .field("image", &self.image)
            .field("state", &self.state())
            .field("info", &self.info)
            .finish()
    }
}

impl Drop for ImportedImage {
    fn drop(&mut self) {
        if self.state() == ImportPhase::Ready {
            tracing::warn!(format = ?self.info.format, "Imported image dropped without release; releasing");
            if let Err(e) = self.release() {
                tracing::warn!(error = %e, "Failed to release dropped image");
            }
        }
    }
}
