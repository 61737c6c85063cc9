// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! YCbCr conversion description negotiated for YUV and external-format
//! buffers.

use vulkanalia::vk;

use crate::driver::NativeBufferProperties;

/// Whether the conversion may use linear chroma reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearFilterSupport {
    Supported,
    Unsupported,
}

/// Parameters a sampler needs to read an opaque or multi-planar buffer.
///
/// This only records which conversion applies; the sampler-side
/// `VkSamplerYcbcrConversion` object is created by whoever builds samplers
/// for the image.
#[derive(Debug, Clone, Copy)]
pub struct ConversionDescription {
    /// External format token, 0 when `format` is concrete.
    pub external_format: u64,
    /// Concrete multi-planar format, `UNDEFINED` for external formats.
    pub format: vk::Format,
    pub model: vk::SamplerYcbcrModelConversion,
    pub range: vk::SamplerYcbcrRange,
    pub x_chroma_offset: vk::ChromaLocation,
    pub y_chroma_offset: vk::ChromaLocation,
    /// Always `NEAREST`; samplers may switch to `LINEAR` when
    /// `linear_filter` is supported.
    pub chroma_filter: vk::Filter,
    pub components: vk::ComponentMapping,
    pub linear_filter: LinearFilterSupport,
}

impl ConversionDescription {
    /// Build from the driver's suggestions for a specific buffer.
    pub fn from_properties(props: &NativeBufferProperties) -> Self {
        let external = props.is_external();
        let linear_filter = if props
            .format_features
            .contains(vk::FormatFeatureFlags::SAMPLED_IMAGE_YCBCR_CONVERSION_LINEAR_FILTER)
        {
            LinearFilterSupport::Supported
        } else {
            LinearFilterSupport::Unsupported
        };

        Self {
            external_format: if external { props.external_format } else { 0 },
            format: if external {
                vk::Format::UNDEFINED
            } else {
                props.format
            },
            model: props.suggested_ycbcr_model,
            range: props.suggested_ycbcr_range,
            x_chroma_offset: props.suggested_x_chroma_offset,
            y_chroma_offset: props.suggested_y_chroma_offset,
            chroma_filter: vk::Filter::NEAREST,
            components: props.sampler_ycbcr_conversion_components,
            linear_filter,
        }
    }

    pub fn is_external(&self) -> bool {
        self.external_format != 0
    }
}
