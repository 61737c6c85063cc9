// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Display-level queries: window validity and config formats.

use vulkanalia::vk;

use crate::config::BackendFeatures;
use crate::native::{NativePlatform, NativeWindow};

/// Instance extension that provides `vkCreateSurfaceOHOS`.
pub const WSI_EXTENSION_NAME: &str = "VK_OHOS_surface";

/// A window is valid when the platform can name its surface.
pub fn is_valid_native_window(platform: &dyn NativePlatform, window: NativeWindow) -> bool {
    platform.window_surface_id(window).is_some()
}

/// Color buffer layouts a config can advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigColorFormat {
    Rgba8,
    Rgb8,
    Rgb565,
    Rgb10A2,
    Rgba16F,
}

impl ConfigColorFormat {
    pub fn vk_format(&self) -> vk::Format {
        match self {
            Self::Rgba8 => vk::Format::R8G8B8A8_UNORM,
            Self::Rgb8 => vk::Format::R8G8B8_UNORM,
            Self::Rgb565 => vk::Format::R5G6B5_UNORM_PACK16,
            Self::Rgb10A2 => vk::Format::A2B10G10R10_UNORM_PACK32,
            Self::Rgba16F => vk::Format::R16G16B16A16_SFLOAT,
        }
    }

    /// `(red, green, blue, alpha)` bit sizes.
    pub fn bits(&self) -> ConfigBits {
        let (red, green, blue, alpha) = match self {
            Self::Rgba8 => (8, 8, 8, 8),
            Self::Rgb8 => (8, 8, 8, 0),
            Self::Rgb565 => (5, 6, 5, 0),
            Self::Rgb10A2 => (10, 10, 10, 2),
            Self::Rgba16F => (16, 16, 16, 16),
        };
        ConfigBits {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// Color channel sizes of a config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigBits {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl ConfigBits {
    /// Whether a video encoder can consume surfaces of this config.
    pub fn is_recordable(&self) -> bool {
        let rgba8888 = (8, 8, 8, 8);
        let rgb888 = (8, 8, 8, 0);
        let rgb10a2 = (10, 10, 10, 2);
        let bits = (self.red, self.green, self.blue, self.alpha);
        bits == rgba8888 || bits == rgb888 || bits == rgb10a2
    }
}

/// Color formats to build configs from.
///
/// Without a surfaceless format query the device is trusted to present
/// RGB565; otherwise the optional formats are offered only when
/// `supports_format` says the surface accepts them.
pub fn select_config_color_formats(
    features: &BackendFeatures,
    supports_format: impl Fn(vk::Format) -> bool,
) -> Vec<ConfigColorFormat> {
    let mut formats = vec![ConfigColorFormat::Rgba8, ConfigColorFormat::Rgb8];

    if !features.supports_surfaceless_query {
        formats.push(ConfigColorFormat::Rgb565);
        return formats;
    }

    for optional in [
        ConfigColorFormat::Rgb565,
        ConfigColorFormat::Rgb10A2,
        ConfigColorFormat::Rgba16F,
    ] {
        if supports_format(optional.vk_format()) {
            formats.push(optional);
        }
    }

    tracing::debug!(?formats, "Selected config color formats");
    formats
}

/// Depth/stencil formats to build configs from. `UNDEFINED` means a config
/// without depth or stencil.
pub fn config_depth_stencil_formats(supports_stencil8: bool) -> Vec<vk::Format> {
    let mut formats = vec![
        vk::Format::UNDEFINED,
        vk::Format::D24_UNORM_S8_UINT,
        vk::Format::X8_D24_UNORM_PACK32,
        vk::Format::D16_UNORM,
    ];
    if supports_stencil8 {
        formats.push(vk::Format::S8_UINT);
    }
    formats
}
