// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Native pixel format → Vulkan format translation.
//!
//! The translation is a static table. Codes missing from it are vendor
//! formats the compositor allocated for its own hardware; those are treated
//! as opaque YUV data that can only be sampled through an external format
//! and a YCbCr conversion, never as an error.

use std::fmt;

use vulkanalia::vk;

/// `OH_NativeBuffer_Format` code.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativePixelFormat(pub i32);

impl NativePixelFormat {
    pub const RGB_565: Self = Self(3);
    pub const RGBA_5658: Self = Self(4);
    pub const RGBX_4444: Self = Self(5);
    pub const RGBA_4444: Self = Self(6);
    pub const RGB_444: Self = Self(7);
    pub const RGBX_5551: Self = Self(8);
    pub const RGBA_5551: Self = Self(9);
    pub const RGB_555: Self = Self(10);
    pub const RGBX_8888: Self = Self(11);
    pub const RGBA_8888: Self = Self(12);
    pub const RGB_888: Self = Self(13);
    pub const BGR_565: Self = Self(14);
    pub const BGRX_4444: Self = Self(15);
    pub const BGRA_4444: Self = Self(16);
    pub const BGRX_5551: Self = Self(17);
    pub const BGRA_5551: Self = Self(18);
    pub const BGRX_8888: Self = Self(19);
    pub const BGRA_8888: Self = Self(20);
    pub const YUV_422_I: Self = Self(21);
    pub const YCBCR_422_SP: Self = Self(22);
    pub const YCRCB_422_SP: Self = Self(23);
    pub const YCBCR_420_SP: Self = Self(24);
    pub const YCRCB_420_SP: Self = Self(25);
    pub const YCBCR_422_P: Self = Self(26);
    pub const YCRCB_422_P: Self = Self(27);
    pub const YCBCR_420_P: Self = Self(28);
    pub const YCRCB_420_P: Self = Self(29);
    pub const YUYV_422_PKG: Self = Self(30);
    pub const UYVY_422_PKG: Self = Self(31);
    pub const YVYU_422_PKG: Self = Self(32);
    pub const VYUY_422_PKG: Self = Self(33);
    pub const RGBA_1010102: Self = Self(34);
    pub const YCBCR_P010: Self = Self(35);
    pub const YCRCB_P010: Self = Self(36);
    /// Codes at or above this value are vendor private.
    pub const VENDOR_MASK: Self = Self(0x7FFF_0000);
}

impl fmt::Debug for NativePixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match lookup(*self) {
            Some(entry) => write!(f, "{}({})", entry.name, self.0),
            None => write!(f, "VENDOR(0x{:x})", self.0),
        }
    }
}

/// Result of translating a native pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatClassification {
    /// Best Vulkan equivalent. YUV and vendor codes get an RGB8 placeholder.
    pub vk_format: vk::Format,
    /// Data needs a YCbCr conversion (or external format) to be sampled.
    pub is_yuv: bool,
    pub is_depth_or_stencil: bool,
}

/// Placeholder used for YUV and vendor formats.
const YUV_PLACEHOLDER: vk::Format = vk::Format::R8G8B8_UNORM;

struct FormatEntry {
    code: NativePixelFormat,
    name: &'static str,
    vk_format: vk::Format,
    is_yuv: bool,
}

const fn rgb(code: NativePixelFormat, name: &'static str, vk_format: vk::Format) -> FormatEntry {
    FormatEntry {
        code,
        name,
        vk_format,
        is_yuv: false,
    }
}

const fn yuv(code: NativePixelFormat, name: &'static str) -> FormatEntry {
    FormatEntry {
        code,
        name,
        vk_format: YUV_PLACEHOLDER,
        is_yuv: true,
    }
}

static FORMAT_TABLE: &[FormatEntry] = &[
    rgb(NativePixelFormat::RGBA_8888, "RGBA_8888", vk::Format::R8G8B8A8_UNORM),
    // RGBX is backed by an RGBA image whose alpha is ignored.
    rgb(NativePixelFormat::RGBX_8888, "RGBX_8888", vk::Format::R8G8B8A8_UNORM),
    rgb(NativePixelFormat::RGB_888, "RGB_888", vk::Format::R8G8B8_UNORM),
    rgb(NativePixelFormat::RGB_565, "RGB_565", vk::Format::R5G6B5_UNORM_PACK16),
    rgb(NativePixelFormat::BGRA_8888, "BGRA_8888", vk::Format::B8G8R8A8_UNORM),
    rgb(NativePixelFormat::BGRA_5551, "BGRA_5551", vk::Format::R5G5B5A1_UNORM_PACK16),
    rgb(NativePixelFormat::RGBA_4444, "RGBA_4444", vk::Format::R4G4B4A4_UNORM_PACK16),
    rgb(NativePixelFormat::BGRA_4444, "BGRA_4444", vk::Format::R4G4B4A4_UNORM_PACK16),
    rgb(
        NativePixelFormat::RGBA_1010102,
        "RGBA_1010102",
        vk::Format::A2B10G10R10_UNORM_PACK32,
    ),
    yuv(NativePixelFormat::YUV_422_I, "YUV_422_I"),
    yuv(NativePixelFormat::YCBCR_422_SP, "YCBCR_422_SP"),
    yuv(NativePixelFormat::YCRCB_422_SP, "YCRCB_422_SP"),
    yuv(NativePixelFormat::YCBCR_420_SP, "YCBCR_420_SP"),
    yuv(NativePixelFormat::YCRCB_420_SP, "YCRCB_420_SP"),
    yuv(NativePixelFormat::YCBCR_422_P, "YCBCR_422_P"),
    yuv(NativePixelFormat::YCRCB_422_P, "YCRCB_422_P"),
    yuv(NativePixelFormat::YCBCR_420_P, "YCBCR_420_P"),
    yuv(NativePixelFormat::YCRCB_420_P, "YCRCB_420_P"),
    yuv(NativePixelFormat::YUYV_422_PKG, "YUYV_422_PKG"),
    yuv(NativePixelFormat::UYVY_422_PKG, "UYVY_422_PKG"),
    yuv(NativePixelFormat::YVYU_422_PKG, "YVYU_422_PKG"),
    yuv(NativePixelFormat::VYUY_422_PKG, "VYUY_422_PKG"),
    yuv(NativePixelFormat::YCBCR_P010, "YCBCR_P010"),
    yuv(NativePixelFormat::YCRCB_P010, "YCRCB_P010"),
];

fn lookup(code: NativePixelFormat) -> Option<&'static FormatEntry> {
    FORMAT_TABLE.iter().find(|entry| entry.code == code)
}

/// Translate a native pixel format code. Never fails.
pub fn classify(code: NativePixelFormat) -> FormatClassification {
    match lookup(code) {
        Some(entry) => FormatClassification {
            vk_format: entry.vk_format,
            is_yuv: entry.is_yuv,
            is_depth_or_stencil: has_depth_or_stencil(entry.vk_format),
        },
        None => FormatClassification {
            vk_format: YUV_PLACEHOLDER,
            is_yuv: true,
            is_depth_or_stencil: false,
        },
    }
}

const DEPTH_STENCIL_FORMATS: [vk::Format; 7] = [
    vk::Format::D16_UNORM,
    vk::Format::X8_D24_UNORM_PACK32,
    vk::Format::D32_SFLOAT,
    vk::Format::S8_UINT,
    vk::Format::D16_UNORM_S8_UINT,
    vk::Format::D24_UNORM_S8_UINT,
    vk::Format::D32_SFLOAT_S8_UINT,
];

pub fn has_depth_or_stencil(format: vk::Format) -> bool {
    DEPTH_STENCIL_FORMATS.contains(&format)
}

/// Whether `format` is one of the `VK_KHR_sampler_ycbcr_conversion` (or
/// `VK_EXT_ycbcr_2plane_444_formats`) formats that require a sampler YCbCr
/// conversion to be sampled.
pub fn is_ycbcr_format(format: vk::Format) -> bool {
    // G8B8G8R8_422_UNORM ..= G16_B16_R16_3PLANE_444_UNORM
    const KHR_FIRST: i32 = 1_000_156_000;
    const KHR_LAST: i32 = 1_000_156_033;
    // G8_B8R8_2PLANE_444_UNORM ..= G16_B16R16_2PLANE_444_UNORM
    const EXT_444_FIRST: i32 = 1_000_330_000;
    const EXT_444_LAST: i32 = 1_000_330_003;

    let raw = format.as_raw();
    (KHR_FIRST..=KHR_LAST).contains(&raw) || (EXT_444_FIRST..=EXT_444_LAST).contains(&raw)
}

fn sampleable_bits() -> vk::FormatFeatureFlags {
    vk::FormatFeatureFlags::SAMPLED_IMAGE | vk::FormatFeatureFlags::SAMPLED_IMAGE_FILTER_LINEAR
}

/// Features needed to use a format as a texture that may also be rendered
/// to.
pub fn has_full_texture_support(features: vk::FormatFeatureFlags) -> bool {
    features.contains(sampleable_bits() | vk::FormatFeatureFlags::COLOR_ATTACHMENT)
        || features.contains(vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT)
}

/// Features needed to use a format as a sample-only texture.
pub fn has_non_renderable_texture_support(features: vk::FormatFeatureFlags) -> bool {
    features.contains(sampleable_bits())
        || features.contains(vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT)
}

pub fn is_renderable(features: vk::FormatFeatureFlags) -> bool {
    features.intersects(
        vk::FormatFeatureFlags::COLOR_ATTACHMENT
            | vk::FormatFeatureFlags::DEPTH_STENCIL_ATTACHMENT,
    )
}

pub fn is_sampleable(features: vk::FormatFeatureFlags) -> bool {
    features.contains(sampleable_bits())
}
