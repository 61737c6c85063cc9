// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Native buffer import state machine.
//!
//! `Unbound → Configured → ImageCreated → MemoryImported → Ready`. The image
//! object always exists before its memory is imported, and any failure
//! destroys whatever was created so no partial image reaches the caller.

use std::sync::Arc;

use vulkanalia::vk;

use crate::attributes::AttributeMap;
use crate::config::BackendFeatures;
use crate::conversion::ConversionDescription;
use crate::driver::{self, BufferDriver, ImageCreateDesc, MemoryImportDesc, NativeBufferProperties};
use crate::error::{NativeBufferError, Result};
use crate::format::{self, FormatClassification, NativePixelFormat};
use crate::image::{ImportedImage, ImportedImageInfo, TextureType};
use crate::native::{ClientBuffer, NativeBuffer, NativeBufferConfig, NativeBufferRef, NativeBufferUsage, NativePlatform};
use crate::validate;

/// Import progress. [`ImportedImage::state`] reports the last two phases.
///
/// There is no failed phase: a failed transition returns `Err` from
/// [`NativeBufferImporter::import`] after destroying anything it created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportPhase {
    Unbound,
    Configured,
    ImageCreated,
    MemoryImported,
    Ready,
    Released,
}

/// Imported images are always optimally tiled, even when the native buffer
/// is linear.
pub fn derive_tiling() -> vk::ImageTiling {
    vk::ImageTiling::OPTIMAL
}

/// Map native buffer usage to image usage.
///
/// `SAMPLED` is always added, whatever the native usage says.
pub fn derive_usage(
    usage: NativeBufferUsage,
    is_depth_or_stencil: bool,
    external_format: Option<u64>,
    features: &BackendFeatures,
) -> vk::ImageUsageFlags {
    let mut flags = vk::ImageUsageFlags::empty();

    if external_format.is_none() {
        flags |= vk::ImageUsageFlags::TRANSFER_SRC | vk::ImageUsageFlags::TRANSFER_DST;
    }

    if usage.contains(NativeBufferUsage::HW_TEXTURE) {
        flags |= vk::ImageUsageFlags::SAMPLED | vk::ImageUsageFlags::INPUT_ATTACHMENT;
    }

    if usage.contains(NativeBufferUsage::HW_RENDER) {
        flags |= if is_depth_or_stencil {
            vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT
        } else {
            vk::ImageUsageFlags::COLOR_ATTACHMENT
        };
    }

    // External-format images may only be sampled unless external format
    // resolve lets them be rendered to.
    if matches!(external_format, Some(token) if token != 0)
        && !features.supports_external_format_resolve
    {
        flags &= vk::ImageUsageFlags::SAMPLED;
    }

    flags | vk::ImageUsageFlags::SAMPLED
}

/// Cube-map and protected-content creation flags are not derived for native
/// buffers.
pub fn derive_create_flags(_usage: NativeBufferUsage) -> vk::ImageCreateFlags {
    vk::ImageCreateFlags::empty()
}

/// Format the image is described with: the driver's concrete format when it
/// has one, otherwise the translator's classification. RGBX always uses the
/// translator's RGBA-backed entry.
pub fn derive_format(
    config: &NativeBufferConfig,
    props: &NativeBufferProperties,
    classification: &FormatClassification,
) -> vk::Format {
    if config.format == NativePixelFormat::RGBX_8888 || props.is_external() {
        classification.vk_format
    } else {
        props.format
    }
}

/// Output of the `Unbound → Configured` transition.
#[derive(Debug)]
struct ImportPlan {
    buffer: NativeBuffer,
    config: NativeBufferConfig,
    props: NativeBufferProperties,
    info: ImportedImageInfo,
}

/// Resources created so far by an import attempt. Destroyed on drop unless
/// the attempt reached `Ready`.
struct PartialImport<'a> {
    driver: &'a dyn BufferDriver,
    image: Option<vk::Image>,
    memory: Option<vk::DeviceMemory>,
}

impl<'a> PartialImport<'a> {
    fn new(driver: &'a dyn BufferDriver) -> Self {
        Self {
            driver,
            image: None,
            memory: None,
        }
    }

    /// Hand ownership to the finished image.
    fn disarm(mut self) {
        self.image = None;
        self.memory = None;
    }
}

impl Drop for PartialImport<'_> {
    fn drop(&mut self) {
        if let Some(memory) = self.memory.take() {
            self.driver.free_memory(memory);
        }
        if let Some(image) = self.image.take() {
            tracing::debug!(?image, "Destroying partially imported image");
            self.driver.destroy_image(image);
        }
    }
}

/// Imports native buffers into images on one device.
pub struct NativeBufferImporter {
    platform: Arc<dyn NativePlatform>,
    driver: Arc<dyn BufferDriver>,
    features: BackendFeatures,
}

impl NativeBufferImporter {
    pub fn new(
        platform: Arc<dyn NativePlatform>,
        driver: Arc<dyn BufferDriver>,
        features: BackendFeatures,
    ) -> Self {
        Self {
            platform,
            driver,
            features,
        }
    }

    pub fn features(&self) -> &BackendFeatures {
        &self.features
    }

    /// Feasibility check without creating anything.
    pub fn validate(&self, client: ClientBuffer, attribs: &AttributeMap) -> Result<()> {
        validate::validate_native_buffer(
            self.platform.as_ref(),
            self.driver.as_ref(),
            client,
            attribs,
        )
    }

    /// Import `client` as an image.
    pub fn import(&self, client: ClientBuffer, attribs: &AttributeMap) -> Result<ImportedImage> {
        let mut phase = ImportPhase::Unbound;
        let result = self.run(client, attribs, &mut phase);
        if let Err(e) = &result {
            tracing::warn!(?client, ?phase, error = %e, "Native buffer import failed");
        }
        result
    }

    fn run(
        &self,
        client: ClientBuffer,
        attribs: &AttributeMap,
        phase: &mut ImportPhase,
    ) -> Result<ImportedImage> {
        let driver = self.driver.as_ref();

        let plan = self.configure(client, attribs)?;
        advance(phase, ImportPhase::Configured);

        let mut partial = PartialImport::new(driver);

        let image = driver
            .create_image(&ImageCreateDesc {
                extent: plan.info.extent,
                format: if plan.info.is_external {
                    vk::Format::UNDEFINED
                } else {
                    plan.info.format
                },
                external_format: if plan.info.is_external {
                    plan.props.external_format
                } else {
                    0
                },
                tiling: plan.info.tiling,
                usage: plan.info.usage,
                flags: plan.info.create_flags,
                mip_levels: plan.info.level_count,
                array_layers: plan.info.layer_count,
                // Contents belong to the native buffer; nothing initializes them.
                initial_layout: vk::ImageLayout::PREINITIALIZED,
                conversion: plan.info.conversion,
            })
            .map_err(|e| {
                NativeBufferError::ImportFailed(format!("failed to create image: {e}"))
            })?;
        partial.image = Some(image);
        advance(phase, ImportPhase::ImageCreated);

        let memory_type_index = driver::find_memory_type_index(
            &driver.memory_properties(),
            plan.props.memory_type_bits,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
        )
        .ok_or_else(|| {
            NativeBufferError::ImportFailed(format!(
                "no device-local memory type in mask 0b{:b}",
                plan.props.memory_type_bits
            ))
        })?;

        let memory = driver
            .import_memory(&MemoryImportDesc {
                buffer: plan.buffer,
                dedicated_image: image,
                allocation_size: plan.props.allocation_size,
                memory_type_index,
            })
            .map_err(|e| {
                NativeBufferError::ImportFailed(format!(
                    "failed to import {} bytes into memory type {memory_type_index}: {e}",
                    plan.props.allocation_size
                ))
            })?;
        partial.memory = Some(memory);
        advance(phase, ImportPhase::MemoryImported);

        let buffer_ref = NativeBufferRef::acquire(Arc::clone(&self.platform), plan.buffer);
        partial.disarm();
        advance(phase, ImportPhase::Ready);

        tracing::info!(
            width = plan.config.width,
            height = plan.config.height,
            native_format = ?plan.config.format,
            format = ?plan.info.format,
            external = plan.info.is_external,
            usage = ?plan.info.usage,
            renderable = plan.info.renderable,
            sampleable = plan.info.sampleable,
            yuv = plan.info.conversion.is_some(),
            "Imported native buffer"
        );

        Ok(ImportedImage::new(
            Arc::clone(&self.driver),
            image,
            memory,
            buffer_ref,
            plan.info,
        ))
    }

    /// `Unbound → Configured`: query, check and derive everything the image
    /// needs. Creates nothing.
    fn configure(&self, client: ClientBuffer, attribs: &AttributeMap) -> Result<ImportPlan> {
        let platform = self.platform.as_ref();
        let driver = self.driver.as_ref();

        let buffer = validate::resolve_buffer(platform, client)?;
        let config = platform.buffer_config(buffer);
        let props = validate::query_properties(driver, buffer)?;
        validate::check_feasibility(driver, &props, &config, attribs)?;

        let is_external = props.is_external();
        let classification = format::classify(config.format);
        let format = derive_format(&config, &props, &classification);
        let is_depth_or_stencil = format::has_depth_or_stencil(format);

        let level_count = 1;
        let layer_count = 1;
        let usage = derive_usage(
            config.usage,
            is_depth_or_stencil,
            is_external.then_some(props.external_format),
            &self.features,
        );

        let conversion = if is_external || format::is_ycbcr_format(format) {
            if !self.features.supports_yuv_sampler_conversion {
                return Err(NativeBufferError::ConversionUnsupported(format!(
                    "{:?} needs a YCbCr sampler conversion but the device has none",
                    config.format
                )));
            }
            Some(ConversionDescription::from_properties(&props))
        } else {
            None
        };

        let (renderable, sampleable) = if is_external {
            (self.features.supports_external_format_resolve, true)
        } else {
            let features = driver.format_features(format);
            (format::is_renderable(features), format::is_sampleable(features))
        };

        tracing::debug!(
            native_format = ?config.format,
            classification = ?classification,
            ?format,
            is_external,
            ?usage,
            "Configured native buffer import"
        );

        Ok(ImportPlan {
            buffer,
            config,
            props,
            info: ImportedImageInfo {
                extent: vk::Extent3D {
                    width: config.width,
                    height: config.height,
                    depth: 1,
                },
                native_format: config.format,
                format,
                is_external,
                level_count,
                layer_count,
                tiling: derive_tiling(),
                usage,
                create_flags: derive_create_flags(config.usage),
                texture_type: TextureType::for_layer_count(layer_count),
                renderable,
                sampleable,
                conversion,
                color_space: attribs.color_space(),
            },
        })
    }
}

fn advance(phase: &mut ImportPhase, next: ImportPhase) {
    debug_assert!(next > *phase, "import phase went from {phase:?} to {next:?}");
    tracing::trace!(from = ?*phase, to = ?next, "Import phase");
    *phase = next;
}
