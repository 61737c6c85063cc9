// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Feasibility checks run before any resource is created.
//!
//! [`validate_native_buffer`] has no side effects beyond the driver query.
//! The importer runs the same checks against its own query, so the two can
//! never disagree about a buffer.

use vulkanalia::vk;

use crate::attributes::AttributeMap;
use crate::driver::{BufferDriver, NativeBufferProperties};
use crate::error::{NativeBufferError, Result};
use crate::format;
use crate::native::{ClientBuffer, NativeBuffer, NativeBufferConfig, NativeBufferUsage, NativePlatform};

/// Check that `client` can be imported with `attribs` on this device.
pub fn validate_native_buffer(
    platform: &dyn NativePlatform,
    driver: &dyn BufferDriver,
    client: ClientBuffer,
    attribs: &AttributeMap,
) -> Result<()> {
    let buffer = resolve_buffer(platform, client)?;
    let props = query_properties(driver, buffer)?;
    let config = platform.buffer_config(buffer);
    check_feasibility(driver, &props, &config, attribs)?;

    tracing::debug!(
        ?client,
        format = ?config.format,
        vk_format = ?props.format,
        "Native buffer validated"
    );
    Ok(())
}

pub(crate) fn resolve_buffer(
    platform: &dyn NativePlatform,
    client: ClientBuffer,
) -> Result<NativeBuffer> {
    if client.is_null() {
        return Err(NativeBufferError::InvalidBuffer(
            "client buffer handle is null".into(),
        ));
    }
    platform.resolve_buffer(client).ok_or_else(|| {
        NativeBufferError::InvalidBuffer(format!(
            "failed to obtain native buffer from window buffer {client:?}"
        ))
    })
}

pub(crate) fn query_properties(
    driver: &dyn BufferDriver,
    buffer: NativeBuffer,
) -> Result<NativeBufferProperties> {
    driver
        .native_buffer_properties(buffer)
        .map_err(|source| NativeBufferError::QueryFailed {
            context: "native buffer properties",
            source,
        })
}

pub(crate) fn check_feasibility(
    driver: &dyn BufferDriver,
    props: &NativeBufferProperties,
    config: &NativeBufferConfig,
    attribs: &AttributeMap,
) -> Result<()> {
    if props.is_external() {
        if props.external_format == 0 {
            return Err(NativeBufferError::UnsupportedFormat(format!(
                "driver reported no format and no external format for {:?}",
                config.format
            )));
        }
        if !props
            .format_features
            .contains(vk::FormatFeatureFlags::SAMPLED_IMAGE)
        {
            return Err(NativeBufferError::UnsupportedFormat(format!(
                "sampling from external format 0x{:x} is unsupported",
                props.external_format
            )));
        }
    } else {
        let features = driver.format_features(props.format);
        let renders = config.usage.contains(NativeBufferUsage::HW_RENDER);
        let supported = if renders {
            format::has_full_texture_support(features)
        } else {
            format::has_non_renderable_texture_support(features)
        };
        if !supported {
            return Err(NativeBufferError::UnsupportedFormat(format!(
                "format {:?} ({:?}) does not support enough features to use as a {} texture \
                 (features {:?})",
                props.format,
                config.format,
                if renders { "renderable" } else { "sampled" },
                features
            )));
        }
    }

    if attribs.requests_protected_content() {
        return Err(NativeBufferError::UnsupportedAttribute(
            "protected content is not supported for native buffers".into(),
        ));
    }

    Ok(())
}
