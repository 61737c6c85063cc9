// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Backend capability configuration.
//!
//! The embedding renderer fills [`BackendFeatures`] from its device probe (or
//! loads it from a TOML override file) and hands it to the importer and the
//! display helpers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NativeBufferError, Result};

/// Device capabilities that change how native buffers are imported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendFeatures {
    /// `VK_KHR_sampler_ycbcr_conversion` (or core 1.1 feature) is enabled.
    /// Required for any external-format or multi-planar import.
    pub supports_yuv_sampler_conversion: bool,
    /// External-format images may be used as render targets
    /// (external format resolve). When false, external images are sample-only.
    pub supports_external_format_resolve: bool,
    /// Surface formats can be queried without a `VkSurfaceKHR`.
    pub supports_surfaceless_query: bool,
    /// `S8_UINT` is usable as a depth/stencil attachment.
    pub supports_stencil8: bool,
}

impl BackendFeatures {
    /// Parse features from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| {
            NativeBufferError::Configuration(format!("failed to parse backend features: {e}"))
        })
    }

    /// Load features from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let features = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), ?features, "Loaded backend features");
        Ok(features)
    }
}
