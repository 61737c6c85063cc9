// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use thiserror::Error;
use vulkanalia::vk;

/// Errors surfaced by native buffer validation, import and surface
/// negotiation. Nothing is retried internally.
#[derive(Error, Debug)]
pub enum NativeBufferError {
    #[error("Invalid native buffer: {0}")]
    InvalidBuffer(String),

    #[error("Driver query failed ({context}): {source}")]
    QueryFailed {
        context: &'static str,
        #[source]
        source: vk::ErrorCode,
    },

    #[error("Unsupported native buffer format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported attribute: {0}")]
    UnsupportedAttribute(String),

    #[error("YCbCr sampler conversion unsupported: {0}")]
    ConversionUnsupported(String),

    #[error("External memory import failed: {0}")]
    ImportFailed(String),

    #[error("Window surface creation failed: {0}")]
    CreateSurfaceFailed(String),

    #[error("Imported image already released")]
    AlreadyReleased,

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NativeBufferError>;
