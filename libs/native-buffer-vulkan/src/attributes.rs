// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Read-only EGL attribute lookup for image creation hints.

use std::collections::HashMap;

/// EGL attribute keys and values consulted during native buffer import.
pub mod keys {
    /// Attribute list terminator.
    pub const NONE: i64 = 0x3038;
    pub const TRUE: i64 = 1;
    pub const FALSE: i64 = 0;

    /// `EGL_PROTECTED_CONTENT_EXT`
    pub const PROTECTED_CONTENT_EXT: i64 = 0x32C0;
    /// `EGL_GL_COLORSPACE_KHR`
    pub const GL_COLORSPACE_KHR: i64 = 0x309D;
    /// `EGL_GL_COLORSPACE_SRGB_KHR`
    pub const GL_COLORSPACE_SRGB_KHR: i64 = 0x3089;
    /// `EGL_GL_COLORSPACE_LINEAR_KHR`
    pub const GL_COLORSPACE_LINEAR_KHR: i64 = 0x308A;
}

/// Key → integer map of caller-supplied attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    values: HashMap<i64, i64>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an EGL-style `key, value, ..., NONE` list.
    ///
    /// Parsing stops at the first `NONE` key; a dangling key without a value
    /// is ignored.
    pub fn from_list(list: &[i64]) -> Self {
        let mut values = HashMap::new();
        for pair in list.chunks_exact(2) {
            if pair[0] == keys::NONE {
                break;
            }
            values.insert(pair[0], pair[1]);
        }
        Self { values }
    }

    pub fn with(mut self, key: i64, value: i64) -> Self {
        self.values.insert(key, value);
        self
    }

    pub fn contains(&self, key: i64) -> bool {
        self.values.contains_key(&key)
    }

    pub fn get(&self, key: i64) -> Option<i64> {
        self.values.get(&key).copied()
    }

    pub fn get_as_int(&self, key: i64, default: i64) -> i64 {
        self.get(key).unwrap_or(default)
    }

    /// Whether the caller asked for a protected-content image.
    pub fn requests_protected_content(&self) -> bool {
        self.get_as_int(keys::PROTECTED_CONTENT_EXT, keys::FALSE) == keys::TRUE
    }

    /// Requested GL color space, linear when unspecified.
    pub fn color_space(&self) -> i64 {
        self.get_as_int(keys::GL_COLORSPACE_KHR, keys::GL_COLORSPACE_LINEAR_KHR)
    }
}
