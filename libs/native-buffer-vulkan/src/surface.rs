// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Window surface negotiation.

use std::sync::Arc;

use parking_lot::Mutex;
use vulkanalia::vk;

use crate::display;
use crate::driver::SurfaceDriver;
use crate::error::{NativeBufferError, Result};
use crate::native::{NativePlatform, NativeWindow};

/// Presentation surface for a native window. Destroyed on drop.
pub struct WindowSurface {
    driver: Arc<dyn SurfaceDriver>,
    window: NativeWindow,
    surface: vk::SurfaceKHR,
    current_extent: Mutex<vk::Extent2D>,
}

impl WindowSurface {
    /// Create a surface for `window` and read its current extent.
    pub fn create(
        platform: &dyn NativePlatform,
        driver: Arc<dyn SurfaceDriver>,
        window: NativeWindow,
    ) -> Result<Self> {
        if !display::is_valid_native_window(platform, window) {
            return Err(NativeBufferError::CreateSurfaceFailed(format!(
                "{window:?} is not a valid native window"
            )));
        }

        let surface = driver.create_surface(window).map_err(|e| {
            NativeBufferError::CreateSurfaceFailed(format!(
                "failed to create surface for {window:?}: {e}"
            ))
        })?;

        let extent = match query_extent(driver.as_ref(), surface) {
            Ok(extent) => extent,
            Err(e) => {
                driver.destroy_surface(surface);
                return Err(e);
            }
        };

        tracing::info!(
            ?window,
            width = extent.width,
            height = extent.height,
            "Created window surface"
        );

        Ok(Self {
            driver,
            window,
            surface,
            current_extent: Mutex::new(extent),
        })
    }

    pub fn surface(&self) -> vk::SurfaceKHR {
        self.surface
    }

    pub fn window(&self) -> NativeWindow {
        self.window
    }

    /// Extent from the most recent capability query.
    pub fn current_extent(&self) -> vk::Extent2D {
        *self.current_extent.lock()
    }

    /// Re-query the surface extent and cache it.
    pub fn query_current_extent(&self) -> Result<vk::Extent2D> {
        let extent = query_extent(self.driver.as_ref(), self.surface)?;
        *self.current_extent.lock() = extent;
        Ok(extent)
    }
}

fn query_extent(driver: &dyn SurfaceDriver, surface: vk::SurfaceKHR) -> Result<vk::Extent2D> {
    driver
        .surface_capabilities(surface)
        .map(|caps| caps.current_extent)
        .map_err(|e| {
            NativeBufferError::CreateSurfaceFailed(format!(
                "failed to query surface capabilities: {e}"
            ))
        })
}

impl Drop for WindowSurface {
    fn drop(&mut self) {
        tracing::debug!(window = ?self.window, "Destroying window surface");
        self.driver.destroy_surface(self.surface);
    }
}
