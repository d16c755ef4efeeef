use vulkanalia::window as vk_window;
use winit::window::Window;

use crate::gapi::vulkan::extensions::ExtensionStr;

/// Anything that knows which instance extensions presentation requires.
///
/// The returned list is only ever read and appended to by the builder, never reordered.
pub trait SurfaceSource {
    fn required_extensions(&self) -> Vec<ExtensionStr>;
}

impl<T: SurfaceSource + ?Sized> SurfaceSource for &T {
    fn required_extensions(&self) -> Vec<ExtensionStr> {
        (**self).required_extensions()
    }
}

/// The windowing system decides: `VK_KHR_surface` plus the platform specific surface extension.
impl SurfaceSource for Window {
    fn required_extensions(&self) -> Vec<ExtensionStr> {
        vk_window::get_required_instance_extensions(self)
            .iter()
            .map(|ext| **ext)
            .collect()
    }
}

/// Headless use: an explicit extension list.
impl SurfaceSource for [ExtensionStr] {
    fn required_extensions(&self) -> Vec<ExtensionStr> {
        self.to_vec()
    }
}

impl SurfaceSource for Vec<ExtensionStr> {
    fn required_extensions(&self) -> Vec<ExtensionStr> {
        self.clone()
    }
}
