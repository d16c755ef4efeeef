use log::{debug, trace};
use vulkanalia::loader::{LibloadingLoader, LIBRARY};
use vulkanalia::vk::{self, EntryV1_0, ExtDebugUtilsExtension, InstanceV1_0};
use vulkanalia::{Entry as VkEntry, Instance as VkInstance, VkResult};

use crate::gapi::vulkan::driver::{DebugUtilsExtension, Driver, NativeInstance};
use crate::gapi::vulkan::errors::InstanceError;
use crate::gapi::vulkan::extensions::InstanceExtension;
use crate::gapi::vulkan::layers::LayerStr;

/// # Vulkan Entry
/// A Vulkan Entry is the entry point for Vulkan.
/// It is the object that dynamically loads the Vulkan API.
///
/// # Details
/// At the point of creating the `Entry`, the ICDs have not been loaded yet (the ICDs are Vulkan
/// front-ends for the GPU driver).
/// Therefore, Vulkan symbols are not loaded yet either.
///
/// What `Entry` does is find the loader in the system (i.e. `vulkan-1.dll` and `libvulkan.so.1`)
/// and get the global symbols from the loader
/// (these symbols are just the functions for VkEntry to work, i.e. `vkCreateInstance`).
///
/// In other words, `Entry` is a bootstrapper for the Vulkan ICDs.
///
/// The loader library stays mapped for as long as the `Entry` is alive.
pub struct Entry {
    entry: VkEntry,
}

impl Entry {
    /// Constructs a new [Vulkan Entry](Entry) object.
    ///
    /// # Details
    ///
    /// Two steps in order:
    /// 1. It searches the [Loader](https://github.com/KhronosGroup/Vulkan-Loader)
    /// inside the OS (the name and location of the loader is platform-dependent) and load it.
    /// 2. It dynamically dispatches the Vulkan symbols and stores them in a VTable inside
    /// the Loader.
    ///
    /// # Errors
    ///
    /// - If the loader is not found, it returns an error.
    /// - If it fails to load the Vulkan entry, it returns an error.
    pub fn new() -> Result<Self, InstanceError> {
        // Finds the dynamic library (e.g. `.so` or `.dll`)
        let loader = unsafe { LibloadingLoader::new(LIBRARY) }.map_err(|error| {
            InstanceError::LoaderUnavailable(format!("{}: {}", LIBRARY, error))
        })?;
        // Dynamically dispatches the Vulkan functions
        let entry = unsafe { VkEntry::new(loader) }
            .map_err(|error| InstanceError::LoaderUnavailable(error.to_string()))?;
        debug!("Vulkan loader `{}` loaded.", LIBRARY);
        Ok(Self { entry })
    }

}

impl Driver for Entry {
    type Instance = VkInstance;

    /// Get the available layers for the instance before its creation.
    ///
    /// # Details
    /// This calls `vkEnumerateInstanceLayerProperties` underneath.
    /// The loader scans the layer manifests (JSON files, whose location is OS specific),
    /// validates them and returns the list of layers it could load.
    ///
    /// # Errors
    ///
    /// `VK_ERROR_OUT_OF_HOST_MEMORY` if the loader fails to allocate memory for the layer properties.
    fn enumerate_instance_layers(&self) -> VkResult<Vec<LayerStr>> {
        let layers = unsafe { self.entry.enumerate_instance_layer_properties() }?
            .iter()
            .map(|layer| layer.layer_name)
            .collect::<Vec<_>>();
        Ok(layers)
    }

    fn create_instance(&self, info: &vk::InstanceCreateInfo) -> VkResult<VkInstance> {
        unsafe { self.entry.create_instance(info, None) }
    }
}

impl NativeInstance for VkInstance {
    type DebugUtils = VkInstance;

    fn handle(&self) -> vk::Instance {
        InstanceV1_0::handle(self)
    }

    /// vulkanalia loads every command it can resolve when the instance is created; the
    /// `VK_EXT_debug_utils` entries are only usable if the extension was enabled.
    fn load_debug_utils(&self) -> Option<VkInstance> {
        let name = InstanceExtension::ExtDebugUtils.name();
        if self.extensions().contains(name) {
            trace!("`{}` commands resolved.", name.to_string_lossy());
            Some(self.clone())
        } else {
            None
        }
    }

    fn destroy(&self) {
        debug!("Destroying instance.");
        unsafe {
            self.destroy_instance(None);
        }
    }
}

impl DebugUtilsExtension for VkInstance {
    fn create_debug_utils_messenger(
        &self,
        instance: vk::Instance,
        info: &vk::DebugUtilsMessengerCreateInfoEXT,
    ) -> VkResult<vk::DebugUtilsMessengerEXT> {
        debug_assert_eq!(instance, InstanceV1_0::handle(self));
        unsafe { self.create_debug_utils_messenger_ext(info, None) }
    }

    fn destroy_debug_utils_messenger(
        &self,
        instance: vk::Instance,
        messenger: vk::DebugUtilsMessengerEXT,
    ) {
        debug_assert_eq!(instance, InstanceV1_0::handle(self));
        unsafe {
            self.destroy_debug_utils_messenger_ext(messenger, None);
        }
    }
}
