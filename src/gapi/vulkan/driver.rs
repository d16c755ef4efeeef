//! The native side of instance construction.
//!
//! These traits are the only way the builder talks to Vulkan. [`Entry`](super::entry::Entry)
//! and [`vulkanalia::Instance`] implement them against the real loader; tests implement them with
//! recording fakes.

use vulkanalia::VkResult;
use vulkanalia::vk;

use crate::gapi::vulkan::layers::LayerStr;

/// The loader: global commands available before any instance exists.
pub trait Driver {
    /// The created instance, with its instance-level commands loaded.
    type Instance: NativeInstance;

    /// `vkEnumerateInstanceLayerProperties`, reduced to the layer names.
    fn enumerate_instance_layers(&self) -> VkResult<Vec<LayerStr>>;

    /// `vkCreateInstance`.
    ///
    /// Every pointer inside `info` is only guaranteed to be valid for the duration of the call.
    fn create_instance(&self, info: &vk::InstanceCreateInfo) -> VkResult<Self::Instance>;
}

/// A created instance.
pub trait NativeInstance {
    /// Function table of `VK_EXT_debug_utils` for this instance.
    type DebugUtils: DebugUtilsExtension;

    fn handle(&self) -> vk::Instance;

    /// Resolves the `VK_EXT_debug_utils` commands, or `None` if the loader cannot provide them.
    fn load_debug_utils(&self) -> Option<Self::DebugUtils>;

    /// `vkDestroyInstance`. Must be called at most once, after every child object is destroyed.
    fn destroy(&self);
}

/// `VK_EXT_debug_utils` commands. The instance handle is passed explicitly because the messenger
/// only keeps a non-owning reference to the instance it was attached to.
pub trait DebugUtilsExtension {
    fn create_debug_utils_messenger(
        &self,
        instance: vk::Instance,
        info: &vk::DebugUtilsMessengerCreateInfoEXT,
    ) -> VkResult<vk::DebugUtilsMessengerEXT>;

    fn destroy_debug_utils_messenger(
        &self,
        instance: vk::Instance,
        messenger: vk::DebugUtilsMessengerEXT,
    );
}

/// The debug utilities table a [`Driver`] produces.
pub type DebugUtilsOf<D> = <<D as Driver>::Instance as NativeInstance>::DebugUtils;
