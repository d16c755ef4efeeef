use std::collections::HashSet;

use vulkanalia::vk;

use crate::gapi::vulkan::errors::InstanceError;

/// Type alias for the layer names.
/// Vulkan provides a type for Extension ([`vk::ExtensionName`]) but not for Layer.
///
/// Although, under the hood, Vulkan does define a type for Layer, it is just not
/// so strictly defined.
/// It can be seen defined in [`VkLayerProperties`](vk::LayerProperties) as
/// `StringArray<MAX_EXTENSION_NAME_SIZE>`
/// (the same max extension name used for extensions).
pub type LayerStr = vk::ExtensionName;

/// # Vulkan Layers
///
/// Layers are optional components that augment the Vulkan system.
/// They can intercept, evaluate, and modify Vulkan functions, attaching behavior to the normal Vulkan API.
///
/// # Details
/// Layers are implemented as libraries that are installed on the system and enabled or disabled
/// at instance creation. Because they are optional, enable them for debugging and leave them out
/// of release builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceLayer {
    /// # `VK_LAYER_KHRONOS_validation`
    /// The official, all-in-one validation layer maintained by the Khronos Group.
    /// Pair with the `VK_EXT_debug_utils` extension to receive messages.
    Validation,

    /// # `VK_LAYER_LUNARG_api_dump`
    /// Logs every Vulkan call (and its parameters) as it happens.
    ApiDump,

    /// # `VK_LAYER_RENDERDOC_Capture`
    /// Lets RenderDoc intercept Vulkan work for frame capture.
    RenderDoc,
}

impl InstanceLayer {
    pub const VALIDATION: LayerStr = LayerStr::from_bytes("VK_LAYER_KHRONOS_validation".as_bytes());
    pub const API_DUMP: LayerStr = LayerStr::from_bytes("VK_LAYER_LUNARG_api_dump".as_bytes());
    pub const RENDERDOC: LayerStr = LayerStr::from_bytes("VK_LAYER_RENDERDOC_Capture".as_bytes());

    pub fn name(&self) -> LayerStr {
        match self {
            Self::Validation => Self::VALIDATION,
            Self::ApiDump => Self::API_DUMP,
            Self::RenderDoc => Self::RENDERDOC,
        }
    }
}

/// Builds a [`LayerStr`] from a user supplied layer name.
///
/// # Errors
/// [`InstanceError::InvalidLayerName`] if `name` contains a NUL byte or does not fit in
/// `VK_MAX_EXTENSION_NAME_SIZE` together with its terminator. Either would otherwise be truncated
/// into a different name.
pub fn layer_name(name: &str) -> Result<LayerStr, InstanceError> {
    if name.contains('\0') || name.len() >= vk::MAX_EXTENSION_NAME_SIZE {
        return Err(InstanceError::InvalidLayerName(name.to_owned()));
    }
    Ok(LayerStr::from_bytes(name.as_bytes()))
}

/// Finds all the requested layers that the system does not provide.
///
/// # Parameters
/// - `available_layers`: The layers available in the system (queried through the driver).
/// - `requested_layers`: The layers configured for the instance, in request order.
///
/// # Returns
/// - The requested layers missing from `available_layers`, in request order.
pub fn find_unavailable_layers(
    available_layers: &HashSet<LayerStr>,
    requested_layers: &[LayerStr],
) -> Vec<LayerStr> {
    requested_layers
        .iter()
        .filter(|layer| !available_layers.contains(*layer))
        .copied()
        .collect()
}
