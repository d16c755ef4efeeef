use vulkanalia::vk;

/// Type alias for the extension names.
/// Vulkan provides a type for Extension ([`vk::ExtensionName`]) that is defined as
/// `StringArray<MAX_EXTENSION_NAME_SIZE>`
pub type ExtensionStr = vk::ExtensionName;

/// # Vulkan Instance Extensions
///
/// Vulkan extensions are optional, feature-specific additions to the core Vulkan API.
/// Instance extensions must be enabled during `vkCreateInstance`; they typically deal with window
/// system integration (WSI) or debugging features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceExtension {
    /// # VK_EXT_debug_utils
    /// Structured debugging utilities: the debug messenger, object names and labels.
    /// Replaces the older `VK_EXT_debug_report` and `VK_EXT_debug_marker` extensions.
    ExtDebugUtils,
    /// # VK_KHR_get_physical_device_properties2
    /// Extended querying for physical-device features and properties.
    /// Promoted to core in Vulkan 1.1; still needed when targeting `VK_API_VERSION_1_0`.
    KhrGetPhysicalDeviceProperties2,
    /// # VK_KHR_portability_enumeration
    /// Opt-in enumeration of portability-subset (non-conformant) devices, such as MoltenVK.
    KhrPortabilityEnumeration,
}

impl InstanceExtension {
    /// Converts the enum to the Vulkan extension name string ([`vk::ExtensionName`])
    pub fn name(&self) -> &'static ExtensionStr {
        match self {
            Self::ExtDebugUtils => &vk::EXT_DEBUG_UTILS_EXTENSION.name,
            Self::KhrGetPhysicalDeviceProperties2 => {
                &vk::KHR_GET_PHYSICAL_DEVICE_PROPERTIES2_EXTENSION.name
            }
            Self::KhrPortabilityEnumeration => &vk::KHR_PORTABILITY_ENUMERATION_EXTENSION.name,
        }
    }
}

/// Collects all the extensions that will be used for the Vulkan instance creation.
///
/// # Details
/// The platform list comes first, in the order the surface provider gave it, and is never
/// modified. The debug utilities extension is appended when validation is enabled, followed by
/// the portability extensions when requested. An extension already present is not added twice.
///
/// # Parameters
/// - `platform`: The extensions the windowing system requires.
/// - `validation`: Whether the debug messenger will be attached.
/// - `portability`: Whether portability-subset devices should be enumerated.
pub fn resolve_extensions(
    platform: &[ExtensionStr],
    validation: bool,
    portability: bool,
) -> Vec<ExtensionStr> {
    let mut extensions: Vec<ExtensionStr> = Vec::with_capacity(platform.len() + 3);
    let mut push = |extension: ExtensionStr| {
        if !extensions.contains(&extension) {
            extensions.push(extension);
        }
    };

    platform.iter().copied().for_each(&mut push);
    if validation {
        push(*InstanceExtension::ExtDebugUtils.name());
    }
    if portability {
        push(*InstanceExtension::KhrGetPhysicalDeviceProperties2.name());
        push(*InstanceExtension::KhrPortabilityEnumeration.name());
    }
    extensions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform() -> Vec<ExtensionStr> {
        vec![
            vk::KHR_SURFACE_EXTENSION.name,
            vk::KHR_XCB_SURFACE_EXTENSION.name,
        ]
    }

    #[test]
    fn validation_appends_debug_utils_after_platform() {
        let extensions = resolve_extensions(&platform(), true, false);

        assert_eq!(
            extensions,
            vec![
                vk::KHR_SURFACE_EXTENSION.name,
                vk::KHR_XCB_SURFACE_EXTENSION.name,
                vk::EXT_DEBUG_UTILS_EXTENSION.name,
            ]
        );
    }

    #[test]
    fn without_validation_platform_list_is_untouched() {
        assert_eq!(resolve_extensions(&platform(), false, false), platform());
    }

    #[test]
    fn debug_utils_is_not_duplicated() {
        let mut platform = platform();
        platform.push(vk::EXT_DEBUG_UTILS_EXTENSION.name);

        let extensions = resolve_extensions(&platform, true, false);

        assert_eq!(extensions, platform);
    }

    #[test]
    fn portability_adds_both_extensions() {
        let extensions = resolve_extensions(&[], false, true);

        assert_eq!(
            extensions,
            vec![
                vk::KHR_GET_PHYSICAL_DEVICE_PROPERTIES2_EXTENSION.name,
                vk::KHR_PORTABILITY_ENUMERATION_EXTENSION.name,
            ]
        );
    }
}
