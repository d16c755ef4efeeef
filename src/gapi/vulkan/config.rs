use vulkanalia::Version;

pub const VALIDATION_ENABLED: bool = cfg!(feature = "validation");
pub const API_DUMP_ENABLED: bool = cfg!(feature = "api_dump");
pub const RENDERDOC_ENABLED: bool = cfg!(feature = "renderdoc");

pub const DEFAULT_APPLICATION_NAME: &str = "Vulkan Application";
pub const DEFAULT_ENGINE_NAME: &str = "No Engine";
pub const DEFAULT_APPLICATION_VERSION: Version = Version::new(1, 0, 0);
pub const DEFAULT_ENGINE_VERSION: Version = Version::new(1, 0, 0);
/// Vulkan version requested through `VkApplicationInfo::apiVersion` unless overridden.
pub const DEFAULT_API_VERSION: Version = Version::new(1, 2, 0);
