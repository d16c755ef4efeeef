//! Guarded construction of a Vulkan instance and its optional debug messenger.
//!
//! The entry point is [`InstanceBuilder`]: configure the application identity and validation
//! layers, then call [`InstanceBuilder::build`]. Construction either fully succeeds, returning an
//! [`Instance`] that owns the native handle (and the attached [`DebugMessenger`]), or fully fails
//! with an [`InstanceError`] and no native resource left behind.

pub mod gapi;
pub mod log;
pub mod window;

pub use gapi::vulkan::builder::InstanceBuilder;
pub use gapi::vulkan::debug::{DebugFilter, DebugMessenger};
pub use gapi::vulkan::driver::{DebugUtilsExtension, Driver, NativeInstance};
pub use gapi::vulkan::entry::Entry;
pub use gapi::vulkan::errors::{check_result, InstanceError, InvalidApiResult};
pub use gapi::vulkan::extensions::ExtensionStr;
pub use gapi::vulkan::instance::{Instance, ObjectHandle};
pub use gapi::vulkan::layers::LayerStr;
pub use gapi::vulkan::surface::SurfaceSource;
