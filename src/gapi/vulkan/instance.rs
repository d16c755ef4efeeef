use std::fmt;

use log::debug;
use vulkanalia::vk::{self, Handle};

use crate::gapi::vulkan::debug::DebugMessenger;
use crate::gapi::vulkan::driver::{DebugUtilsOf, Driver, NativeInstance};

/// A handle reduced to its identity: object type plus raw value.
///
/// Enough for code that only needs to name an object (debug names, generic destruction queues),
/// not to call anything on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectHandle {
    pub object_type: vk::ObjectType,
    pub raw: u64,
}

impl ObjectHandle {
    pub fn new(object_type: vk::ObjectType, raw: u64) -> Self {
        Self { object_type, raw }
    }
}

/// # Vulkan Instance
/// The Vulkan instance is the connection between this program and the Vulkan driver.
/// Acts as the "context" for the entire Vulkan ecosystem.
///
/// # Details
/// Only [`InstanceBuilder::build`](crate::InstanceBuilder::build) creates one. It owns:
/// - the native instance,
/// - the attached [`DebugMessenger`], when validation was enabled,
/// - the driver (loader) it was created with.
///
/// Teardown runs once, either through [`destroy`](Self::destroy) or on drop, in this order:
/// messenger, native instance, loader. Destroying the instance before its messenger is undefined
/// behavior at the native level.
///
/// > Note: Instance captures the driver state at creation time, so any changes to the driver,
/// > layers, or extensions at system level after instance creation will not be reflected in the
/// > instance.
pub struct Instance<D: Driver> {
    native: D::Instance,
    debug_messenger: Option<DebugMessenger<DebugUtilsOf<D>>>,
    destroyed: bool,
    // Dropped last, after the native instance is gone.
    driver: D,
}

impl<D: Driver> Instance<D> {
    pub(crate) fn new(
        driver: D,
        native: D::Instance,
        debug_messenger: Option<DebugMessenger<DebugUtilsOf<D>>>,
    ) -> Self {
        Self {
            native,
            debug_messenger,
            destroyed: false,
            driver,
        }
    }

    /// The raw `VkInstance`, for interop with device and surface creation. Ownership stays here.
    pub fn handle(&self) -> vk::Instance {
        self.native.handle()
    }

    pub fn to_handle(&self) -> ObjectHandle {
        ObjectHandle::new(vk::ObjectType::INSTANCE, self.handle().as_raw() as u64)
    }

    /// The loaded instance, with its instance-level commands.
    pub fn native(&self) -> &D::Instance {
        &self.native
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn debug_messenger(&self) -> Option<&DebugMessenger<DebugUtilsOf<D>>> {
        self.debug_messenger.as_ref()
    }

    /// Destroys the messenger (if any), then the native instance.
    pub fn destroy(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        if let Some(messenger) = self.debug_messenger.as_mut() {
            messenger.destroy();
        }
        self.native.destroy();
        debug!("Instance destroyed.");
    }
}

impl<D: Driver> Drop for Instance<D> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<D: Driver> From<&Instance<D>> for vk::Instance {
    fn from(instance: &Instance<D>) -> Self {
        instance.handle()
    }
}

impl<D: Driver> fmt::Debug for Instance<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("handle", &self.handle())
            .field("debug_messenger", &self.debug_messenger)
            .finish()
    }
}
