use std::borrow::Cow;
use std::ffi::CStr;
use std::io::{self, Write};
use std::os::raw::c_void;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, error, trace, warn, Level};
use vulkanalia::vk::{self, HasBuilder};

use crate::gapi::vulkan::driver::{DebugUtilsExtension, NativeInstance};
use crate::gapi::vulkan::errors::InstanceError;
use crate::gapi::vulkan::extensions::InstanceExtension;
use crate::vk_check;

pub const DEFAULT_MESSAGE_SEVERITY: vk::DebugUtilsMessageSeverityFlagsEXT =
    vk::DebugUtilsMessageSeverityFlagsEXT::from_bits_truncate(
        vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE.bits()
            | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING.bits()
            | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR.bits(),
    );

pub const DEFAULT_MESSAGE_TYPE: vk::DebugUtilsMessageTypeFlagsEXT =
    vk::DebugUtilsMessageTypeFlagsEXT::from_bits_truncate(
        vk::DebugUtilsMessageTypeFlagsEXT::GENERAL.bits()
            | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE.bits()
            | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION.bits(),
    );

/// Which messages the driver forwards to the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugFilter {
    pub severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    pub message_type: vk::DebugUtilsMessageTypeFlagsEXT,
}

impl Default for DebugFilter {
    fn default() -> Self {
        Self {
            severity: DEFAULT_MESSAGE_SEVERITY,
            message_type: DEFAULT_MESSAGE_TYPE,
        }
    }
}

struct Attachment<E> {
    debug_utils: E,
    /// Not owned; only kept to destroy the messenger.
    instance: vk::Instance,
    messenger: vk::DebugUtilsMessengerEXT,
}

/// # Debug Messenger
/// Receives the validation layer messages and forwards them to the [`log`] facade.
///
/// # Details
/// Before [`attach`](Self::attach) it is plain configuration: a [`DebugFilter`] and the callback,
/// with no native object behind it. Attaching creates the `VkDebugUtilsMessengerEXT` on a live
/// instance; [`destroy`](Self::destroy) releases it again and must run before the instance is
/// destroyed.
///
/// The same configuration is chained into `VkInstanceCreateInfo` (see
/// [`populate_create_info`](Self::populate_create_info)) so that messages emitted while the
/// instance itself is created and destroyed are captured too.
pub struct DebugMessenger<E> {
    filter: DebugFilter,
    attachment: Option<Attachment<E>>,
}

impl<E> DebugMessenger<E> {
    pub fn new(filter: DebugFilter) -> Self {
        Self {
            filter,
            attachment: None,
        }
    }

    pub fn filter(&self) -> DebugFilter {
        self.filter
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    /// The native messenger, once attached.
    pub fn messenger(&self) -> Option<vk::DebugUtilsMessengerEXT> {
        self.attachment.as_ref().map(|attachment| attachment.messenger)
    }

    /// Builds the creation descriptor: filters plus [`debug_callback`]. Has no side effects.
    pub fn populate_create_info(&self) -> vk::DebugUtilsMessengerCreateInfoEXT {
        vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(self.filter.severity)
            .message_type(self.filter.message_type)
            .user_callback(Some(debug_callback))
            .build()
    }
}

impl<E: DebugUtilsExtension> DebugMessenger<E> {
    /// Creates the native messenger on `instance`.
    ///
    /// # Errors
    /// - [`InstanceError::MessengerAlreadyAttached`] if called a second time.
    /// - [`InstanceError::ExtensionUnavailable`] if `VK_EXT_debug_utils` cannot be loaded.
    /// - [`InstanceError::ApiResult`] if `vkCreateDebugUtilsMessengerEXT` fails.
    pub fn attach<I>(&mut self, instance: &I) -> Result<(), InstanceError>
    where
        I: NativeInstance<DebugUtils = E>,
    {
        if self.is_attached() {
            return Err(InstanceError::MessengerAlreadyAttached);
        }

        let extension = InstanceExtension::ExtDebugUtils.name();
        let debug_utils = instance.load_debug_utils().ok_or_else(|| {
            InstanceError::ExtensionUnavailable(extension.to_string_lossy().into_owned())
        })?;

        debug!("Adding debug callback.");
        let info = self.populate_create_info();
        let handle = instance.handle();
        let messenger = vk_check!(
            debug_utils.create_debug_utils_messenger(handle, &info),
            "Failed to set up debug messenger."
        )?;

        self.attachment = Some(Attachment {
            debug_utils,
            instance: handle,
            messenger,
        });
        Ok(())
    }

    /// Destroys the native messenger if it was attached; a no-op otherwise.
    pub fn destroy(&mut self) {
        if let Some(attachment) = self.attachment.take() {
            debug!("Destroying messenger.");
            attachment
                .debug_utils
                .destroy_debug_utils_messenger(attachment.instance, attachment.messenger);
        }
    }
}

impl<E> Default for DebugMessenger<E> {
    fn default() -> Self {
        Self::new(DebugFilter::default())
    }
}

impl<E> std::fmt::Debug for DebugMessenger<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugMessenger")
            .field("filter", &self.filter)
            .field("messenger", &self.messenger())
            .finish()
    }
}

/// The debug callback handed to the driver.
/// We need extern "system" so we can expose this function to the (external) Vulkan loader.
///
/// The first parameter `severity` specifies the severity of the message, which is one of the following flags:
/// - `vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE` – Diagnostic message
/// - `vk::DebugUtilsMessageSeverityFlagsEXT::INFO` – Informational message like the creation of a resource
/// - `vk::DebugUtilsMessageSeverityFlagsEXT::WARNING` – Message about behavior that is not necessarily an error,
/// but very likely a bug in your application
/// - `vk::DebugUtilsMessageSeverityFlagsEXT::ERROR` – Message about behavior that is invalid and may cause crashes
///
/// The `type_` parameter can have the following values:
/// - `vk::DebugUtilsMessageTypeFlagsEXT::GENERAL` – Some event has happened that is unrelated to the specification
/// or performance
/// - `vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION` – Something has happened that violates the specification or
/// indicates a possible mistake
/// - `vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE` – Potential non-optimal use of Vulkan
///
/// The callback returns a (Vulkan) boolean that indicates if the Vulkan call that triggered the validation layer
/// message should be aborted. It always returns `vk::FALSE`: aborting is only meant for testing the
/// layers themselves. Nothing may unwind out of this function, so any panic from the logger is caught here.
pub extern "system" fn debug_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    type_: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _: *mut c_void,
) -> vk::Bool32 {
    let message = unsafe { callback_message(data) };
    deliver(severity, type_, &message, log_message)
}

/// Reads the message out of the callback data, tolerating null pointers.
///
/// # Safety
/// `data`, if not null, must point to a valid callback data struct whose `message`, if not null,
/// is a NUL-terminated string.
unsafe fn callback_message(data: *const vk::DebugUtilsMessengerCallbackDataEXT) -> Cow<'static, str> {
    if data.is_null() {
        return Cow::Borrowed("<no callback data>");
    }
    let message = unsafe { (*data).message };
    if message.is_null() {
        return Cow::Borrowed("<no message>");
    }
    Cow::Owned(unsafe { CStr::from_ptr(message) }.to_string_lossy().into_owned())
}

/// Hands one message to `sink`, swallowing any panic it raises.
pub(crate) fn deliver<F>(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    type_: vk::DebugUtilsMessageTypeFlagsEXT,
    message: &str,
    sink: F,
) -> vk::Bool32
where
    F: FnOnce(Level, vk::DebugUtilsMessageTypeFlagsEXT, &str),
{
    let level = severity_level(severity);
    let delivered = panic::catch_unwind(AssertUnwindSafe(|| sink(level, type_, message)));
    if delivered.is_err() {
        // The sink itself failed; stderr is all that is left, and it may be gone too.
        let _ = writeln!(io::stderr(), "validation layer: ({:?}) {}", type_, message);
    }
    vk::FALSE
}

pub(crate) fn severity_level(severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> Level {
    if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
        Level::Error
    } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
        Level::Warn
    } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::INFO {
        Level::Debug
    } else {
        Level::Trace
    }
}

fn log_message(level: Level, type_: vk::DebugUtilsMessageTypeFlagsEXT, message: &str) {
    match level {
        Level::Error => error!("({:?}) {}", type_, message),
        Level::Warn => warn!("({:?}) {}", type_, message),
        Level::Info | Level::Debug => debug!("({:?}) {}", type_, message),
        Level::Trace => trace!("({:?}) {}", type_, message),
    }
}
