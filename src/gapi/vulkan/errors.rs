use std::ffi::NulError;

use thiserror::Error;
use vulkanalia::vk;

/// # Invalid API Result
/// A native Vulkan call returned something other than [`vk::Result::SUCCESS`].
///
/// # Details
/// Carries the returned status, a human-readable message and, when the failure was caught by
/// [`vk_check!`](crate::vk_check), the literal source of the checked call.
///
/// The codes most commonly seen while bootstrapping an instance:
/// - `VK_ERROR_OUT_OF_HOST_MEMORY` / `VK_ERROR_OUT_OF_DEVICE_MEMORY`
/// Should not happen at this stage; if it does the ICD or a layer allocated badly.
/// - `VK_ERROR_INITIALIZATION_FAILED`
/// Catch-all for initialization failures.
/// - `VK_ERROR_LAYER_NOT_PRESENT`
/// A layer in `enabled_layer_names` is not installed.
/// - `VK_ERROR_EXTENSION_NOT_PRESENT`
/// An extension in `enabled_extension_names` is not exposed by the loader or the layers.
/// - `VK_ERROR_INCOMPATIBLE_DRIVER`
/// The driver cannot provide the requested API version.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct InvalidApiResult {
    pub result: vk::Result,
    pub message: String,
    pub expression: Option<&'static str>,
}

impl InvalidApiResult {
    pub fn new(result: vk::Result, message: Option<&str>) -> Self {
        let message = match message {
            Some(message) => message.to_owned(),
            None => format!(
                "Result is not {:?}; was `{:?}`.",
                vk::Result::SUCCESS,
                result
            ),
        };
        Self {
            result,
            message,
            expression: None,
        }
    }

    /// Same as [`Self::new`] but for the error half of a [`vulkanalia::VkResult`].
    pub fn from_error_code(code: vk::ErrorCode, message: Option<&str>) -> Self {
        Self::new(vk::Result::from_raw(code.as_raw()), message)
    }

    pub fn with_expression(mut self, expression: &'static str) -> Self {
        self.expression = Some(expression);
        self
    }
}

/// Turns a native status into a typed failure.
///
/// # Returns
/// - `Ok(())` if `result` is [`vk::Result::SUCCESS`].
/// - `Err(InvalidApiResult)` otherwise, with `message` or the default description.
pub fn check_result(result: vk::Result, message: Option<&str>) -> Result<(), InvalidApiResult> {
    if result == vk::Result::SUCCESS {
        return Ok(());
    }
    Err(InvalidApiResult::new(result, message))
}

/// Checks a [`vulkanalia::VkResult`] returning call.
///
/// Evaluates to `Result<T, InvalidApiResult>`; on failure the error records the stringified call.
///
/// ```ignore
/// let instance = vk_check!(driver.create_instance(&info), "Failed to create Instance.")?;
/// ```
#[macro_export]
macro_rules! vk_check {
    (@inner $call:expr, $message:expr) => {
        match $call {
            Ok(value) => Ok(value),
            Err(code) => Err($crate::gapi::vulkan::errors::InvalidApiResult::from_error_code(
                code, $message,
            )
            .with_expression(stringify!($call))),
        }
    };
    ($call:expr) => {
        $crate::vk_check!(@inner $call, None)
    };
    ($call:expr, $message:expr) => {
        $crate::vk_check!(@inner $call, Some($message))
    };
}

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("Failed to load Vulkan entry: {0}")]
    LoaderUnavailable(String),

    #[error("Layers requested, but not available: {0:?}")]
    LayersUnavailable(Vec<String>),

    #[error("Failed to get extension {0}.")]
    ExtensionUnavailable(String),

    #[error(transparent)]
    ApiResult(#[from] InvalidApiResult),

    #[error("Invalid layer name {0:?}: contains a NUL byte or is too long.")]
    InvalidLayerName(String),

    #[error("Invalid application or engine name: {0}")]
    InvalidName(#[from] NulError),

    #[error("Debug messenger is already attached.")]
    MessengerAlreadyAttached,
}

impl InstanceError {
    /// The native status behind this error, if it came from a Vulkan call.
    pub fn result(&self) -> Option<vk::Result> {
        match self {
            Self::ApiResult(error) => Some(error.result),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_a_no_op() {
        assert!(check_result(vk::Result::SUCCESS, None).is_ok());
        assert!(check_result(vk::Result::SUCCESS, Some("unused")).is_ok());
    }

    #[test]
    fn failure_carries_code_and_default_message() {
        let error = check_result(vk::Result::ERROR_OUT_OF_HOST_MEMORY, None).unwrap_err();

        assert_eq!(error.result, vk::Result::ERROR_OUT_OF_HOST_MEMORY);
        assert!(error.message.starts_with("Result is not"));
        assert!(error.expression.is_none());
    }

    #[test]
    fn failure_prefers_caller_message() {
        let error =
            check_result(vk::Result::ERROR_INITIALIZATION_FAILED, Some("Failed to create Instance."))
                .unwrap_err();

        assert_eq!(error.to_string(), "Failed to create Instance.");
    }

    #[test]
    fn macro_records_the_checked_expression() {
        fn failing_call() -> vulkanalia::VkResult<u32> {
            Err(vk::ErrorCode::LAYER_NOT_PRESENT)
        }

        let error = vk_check!(failing_call()).unwrap_err();

        assert_eq!(error.result, vk::Result::ERROR_LAYER_NOT_PRESENT);
        assert_eq!(error.expression, Some("failing_call()"));
    }

    #[test]
    fn macro_passes_values_through() {
        let value: Result<u32, InvalidApiResult> = vk_check!(Ok::<u32, vk::ErrorCode>(7), "unused");

        assert_eq!(value.unwrap(), 7);
    }

    #[test]
    fn instance_error_exposes_native_status() {
        let error: InstanceError = InvalidApiResult::new(vk::Result::ERROR_DEVICE_LOST, None).into();

        assert_eq!(error.result(), Some(vk::Result::ERROR_DEVICE_LOST));
        assert_eq!(InstanceError::MessengerAlreadyAttached.result(), None);
    }
}
