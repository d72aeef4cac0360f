//! Per-continuation fault boundary.
//!
//! A panic inside caller-supplied logic is caught here, reported as a message
//! and never unwinds into the driver's bookkeeping.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Run `f`, turning a panic into its message.
pub fn run_contained<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_passes_through() {
        assert_eq!(run_contained(|| 5), Ok(5));
    }

    #[test]
    fn test_panic_becomes_message() {
        let err = run_contained(|| -> i32 { panic!("boom") }).unwrap_err();
        assert_eq!(err, "boom");

        let code = 7;
        let err = run_contained(|| -> i32 { panic!("code {code}") }).unwrap_err();
        assert_eq!(err, "code 7");
    }
}
