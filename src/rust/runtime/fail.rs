// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use ::libc::c_int;
use ::std::{
    error,
    fmt,
};

//======================================================================================================================
// Structures
//======================================================================================================================

/// Failure. Carries the error code that classifies the failure and a human-readable cause.
///
/// Error codes used by this crate:
/// - `EINVAL`: malformed argument (task with no run hook)
/// - `EAGAIN`: slot registry is full
/// - `EPERM`: operation not legal in the current scheduler state
/// - `EBUSY`: scheduler still has registered tasks
/// - `ENOMEM`: allocation failure
#[derive(Clone)]
pub struct Fail {
    /// Error code.
    pub errno: c_int,
    /// Cause.
    pub cause: String,
}

//======================================================================================================================
// Associate Functions
//======================================================================================================================

/// Associate Functions for Failures
impl Fail {
    /// Creates a new Failure
    pub fn new(errno: i32, cause: &str) -> Self {
        Self {
            errno,
            cause: cause.to_string(),
        }
    }
}

//======================================================================================================================
// Trait Implementations
//======================================================================================================================

/// Display Trait Implementation for Failures
impl fmt::Display for Fail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error {:?}: {:?}", self.errno, self.cause)
    }
}

/// Debug trait Implementation for Failures
impl fmt::Debug for Fail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error {:?}: {:?}", self.errno, self.cause)
    }
}

/// Error Trait Implementation for Failures
impl error::Error for Fail {}
