use std::any::Any;
use std::ffi::{CStr, CString};

/// Renders a string-like argument for the collaborator.
pub trait StringParam {
    fn to_mock_string(&self) -> String;
}

impl StringParam for str {
    fn to_mock_string(&self) -> String {
        self.to_owned()
    }
}

impl StringParam for String {
    fn to_mock_string(&self) -> String {
        self.clone()
    }
}

impl StringParam for CStr {
    fn to_mock_string(&self) -> String {
        self.to_string_lossy().into_owned()
    }
}

impl StringParam for CString {
    fn to_mock_string(&self) -> String {
        self.as_c_str().to_mock_string()
    }
}

impl StringParam for *const libc::c_char {
    /// A null pointer is rendered as `(null)`.
    fn to_mock_string(&self) -> String {
        if self.is_null() {
            return "(null)".to_owned();
        }
        // Safety: a non-null `*const c_char` handed to a mocked C-style
        // function must point to a NUL-terminated string.
        unsafe { CStr::from_ptr(*self) }.to_mock_string()
    }
}

impl<T: StringParam + ?Sized> StringParam for &T {
    fn to_mock_string(&self) -> String {
        (**self).to_mock_string()
    }
}

impl<T: StringParam + ?Sized> StringParam for &mut T {
    fn to_mock_string(&self) -> String {
        (**self).to_mock_string()
    }
}

/// The address an input pointer argument is compared by.
pub trait Address {
    fn address(&self) -> usize;
}

impl<T: ?Sized> Address for *const T {
    fn address(&self) -> usize {
        self.cast::<()>() as usize
    }
}

impl<T: ?Sized> Address for *mut T {
    fn address(&self) -> usize {
        self.cast::<()>() as usize
    }
}

impl<T: ?Sized> Address for &T {
    fn address(&self) -> usize {
        (*self as *const T).address()
    }
}

impl<T: ?Sized> Address for &mut T {
    fn address(&self) -> usize {
        (&**self as *const T).address()
    }
}

/// A pointee an output parameter value can be written into.
///
/// Any `Clone` type takes a configured value of the same type. A slice
/// `[T]` takes a configured `Vec<T>` or `Box<[T]>` and receives as many
/// leading elements as both sides hold.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot receive a configured output value",
    note = "annotate the parameter with #[param(in_ptr)] or #[param(custom(..))]"
)]
pub trait OutputTarget {
    /// Overwrites `self` from `value`; `false` when `value` has another type.
    fn write_from(&mut self, value: &dyn Any) -> bool;
}

impl<T: Any + Clone> OutputTarget for T {
    fn write_from(&mut self, value: &dyn Any) -> bool {
        match value.downcast_ref::<T>() {
            Some(value) => {
                self.clone_from(value);
                true
            }
            None => false,
        }
    }
}

impl<T: Any + Clone> OutputTarget for [T] {
    fn write_from(&mut self, value: &dyn Any) -> bool {
        let source = match value.downcast_ref::<Vec<T>>() {
            Some(items) => items.as_slice(),
            None => match value.downcast_ref::<Box<[T]>>() {
                Some(items) => &**items,
                None => return false,
            },
        };
        let len = self.len().min(source.len());
        self[..len].clone_from_slice(&source[..len]);
        true
    }
}
