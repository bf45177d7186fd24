use std::ffi::{CStr, CString};

use libc::c_char;
use moxie::support;
use moxie::{mock, Value};

#[mock]
#[no_mangle]
pub extern "C" fn moxie_test_strlen(text: *const c_char) -> usize {
    if text.is_null() {
        return 0;
    }
    unsafe { CStr::from_ptr(text) }.to_bytes().len()
}

#[mock(returns = ptr)]
pub extern "C" fn moxie_test_getenv(#[param(string)] name: *const c_char) -> *const c_char {
    let _ = name;
    std::ptr::null()
}

#[test]
fn test_extern_c_when_disabled_should_call_real() {
    let text = CString::new("hello").unwrap();

    assert_eq!(moxie_test_strlen(text.as_ptr()), 5);
    assert_eq!(moxie_test_strlen(std::ptr::null()), 0);
}

#[test]
fn test_extern_c_when_enabled_should_record_c_string() {
    moxie_test_strlen::enable();
    let text = CString::new("hello").unwrap();

    assert_eq!(moxie_test_strlen(text.as_ptr()), 5);
    moxie_test_strlen(std::ptr::null());

    let calls = support::mock().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].parameter("text"), Some(&Value::String("hello".to_string())));
    assert_eq!(calls[1].parameter("text"), Some(&Value::String("(null)".to_string())));
}

#[test]
fn test_extern_c_when_called_through_function_pointer_should_be_mocked() {
    let strlen: extern "C" fn(*const c_char) -> usize = moxie_test_strlen;
    moxie_test_strlen::enable();
    support::mock()
        .expect_call("moxie_test_strlen")
        .and_return_value(99u64);

    let text = CString::new("abc").unwrap();

    assert_eq!(strlen(text.as_ptr()), 99);
}

#[test]
fn test_extern_c_when_pointer_return_configured_should_return_it() {
    let value = CString::new("/home/test").unwrap();
    moxie_test_getenv::enable();
    support::mock()
        .expect_call("moxie_test_getenv")
        .and_return_value(Value::pointer(value.as_ptr()));

    let name = CString::new("HOME").unwrap();
    let result = moxie_test_getenv(name.as_ptr());

    assert_eq!(unsafe { CStr::from_ptr(result) }, value.as_c_str());
    assert_eq!(
        support::mock().last_call("moxie_test_getenv").unwrap().parameter("name"),
        Some(&Value::String("HOME".to_string()))
    );
}
