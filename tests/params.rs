use std::ffi::{CStr, CString};

use moxie::support;
use moxie::{mock, Value};

#[derive(Debug)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reading {
    pub celsius: f64,
}

#[mock]
fn configure(flag: bool, level: i16, mask: u8, offset: isize, size: usize, ratio: f32) -> bool {
    let _ = (flag, level, mask, offset, size, ratio);
    true
}

#[mock]
fn label(text: &str, owned: String, c_text: &CStr) -> usize {
    text.len() + owned.len() + c_text.to_bytes().len()
}

#[mock]
fn distance(#[param(in_type_ptr)] from: &Point, to: *const Point) -> f64 {
    let to = unsafe { &*to };
    (((to.x - from.x).pow(2) + (to.y - from.y).pow(2)) as f64).sqrt()
}

#[mock]
fn write_all(
    #[param(ignore)] fd: i32,
    #[param(custom(call.with_unsigned_long_int_parameter("len", data.len() as u64);))] data: Vec<u8>,
) -> bool {
    let _ = fd;
    !data.is_empty()
}

#[mock]
fn second(_: i32, value: i32) -> i32 {
    value
}

#[mock]
fn fetch_name(id: u32, name: &mut String) -> bool {
    let _ = id;
    name.push_str("real");
    true
}

#[mock]
fn fill(buf: &mut [u8]) -> usize {
    buf.fill(0xff);
    buf.len()
}

#[mock]
fn shout(#[param(string)] text: &mut str) {
    text.make_ascii_uppercase();
}

#[mock]
fn sample(#[param(out_type_ptr)] reading: &mut Reading) -> bool {
    reading.celsius = -1.0;
    false
}

#[mock]
fn widen(#[param(long)] small: i8, #[param(double)] whole: u16) -> i32 {
    small as i32 + whole as i32
}

#[test]
fn test_record_when_numeric_kinds_should_report_each_family() {
    configure::enable();

    configure(true, -3, 200, -9, 4096, 0.5);

    let call = support::mock().last_call("configure").unwrap();
    assert_eq!(
        call.parameters
            .iter()
            .map(|p| (p.name.as_str(), p.value.clone()))
            .collect::<Vec<_>>(),
        vec![
            ("flag", Value::Bool(true)),
            ("level", Value::Int(-3)),
            ("mask", Value::UInt(200)),
            ("offset", Value::Long(-9)),
            ("size", Value::ULong(4096)),
            ("ratio", Value::Double(0.5)),
        ]
    );
}

#[test]
fn test_record_when_explicit_kind_should_override_inferred_one() {
    widen::enable();

    assert_eq!(widen(-2, 7), 5);

    let call = support::mock().last_call("widen").unwrap();
    assert_eq!(call.parameter("small"), Some(&Value::Long(-2)));
    assert_eq!(call.parameter("whole"), Some(&Value::Double(7.0)));
}

#[test]
fn test_record_when_string_like_should_report_contents() {
    label::enable();
    let c_text = CString::new("ccc").unwrap();

    assert_eq!(label("a", String::from("bb"), &c_text), 6);

    let call = support::mock().last_call("label").unwrap();
    assert_eq!(call.parameter("text"), Some(&Value::String("a".to_string())));
    assert_eq!(call.parameter("owned"), Some(&Value::String("bb".to_string())));
    assert_eq!(call.parameter("c_text"), Some(&Value::String("ccc".to_string())));
}

#[test]
fn test_record_when_pointers_should_report_addresses() {
    distance::enable();
    let from = Point { x: 0, y: 0 };
    let to = Point { x: 3, y: 4 };

    assert_eq!(distance(&from, &to), 5.0);

    let call = support::mock().last_call("distance").unwrap();
    assert_eq!(
        call.parameter("from"),
        Some(&Value::Object {
            type_name: "Point".to_string(),
            address: &from as *const Point as usize,
        })
    );
    assert_eq!(call.parameter("to"), Some(&Value::pointer(&to as *const Point)));
}

#[test]
fn test_record_when_ignored_or_custom_should_follow_annotation() {
    write_all::enable();

    assert!(write_all(7, vec![1, 2, 3]));

    let call = support::mock().last_call("write_all").unwrap();
    assert_eq!(call.parameters.len(), 1);
    assert_eq!(call.parameter("len"), Some(&Value::ULong(3)));
    assert_eq!(call.parameter("fd"), None);
    assert_eq!(call.parameter("data"), None);
}

#[test]
fn test_record_when_pattern_is_not_a_name_should_use_position() {
    second::enable();

    assert_eq!(second(1, 2), 2);

    let call = support::mock().last_call("second").unwrap();
    assert_eq!(call.parameter("arg0"), Some(&Value::Int(1)));
    assert_eq!(call.parameter("value"), Some(&Value::Int(2)));
}

#[test]
fn test_output_parameter_when_configured_should_be_written_back() {
    fetch_name::enable();
    support::mock()
        .expect_call("fetch_name")
        .with_output_parameter_returning("name", String::from("mocked"))
        .and_return_value(false);

    let mut name = String::new();
    let found = fetch_name(1, &mut name);

    assert!(!found);
    assert_eq!(name, "mocked");
    assert_eq!(
        support::mock().last_call("fetch_name").unwrap().parameter("name"),
        Some(&Value::Output { type_name: None })
    );
}

#[test]
fn test_output_parameter_when_not_configured_should_let_real_fill_it() {
    fetch_name::enable();

    let mut name = String::new();
    assert!(fetch_name(1, &mut name));

    assert_eq!(name, "real");
}

#[test]
fn test_output_parameter_when_slice_should_copy_configured_elements() {
    fill::enable();
    support::mock()
        .expect_call("fill")
        .with_output_parameter_returning("buf", vec![1u8, 2, 3])
        .and_return_value(3u64);

    let mut buf = [0u8; 4];
    let written = fill(&mut buf);

    assert_eq!(written, 3);
    assert_eq!(buf, [1, 2, 3, 0]);
    assert_eq!(
        support::mock().last_call("fill").unwrap().parameter("buf"),
        Some(&Value::Output { type_name: None })
    );
}

#[test]
fn test_output_parameter_when_slice_not_configured_should_let_real_fill_it() {
    fill::enable();

    let mut buf = [0u8; 2];
    assert_eq!(fill(&mut buf), 2);

    assert_eq!(buf, [0xff, 0xff]);
    assert_eq!(support::mock().call_count("fill"), 1);
}

#[test]
fn test_string_parameter_when_mut_str_annotated_should_report_contents() {
    shout::enable();

    let mut text = String::from("quiet");
    shout(text.as_mut_str());

    assert_eq!(text, "QUIET");
    assert_eq!(
        support::mock().last_call("shout").unwrap().parameter("text"),
        Some(&Value::String("quiet".to_string()))
    );
}

#[test]
fn test_output_parameter_when_value_type_differs_should_panic() {
    fetch_name::enable();
    support::mock()
        .expect_call("fetch_name")
        .with_output_parameter_returning("name", 5i32);

    let result = std::panic::catch_unwind(|| {
        let mut name = String::new();
        fetch_name(1, &mut name)
    });

    assert!(result.is_err());
}

#[test]
fn test_typed_output_parameter_when_configured_should_be_written_back() {
    sample::enable();
    support::mock()
        .expect_call("sample")
        .with_output_parameter_of_type_returning("Reading", "reading", Reading { celsius: 21.0 })
        .and_return_value(true);

    let mut reading = Reading::default();

    assert!(sample(&mut reading));
    assert_eq!(reading, Reading { celsius: 21.0 });
    assert_eq!(
        support::mock().last_call("sample").unwrap().parameter("reading"),
        Some(&Value::Output {
            type_name: Some("Reading".to_string())
        })
    );
}

#[test]
fn test_typed_output_parameter_when_tag_differs_should_panic() {
    sample::enable();
    support::mock()
        .expect_call("sample")
        .with_output_parameter_of_type_returning("Forecast", "reading", Reading { celsius: 1.0 });

    let result = std::panic::catch_unwind(|| {
        let mut reading = Reading::default();
        sample(&mut reading)
    });

    assert!(result.is_err());
}
