//! # Native Call Tests
//!
//! Calls `strcmp` from the C runtime already loaded into the test process. Its
//! result is a status-shaped `int`, so equal strings succeed, a positive result is
//! an unknown warning, and a negative result is an unknown error.

use std::sync::Arc;

use nifpga_core::{
    Arg, DispatchError, Library, LibraryFunctionInfo, NamedArgtype, NativeLibrary, NativeType,
    RecordingSink, StatusCheckedLibrary,
};

use crate::common::harness::init_tracing;

fn strcmp_library(sink: Arc<RecordingSink>) -> StatusCheckedLibrary {
    init_tracing();
    StatusCheckedLibrary::new(
        &NativeLibrary::process(),
        [LibraryFunctionInfo::new(
            "strcmp",
            "strcmp",
            [
                NamedArgtype::new("string1", NativeType::CharPtr),
                NamedArgtype::new("string2", NativeType::CharPtr),
            ],
        )],
    )
    .expect("strcmp is exported by the C runtime")
    .with_notices(sink)
}

#[test]
fn equal_strings_succeed_silently() {
    let sink = Arc::new(RecordingSink::new());
    let library = strcmp_library(sink.clone());

    assert!(
        library
            .call("strcmp", &[Arg::from("same"), Arg::from("same")])
            .is_ok()
    );
    assert!(sink.is_empty());
}

#[test]
fn positive_result_is_an_unknown_warning() {
    let sink = Arc::new(RecordingSink::new());
    let library = strcmp_library(sink.clone());

    assert!(
        library
            .call("strcmp", &[Arg::from("these are"), Arg::from("not equal")])
            .is_ok()
    );

    let notices = sink.take();
    assert_eq!(notices.len(), 1);
    let warning = notices[0].as_status().expect("status notice");
    assert!(warning.is_unknown());
    assert!(warning.code() > 0);
    assert_eq!(warning.args()["string1"].as_bytes(), Some(&b"these are"[..]));
    assert_eq!(warning.args()["string2"].as_bytes(), Some(&b"not equal"[..]));

    let message = warning.to_string();
    assert!(message.contains("strcmp"));
    assert!(message.contains("string1: b'these are'"));
    assert!(message.contains("string2: b'not equal'"));
}

#[test]
fn negative_result_is_an_unknown_error() {
    let library = strcmp_library(Arc::new(RecordingSink::new()));

    let error = library
        .call("strcmp", &[Arg::from("not equal"), Arg::from("these are")])
        .expect_err("negative result must fail");

    let status = error.as_status().expect("status-derived failure");
    assert!(status.is_unknown());
    assert!(status.code() < 0);
    assert!(error.to_string().starts_with("Error: Unknown ("));
}

#[test]
fn missing_symbol_is_reported() {
    let library = NativeLibrary::process();
    let error = library
        .resolve("NiFpga_DefinitelyNotExported")
        .err()
        .expect("symbol is absent");

    assert!(matches!(error, DispatchError::SymbolNotFound { .. }));
    assert_eq!(library.name(), "<process>");
}
