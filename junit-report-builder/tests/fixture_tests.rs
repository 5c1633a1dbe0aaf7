// Copyright (c) The diem-devtools Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use goldenfile::Mint;
use junit_report_builder::{Builder, new_builder};
use std::io::Write;

#[test]
fn fixtures() {
    let mut mint = Mint::new("tests/fixtures");

    for (name, builder) in [
        ("expected_report.xml", expected_report()),
        ("full_report.xml", full_report()),
    ] {
        let mut f = mint
            .new_goldenfile(name)
            .expect("creating new goldenfile succeeds");
        let xml = builder.build().expect("building report succeeds");
        f.write_all(xml.as_bytes())
            .expect("writing goldenfile succeeds");
    }
}

fn expected_report() -> Builder {
    let mut builder = new_builder();
    builder.test_case().class_name("root.test.Class1");

    let suite1 = builder.test_suite().name("first.Suite");
    suite1.test_case().name("Second test");
    suite1
        .test_case()
        .class_name("suite1.test.Class2")
        .name("Third test")
        .file("./path-to/the-test-file.coffee");

    let suite2 = builder.test_suite().name("second.Suite");
    suite2.test_case().failure(Some("Failure message"), None, None);
    suite2.test_case().stacktrace("Stacktrace");
    suite2.test_case().skipped();

    builder
}

fn full_report() -> Builder {
    let mut builder = new_builder();

    let suite = builder.test_suite();
    suite
        .name("full.Suite")
        .time(12.5)
        .timestamp("2014-10-21T12:36:58")
        .property("env", "FOOBAR")
        .property("quote", r#"a "b" <c> & d"#);
    suite
        .test_case()
        .name("errored")
        .class_name("full.Class")
        .time(0.25)
        .file("src/lib.rs")
        .error(
            Some("Invalid\x00Characters\x08Stripped"),
            Some("panic"),
            Some("content"),
        )
        .stacktrace("at src/lib.rs:10")
        .standard_output("Emoji: 🤦")
        .standard_error("stderr line")
        .error_attachment("absolute/path/to/attachment");
    suite.test_case().name("skipped").skipped();

    builder
        .test_case()
        .name("bare")
        .failure(Some(r#"it is "quoted""#), None, Some("a ]]> b"));

    builder
}
