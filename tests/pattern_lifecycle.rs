use pcre_bridge::{CompileOptions, ExecOptions, Pattern, Pcre, PcreError};

fn disposed() -> (Pcre, Pattern) {
    let pcre = Pcre::new();
    pcre.init().expect("engine should initialize");
    let mut pattern = pcre
        .compile("(a)", CompileOptions::empty())
        .expect("pattern should compile");
    pattern.dispose().expect("first dispose should succeed");
    (pcre, pattern)
}

fn expect_use_after_free<T: std::fmt::Debug>(result: Result<T, PcreError>, expected: &str) {
    match result.expect_err("expected use after free") {
        PcreError::UseAfterFree { operation } => assert_eq!(operation, expected),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn pattern_when_disposed_then_every_operation_fails() {
    let (_pcre, pattern) = disposed();

    assert!(pattern.is_disposed());
    expect_use_after_free(pattern.test("a"), "test");
    expect_use_after_free(pattern.test_at("a", 0), "test");
    expect_use_after_free(pattern.exec("a"), "exec");
    expect_use_after_free(pattern.exec_at("a", 0), "exec");
    expect_use_after_free(pattern.exec_with("a", 0, ExecOptions::empty()), "exec");
    expect_use_after_free(pattern.global_match("a"), "global_match");
    expect_use_after_free(pattern.matches("a").map(|_| ()), "global_match");
    expect_use_after_free(pattern.replace("a", "b", true), "replace");
    expect_use_after_free(pattern.named_groups().map(|_| ()), "named_groups");
    expect_use_after_free(pattern.pattern().map(str::to_string), "pattern");
    expect_use_after_free(pattern.options(), "options");
    expect_use_after_free(pattern.capture_count(), "capture_count");
}

#[test]
fn dispose_when_called_twice_then_second_fails() {
    let (_pcre, mut pattern) = disposed();
    expect_use_after_free(pattern.dispose(), "dispose");
}

#[test]
fn dispose_when_other_pattern_disposed_then_sibling_unaffected() {
    let pcre = Pcre::new();
    pcre.init().expect("engine should initialize");
    let mut first = pcre
        .compile("a", CompileOptions::empty())
        .expect("pattern should compile");
    let second = pcre
        .compile("b", CompileOptions::empty())
        .expect("pattern should compile");

    first.dispose().expect("dispose should succeed");
    assert!(!second.is_disposed());
    assert!(second.test("b").expect("sibling still usable"));
}

#[test]
fn pattern_when_compiled_and_dropped_repeatedly_then_engine_stays_usable() {
    let pcre = Pcre::new();
    pcre.init().expect("engine should initialize");
    for _ in 0..64 {
        let pattern = pcre
            .compile(r"\w+", CompileOptions::empty())
            .expect("pattern should compile");
        assert!(pattern.test("x").expect("test should run"));
    }
}
