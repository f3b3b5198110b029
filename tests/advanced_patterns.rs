use pcre_bridge::engine::compile_codes;
use pcre_bridge::{CompileOptions, Pcre, PcreError};

fn ready() -> Pcre {
    let pcre = Pcre::new();
    pcre.init().expect("engine should initialize");
    pcre
}

fn first<'s>(pcre: &Pcre, pattern: &str, subject: &'s str) -> Option<&'s str> {
    pcre.quick_match(pattern, subject, CompileOptions::empty())
        .expect("quick match should run")
        .map(|record| record.whole().as_str())
}

#[test]
fn lookahead_when_positive_then_match_excludes_lookahead_text() {
    let pcre = ready();
    assert_eq!(first(&pcre, "foo(?=bar)", "foobar"), Some("foo"));
    assert_eq!(first(&pcre, "foo(?=bar)", "foobaz"), None);
}

#[test]
fn lookahead_when_negative_then_rejects_following_text() {
    let pcre = ready();
    assert_eq!(first(&pcre, "foo(?!bar)", "foobaz"), Some("foo"));
    assert_eq!(first(&pcre, "foo(?!bar)", "foobar"), None);
}

#[test]
fn lookbehind_when_positive_then_requires_preceding_text() {
    let pcre = ready();
    assert_eq!(first(&pcre, "(?<=foo)bar", "foobar"), Some("bar"));
    assert_eq!(first(&pcre, "(?<=foo)bar", "bazbar"), None);
    assert_eq!(first(&pcre, r"(?<=\$)\d+", "price: $42"), Some("42"));
}

#[test]
fn lookbehind_when_negative_then_rejects_preceding_text() {
    let pcre = ready();
    assert_eq!(first(&pcre, "(?<!foo)bar", "bazbar"), Some("bar"));
    assert_eq!(first(&pcre, "(?<!foo)bar", "foobar"), None);
}

#[test]
fn lookbehind_when_variable_length_then_compile_error() {
    let pcre = ready();
    match pcre
        .compile(r"(?<=a+)b", CompileOptions::empty())
        .expect_err("expected compile error")
    {
        PcreError::Compile { code, .. } => {
            assert_eq!(code, compile_codes::LOOKBEHIND_NOT_FIXED)
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn backreference_when_group_repeats_then_matches_same_text() {
    let pcre = ready();
    let record = pcre
        .quick_match(r"(abc)\1", "xabcabc", CompileOptions::empty())
        .expect("quick match should run")
        .expect("expected a match");
    assert_eq!(record.whole().as_str(), "abcabc");
    assert_eq!(record.whole().start(), 1);
    assert_eq!(record.get(1).expect("group 1").as_str(), "abc");

    assert_eq!(first(&pcre, r"(abc)\1", "abcabd"), None);
}

#[test]
fn backreference_when_named_then_resolves_by_name() {
    let pcre = ready();
    assert_eq!(
        first(&pcre, r"(?<q>['\x22]).*?\k<q>", r#"say "hi" now"#),
        Some(r#""hi""#)
    );
    assert_eq!(
        first(&pcre, r"(?<w>\w+) \g{w}", "it is is done"),
        Some("is is")
    );
    assert_eq!(first(&pcre, r"(?P<w>\w)(?P=w)", "abccd"), Some("cc"));
}

#[test]
fn backreference_when_numbered_alongside_named_group_then_matches() {
    let pcre = ready();
    assert_eq!(first(&pcre, r"(?<a>x)(y)\2\1", "xyyx"), Some("xyyx"));
}

#[test]
fn backreference_when_group_missing_then_compile_error() {
    let pcre = ready();
    match pcre
        .compile(r"(a)\k<nope>", CompileOptions::empty())
        .expect_err("expected compile error")
    {
        PcreError::Compile { code, .. } => {
            assert_eq!(code, compile_codes::REFERENCE_MISSING)
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn conditional_when_group_participated_then_takes_yes_branch() {
    let pcre = ready();
    let pattern = r"(\d+)?(?(1)\s+digits|no digits)";
    assert_eq!(first(&pcre, pattern, "123 digits"), Some("123 digits"));
    assert_eq!(first(&pcre, pattern, "no digits"), Some("no digits"));
}

#[test]
fn atomic_group_when_inner_match_consumed_then_no_backtracking_into_it() {
    let pcre = ready();
    assert_eq!(first(&pcre, "(?>a+)b", "aaab"), Some("aaab"));
    assert_eq!(first(&pcre, "(?>a+)a", "aaaa"), None);
}

#[test]
fn callout_when_no_handler_then_matching_continues() {
    let pcre = ready();
    assert_eq!(first(&pcre, "a(?C1)b", "xab"), Some("ab"));
}

#[test]
fn recursion_when_requested_then_reported_unsupported() {
    let pcre = ready();
    match pcre
        .compile(r"\((?:[^()]|(?R))*\)", CompileOptions::empty())
        .expect_err("expected compile error")
    {
        PcreError::Compile { code, offset, .. } => {
            assert_eq!(code, compile_codes::UNSUPPORTED);
            assert_eq!(offset, 11);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn global_match_when_lookaround_used_then_finds_every_match() {
    let pcre = ready();
    let pattern = pcre
        .compile(r"(?<=\$)\d+(?=\.)", CompileOptions::empty())
        .expect("pattern should compile");
    let set = pattern
        .global_match("$10. $x $20. $30")
        .expect("global match should run");
    let found: Vec<&str> = set.iter().map(|record| record.whole().as_str()).collect();
    assert_eq!(found, vec!["10", "20"]);
}
