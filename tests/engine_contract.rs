use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pcre_bridge::{
    CompileOptions, Engine, EngineConfig, EngineVersion, ErrorCode, NameTable, NativeHandle,
    Pcre, PcreError, RawCompileError,
};

type Script = fn(&mut [i32]) -> i32;

/// Engine double that replays a fixed execute outcome.
struct ScriptedEngine {
    capture_count: usize,
    names: NameTable,
    script: Script,
    compiled: Arc<AtomicUsize>,
    freed: Arc<AtomicUsize>,
}

impl ScriptedEngine {
    fn new(capture_count: usize, script: Script) -> Self {
        Self {
            capture_count,
            names: NameTable::empty(),
            script,
            compiled: Arc::new(AtomicUsize::new(0)),
            freed: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn with_names(mut self, names: NameTable) -> Self {
        self.names = names;
        self
    }
}

impl Engine for ScriptedEngine {
    fn compile(
        &mut self,
        _pattern: &str,
        _options: u32,
    ) -> Result<NativeHandle, RawCompileError> {
        self.compiled.fetch_add(1, Ordering::SeqCst);
        Ok(NativeHandle::new(0, 0))
    }

    fn execute(
        &mut self,
        _handle: NativeHandle,
        _subject: &str,
        _start: usize,
        _options: u32,
        ovector: &mut [i32],
    ) -> i32 {
        (self.script)(ovector)
    }

    fn free(&mut self, _handle: NativeHandle) -> i32 {
        self.freed.fetch_add(1, Ordering::SeqCst);
        0
    }

    fn capture_count(&self, _handle: NativeHandle) -> Result<usize, i32> {
        Ok(self.capture_count)
    }

    fn name_table(&self, _handle: NativeHandle) -> Result<NameTable, i32> {
        Ok(self.names.clone())
    }

    fn version(&self) -> EngineVersion {
        EngineVersion { major: 8, minor: 45 }
    }

    fn version_string(&self) -> String {
        "scripted 8.45".to_string()
    }

    fn config(&self) -> EngineConfig {
        EngineConfig {
            utf8: true,
            unicode_properties: false,
            jit: false,
            newline: 10,
            link_size: 2,
            match_limit: 10_000_000,
            nest_limit: 250,
        }
    }
}

fn scripted(engine: ScriptedEngine) -> Pcre {
    let pcre = Pcre::new();
    pcre.init_engine(engine).expect("engine should install");
    pcre
}

#[test]
fn exec_when_engine_hits_match_limit_then_resource_limit() {
    let pcre = scripted(ScriptedEngine::new(0, |_| -8));
    let pattern = pcre
        .compile("a", CompileOptions::empty())
        .expect("pattern should compile");

    match pattern.exec("aaa").expect_err("expected resource limit") {
        PcreError::ResourceLimit { code } => assert_eq!(code, ErrorCode::MatchLimit),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn exec_when_engine_returns_unknown_code_then_unknown_engine_error() {
    let pcre = scripted(ScriptedEngine::new(0, |_| -999));
    let pattern = pcre
        .compile("a", CompileOptions::empty())
        .expect("pattern should compile");

    match pattern.exec("a").expect_err("expected unknown error") {
        PcreError::UnknownEngineError { raw_code } => assert_eq!(raw_code, -999),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn exec_when_engine_reports_bad_option_then_bad_option() {
    let pcre = scripted(ScriptedEngine::new(0, |_| ErrorCode::BadOption.raw()));
    let pattern = pcre
        .compile("a", CompileOptions::empty())
        .expect("pattern should compile");

    match pattern.exec("a").expect_err("expected bad option") {
        PcreError::BadOption { bits } => assert_eq!(bits, 0),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn exec_when_whole_match_slot_unset_then_invariant_violation() {
    let pcre = scripted(ScriptedEngine::new(1, |ovector| {
        ovector[2] = 0;
        ovector[3] = 1;
        2
    }));
    let pattern = pcre
        .compile("(a)", CompileOptions::empty())
        .expect("pattern should compile");

    match pattern.exec("a").expect_err("expected invariant violation") {
        PcreError::EngineInvariantViolation { .. } => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn exec_when_engine_reports_vector_too_small_then_invariant_violation() {
    let pcre = scripted(ScriptedEngine::new(1, |_| 0));
    let pattern = pcre
        .compile("(a)", CompileOptions::empty())
        .expect("pattern should compile");

    match pattern.exec("a").expect_err("expected invariant violation") {
        PcreError::EngineInvariantViolation { .. } => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn exec_when_offset_past_subject_then_invariant_violation() {
    let pcre = scripted(ScriptedEngine::new(0, |ovector| {
        ovector[0] = 0;
        ovector[1] = 50;
        1
    }));
    let pattern = pcre
        .compile("a", CompileOptions::empty())
        .expect("pattern should compile");

    match pattern.exec("abc").expect_err("expected invariant violation") {
        PcreError::EngineInvariantViolation { .. } => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn global_match_when_engine_makes_no_progress_then_stops_with_error() {
    let pcre = scripted(ScriptedEngine::new(0, |ovector| {
        ovector[0] = 0;
        ovector[1] = 1;
        1
    }));
    let pattern = pcre
        .compile("a", CompileOptions::empty())
        .expect("pattern should compile");

    match pattern.global_match("aaa").expect_err("expected invariant violation") {
        PcreError::EngineInvariantViolation { .. } => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn global_match_when_engine_repeats_empty_match_then_stops_with_error() {
    let pcre = scripted(ScriptedEngine::new(0, |ovector| {
        ovector[0] = 0;
        ovector[1] = 0;
        1
    }));
    let pattern = pcre
        .compile("x*", CompileOptions::empty())
        .expect("pattern should compile");

    let mut matches = pattern.matches("ab").expect("pattern is live");
    let first = matches
        .next()
        .expect("first item")
        .expect("first match is valid");
    assert_eq!((first.whole().start(), first.whole().end()), (0, 0));
    match matches.next().expect("second item") {
        Err(PcreError::EngineInvariantViolation { detail }) => {
            assert!(detail.contains("before the search offset 1"), "{detail}")
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches.next().is_none());
}

#[test]
fn exec_at_when_match_starts_before_offset_then_invariant_violation() {
    let pcre = scripted(ScriptedEngine::new(0, |ovector| {
        ovector[0] = 1;
        ovector[1] = 4;
        1
    }));
    let pattern = pcre
        .compile("bcd", CompileOptions::empty())
        .expect("pattern should compile");

    match pattern.exec_at("abcde", 2).expect_err("expected invariant violation") {
        PcreError::EngineInvariantViolation { .. } => {}
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(pattern.exec_at("abcde", 1).expect("exec should run").is_some());
}

#[test]
fn exec_when_engine_reports_bad_length_then_subject_too_long() {
    let pcre = scripted(ScriptedEngine::new(0, |_| ErrorCode::BadLength.raw()));
    let pattern = pcre
        .compile("a", CompileOptions::empty())
        .expect("pattern should compile");

    match pattern.exec("abc").expect_err("expected subject too long") {
        PcreError::SubjectTooLong { length, max } => {
            assert_eq!(length, 3);
            assert_eq!(max, i32::MAX as usize);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn pattern_when_dropped_without_dispose_then_every_handle_is_released() {
    let engine = ScriptedEngine::new(0, |_| 0);
    let compiled = engine.compiled.clone();
    let freed = engine.freed.clone();
    let pcre = scripted(engine);

    for round in 1..=64 {
        let pattern = pcre
            .compile(r"\w+", CompileOptions::empty())
            .expect("pattern should compile");
        assert!(pattern.test("x").expect("test should run"));
        drop(pattern);
        assert_eq!(compiled.load(Ordering::SeqCst), round);
        assert_eq!(freed.load(Ordering::SeqCst), round);
    }
}

#[test]
fn name_table_when_name_repeated_then_last_entry_wins() {
    let engine = ScriptedEngine::new(2, |ovector| {
        ovector[..6].copy_from_slice(&[0, 1, 0, 1, -1, -1]);
        2
    })
    .with_names(NameTable::pack(&[(1, "dup"), (2, "dup")]));
    let pcre = scripted(engine);
    let pattern = pcre
        .compile("(?<dup>a)|(?<dup>b)", CompileOptions::DUPNAMES)
        .expect("pattern should compile");

    let names = pattern.named_groups().expect("pattern is live");
    assert_eq!(names.get("dup"), Some(2));

    let record = pattern
        .exec("a")
        .expect("exec should run")
        .expect("expected a match");
    assert!(record.name("dup").is_none());
    assert_eq!(record.get(1).expect("group 1").as_str(), "a");
}

#[test]
fn name_table_when_malformed_then_compile_frees_handle_and_fails() {
    let engine = ScriptedEngine::new(1, |_| -1)
        .with_names(NameTable::from_raw(1, 4, vec![0, 1, b'a', b'b']));
    let freed = engine.freed.clone();
    let pcre = scripted(engine);

    match pcre
        .compile("(?<ab>x)", CompileOptions::empty())
        .expect_err("expected invariant violation")
    {
        PcreError::EngineInvariantViolation { .. } => {}
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(freed.load(Ordering::SeqCst), 1);
}

#[test]
fn pattern_when_dropped_or_disposed_then_engine_frees_once() {
    let engine = ScriptedEngine::new(0, |_| -1);
    let freed = engine.freed.clone();
    let pcre = scripted(engine);

    let mut disposed = pcre
        .compile("a", CompileOptions::empty())
        .expect("pattern should compile");
    disposed.dispose().expect("dispose should succeed");
    drop(disposed);
    assert_eq!(freed.load(Ordering::SeqCst), 1);

    {
        let _dropped = pcre
            .compile("b", CompileOptions::empty())
            .expect("pattern should compile");
    }
    assert_eq!(freed.load(Ordering::SeqCst), 2);
}

#[test]
fn version_when_custom_engine_then_reported_through_facade() {
    let pcre = scripted(ScriptedEngine::new(0, |_| -1));
    assert_eq!(pcre.version().expect("version"), 845);
    assert_eq!(pcre.version_string().expect("version string"), "scripted 8.45");
    assert_eq!(pcre.config().expect("config").link_size, 2);
}
