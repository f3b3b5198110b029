use pcre_bridge::{CompileOptions, ConstantKind, Constants, ErrorCode, ExecOptions, Pcre};

#[test]
fn constants_when_requested_then_lists_options_and_errors() {
    let pcre = Pcre::new();
    pcre.init().expect("engine should initialize");
    let table = pcre.constants().expect("constants");

    assert_eq!(table.get("CASELESS"), Some(0x1));
    assert_eq!(table.get("UTF8"), Some(0x800));
    assert_eq!(table.get("NOTEMPTY"), Some(0x400));
    assert_eq!(table.get("ERROR_NOMATCH"), Some(-1));
    assert_eq!(table.get("ERROR_MATCHLIMIT"), Some(-8));
    assert_eq!(table.get("MISSING"), None);
}

#[test]
fn constants_when_alias_requested_then_shares_value() {
    let table = Constants::table();
    assert_eq!(table.get("PARTIAL"), table.get("PARTIAL_SOFT"));
    assert_eq!(table.get("ERROR_UNKNOWN_NODE"), table.get("ERROR_UNKNOWN_OPCODE"));
}

#[test]
fn constants_when_grouped_by_kind_then_counts_match_sources() {
    let table = Constants::table();
    let compile = table.of_kind(ConstantKind::CompileOption).count();
    let exec = table.of_kind(ConstantKind::ExecOption).count();
    let errors = table.of_kind(ConstantKind::ErrorCode).count();

    assert_eq!(compile, CompileOptions::all().iter().count());
    assert_eq!(exec, ExecOptions::all().iter().count() + 1);
    assert_eq!(errors, ErrorCode::ALL.len() + 1);
    assert_eq!(table.len(), compile + exec + errors);
}

#[test]
fn constants_when_name_shared_by_kinds_then_lookup_by_kind() {
    let table = Constants::table();
    assert_eq!(
        table.get_kind("ANCHORED", ConstantKind::ExecOption),
        Some(i64::from(ExecOptions::ANCHORED.bits()))
    );
    assert_eq!(
        table.get_kind("ANCHORED", ConstantKind::CompileOption),
        Some(i64::from(CompileOptions::ANCHORED.bits()))
    );
}
