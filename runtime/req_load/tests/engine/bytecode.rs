use pretty_assertions::assert_eq;
use req_load::LoadErrorKind;
use req_unit::{FrameError, Instr};

use crate::common::{unit_bytes, unit_with, Fixture};

#[test]
fn bytecode_unit_runs_with_patched_terminator() {
    let mut fx = Fixture::new();
    fx.file("m.mrb", unit_bytes("print from bytecode"));
    let mut loader = fx.loader();

    assert!(loader.require(&mut fx.vm, "m").unwrap());
    assert_eq!(fx.vm.events, vec!["from bytecode"]);

    let unit = &fx.vm.units[0];
    let code: Vec<Instr> = unit.instructions().collect();
    assert_eq!(
        code,
        vec![Instr::load_nil(1), Instr::load_nil(0), Instr::ret(0, 0)]
    );
}

#[test]
fn unit_without_stop_is_untouched() {
    let mut fx = Fixture::new();
    let code = [Instr::load_nil(0), Instr::ret(0, 0)];
    fx.file("m.mrb", unit_with(&code, "print plain"));
    let mut loader = fx.loader();

    loader.require(&mut fx.vm, "m.mrb").unwrap();
    assert_eq!(fx.vm.units[0].instructions().collect::<Vec<_>>(), code.to_vec());
}

#[test]
fn unit_call_is_arena_scoped() {
    let mut fx = Fixture::new();
    fx.file("m.mrb", unit_bytes("require inner"));
    fx.file("inner.mrb", unit_bytes("print inner"));
    let mut loader = fx.loader();

    loader.require(&mut fx.vm, "m").unwrap();
    assert_eq!(fx.vm.max_arena_depth, 2);
    assert_eq!(fx.vm.arena_depth(), 0);
}

#[test]
fn arena_restored_when_unit_raises() {
    let mut fx = Fixture::new();
    fx.file("m.mrb", unit_bytes("raise RuntimeError inside"));
    let mut loader = fx.loader();

    assert!(loader.require(&mut fx.vm, "m").is_err());
    assert_eq!(fx.vm.arena_depth(), 0);
}

#[test]
fn corrupt_unit_is_a_deserialize_error() {
    let mut fx = Fixture::new();
    let path = fx.file("m.mrb", b"RQBC0001 this is not a unit");
    let mut loader = fx.loader();

    let err = loader.require(&mut fx.vm, "m").unwrap_err();
    match err.kind {
        LoadErrorKind::Deserialize { origin, .. } => assert_eq!(origin, path.display().to_string()),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.raised_in_script);
    assert!(fx.vm.units.is_empty());
    assert!(loader.registry().is_empty());
}

#[test]
fn deserialize_error_is_not_swallowed_by_load() {
    let mut fx = Fixture::new();
    fx.file("m.mrb", b"XXXX");
    let mut loader = fx.loader();

    let err = loader.load(&mut fx.vm, "m").unwrap_err();
    assert!(matches!(
        err.kind,
        LoadErrorKind::Deserialize {
            error: FrameError::Truncated { .. },
            ..
        }
    ));
    assert!(fx.vm.reported.is_empty());
}
