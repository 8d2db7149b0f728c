use pretty_assertions::assert_eq;
use req_load::kernel::{f_load, f_require, ScriptValue};
use req_load::LoadErrorKind;

use crate::common::Fixture;

/// A script integer.
struct Int(i64);

impl ScriptValue for Int {
    fn as_str(&self) -> Option<&str> {
        None
    }

    fn inspect(&self) -> String {
        self.0.to_string()
    }
}

#[test]
fn non_string_rejected_before_resolution() {
    let mut fx = Fixture::new();
    let mut loader = fx.loader();

    let err = f_require(&mut loader, &mut fx.vm, &Int(42)).unwrap_err();
    assert_eq!(err.message, "can't convert 42 into String");
    assert!(matches!(err.kind, LoadErrorKind::ArgumentType { .. }));

    let err = f_load(&mut loader, &mut fx.vm, &Int(7)).unwrap_err();
    assert_eq!(err.kind.class_name(), "TypeError");

    assert!(fx.opener.opened().is_empty());
    assert!(fx.vm.script_names.is_empty());
}

#[test]
fn string_arguments_delegate() {
    let mut fx = Fixture::new();
    fx.file("m.rb", "print m");
    let mut loader = fx.loader();

    assert!(f_require(&mut loader, &mut fx.vm, "m").unwrap());
    assert!(!f_require(&mut loader, &mut fx.vm, &String::from("m")).unwrap());
    assert!(f_load(&mut loader, &mut fx.vm, "m").unwrap());
    assert_eq!(fx.vm.events, vec!["m", "m"]);
}

#[test]
fn string_inspect_is_quoted() {
    assert_eq!("a\"b".inspect(), "\"a\\\"b\"");
}
