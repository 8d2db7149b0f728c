//! Script-facing `load` and `require`.
//!
//! These take whatever value the script passed and reject anything that is
//! not a string before touching the filesystem.

use crate::errors::{self, LoadError};
use crate::loader::Loader;
use crate::vm::Vm;

/// A value passed from script code.
pub trait ScriptValue {
    /// The string contents, if this is a string.
    fn as_str(&self) -> Option<&str>;

    /// How the value prints in error messages.
    fn inspect(&self) -> String;
}

impl ScriptValue for str {
    fn as_str(&self) -> Option<&str> {
        Some(self)
    }

    fn inspect(&self) -> String {
        format!("{self:?}")
    }
}

impl ScriptValue for String {
    fn as_str(&self) -> Option<&str> {
        Some(String::as_str(self))
    }

    fn inspect(&self) -> String {
        format!("{self:?}")
    }
}

/// `Kernel#load`.
pub fn f_load<V: ScriptValue + ?Sized>(
    loader: &mut Loader,
    vm: &mut dyn Vm,
    arg: &V,
) -> Result<bool, LoadError> {
    let name = string_arg(arg)?;
    loader.load(vm, name)
}

/// `Kernel#require`.
pub fn f_require<V: ScriptValue + ?Sized>(
    loader: &mut Loader,
    vm: &mut dyn Vm,
    arg: &V,
) -> Result<bool, LoadError> {
    let name = string_arg(arg)?;
    loader.require(vm, name)
}

fn string_arg<V: ScriptValue + ?Sized>(arg: &V) -> Result<&str, LoadError> {
    arg.as_str().ok_or_else(|| errors::argument_type(&arg.inspect()))
}
