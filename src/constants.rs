use serde::Serialize;
use std::sync::OnceLock;

use bitflags::Flags;

use crate::errors::ErrorCode;
use crate::options::{CompileOptions, ExecOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConstantKind {
    CompileOption,
    ExecOption,
    ErrorCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Constant {
    pub name: &'static str,
    pub value: i64,
    pub kind: ConstantKind,
}

/// Every recognized option flag and error code, by symbolic name.
#[derive(Debug, Serialize)]
pub struct Constants {
    entries: Vec<Constant>,
}

static TABLE: OnceLock<Constants> = OnceLock::new();

impl Constants {
    pub fn table() -> &'static Constants {
        TABLE.get_or_init(Self::build)
    }

    fn build() -> Self {
        let mut entries = Vec::new();

        for flag in CompileOptions::FLAGS {
            entries.push(Constant {
                name: flag.name(),
                value: i64::from(flag.value().bits()),
                kind: ConstantKind::CompileOption,
            });
        }
        for flag in ExecOptions::FLAGS {
            entries.push(Constant {
                name: flag.name(),
                value: i64::from(flag.value().bits()),
                kind: ConstantKind::ExecOption,
            });
        }
        entries.push(Constant {
            name: "PARTIAL",
            value: i64::from(ExecOptions::PARTIAL_SOFT.bits()),
            kind: ConstantKind::ExecOption,
        });

        for code in ErrorCode::ALL {
            entries.push(Constant {
                name: code.name(),
                value: i64::from(code.raw()),
                kind: ConstantKind::ErrorCode,
            });
        }
        entries.push(Constant {
            name: "ERROR_UNKNOWN_NODE",
            value: i64::from(ErrorCode::UnknownOpcode.raw()),
            kind: ConstantKind::ErrorCode,
        });

        Self { entries }
    }

    /// Value of the first entry with this name. Names shared by a compile
    /// and an exec flag (`ANCHORED`, `NO_UTF8_CHECK`) carry the same value.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value)
    }

    pub fn get_kind(&self, name: &str, kind: ConstantKind) -> Option<i64> {
        self.entries
            .iter()
            .find(|entry| entry.kind == kind && entry.name == name)
            .map(|entry| entry.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constant> + '_ {
        self.entries.iter()
    }

    pub fn of_kind(&self, kind: ConstantKind) -> impl Iterator<Item = &Constant> + '_ {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
