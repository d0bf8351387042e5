use std::{collections::HashMap, fmt::Display, str::FromStr};

use crate::error::{CompileError, ErrorKind, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageClass {
    Static,
    Field,
    Argument,
    Local,
}

impl StorageClass {
    pub const ALL: [StorageClass; 4] = [
        StorageClass::Static,
        StorageClass::Field,
        StorageClass::Argument,
        StorageClass::Local,
    ];

    /// Static and field names live as long as the class; the rest are per subroutine.
    pub fn is_class_scoped(&self) -> bool {
        matches!(self, StorageClass::Static | StorageClass::Field)
    }

    fn slot(&self) -> usize {
        match self {
            StorageClass::Static => 0,
            StorageClass::Field => 1,
            StorageClass::Argument => 2,
            StorageClass::Local => 3,
        }
    }
}

impl FromStr for StorageClass {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(StorageClass::Static),
            "field" => Ok(StorageClass::Field),
            "argument" | "arg" => Ok(StorageClass::Argument),
            "local" | "var" => Ok(StorageClass::Local),
            _ => Err(CompileError::new(
                Position::default(),
                ErrorKind::UnknownStorageClass(s.to_string()),
            )),
        }
    }
}

impl Display for StorageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StorageClass::Static => "static",
            StorageClass::Field => "field",
            StorageClass::Argument => "argument",
            StorageClass::Local => "local",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub ty: String,
    pub kind: StorageClass,
    pub index: u16,
}

/// Two nested scopes: class (static, field) and subroutine (argument, local).
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    class_scope: HashMap<String, Variable>,
    subroutine_scope: HashMap<String, Variable>,
    counts: [u16; 4],
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_subroutine(&mut self) {
        self.subroutine_scope.clear();
        self.counts[StorageClass::Argument.slot()] = 0;
        self.counts[StorageClass::Local.slot()] = 0;
    }

    /// Registers `name` and returns its slot index. A name already present in the
    /// same scope is replaced; its old slot stays consumed.
    pub fn define(&mut self, name: &str, ty: &str, kind: StorageClass) -> u16 {
        let index = self.counts[kind.slot()];
        self.counts[kind.slot()] += 1;

        let scope = if kind.is_class_scoped() {
            &mut self.class_scope
        } else {
            &mut self.subroutine_scope
        };
        let var = Variable {
            ty: ty.to_string(),
            kind,
            index,
        };
        if let Some(old) = scope.insert(name.to_string(), var) {
            log::warn!(
                "'{}' redefined as {} {} (was {} {})",
                name,
                kind,
                ty,
                old.kind,
                old.ty
            );
        }
        index
    }

    pub fn var_count(&self, kind: StorageClass) -> u16 {
        self.counts[kind.slot()]
    }

    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.subroutine_scope
            .get(name)
            .or_else(|| self.class_scope.get(name))
    }

    pub fn kind_of(&self, name: &str) -> Option<StorageClass> {
        self.lookup(name).map(|v| v.kind)
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|v| v.ty.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.lookup(name).map(|v| v.index)
    }
}
