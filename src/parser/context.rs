#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

pub struct IfLabels {
    pub if_true: String,
    pub if_false: String,
    pub end: String,
}

pub struct WhileLabels {
    pub exp: String,
    pub end: String,
}

/// Per-class emission state. Label indices keep counting across subroutines so
/// every label in the class output is unique.
#[derive(Debug)]
pub struct EmissionContext {
    class_name: String,
    subroutine_name: String,
    subroutine_kind: SubroutineKind,
    returns_void: bool,
    if_index: usize,
    while_index: usize,
}

impl EmissionContext {
    pub fn new() -> Self {
        Self {
            class_name: String::new(),
            subroutine_name: String::new(),
            subroutine_kind: SubroutineKind::Function,
            returns_void: false,
            if_index: 0,
            while_index: 0,
        }
    }

    pub fn start_class(&mut self, name: &str) {
        self.class_name = name.to_string();
        self.if_index = 0;
        self.while_index = 0;
    }

    pub fn start_subroutine(&mut self, name: &str, kind: SubroutineKind, returns_void: bool) {
        self.subroutine_name = name.to_string();
        self.subroutine_kind = kind;
        self.returns_void = returns_void;
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn subroutine_kind(&self) -> SubroutineKind {
        self.subroutine_kind
    }

    pub fn returns_void(&self) -> bool {
        self.returns_void
    }

    /// `Class.subroutine` for the subroutine being compiled.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.class_name, self.subroutine_name)
    }

    pub fn next_if_labels(&mut self) -> IfLabels {
        let i = self.if_index;
        self.if_index += 1;
        IfLabels {
            if_true: format!("IF_TRUE{}", i),
            if_false: format!("IF_FALSE{}", i),
            end: format!("IF_END{}", i),
        }
    }

    pub fn next_while_labels(&mut self) -> WhileLabels {
        let i = self.while_index;
        self.while_index += 1;
        WhileLabels {
            exp: format!("WHILE_EXP{}", i),
            end: format!("WHILE_END{}", i),
        }
    }
}
