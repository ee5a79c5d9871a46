/// Sidebar listing the functions the execution service knows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FunctionPanel {
    #[default]
    Loading,
    Loaded {
        names: Vec<String>,
        selected: usize,
    },
    Failed,
}

pub const LOAD_FAILED_NOTICE: &str = "Failed to load functions.";

impl FunctionPanel {
    pub fn loaded(names: Vec<String>) -> Self {
        FunctionPanel::Loaded { names, selected: 0 }
    }

    pub fn names(&self) -> &[String] {
        match self {
            FunctionPanel::Loaded { names, .. } => names,
            _ => &[],
        }
    }

    pub fn selected(&self) -> Option<usize> {
        match self {
            FunctionPanel::Loaded { names, selected } if !names.is_empty() => Some(*selected),
            _ => None,
        }
    }

    pub fn selected_name(&self) -> Option<&str> {
        let index = self.selected()?;
        self.names().get(index).map(String::as_str)
    }

    pub fn select_next(&mut self) {
        if let FunctionPanel::Loaded { names, selected } = self {
            if *selected + 1 < names.len() {
                *selected += 1;
            }
        }
    }

    pub fn select_prev(&mut self) {
        if let FunctionPanel::Loaded { selected, .. } = self {
            *selected = selected.saturating_sub(1);
        }
    }
}
