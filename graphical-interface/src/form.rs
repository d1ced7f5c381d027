use api_client::ParameterSet;

/// Trailing marker that groups several checkboxes under one logical name
/// (values for `foo[]` accumulate under `foo`).
pub const GROUP_SUFFIX: &str = "[]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    Checkbox { checked: bool },
    Text,
    Select,
}

/// Snapshot of one form control at refresh time. The filter panel hands the
/// encoder a fresh list of these, in panel order, on every trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControl {
    pub name: String,
    pub value: String,
    pub kind: ControlKind,
}

impl FormControl {
    pub fn checkbox(name: &str, value: &str, checked: bool) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            kind: ControlKind::Checkbox { checked },
        }
    }

    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            kind: ControlKind::Text,
        }
    }

    pub fn select(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            kind: ControlKind::Select,
        }
    }
}

/// Strips the trailing group marker from a raw control name, returning the
/// logical name and whether the control was grouped. A name without the
/// marker degroups to itself.
pub fn degroup_name(raw: &str) -> (&str, bool) {
    match raw.strip_suffix(GROUP_SUFFIX) {
        Some(logical) => (logical, true),
        None => (raw, false),
    }
}

/// Encodes the current control state into the minimal parameter set.
///
/// Checked checkboxes sharing a logical name accumulate into one
/// delimiter-joined value, in control order. Other controls register their
/// value only when non-empty; a later control overwrites an earlier one of
/// the same name. Total over any control state; never fails.
pub fn encode_parameters(controls: &[FormControl], delimiter: &str) -> ParameterSet {
    let mut parameters = ParameterSet::new();

    for control in controls {
        if control.name.is_empty() {
            continue;
        }

        match control.kind {
            ControlKind::Checkbox { checked } => {
                if !checked {
                    continue;
                }
                let (logical, _grouped) = degroup_name(&control.name);
                match parameters.get_mut(logical) {
                    Some(existing) => {
                        existing.push_str(delimiter);
                        existing.push_str(&control.value);
                    }
                    None => {
                        parameters.insert(logical.to_string(), control.value.clone());
                    }
                }
            }
            ControlKind::Text | ControlKind::Select => {
                if !control.value.is_empty() {
                    parameters.insert(control.name.clone(), control.value.clone());
                }
            }
        }
    }

    parameters
}
