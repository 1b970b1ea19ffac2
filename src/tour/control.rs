use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ControlError;

/// Action requested by a control button or shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ControlCommand {
    /// Button value `"N"`, selecting camera and clip `N - 1`
    Select { button: u32 },
    Back,
}

impl ControlCommand {
    /// Zero-based camera/clip index; `None` for back and for button 0
    pub fn index(&self) -> Option<usize> {
        match *self {
            ControlCommand::Select { button } => button.checked_sub(1).map(|i| i as usize),
            ControlCommand::Back => None,
        }
    }
}

impl FromStr for ControlCommand {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() {
            return Err(ControlError::Empty);
        }
        if value == "back" {
            return Ok(ControlCommand::Back);
        }
        value
            .parse::<u32>()
            .map(|button| ControlCommand::Select { button })
            .map_err(|_| ControlError::Unrecognised(value.to_string()))
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlCommand::Select { button } => write!(f, "{}", button),
            ControlCommand::Back => write!(f, "back"),
        }
    }
}

impl TryFrom<String> for ControlCommand {
    type Error = ControlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ControlCommand> for String {
    fn from(command: ControlCommand) -> Self {
        command.to_string()
    }
}

/// State flag on the control container
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControlClass {
    Active,
    Forward,
    Back,
    Default,
}

impl ControlClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlClass::Active => "is-active",
            ControlClass::Forward => "is-forward",
            ControlClass::Back => "is-back",
            ControlClass::Default => "is-default",
        }
    }
}

impl fmt::Display for ControlClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlClassList {
    classes: BTreeSet<ControlClass>,
}

impl ControlClassList {
    pub fn add(&mut self, class: ControlClass) {
        self.classes.insert(class);
    }

    pub fn remove(&mut self, class: ControlClass) {
        self.classes.remove(&class);
    }

    pub fn contains(&self, class: ControlClass) -> bool {
        self.classes.contains(&class)
    }

    /// Class names in a stable order
    pub fn classes(&self) -> Vec<&'static str> {
        self.classes.iter().map(ControlClass::as_str).collect()
    }
}

impl fmt::Display for ControlClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.classes().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_button_values() {
        assert_eq!("1".parse(), Ok(ControlCommand::Select { button: 1 }));
        assert_eq!(" 3 ".parse(), Ok(ControlCommand::Select { button: 3 }));
        assert_eq!("back".parse(), Ok(ControlCommand::Back));
        assert_eq!("".parse::<ControlCommand>(), Err(ControlError::Empty));
        assert_eq!(
            "forward".parse::<ControlCommand>(),
            Err(ControlError::Unrecognised("forward".into()))
        );
        assert!("-1".parse::<ControlCommand>().is_err());
    }

    #[test]
    fn test_index_is_zero_based() {
        assert_eq!(ControlCommand::Select { button: 1 }.index(), Some(0));
        assert_eq!(ControlCommand::Select { button: 0 }.index(), None);
        assert_eq!(ControlCommand::Back.index(), None);
    }

    #[test]
    fn test_serde_uses_button_values() {
        let commands: Vec<ControlCommand> = serde_json::from_str(r#"["2", "back"]"#).unwrap();
        assert_eq!(commands, vec![ControlCommand::Select { button: 2 }, ControlCommand::Back]);
        assert_eq!(serde_json::to_string(&commands).unwrap(), r#"["2","back"]"#);
        assert!(serde_json::from_str::<ControlCommand>(r#""up""#).is_err());
    }

    #[test]
    fn test_class_list() {
        let mut list = ControlClassList::default();
        list.add(ControlClass::Default);
        list.add(ControlClass::Forward);
        list.add(ControlClass::Forward);
        assert_eq!(list.classes(), vec!["is-forward", "is-default"]);

        list.remove(ControlClass::Default);
        list.remove(ControlClass::Back);
        assert!(list.contains(ControlClass::Forward));
        assert_eq!(list.to_string(), "is-forward");
    }
}
