use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    StepOutOfRange { index: usize, len: usize },
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StepOutOfRange { index, len } => {
                write!(f, "step index {index} out of range for pipeline of length {len}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
