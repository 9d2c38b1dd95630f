pub mod consistency;

pub use consistency::{
    ConsistencyReport, Issue, Severity, check_consistency, check_consistency_with,
};
