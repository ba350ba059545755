pub mod tabular;

pub use tabular::q_table::{QTable, QTableAgent, QTableAgentConfig};
