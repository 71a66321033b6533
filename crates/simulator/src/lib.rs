//! Stakesim Simulator
//!
//! Reference scenarios and a command-line driver built on top of the
//! simulation framework.
//!
//! # Example
//!
//! ```no_run
//! use stakesim_node::Adversary;
//! use stakesim_simulator::{ScenarioConfig, Simulator};
//!
//! let config = ScenarioConfig::new(3)
//!     .with_seed(42)
//!     .with_adversary(Adversary::ForgedReveal);
//!
//! let report = Simulator::new(config).run()?;
//! report.print_summary();
//! # Ok::<(), stakesim_simulator::ScenarioError>(())
//! ```

pub mod config;
pub mod report;
pub mod runner;
pub mod scenario;

pub use config::ScenarioConfig;
pub use report::ScenarioReport;
pub use runner::{ScenarioError, Simulator};
pub use scenario::{reference_network, ADVERSARY_NODE};
