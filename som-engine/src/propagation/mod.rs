//! Change propagation: measure reductions → pressure levels → state loads.
//!
//! Each time step runs three passes per area:
//! 1. activity → pressure: cases reduce pressure levels, weighted by the
//!    acted activity's contribution, which is then renormalized;
//! 2. direct → state: cases linked straight to a state reduce its load;
//! 3. pressure → state: each contributing pressure's total reduction,
//!    including subpressure equivalents, reduces the state load.

pub mod area_table;
pub mod contributions;
pub mod engine;
pub mod output;

pub use area_table::AreaTable;
pub use contributions::{ActivityContributionTable, ContributionTable, PressureContributionTable};
pub use engine::{ChangePropagator, PropagationInputs};
pub use output::{PropagationOutput, StepSnapshot};
