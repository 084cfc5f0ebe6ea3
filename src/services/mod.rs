pub mod consent;
pub mod list_view;
pub mod patients;
pub mod stats;
pub mod transactions;

pub use consent::{ConsentAction, ConsentForm, ConsentManager, ConsentWorkflow};
pub use list_view::{FetchOutcome, ListController, ListPage, ListSource, ListState};
pub use patients::{PatientDetail, PatientList};
pub use stats::{StatsDashboard, StatsState};
pub use transactions::TransactionHistory;
