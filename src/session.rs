use crate::aggregate;
use crate::loader::{self, LoadReport};
use crate::types::{Aggregate, ValidRow};
use log::info;
use std::path::Path;

/// Default selection when a dataset is freshly loaded.
pub const DEFAULT_POLARITY: u8 = 3;

/// Everything derived from one loaded file. Valid rows and the aggregate are
/// built once per load; polarity changes only re-project from the aggregate.
#[derive(Debug)]
pub struct SessionData {
    pub valid_rows: Vec<ValidRow>,
    pub report: LoadReport,
    pub aggregate: Aggregate,
    pub selected_polarity: u8,
}

/// Session state machine. A load replaces the whole record: there is no
/// merging of datasets across loads and no partially-committed state.
#[derive(Debug)]
pub enum Session {
    Idle,
    Loaded(Box<SessionData>),
    Error(String),
}

impl Session {
    /// Transition from any state through a load attempt. Ingestion failures
    /// collapse into a single message and leave no rows behind.
    pub fn load(path: &Path) -> Session {
        match loader::load_and_validate(path) {
            Ok((valid_rows, report)) => {
                let aggregate = aggregate::aggregate(&valid_rows);
                info!(
                    "session loaded: {} valid rows, {} mapped states",
                    report.valid_rows,
                    aggregate.buckets.len()
                );
                Session::Loaded(Box::new(SessionData {
                    valid_rows,
                    report,
                    aggregate,
                    selected_polarity: DEFAULT_POLARITY,
                }))
            }
            Err(e) => Session::Error(e.to_string()),
        }
    }

    pub fn data(&self) -> Option<&SessionData> {
        match self {
            Session::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut SessionData> {
        match self {
            Session::Loaded(data) => Some(data),
            _ => None,
        }
    }
}
