use serde::Serialize;

/// Progress of a product submission as seen by observers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl SubmissionStatus {
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}
