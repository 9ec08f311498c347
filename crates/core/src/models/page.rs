use serde::{Deserialize, Serialize};

/// Display state of a page backed by a fetched series.
///
/// Loading, failure and "no data" are distinct states the renderer must
/// show explicitly; none of them is an error in the analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageState<T> {
    Loading,
    Failed(String),
    Empty,
    Ready(T),
}

impl<T> PageState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, PageState::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PageState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PageState<U> {
        match self {
            PageState::Loading => PageState::Loading,
            PageState::Failed(msg) => PageState::Failed(msg),
            PageState::Empty => PageState::Empty,
            PageState::Ready(value) => PageState::Ready(f(value)),
        }
    }
}
