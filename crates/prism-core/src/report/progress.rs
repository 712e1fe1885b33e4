//! Per-variant progress updates. The optimizer emits one event after each
//! variant; the console layer turns them into stderr lines.

use crate::model::Technique;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub done: usize,
    pub total: usize,
    pub technique: Technique,
}

pub type ProgressSink = Arc<dyn Fn(ProgressEvent) + Send + Sync>;
