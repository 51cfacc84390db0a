//! Progress and log events emitted by an aggregation session

/// How a log event should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// One entry of the ordered event stream a session emits
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Progress { percent: f64, status: String },
    Log { message: String, severity: Severity },
}

/// Receiver for session events
pub trait EventSink {
    fn emit(&mut self, event: SessionEvent);
}

impl EventSink for Vec<SessionEvent> {
    fn emit(&mut self, event: SessionEvent) {
        self.push(event);
    }
}

/// Percentages carried by the progress events of a stream, in order
#[cfg(test)]
pub(crate) fn progress_values(events: &[SessionEvent]) -> Vec<f64> {
    events
        .iter()
        .filter_map(|event| match event {
            SessionEvent::Progress { percent, .. } => Some(*percent),
            SessionEvent::Log { .. } => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_keeps_order() {
        let mut sink: Vec<SessionEvent> = Vec::new();
        sink.emit(SessionEvent::Progress { percent: 0.0, status: "start".into() });
        sink.emit(SessionEvent::Log { message: "hello".into(), severity: Severity::Info });
        sink.emit(SessionEvent::Progress { percent: 50.0, status: "half".into() });

        assert_eq!(sink.len(), 3);
        assert_eq!(progress_values(&sink), vec![0.0, 50.0]);
    }
}
