//! Recorded host trace format.
//!
//! JSON Lines, one event per line. Blank lines and lines starting with `#`
//! are ignored.
//!
//! ```text
//! {"event":"testrun_start"}
//! {"event":"traffic_spawn","obj_id":16000001,"traffic_id":3}
//! {"event":"cycle","time":0.01,"state":"simulate","ego":{...},"objects":[...]}
//! {"event":"testrun_end"}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use contracts::CycleState;
use serde::{Deserialize, Serialize};

/// One host callback or traffic change, in recording order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Test run set up; the host calls the start hook
    TestrunStart,
    /// Traffic actor appeared
    TrafficSpawn { obj_id: i32, traffic_id: i32 },
    /// Traffic actor removed
    TrafficDespawn { obj_id: i32 },
    /// One simulation cycle
    Cycle(CycleState),
    /// Test run ended; the host calls the end hook
    TestrunEnd,
}

/// Read a whole trace file
pub fn read_trace(path: &Path) -> Result<Vec<TraceEvent>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open trace {}", path.display()))?;
    parse_trace(BufReader::new(file))
        .with_context(|| format!("Failed to read trace {}", path.display()))
}

fn parse_trace(reader: impl BufRead) -> Result<Vec<TraceEvent>> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(line)
            .with_context(|| format!("line {}: invalid trace event", idx + 1))?;
        events.push(event);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SimState;

    #[test]
    fn test_parse_trace_events() {
        let content = r#"
# recorded run
{"event":"testrun_start"}
{"event":"traffic_spawn","obj_id":16000001,"traffic_id":3}
{"event":"cycle","time":0.01,"state":"simulate","ego":{"position":{"x":0,"y":0,"z":0},"velocity":{"x":1,"y":0,"z":0},"acceleration":{"x":0,"y":0,"z":0},"yaw_rate":0.0,"gear":1}}
{"event":"traffic_despawn","obj_id":16000001}
{"event":"testrun_end"}
"#;
        let events = parse_trace(content.as_bytes()).unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(events[0], TraceEvent::TestrunStart);
        assert_eq!(
            events[1],
            TraceEvent::TrafficSpawn {
                obj_id: 16_000_001,
                traffic_id: 3
            }
        );
        let TraceEvent::Cycle(cycle) = &events[2] else {
            panic!("expected cycle event");
        };
        assert_eq!(cycle.state, SimState::Simulate);
        assert_eq!(cycle.ego.gear, 1);
        assert_eq!(events[4], TraceEvent::TestrunEnd);
    }

    #[test]
    fn test_demo_trace_parses() {
        let content = include_str!("../../../../demos/highway_trace.jsonl");
        let events = parse_trace(content.as_bytes()).unwrap();
        assert_eq!(events.len(), 10);
        let cycles = events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Cycle(_)))
            .count();
        assert_eq!(cycles, 6);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let content = "{\"event\":\"testrun_start\"}\n{\"event\":\"bogus\"}\n";
        let err = parse_trace(content.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
