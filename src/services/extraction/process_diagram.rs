//! Process Diagram Extractor
//!
//! Walks a BPMN-style XML process definition, collecting tasks and gateways
//! per process. Complexity is a deterministic function of the grand totals,
//! never inference-derived: re-running on the same file yields the same
//! counts and tier every time.

use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::models::{AnalysisRecord, Complexity, GatewayNode, Modality, ProcessSummary, TaskNode};
use crate::utils::error::{AppError, AppResult};

use super::{Extractor, MessagePayload};

/// Totals below these bounds map to low complexity
const LOW_TASK_BOUND: usize = 5;
const LOW_GATEWAY_BOUND: usize = 3;

/// Totals below these bounds (and at or above the low bounds) map to medium
const MEDIUM_TASK_BOUND: usize = 15;
const MEDIUM_GATEWAY_BOUND: usize = 8;

/// BPMN process-definition analysis
pub struct BpmnExtractor;

impl BpmnExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Walk all `process` elements collecting task and gateway children
    fn parse_processes(xml: &str) -> AppResult<Vec<ProcessSummary>> {
        let mut reader = quick_xml::Reader::from_str(xml);
        let mut processes: Vec<ProcessSummary> = Vec::new();
        let mut current: Option<ProcessSummary> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    Self::on_element(e, true, &mut current, &mut processes);
                }
                Ok(Event::Empty(ref e)) => {
                    Self::on_element(e, false, &mut current, &mut processes);
                }
                Ok(Event::End(ref e)) => {
                    if String::from_utf8_lossy(e.local_name().as_ref()) == "process" {
                        if let Some(process) = current.take() {
                            processes.push(process);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(AppError::extraction(format!("XML parse error: {}", e)));
                }
                _ => {}
            }
        }

        // Unterminated process element still counts
        if let Some(process) = current.take() {
            processes.push(process);
        }

        Ok(processes)
    }

    fn on_element(
        e: &BytesStart<'_>,
        is_open: bool,
        current: &mut Option<ProcessSummary>,
        processes: &mut Vec<ProcessSummary>,
    ) {
        let name = local_name(e);

        if name == "process" {
            let summary = ProcessSummary {
                id: attr(e, "id"),
                name: attr(e, "name"),
                tasks: Vec::new(),
                gateways: Vec::new(),
            };
            if is_open {
                // Processes are not nested; close a dangling one defensively
                if let Some(previous) = current.take() {
                    processes.push(previous);
                }
                *current = Some(summary);
            } else {
                processes.push(summary);
            }
            return;
        }

        let Some(process) = current.as_mut() else {
            return;
        };

        if name == "task" {
            process.tasks.push(TaskNode {
                id: attr(e, "id"),
                name: attr(e, "name"),
            });
        } else if is_gateway_element(&name) {
            process.gateways.push(GatewayNode {
                id: attr(e, "id"),
                name: attr(e, "name"),
                direction: attr(e, "gatewayDirection").unwrap_or_else(|| "unspecified".to_string()),
            });
        }
    }
}

impl Default for BpmnExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Local element name, namespace prefix stripped
fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Read an attribute value by name
fn attr(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

/// The literal `gateway` element plus the standard typed variants
/// (exclusiveGateway, parallelGateway, ...)
fn is_gateway_element(name: &str) -> bool {
    name == "gateway" || name.ends_with("Gateway")
}

/// Map grand totals to a complexity tier.
///
/// Lower buckets are inclusive at their floor and exclusive at their
/// ceiling: 4 tasks/2 gateways is low, 5/2 is medium, 15/8 is high.
pub fn complexity_for_counts(total_tasks: usize, total_gateways: usize) -> Complexity {
    if total_tasks < LOW_TASK_BOUND && total_gateways < LOW_GATEWAY_BOUND {
        Complexity::Low
    } else if total_tasks < MEDIUM_TASK_BOUND && total_gateways < MEDIUM_GATEWAY_BOUND {
        Complexity::Medium
    } else {
        Complexity::High
    }
}

#[async_trait]
impl Extractor for BpmnExtractor {
    fn modality(&self) -> Modality {
        Modality::Bpmn
    }

    async fn analyze(&self, payload: &MessagePayload) -> AppResult<AnalysisRecord> {
        let path = payload.require_file()?;

        let xml = std::fs::read_to_string(path)
            .map_err(|e| AppError::extraction(format!("failed to read process diagram: {}", e)))?;

        let processes = Self::parse_processes(&xml)?;

        let total_tasks: usize = processes.iter().map(|p| p.tasks.len()).sum();
        let total_gateways: usize = processes.iter().map(|p| p.gateways.len()).sum();
        let complexity = complexity_for_counts(total_tasks, total_gateways);

        debug!(
            processes = processes.len(),
            total_tasks, total_gateways, "process diagram parsed"
        );

        Ok(AnalysisRecord::Bpmn {
            processes,
            total_tasks,
            total_gateways,
            complexity,
        })
    }
}
