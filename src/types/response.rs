//! Run response envelope, discriminated by `status` and then by agent family.

use super::agent::{AgentFamily, AgentKind};
use crate::validation::{ValidationReport, Validator};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Score {
    High,
    Medium,
    Low,
}

impl Score {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Lifecycle state reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub const TAGS: [&'static str; 4] = ["queued", "failed", "completed", "running"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Completed and failed runs do not change anymore.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchStep {
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Research {
    pub steps: Vec<ResearchStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
}

/// Scored judgement of the qualification and timing agents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub score: Score,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// One of the request's option names, or `"unknown"`.
    pub choice: String,
    pub reason: String,
}

impl Classification {
    pub const UNKNOWN_CHOICE: &'static str = "unknown";

    /// The agent could not pick any of the options.
    pub fn is_unknown(&self) -> bool {
        self.choice == Self::UNKNOWN_CHOICE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageBody {
    pub markdown: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopyMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<MessageBody>,
}

/// Result payload of a completed or running run, per agent family.
#[derive(Debug, Clone, PartialEq)]
pub enum RunResult {
    Research {
        research: Option<Research>,
    },
    Qualification {
        research: Option<Research>,
        qualification: Option<Verdict>,
    },
    Copywriting {
        research: Option<Research>,
        message: Option<CopyMessage>,
        sequence: Option<Vec<CopyMessage>>,
    },
    Timing {
        research: Option<Research>,
        timing: Option<Verdict>,
    },
    Classification {
        research: Option<Research>,
        classification: Option<Classification>,
    },
}

impl RunResult {
    pub fn family(&self) -> AgentFamily {
        match self {
            Self::Research { .. } => AgentFamily::Research,
            Self::Qualification { .. } => AgentFamily::Qualification,
            Self::Copywriting { .. } => AgentFamily::Copywriting,
            Self::Timing { .. } => AgentFamily::Timing,
            Self::Classification { .. } => AgentFamily::Classification,
        }
    }

    pub fn research(&self) -> Option<&Research> {
        match self {
            Self::Research { research }
            | Self::Qualification { research, .. }
            | Self::Copywriting { research, .. }
            | Self::Timing { research, .. }
            | Self::Classification { research, .. } => research.as_ref(),
        }
    }

    pub fn qualification(&self) -> Option<&Verdict> {
        match self {
            Self::Qualification { qualification, .. } => qualification.as_ref(),
            _ => None,
        }
    }

    pub fn timing(&self) -> Option<&Verdict> {
        match self {
            Self::Timing { timing, .. } => timing.as_ref(),
            _ => None,
        }
    }

    pub fn classification(&self) -> Option<&Classification> {
        match self {
            Self::Classification { classification, .. } => classification.as_ref(),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&CopyMessage> {
        match self {
            Self::Copywriting { message, .. } => message.as_ref(),
            _ => None,
        }
    }

    pub fn sequence(&self) -> Option<&[CopyMessage]> {
        match self {
            Self::Copywriting { sequence, .. } => sequence.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueuedRun {
    pub id: String,
    pub agent: AgentKind,
    pub metadata: Option<Map<String, Value>>,
    pub created_at: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedRun {
    pub id: String,
    pub agent: AgentKind,
    pub error: Option<String>,
    pub metadata: Option<Map<String, Value>>,
    pub created_at: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunWithResult {
    pub id: String,
    pub agent: AgentKind,
    /// `Completed` or `Running`.
    pub status: RunStatus,
    pub result: RunResult,
    pub metadata: Option<Map<String, Value>>,
    pub created_at: f64,
}

/// Body of `GET /agents/runs/{run}`.
#[derive(Debug, Clone, PartialEq)]
pub enum RunResponse {
    Queued(QueuedRun),
    Failed(FailedRun),
    WithResult(RunWithResult),
}

impl RunResponse {
    /// Validate an untyped response body: first by `status`, then by agent family.
    pub fn from_value(value: &Value) -> Result<Self, ValidationReport> {
        let mut v = Validator::new();
        let parsed = parse_run_response(&mut v, value);
        v.finish(parsed)
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Queued(r) => &r.id,
            Self::Failed(r) => &r.id,
            Self::WithResult(r) => &r.id,
        }
    }

    pub fn agent(&self) -> AgentKind {
        match self {
            Self::Queued(r) => r.agent,
            Self::Failed(r) => r.agent,
            Self::WithResult(r) => r.agent,
        }
    }

    pub fn status(&self) -> RunStatus {
        match self {
            Self::Queued(_) => RunStatus::Queued,
            Self::Failed(_) => RunStatus::Failed,
            Self::WithResult(r) => r.status,
        }
    }

    pub fn created_at(&self) -> f64 {
        match self {
            Self::Queued(r) => r.created_at,
            Self::Failed(r) => r.created_at,
            Self::WithResult(r) => r.created_at,
        }
    }

    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Queued(r) => r.metadata.as_ref(),
            Self::Failed(r) => r.metadata.as_ref(),
            Self::WithResult(r) => r.metadata.as_ref(),
        }
    }

    pub fn result(&self) -> Option<&RunResult> {
        match self {
            Self::WithResult(r) => Some(&r.result),
            _ => None,
        }
    }

    /// Failure reason of a failed run.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(r) => r.error.as_deref(),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }
}

impl<'de> Deserialize<'de> for RunResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        RunResponse::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Body of `POST /agents/runs`, without the internal `_status` marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedRun {
    pub id: String,
    /// Any other field the API returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn parse_agent_enum(v: &mut Validator, value: &Value) -> Option<AgentKind> {
    v.one_of(value, &AgentKind::tags())
        .and_then(AgentKind::from_tag)
}

fn parse_metadata(v: &mut Validator, obj: &Map<String, Value>) -> Option<Option<Map<String, Value>>> {
    v.optional(obj, "metadata", |v, val| v.record(val))
}

/// `_status` is an internal marker; only its type is checked.
fn check_status_marker(v: &mut Validator, obj: &Map<String, Value>) -> bool {
    v.optional(obj, "_status", |v, val| v.number(val)).is_some()
}

fn parse_step(v: &mut Validator, value: &Value) -> Option<ResearchStep> {
    let obj = v.object(value)?;
    let action = v.required(obj, "action", |v, val| v.string(val));
    let outcome = v.optional(obj, "outcome", |v, val| v.string(val));
    Some(ResearchStep {
        action: action?,
        outcome: outcome?,
    })
}

fn parse_research(v: &mut Validator, value: &Value) -> Option<Research> {
    let obj = v.object(value)?;
    let steps = v.required(obj, "steps", |v, val| {
        let items = v.array(val)?;
        v.each(items, parse_step)
    });
    let conclusion = v.optional(obj, "conclusion", |v, val| v.string(val));
    Some(Research {
        steps: steps?,
        conclusion: conclusion?,
    })
}

fn parse_verdict(v: &mut Validator, value: &Value) -> Option<Verdict> {
    let obj = v.object(value)?;
    let score = v.required(obj, "score", |v, val| {
        v.one_of(val, &["high", "medium", "low"])
            .and_then(Score::from_tag)
    });
    let reason = v.required(obj, "reason", |v, val| v.string(val));
    Some(Verdict {
        score: score?,
        reason: reason?,
    })
}

fn parse_classification(v: &mut Validator, value: &Value) -> Option<Classification> {
    let obj = v.object(value)?;
    let choice = v.required(obj, "choice", |v, val| v.string(val));
    let reason = v.required(obj, "reason", |v, val| v.string(val));
    Some(Classification {
        choice: choice?,
        reason: reason?,
    })
}

fn parse_message(v: &mut Validator, value: &Value) -> Option<CopyMessage> {
    let obj = v.object(value)?;
    let body = v.nullish(obj, "body", |v, val| {
        let body = v.object(val)?;
        let markdown = v.required(body, "markdown", |v, val| v.string(val));
        let html = v.required(body, "html", |v, val| v.string(val));
        Some(MessageBody {
            markdown: markdown?,
            html: html?,
        })
    });
    let subject = v.nullish(obj, "subject", |v, val| v.string(val));
    Some(CopyMessage {
        subject: subject?,
        body: body?,
    })
}

fn parse_result(v: &mut Validator, value: &Value, family: AgentFamily) -> Option<RunResult> {
    let obj = v.object(value)?;
    let research = v.nullish(obj, "research", parse_research);
    let result = match family {
        AgentFamily::Research => Some(RunResult::Research { research: None }),
        AgentFamily::Qualification => v
            .nullish(obj, "qualification", parse_verdict)
            .map(|qualification| RunResult::Qualification {
                research: None,
                qualification,
            }),
        AgentFamily::Timing => v
            .nullish(obj, "timing", parse_verdict)
            .map(|timing| RunResult::Timing {
                research: None,
                timing,
            }),
        AgentFamily::Classification => v
            .nullish(obj, "classification", parse_classification)
            .map(|classification| RunResult::Classification {
                research: None,
                classification,
            }),
        AgentFamily::Copywriting => {
            let message = v.nullish(obj, "message", parse_message);
            let sequence = v.optional(obj, "sequence", |v, val| {
                let items = v.array(val)?;
                v.each(items, parse_message)
            });
            match (message, sequence) {
                (Some(message), Some(sequence)) => Some(RunResult::Copywriting {
                    research: None,
                    message,
                    sequence,
                }),
                _ => None,
            }
        }
    };
    let research = research?;
    result.map(|mut r| {
        match &mut r {
            RunResult::Research { research: slot }
            | RunResult::Qualification { research: slot, .. }
            | RunResult::Copywriting { research: slot, .. }
            | RunResult::Timing { research: slot, .. }
            | RunResult::Classification { research: slot, .. } => *slot = research,
        }
        r
    })
}

fn parse_run_response(v: &mut Validator, value: &Value) -> Option<RunResponse> {
    let obj = v.object(value)?;
    let status = v.required(obj, "status", |v, val| v.one_of(val, &RunStatus::TAGS))?;

    let marker_ok = check_status_marker(v, obj);
    let id = v.required(obj, "id", |v, val| v.string(val));

    let response = match status {
        "queued" => {
            let agent = v.required(obj, "agent", parse_agent_enum);
            let metadata = parse_metadata(v, obj);
            let created_at = v.required(obj, "created_at", |v, val| v.number(val));
            Some(RunResponse::Queued(QueuedRun {
                id: id?,
                agent: agent?,
                metadata: metadata?,
                created_at: created_at?,
            }))
        }
        "failed" => {
            let agent = v.required(obj, "agent", parse_agent_enum);
            let error = v.optional(obj, "error", |v, val| v.string(val));
            let metadata = parse_metadata(v, obj);
            let created_at = v.required(obj, "created_at", |v, val| v.number(val));
            Some(RunResponse::Failed(FailedRun {
                id: id?,
                agent: agent?,
                error: error?,
                metadata: metadata?,
                created_at: created_at?,
            }))
        }
        other => {
            let status = if other == "running" {
                RunStatus::Running
            } else {
                RunStatus::Completed
            };
            let agent = v.scoped("agent", |v| {
                let kind = obj
                    .get("agent")
                    .and_then(Value::as_str)
                    .and_then(AgentKind::from_tag);
                if kind.is_none() {
                    v.report(format!(
                        "Invalid discriminator value. Expected {}",
                        AgentKind::expected_tags()
                    ));
                }
                kind
            });
            let result = agent.and_then(|agent| {
                v.required(obj, "result", |v, val| parse_result(v, val, agent.family()))
            });
            let metadata = parse_metadata(v, obj);
            let created_at = v.required(obj, "created_at", |v, val| v.number(val));
            Some(RunResponse::WithResult(RunWithResult {
                id: id?,
                agent: agent?,
                status,
                result: result?,
                metadata: metadata?,
                created_at: created_at?,
            }))
        }
    };
    response.filter(|_| marker_ok)
}
