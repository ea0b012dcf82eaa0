//! Run request envelope: the common lead/user/context shape plus the family-specific fields,
//! discriminated by `agent`.

use super::agent::{AgentFamily, AgentKind};
use crate::error::{Error, ErrorContext};
use crate::error_code::ErrorKind;
use crate::validation::{rules, ValidationReport, Validator};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};

const INVALID_DOMAIN_OR_URL: &str = "Please enter a valid URL or domain";
const UNSUPPORTED_LANGUAGE: &str = "Language not recognized or supported; please contact support in case you'd like to add support for a language.";

/// Languages accepted by the copywriting agents.
pub const LANGUAGE_CODES: [&str; 44] = [
    "en-US", "en-UK", "en-AU", "nl", "de", "lb", "fr", "es", "pt", "it", "gr", "ru", "tr", "da",
    "sv", "fi", "is", "no", "zh", "ja", "hi", "th", "vi", "my", "ko", "et", "lt", "lv", "mk",
    "id", "cs", "pl", "sl", "sk", "bg", "bs", "hu", "uk", "sr", "ro", "sq", "hy", "he", "ar",
];

/// One of [`LANGUAGE_CODES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LanguageCode(&'static str);

impl LanguageCode {
    pub const EN_US: LanguageCode = LanguageCode("en-US");

    pub fn parse(code: &str) -> Option<Self> {
        LANGUAGE_CODES
            .iter()
            .find(|c| **c == code)
            .map(|c| LanguageCode(*c))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self::EN_US
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Company {
    pub fn new(website: impl Into<String>) -> Self {
        Self {
            website: website.into(),
            name: None,
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
}

impl Person {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            linkedin_url: None,
            email: None,
            job_title: None,
        }
    }
}

/// A company and optionally a person at it. Used for both `lead` and `user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub company: Company,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
}

impl Lead {
    pub fn new(company: Company) -> Self {
        Self {
            company,
            person: None,
        }
    }

    pub fn with_person(mut self, person: Person) -> Self {
        self.person = Some(person);
        self
    }
}

/// Something that happened to the lead, in the caller's words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationOption {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ClassificationOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// Fields shared by every agent family.
#[derive(Debug, Clone, PartialEq)]
pub struct RunBase {
    pub lead: Lead,
    pub user: Option<Lead>,
    pub events: Option<Vec<Event>>,
    /// Free-format instructions, like a system prompt.
    pub context: Option<String>,
    pub min_research_steps: Option<Number>,
    pub max_research_steps: Option<Number>,
    pub callback_url: Option<String>,
    /// Reuse what previous research runs found about the lead.
    pub use_memory: Option<bool>,
}

impl RunBase {
    pub fn new(lead: Lead) -> Self {
        Self {
            lead,
            user: None,
            events: None,
            context: None,
            min_research_steps: None,
            max_research_steps: None,
            callback_url: None,
            use_memory: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CopywritingParams {
    pub language: LanguageCode,
    /// Number of messages to write, 1 to 10.
    pub sequence_length: u8,
}

impl Default for CopywritingParams {
    fn default() -> Self {
        Self {
            language: LanguageCode::EN_US,
            sequence_length: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassificationParams {
    /// Between 2 and 10 options.
    pub options: Vec<ClassificationOption>,
}

/// Family-specific part of a run request.
#[derive(Debug, Clone, PartialEq)]
pub enum RunParams {
    Research,
    Qualification,
    Copywriting(CopywritingParams),
    Timing,
    Classification(ClassificationParams),
}

impl RunParams {
    /// Params with every family default applied (classification starts without options).
    pub fn defaults_for(family: AgentFamily) -> Self {
        match family {
            AgentFamily::Research => Self::Research,
            AgentFamily::Qualification => Self::Qualification,
            AgentFamily::Copywriting => Self::Copywriting(CopywritingParams::default()),
            AgentFamily::Timing => Self::Timing,
            AgentFamily::Classification => Self::Classification(ClassificationParams::default()),
        }
    }

    pub fn family(&self) -> AgentFamily {
        match self {
            Self::Research => AgentFamily::Research,
            Self::Qualification => AgentFamily::Qualification,
            Self::Copywriting(_) => AgentFamily::Copywriting,
            Self::Timing => AgentFamily::Timing,
            Self::Classification(_) => AgentFamily::Classification,
        }
    }
}

/// A validated request to start an agent run.
///
/// The agent and its family params always agree: values come either from
/// [`RunRequest::from_value`] or from [`RunRequest::new`] + [`RunRequest::with_params`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    agent: AgentKind,
    params: RunParams,
    pub base: RunBase,
    pub metadata: Option<Map<String, Value>>,
}

impl RunRequest {
    pub fn new(agent: AgentKind, lead: Lead) -> Self {
        Self {
            agent,
            params: RunParams::defaults_for(agent.family()),
            base: RunBase::new(lead),
            metadata: None,
        }
    }

    /// Replace the family params; fails when they belong to another family than the agent.
    pub fn with_params(mut self, params: RunParams) -> Result<Self, Error> {
        if params.family() != self.agent.family() {
            return Err(Error::with_context(
                ErrorKind::ValidationError,
                format!(
                    "Invalid request data: {} params do not apply to agent '{}'",
                    params.family(),
                    self.agent
                ),
                ErrorContext::new()
                    .with_field_path("agent")
                    .with_source("request_validator"),
            ));
        }
        self.params = params;
        Ok(self)
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn agent(&self) -> AgentKind {
        self.agent
    }

    pub fn params(&self) -> &RunParams {
        &self.params
    }

    /// Validate an untyped request, applying family defaults.
    pub fn from_value(value: &Value) -> Result<Self, ValidationReport> {
        let mut v = Validator::new();
        let parsed = parse_run_request(&mut v, value);
        v.finish(parsed)
    }
}

#[derive(Serialize)]
struct WireRunRequest<'a> {
    agent: AgentKind,
    lead: &'a Lead,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a Lead>,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<&'a [Event]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_research_steps: Option<&'a Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_research_steps: Option<&'a Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    use_memory: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<LanguageCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sequence_length: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a [ClassificationOption]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a Map<String, Value>>,
}

impl Serialize for RunRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let base = &self.base;
        let (language, sequence_length, options) = match &self.params {
            RunParams::Copywriting(p) => (Some(p.language), Some(p.sequence_length), None),
            RunParams::Classification(p) => (None, None, Some(p.options.as_slice())),
            _ => (None, None, None),
        };
        WireRunRequest {
            agent: self.agent,
            lead: &base.lead,
            user: base.user.as_ref(),
            events: base.events.as_deref(),
            context: base.context.as_deref(),
            min_research_steps: base.min_research_steps.as_ref(),
            max_research_steps: base.max_research_steps.as_ref(),
            callback_url: base.callback_url.as_deref(),
            use_memory: base.use_memory,
            language,
            sequence_length,
            options,
            metadata: self.metadata.as_ref(),
        }
        .serialize(serializer)
    }
}

/// Parameters of `GET /agents/runs/{run}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRunRequest {
    pub run: String,
    /// Optional filter; not sent to the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentKind>,
}

impl GetRunRequest {
    pub fn new(run: impl Into<String>) -> Self {
        Self {
            run: run.into(),
            agent: None,
        }
    }

    pub fn with_agent(mut self, agent: AgentKind) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn from_value(value: &Value) -> Result<Self, ValidationReport> {
        let mut v = Validator::new();
        let parsed = (|| {
            let obj = v.object(value)?;
            let agent = v.optional(obj, "agent", |v, val| {
                v.one_of(val, &AgentKind::tags()).and_then(AgentKind::from_tag)
            });
            let run = v.required(obj, "run", |v, val| v.string(val));
            Some(GetRunRequest {
                run: run?,
                agent: agent?,
            })
        })();
        v.finish(parsed)
    }
}

fn bounded_string(
    v: &mut Validator,
    value: &Value,
    min: Option<(usize, &str)>,
    max: Option<(usize, &str)>,
) -> Option<String> {
    let s = v.string(value)?;
    v.char_bounds(&s, min, max).then_some(s)
}

fn bounded_number(v: &mut Validator, value: &Value, min: f64, max: f64) -> Option<Number> {
    let n = v.json_number(value)?;
    let f = n.as_f64()?;
    v.number_bounds(f, min, max).then_some(n)
}

fn domain_or_url(v: &mut Validator, value: &Value, max: Option<(usize, &str)>) -> Option<String> {
    let s = v.string(value)?;
    let within = v.char_bounds(&s, None, max);
    let valid = v.check(rules::is_valid_domain_or_url(&s), INVALID_DOMAIN_OR_URL);
    (within && valid).then_some(s)
}

fn parse_company(v: &mut Validator, value: &Value) -> Option<Company> {
    let obj = v.object(value)?;
    let website = v.required(obj, "website", |v, val| domain_or_url(v, val, None));
    let name = v.optional(obj, "name", |v, val| {
        bounded_string(
            v,
            val,
            None,
            Some((100, "company name must be less than 100 characters")),
        )
    });
    let description = v.optional(obj, "description", |v, val| {
        bounded_string(
            v,
            val,
            None,
            Some((
                10_000,
                "company description must be less than 10,000 characters",
            )),
        )
    });
    Some(Company {
        website: website?,
        name: name?,
        description: description?,
    })
}

fn parse_person(v: &mut Validator, value: &Value) -> Option<Person> {
    let obj = v.object(value)?;
    let full_name = v.required(obj, "full_name", |v, val| {
        bounded_string(
            v,
            val,
            Some((1, "full name is required")),
            Some((100, "full name must be less than 100 characters")),
        )
    });
    let linkedin_url = v.optional(obj, "linkedin_url", |v, val| {
        domain_or_url(
            v,
            val,
            Some((500, "linkedin url must be less than 500 characters")),
        )
    });
    let email = v.optional(obj, "email", |v, val| {
        let s = v.string(val)?;
        let valid = v.check(rules::is_valid_email(&s), "Invalid email");
        let within = v.char_bounds(
            &s,
            None,
            Some((100, "email must be less than 100 characters")),
        );
        (valid && within).then_some(s)
    });
    let job_title = v.optional(obj, "job_title", |v, val| {
        bounded_string(
            v,
            val,
            None,
            Some((100, "job title must be less than 100 characters")),
        )
    });
    Some(Person {
        full_name: full_name?,
        linkedin_url: linkedin_url?,
        email: email?,
        job_title: job_title?,
    })
}

fn parse_lead(v: &mut Validator, value: &Value) -> Option<Lead> {
    let obj = v.object(value)?;
    let company = v.required(obj, "company", parse_company);
    let person = v.optional(obj, "person", parse_person);
    Some(Lead {
        company: company?,
        person: person?,
    })
}

fn parse_event(v: &mut Validator, value: &Value) -> Option<Event> {
    let obj = v.object(value)?;
    let description = v.required(obj, "description", |v, val| {
        bounded_string(
            v,
            val,
            None,
            Some((
                10_000,
                "event description must be less than 10,000 characters",
            )),
        )
    });
    let timestamp_ms = v.optional(obj, "timestamp_ms", |v, val| v.json_number(val));
    Some(Event {
        description: description?,
        timestamp_ms: timestamp_ms?,
    })
}

fn parse_base(v: &mut Validator, obj: &Map<String, Value>) -> Option<RunBase> {
    let lead = v.required(obj, "lead", parse_lead);
    let user = v.optional(obj, "user", parse_lead);
    let events = v.optional(obj, "events", |v, val| {
        let items = v.array(val)?;
        let within = v.len_bounds(
            items.len(),
            None,
            Some((100, "you can only provide up to 100 events")),
        );
        let events = v.each(items, parse_event);
        events.filter(|_| within)
    });
    let context = v.optional(obj, "context", |v, val| {
        bounded_string(
            v,
            val,
            None,
            Some((10_000, "context must be less than 10,000 characters")),
        )
    });
    let min_research_steps = v.optional(obj, "min_research_steps", |v, val| {
        bounded_number(v, val, 0.0, 20.0)
    });
    let max_research_steps = v.optional(obj, "max_research_steps", |v, val| {
        bounded_number(v, val, 0.0, 100.0)
    });
    let callback_url = v.optional(obj, "callback_url", |v, val| {
        let s = v.string(val)?;
        let is_url = v.check(rules::is_absolute_url(&s), "Invalid url");
        let allowed = v.check(
            rules::is_allowed_callback_url(&s),
            "This callback URL is not allowed",
        );
        (is_url && allowed).then_some(s)
    });
    let use_memory = v.optional(obj, "use_memory", |v, val| v.boolean(val));
    Some(RunBase {
        lead: lead?,
        user: user?,
        events: events?,
        context: context?,
        min_research_steps: min_research_steps?,
        max_research_steps: max_research_steps?,
        callback_url: callback_url?,
        use_memory: use_memory?,
    })
}

fn parse_copywriting(v: &mut Validator, obj: &Map<String, Value>) -> Option<CopywritingParams> {
    let language = v.optional(obj, "language", |v, val| {
        let code = v.string(val)?;
        let parsed = LanguageCode::parse(&code);
        if parsed.is_none() {
            v.report(UNSUPPORTED_LANGUAGE);
        }
        parsed
    });
    let sequence_length = v.optional(obj, "sequence_length", |v, val| {
        let n = v.number(val)?;
        let integer = v.check(n.fract() == 0.0, "Expected integer, received float");
        let within = v.number_bounds(n, 1.0, 10.0);
        (integer && within).then_some(n as u8)
    });
    Some(CopywritingParams {
        language: language?.unwrap_or_default(),
        sequence_length: sequence_length?.unwrap_or(1),
    })
}

fn parse_option(v: &mut Validator, value: &Value) -> Option<ClassificationOption> {
    let obj = v.object(value)?;
    let name = v.required(obj, "name", |v, val| {
        bounded_string(
            v,
            val,
            Some((1, "String must contain at least 1 character(s)")),
            None,
        )
    });
    let description = v.optional(obj, "description", |v, val| v.string(val));
    Some(ClassificationOption {
        name: name?,
        description: description?,
    })
}

fn parse_classification(
    v: &mut Validator,
    obj: &Map<String, Value>,
) -> Option<ClassificationParams> {
    let options = v.required(obj, "options", |v, val| {
        let items = v.array(val)?;
        let within = v.len_bounds(
            items.len(),
            Some((2, "you must provide at least 2 options")),
            Some((10, "you can only provide up to 10 options")),
        );
        let options = v.each(items, parse_option);
        options.filter(|_| within)
    });
    Some(ClassificationParams { options: options? })
}

fn parse_params(
    v: &mut Validator,
    obj: &Map<String, Value>,
    family: AgentFamily,
) -> Option<RunParams> {
    match family {
        AgentFamily::Research => Some(RunParams::Research),
        AgentFamily::Qualification => Some(RunParams::Qualification),
        AgentFamily::Timing => Some(RunParams::Timing),
        AgentFamily::Copywriting => parse_copywriting(v, obj).map(RunParams::Copywriting),
        AgentFamily::Classification => {
            parse_classification(v, obj).map(RunParams::Classification)
        }
    }
}

fn parse_run_request(v: &mut Validator, value: &Value) -> Option<RunRequest> {
    let obj = v.object(value)?;

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

    // An unknown discriminator stops the variant checks; metadata is still checked.
    let variant = agent.and_then(|agent| {
        let base = parse_base(v, obj);
        let params = parse_params(v, obj, agent.family());
        Some((agent, base?, params?))
    });
    let metadata = v.optional(obj, "metadata", |v, val| v.record(val));

    let (agent, base, params) = variant?;
    Some(RunRequest {
        agent,
        params,
        base,
        metadata: metadata?,
    })
}
