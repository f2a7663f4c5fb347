//! Request, response and capability types shared by the router and the optimization layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// The kind of AI operation a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    TextGeneration,
    Embeddings,
    Classification,
    Summarization,
    Translation,
    Reasoning,
    Creative,
    Analysis,
}

impl Task {
    /// All tasks, in declaration order
    pub const ALL: [Task; 8] = [
        Task::TextGeneration,
        Task::Embeddings,
        Task::Classification,
        Task::Summarization,
        Task::Translation,
        Task::Reasoning,
        Task::Creative,
        Task::Analysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Task::TextGeneration => "text_generation",
            Task::Embeddings => "embeddings",
            Task::Classification => "classification",
            Task::Summarization => "summarization",
            Task::Translation => "translation",
            Task::Reasoning => "reasoning",
            Task::Creative => "creative",
            Task::Analysis => "analysis",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Task {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Task::ALL
            .into_iter()
            .find(|task| task.as_str() == s)
            .ok_or_else(|| format!("unknown task: {}", s))
    }
}

/// Fixed set of task capabilities, stored as a bitset
///
/// Serializes as a list of task names so configuration files stay readable.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TaskSet(u16);

impl TaskSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, task: Task) {
        self.0 |= task.bit();
    }

    pub fn with(mut self, task: Task) -> Self {
        self.insert(task);
        self
    }

    pub fn contains(&self, task: Task) -> bool {
        self.0 & task.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Task> + '_ {
        Task::ALL.into_iter().filter(|task| self.contains(*task))
    }
}

impl FromIterator<Task> for TaskSet {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut set = TaskSet::empty();
        for task in iter {
            set.insert(task);
        }
        set
    }
}

impl<const N: usize> From<[Task; N]> for TaskSet {
    fn from(tasks: [Task; N]) -> Self {
        tasks.into_iter().collect()
    }
}

impl fmt::Debug for TaskSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for TaskSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for TaskSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tasks = Vec::<Task>::deserialize(deserializer)?;
        Ok(tasks.into_iter().collect())
    }
}

/// Caller-declared urgency of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for RequestPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestPriority::Low => "low",
            RequestPriority::Medium => "medium",
            RequestPriority::High => "high",
        };
        f.write_str(s)
    }
}

/// A generic "generate text" request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiRequest {
    pub prompt: String,
    pub task: Task,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub priority: RequestPriority,
    /// Maximum acceptable cost; a soft scoring penalty, never a hard filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
    #[serde(default)]
    pub telemetry_enabled: bool,
}

impl AiRequest {
    pub fn new(prompt: impl Into<String>, task: Task) -> Self {
        Self {
            prompt: prompt.into(),
            task,
            max_tokens: None,
            temperature: None,
            priority: RequestPriority::default(),
            budget: None,
            strategy: None,
            context: None,
            telemetry_enabled: false,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_priority(mut self, priority: RequestPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_telemetry(mut self, enabled: bool) -> Self {
        self.telemetry_enabled = enabled;
        self
    }
}

/// Result of a successful routed call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub tokens_used: u64,
    pub cost: f64,
    #[serde(rename = "latency_ms", with = "duration_ms")]
    pub latency: Duration,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry_id: Option<Uuid>,
}

/// Serialize a `Duration` as whole milliseconds
pub(crate) mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
