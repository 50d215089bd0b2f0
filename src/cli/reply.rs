use crate::Result;
use std::fmt;
use std::io::Write;

/// Overall flavor of a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    /// Nothing went wrong, but nothing changed either
    Warning,
    Error,
}

impl Tone {
    fn marker(self) -> &'static str {
        match self {
            Tone::Success => "✅",
            Tone::Info => "📚",
            Tone::Warning => "⚠️",
            Tone::Error => "❌",
        }
    }
}

/// One `name: value` line under a reply's title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
}

/// Human readable result of a command, ready to be formatted by a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub tone: Tone,
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<Field>,
}

impl Reply {
    pub fn new(tone: Tone, title: impl Into<String>) -> Self {
        Self {
            tone,
            title: title.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(Tone::Success, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(Tone::Info, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(Tone::Warning, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(Tone::Error, title)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.to_string(),
        });
        self
    }

    /// Value of the first field called `name`
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    pub fn is_error(&self) -> bool {
        self.tone == Tone::Error
    }

    /// Convert to exit code
    pub fn exit_code(&self) -> i32 {
        match self.tone {
            Tone::Error => 1,
            Tone::Success | Tone::Info | Tone::Warning => 0,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tone.marker(), self.title)?;
        if let Some(description) = &self.description {
            write!(f, "\n{}", description)?;
        }
        for field in &self.fields {
            write!(f, "\n   {}: {}", field.name, field.value)?;
        }
        Ok(())
    }
}

/// Where replies go once a command has run
pub trait ReplySink {
    fn send(&mut self, reply: Reply) -> Result<()>;
}

/// Collects replies, mostly useful in tests
impl ReplySink for Vec<Reply> {
    fn send(&mut self, reply: Reply) -> Result<()> {
        self.push(reply);
        Ok(())
    }
}

/// Writes each reply as text followed by a blank line
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReplySink for WriterSink<W> {
    fn send(&mut self, reply: Reply) -> Result<()> {
        writeln!(self.writer, "{}\n", reply)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Render an average rating without trailing zeros: `9`, `7.5`, `8.33`
pub fn format_average(average: f64) -> String {
    let rounded = format!("{:.2}", average);
    rounded
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
