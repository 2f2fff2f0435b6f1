//! System prompt composition
//!
//! An [`AgentProfile`] holds the fixed persona of an agent: a one-paragraph
//! description, a list of standing instructions and whether answers should
//! be formatted as markdown. [`AgentProfile::system_prompt`] renders it into
//! the system message sent at the start of every run.

/// Fixed persona and standing instructions of an agent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentProfile {
    pub description: String,
    pub instructions: Vec<String>,
    pub markdown: bool,
}

impl AgentProfile {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            instructions: Vec::new(),
            markdown: false,
        }
    }

    pub fn with_instructions<I, S>(mut self, instructions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions = instructions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }

    /// Render the profile as a system prompt
    ///
    /// ```
    /// use analyst_agent::AgentProfile;
    ///
    /// let prompt = AgentProfile::new("You are a research analyst.")
    ///     .with_instructions(["Cite sources."])
    ///     .with_markdown(true)
    ///     .system_prompt();
    ///
    /// assert!(prompt.starts_with("You are a research analyst."));
    /// assert!(prompt.contains("- Cite sources."));
    /// ```
    pub fn system_prompt(&self) -> String {
        let mut prompt = PromptParts::default().text(self.description.trim());

        if !self.instructions.is_empty() || self.markdown {
            prompt = prompt.section("Instructions");
            for instruction in &self.instructions {
                prompt = prompt.bullet(instruction);
            }
            prompt = prompt.when(self.markdown, |p| {
                p.bullet("Use markdown to format your answers.")
            });
        }

        prompt.build()
    }
}

/// Line-oriented prompt assembly
#[derive(Default)]
struct PromptParts {
    lines: Vec<String>,
}

impl PromptParts {
    fn text(mut self, content: &str) -> Self {
        if !content.is_empty() {
            self.lines.push(content.to_string());
        }
        self
    }

    fn section(mut self, title: &str) -> Self {
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.lines.push(format!("## {title}"));
        self
    }

    /// Bullet item; continuation lines of a multi-line item are indented
    fn bullet(mut self, item: &str) -> Self {
        let mut lines = item.trim().lines();
        if let Some(first) = lines.next() {
            self.lines.push(format!("- {}", first.trim_end()));
        }
        for line in lines {
            let line = line.trim();
            if !line.is_empty() {
                self.lines.push(format!("  {line}"));
            }
        }
        self
    }

    fn when(self, condition: bool, f: impl FnOnce(Self) -> Self) -> Self {
        if condition { f(self) } else { self }
    }

    fn build(self) -> String {
        self.lines.join("\n")
    }
}
